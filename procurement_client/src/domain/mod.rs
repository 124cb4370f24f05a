// Domain layer: request/response entities, error taxonomy and ports.

pub mod entities;
pub mod errors;
pub mod ports;
