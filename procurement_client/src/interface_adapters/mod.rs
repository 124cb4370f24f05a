// Interface adapters: the HTTP client core, REST service wrappers and the
// concrete transport/storage/navigation/prompt implementations.

pub mod clients;
pub mod navigator;
pub mod prompt;
pub mod services;
pub mod storage;
pub mod transport;
