pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::entities::{ApiResponse, ExecutionMode};
pub use domain::errors::ApiError;
pub use frameworks::bootstrap::run;
pub use frameworks::config::ClientConfig;
pub use frameworks::context::{ClientContext, ContextParts};
