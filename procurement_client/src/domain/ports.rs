use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::domain::entities::{Alert, ApiResponse, Confirmation, PreparedRequest, RequestSummary};
use crate::domain::errors::{ApiError, DecorateError, TransportError};

// Port for string key/value storage (bearer token store, cookie jar).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn delete(&self, key: &str) -> Result<bool, String>;
}

// Port for the network. Returns any HTTP status as `Ok`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse, TransportError>;
}

// One step of the outgoing header pipeline.
pub trait RequestDecorator: Send + Sync {
    fn name(&self) -> &'static str;
    fn decorate(&self, headers: &mut HeaderMap) -> Result<(), DecorateError>;
}

// Observes every settled request, in registration order.
pub trait ResponseObserver: Send + Sync {
    fn on_success(&self, request: &RequestSummary, response: &ApiResponse);
    fn on_failure(&self, error: &ApiError);
}

// Port for moving the embedding application to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

// Port for user-facing dialogs. Both calls return once the dialog is closed.
pub trait Prompt: Send + Sync {
    fn alert(&self, alert: &Alert);
    fn confirm(&self, confirmation: &Confirmation) -> bool;
}
