use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::entities::{ApiResponse, RequestSummary};
use crate::domain::errors::{ApiError, DecorateError};
use crate::domain::ports::{KeyValueStore, Navigator, RequestDecorator, ResponseObserver};
use crate::use_cases::csrf::{CsrfTokenReader, XSRF_HEADER_NAME};

// Key of the bearer token in the durable store.
pub const TOKEN_STORAGE_KEY: &str = "token";
// Route the application is sent to when the session is rejected.
pub const LOGIN_ROUTE: &str = "/";

// Attaches `Authorization: Bearer <token>` when a token is stored.
pub struct BearerTokenDecorator {
    store: Arc<dyn KeyValueStore>,
}

impl BearerTokenDecorator {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl RequestDecorator for BearerTokenDecorator {
    fn name(&self) -> &'static str {
        "bearer_token"
    }

    fn decorate(&self, headers: &mut HeaderMap) -> Result<(), DecorateError> {
        let token = self
            .store
            .get(TOKEN_STORAGE_KEY)
            .map_err(DecorateError::Storage)?;

        if let Some(token) = token.filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| DecorateError::InvalidHeader(err.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

// Copies the decoded CSRF cookie into the header the backend checks.
pub struct CsrfHeaderDecorator {
    reader: Arc<CsrfTokenReader>,
}

impl CsrfHeaderDecorator {
    pub fn new(reader: Arc<CsrfTokenReader>) -> Self {
        Self { reader }
    }
}

impl RequestDecorator for CsrfHeaderDecorator {
    fn name(&self) -> &'static str {
        "csrf_header"
    }

    fn decorate(&self, headers: &mut HeaderMap) -> Result<(), DecorateError> {
        if let Some(token) = self.reader.read().map_err(DecorateError::Storage)? {
            let value = HeaderValue::from_str(&token)
                .map_err(|err| DecorateError::InvalidHeader(err.to_string()))?;
            headers.insert(HeaderName::from_static(XSRF_HEADER_NAME), value);
        }
        Ok(())
    }
}

// Logs every settled request. Never touches the response.
pub struct LoggingObserver;

impl ResponseObserver for LoggingObserver {
    fn on_success(&self, request: &RequestSummary, response: &ApiResponse) {
        info!(
            method = %request.method,
            url = %request.url,
            status = response.status.as_u16(),
            "api success"
        );
    }

    fn on_failure(&self, error: &ApiError) {
        match error {
            ApiError::Response {
                method,
                url,
                status,
                body,
            } => error!(
                %method,
                %url,
                status = status.as_u16(),
                %body,
                "api error response"
            ),
            ApiError::NoResponse {
                method,
                url,
                source,
            } => error!(%method, %url, error = %source, "api request error (no response)"),
            ApiError::Setup {
                method,
                target,
                message,
            } => error!(%method, %target, error = %message, "api request setup failed"),
        }
    }
}

/// Clears the stored session and sends the app to the login route on 401.
///
/// The failure itself still reaches the caller; this only runs the side
/// effects.
pub struct SessionExpiryObserver {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionExpiryObserver {
    pub fn new(store: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }
}

impl ResponseObserver for SessionExpiryObserver {
    fn on_success(&self, _request: &RequestSummary, _response: &ApiResponse) {}

    fn on_failure(&self, error: &ApiError) {
        if !error.is_unauthorized() {
            return;
        }

        info!("unauthorized, redirecting to login");
        if let Err(err) = self.store.delete(TOKEN_STORAGE_KEY) {
            warn!(error = %err, "failed to clear session token");
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }
}
