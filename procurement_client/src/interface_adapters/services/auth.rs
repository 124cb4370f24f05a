use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::domain::entities::ApiResponse;
use crate::domain::errors::ApiError;
use crate::domain::ports::KeyValueStore;
use crate::interface_adapters::clients::ApiClient;
use crate::use_cases::csrf::CsrfTokenAcquirer;
use crate::use_cases::pipeline::TOKEN_STORAGE_KEY;

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Hand-written so the password never reaches a log line.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login, logout and account endpoints plus the stored bearer token.
///
/// Login does not persist the returned token; callers pick it out of the
/// response and hand it to [`AuthService::set_token`].
pub struct AuthService {
    api: Arc<ApiClient>,
    csrf: Arc<CsrfTokenAcquirer>,
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(
        api: Arc<ApiClient>,
        csrf: Arc<CsrfTokenAcquirer>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self { api, csrf, store }
    }

    #[instrument(skip(self), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, ApiError> {
        // The session cookie must exist before the login POST.
        self.csrf.ensure_token().await;
        self.api.post("/login", credentials).await
    }

    pub async fn logout(&self) -> Result<ApiResponse, ApiError> {
        self.api.post_empty("/logout").await
    }

    pub async fn get_user(&self) -> Result<ApiResponse, ApiError> {
        self.api.get("/user").await
    }

    pub async fn reset_password(&self, email: &str) -> Result<ApiResponse, ApiError> {
        self.api
            .post("/password/reset", &json!({ "email": email }))
            .await
    }

    pub async fn change_password<B>(&self, data: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.api.post("/password/change", data).await
    }

    pub fn set_token(&self, token: &str) -> Result<(), String> {
        self.store.set(TOKEN_STORAGE_KEY, token)
    }

    pub fn get_token(&self) -> Result<Option<String>, String> {
        self.store.get(TOKEN_STORAGE_KEY)
    }

    pub fn remove_token(&self) -> Result<(), String> {
        self.store.delete(TOKEN_STORAGE_KEY).map(|_| ())
    }

    pub fn is_logged_in(&self) -> bool {
        match self.get_token() {
            Ok(token) => token.is_some_and(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "failed to read session token");
                false
            }
        }
    }
}
