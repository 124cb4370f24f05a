use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

// Which environment the client runs in. Controls the CSRF fallback token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionMode {
    Development,
    Production,
}

impl ExecutionMode {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "production" || v == "prod" => ExecutionMode::Production,
            _ => ExecutionMode::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, ExecutionMode::Production)
    }
}

// Fully built request handed to the transport.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    // Only the CSRF priming request carries a timeout.
    pub timeout: Option<Duration>,
}

// Method and URL of an issued request, kept for logging.
#[derive(Clone, Debug)]
pub struct RequestSummary {
    pub method: Method,
    pub url: String,
}

// Response as returned by the transport. The body is kept raw so blob
// downloads and JSON payloads share one type.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    // Decode the body into a typed payload.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    // Body as loose JSON; empty or non-JSON bodies yield `Value::Null`.
    pub fn data(&self) -> Value {
        if self.body.is_empty() {
            return Value::Null;
        }
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertIcon {
    Error,
    Success,
    Question,
}

// A modal message shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub icon: AlertIcon,
    pub title: String,
    pub text: String,
}

// A yes/no question shown to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub title: String,
    pub text: String,
    pub confirm_text: String,
    pub cancel_text: String,
}
