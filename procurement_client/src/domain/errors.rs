use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::fmt;

// Failure reported by a transport before any response arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    Timeout,
    Connect(String),
    // The transport could not build the request at all.
    Builder(String),
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Connect(err) => write!(f, "connection failed: {err}"),
            TransportError::Builder(err) => write!(f, "invalid request: {err}"),
            TransportError::Other(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl std::error::Error for TransportError {}

// Error surfaced to callers of every API operation.
#[derive(Clone, Debug)]
pub enum ApiError {
    // The server answered with a non-2xx status.
    Response {
        method: Method,
        url: String,
        status: StatusCode,
        body: Value,
    },
    // The request was sent but no response arrived.
    NoResponse {
        method: Method,
        url: String,
        source: TransportError,
    },
    // The request could not be constructed.
    Setup {
        method: Method,
        target: String,
        message: String,
    },
}

impl ApiError {
    pub fn setup(method: Method, target: impl Into<String>, message: impl fmt::Display) -> Self {
        ApiError::Setup {
            method,
            target: target.into(),
            message: message.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn response_body(&self) -> Option<&Value> {
        match self {
            ApiError::Response { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Response {
                method,
                url,
                status,
                ..
            } => write!(f, "api error [{method}] {url}: {status}"),
            ApiError::NoResponse {
                method,
                url,
                source,
            } => write!(f, "no response for [{method}] {url}: {source}"),
            ApiError::Setup {
                method,
                target,
                message,
            } => write!(f, "failed to build [{method}] {target}: {message}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::NoResponse { source, .. } => Some(source),
            _ => None,
        }
    }
}

// Failure inside a request decorator. Never reaches callers.
#[derive(Debug)]
pub enum DecorateError {
    Storage(String),
    InvalidHeader(String),
}

impl fmt::Display for DecorateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecorateError::Storage(err) => write!(f, "storage read failed: {err}"),
            DecorateError::InvalidHeader(err) => write!(f, "invalid header value: {err}"),
        }
    }
}

impl std::error::Error for DecorateError {}
