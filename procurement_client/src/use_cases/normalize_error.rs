use serde_json::{Map, Value};
use tracing::error;

use crate::domain::entities::{Alert, AlertIcon, Confirmation};
use crate::domain::errors::ApiError;
use crate::domain::ports::Prompt;

pub const DEFAULT_FALLBACK_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi nanti.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Tidak dapat terhubung ke server. Periksa koneksi internet Anda.";

const ERROR_TITLE: &str = "Error";
const SUCCESS_TITLE: &str = "Berhasil";
const CONFIRM_TITLE: &str = "Konfirmasi";
const CONFIRM_TEXT: &str = "Ya";
const CANCEL_TEXT: &str = "Tidak";

pub type Callback = Box<dyn FnOnce() + Send>;

// Display-ready view of a failed call.
#[derive(Debug, Clone)]
pub struct NormalizedError {
    pub message: String,
    // Field name to validation messages, as sent by the server.
    pub details: Option<Map<String, Value>>,
    pub original: ApiError,
}

pub struct HandleOptions {
    pub show_alert: bool,
    pub fallback_message: String,
    pub callback: Option<Callback>,
}

impl Default for HandleOptions {
    fn default() -> Self {
        Self {
            show_alert: true,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            callback: None,
        }
    }
}

impl HandleOptions {
    pub fn silent() -> Self {
        Self {
            show_alert: false,
            ..Self::default()
        }
    }

    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn callback(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }
}

// Overrides for the confirmation dialog defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfirmationOptions {
    pub title: Option<String>,
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
}

/// Resolves the message and validation details for a failed call.
///
/// Server `message` wins over the fallback, flattened `errors` win over
/// both. Without a response the network message is used; a request that was
/// never built keeps the fallback.
pub fn normalize(error: ApiError, fallback_message: &str) -> NormalizedError {
    let mut message = fallback_message.to_string();
    let mut details = None;

    match &error {
        ApiError::Response { status, body, .. } => {
            if let Some(text) = body.get("message").and_then(Value::as_str) {
                if !text.is_empty() {
                    message = text.to_string();
                }
            }

            if let Some(errors) = body.get("errors").and_then(Value::as_object) {
                let flattened = flatten_messages(errors);
                if !flattened.is_empty() {
                    message = flattened.join(", ");
                }
                details = Some(errors.clone());
            }

            error!(status = status.as_u16(), %message, %body, "api error");
        }
        ApiError::NoResponse { url, source, .. } => {
            error!(%url, error = %source, "network error");
            message = NETWORK_ERROR_MESSAGE.to_string();
        }
        ApiError::Setup {
            target,
            message: cause,
            ..
        } => {
            error!(%target, error = %cause, "request error");
        }
    }

    NormalizedError {
        message,
        details,
        original: error,
    }
}

// Normalizes the error and, unless silenced, shows it before running the callback.
pub fn handle_api_error(
    error: ApiError,
    options: HandleOptions,
    prompt: &dyn Prompt,
) -> NormalizedError {
    let normalized = normalize(error, &options.fallback_message);

    if options.show_alert {
        prompt.alert(&Alert {
            icon: AlertIcon::Error,
            title: ERROR_TITLE.to_string(),
            text: normalized.message.clone(),
        });
        if let Some(callback) = options.callback {
            callback();
        }
    }

    normalized
}

pub fn show_success_notification(prompt: &dyn Prompt, message: &str, callback: Option<Callback>) {
    prompt.alert(&Alert {
        icon: AlertIcon::Success,
        title: SUCCESS_TITLE.to_string(),
        text: message.to_string(),
    });
    if let Some(callback) = callback {
        callback();
    }
}

// Asks the user and runs the matching continuation. Returns the answer.
pub fn show_confirmation(
    prompt: &dyn Prompt,
    message: &str,
    options: ConfirmationOptions,
    on_confirm: impl FnOnce(),
    on_cancel: Option<Box<dyn FnOnce()>>,
) -> bool {
    let confirmation = Confirmation {
        title: options.title.unwrap_or_else(|| CONFIRM_TITLE.to_string()),
        text: message.to_string(),
        confirm_text: options
            .confirm_text
            .unwrap_or_else(|| CONFIRM_TEXT.to_string()),
        cancel_text: options.cancel_text.unwrap_or_else(|| CANCEL_TEXT.to_string()),
    };

    let confirmed = prompt.confirm(&confirmation);
    if confirmed {
        on_confirm();
    } else if let Some(on_cancel) = on_cancel {
        on_cancel();
    }
    confirmed
}

fn flatten_messages(errors: &Map<String, Value>) -> Vec<String> {
    let mut messages = Vec::new();
    for value in errors.values() {
        match value {
            Value::Array(items) => messages.extend(items.iter().map(display_value)),
            other => messages.push(display_value(other)),
        }
    }
    messages
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
