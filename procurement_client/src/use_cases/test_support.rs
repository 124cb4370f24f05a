use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::entities::{Alert, ApiResponse, Confirmation, PreparedRequest, RequestSummary};
use crate::domain::errors::{ApiError, TransportError};
use crate::domain::ports::{HttpTransport, KeyValueStore, Navigator, Prompt, ResponseObserver};

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub delete: bool,
}

// In-memory key/value fake that counts writes and can simulate failures.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            writes: Arc::new(Mutex::new(0)),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .expect("entries mutex poisoned")
            .insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn value(&self, key: &str) -> Option<String> {
        let guard = self.entries.lock().expect("entries mutex poisoned");
        guard.get(key).cloned()
    }

    pub(crate) fn writes(&self) -> usize {
        *self.writes.lock().expect("writes mutex poisoned")
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }
        Ok(self.value(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        guard.insert(key.to_string(), value.to_string());
        *self.writes.lock().expect("writes mutex poisoned") += 1;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, String> {
        if self.failures.delete {
            return Err("delete failed".to_string());
        }
        let mut guard = self.entries.lock().expect("entries mutex poisoned");
        Ok(guard.remove(key).is_some())
    }
}

type Responder = Box<dyn Fn(&PreparedRequest) -> Result<ApiResponse, TransportError> + Send + Sync>;

// Transport fake that records every request and answers through a closure.
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<PreparedRequest>>,
    responder: Responder,
}

impl RecordingTransport {
    pub(crate) fn ok() -> Self {
        Self::responding(|_| Ok(ApiResponse::new(StatusCode::OK, b"{}".to_vec())))
    }

    pub(crate) fn with_status(status: StatusCode, body: &'static str) -> Self {
        Self::responding(move |_| Ok(ApiResponse::new(status, body.as_bytes().to_vec())))
    }

    pub(crate) fn failing(error: TransportError) -> Self {
        Self::responding(move |_| Err(error.clone()))
    }

    pub(crate) fn responding(
        responder: impl Fn(&PreparedRequest) -> Result<ApiResponse, TransportError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub(crate) fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().expect("requests mutex poisoned").len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse, TransportError> {
        // Yield so concurrent callers interleave the way real network calls do.
        tokio::task::yield_now().await;
        let result = (self.responder)(&request);
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);
        result
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn routes(&self) -> Vec<String> {
        self.routes.lock().expect("routes mutex poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes
            .lock()
            .expect("routes mutex poisoned")
            .push(route.to_string());
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    successes: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub(crate) fn successes(&self) -> Vec<String> {
        self.successes.lock().expect("observer mutex poisoned").clone()
    }

    pub(crate) fn failures(&self) -> Vec<String> {
        self.failures.lock().expect("observer mutex poisoned").clone()
    }
}

impl ResponseObserver for RecordingObserver {
    fn on_success(&self, request: &RequestSummary, response: &ApiResponse) {
        self.successes
            .lock()
            .expect("observer mutex poisoned")
            .push(format!("{} {} {}", request.method, request.url, response.status.as_u16()));
    }

    fn on_failure(&self, error: &ApiError) {
        self.failures
            .lock()
            .expect("observer mutex poisoned")
            .push(error.to_string());
    }
}

// Prompt fake: records dialogs and answers confirmations with a fixed choice.
pub(crate) struct RecordingPrompt {
    pub alerts: Mutex<Vec<Alert>>,
    pub confirmations: Mutex<Vec<Confirmation>>,
    pub answer: bool,
}

impl RecordingPrompt {
    pub(crate) fn answering(answer: bool) -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub(crate) fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().expect("alerts mutex poisoned").clone()
    }

    pub(crate) fn confirmations(&self) -> Vec<Confirmation> {
        self.confirmations
            .lock()
            .expect("confirmations mutex poisoned")
            .clone()
    }
}

impl Prompt for RecordingPrompt {
    fn alert(&self, alert: &Alert) {
        self.alerts
            .lock()
            .expect("alerts mutex poisoned")
            .push(alert.clone());
    }

    fn confirm(&self, confirmation: &Confirmation) -> bool {
        self.confirmations
            .lock()
            .expect("confirmations mutex poisoned")
            .push(confirmation.clone());
        self.answer
    }
}
