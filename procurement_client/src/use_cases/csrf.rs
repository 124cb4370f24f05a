use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{ExecutionMode, PreparedRequest};
use crate::domain::errors::ApiError;
use crate::domain::ports::{HttpTransport, KeyValueStore};

// Cookie set by the backend and echoed back in the CSRF header.
pub const XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
pub const XSRF_HEADER_NAME: &str = "x-xsrf-token";

// Priming endpoints live on the API origin, outside the `/api` prefix.
pub const PRIMING_PATH: &str = "/sanctum/csrf-cookie";
pub const FALLBACK_PRIMING_PATH: &str = "/csrf-cookie";

pub const DEFAULT_PRIMING_TIMEOUT: Duration = Duration::from_millis(5000);

const DEV_FALLBACK_PREFIX: &str = "dev-fallback-csrf-";
const FALLBACK_SUFFIX_LEN: usize = 11;

// Everything `encodeURIComponent` escapes.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Reads the anti-forgery token out of the cookie store.
///
/// In development mode a missing cookie is replaced by a locally generated
/// placeholder that is written back so later reads agree. Production mode
/// never fabricates a token.
pub struct CsrfTokenReader {
    cookies: Arc<dyn KeyValueStore>,
    mode: ExecutionMode,
}

impl CsrfTokenReader {
    pub fn new(cookies: Arc<dyn KeyValueStore>, mode: ExecutionMode) -> Self {
        Self { cookies, mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn read(&self) -> Result<Option<String>, String> {
        if let Some(raw) = self.cookies.get(XSRF_COOKIE_NAME)? {
            let token = decode_cookie_value(&raw);
            if token.is_empty() {
                return Ok(None);
            }
            debug!(token_prefix = %preview(&token), "csrf token found");
            return Ok(Some(token));
        }

        if self.mode.is_production() {
            warn!("XSRF-TOKEN cookie not found");
            return Ok(None);
        }

        warn!("XSRF-TOKEN cookie not found, creating fallback token");
        let token = fallback_token();
        self.cookies
            .set(XSRF_COOKIE_NAME, &encode_cookie_value(&token))?;
        Ok(Some(token))
    }
}

/// Makes sure the CSRF cookie exists before mutating calls.
///
/// Presence of a readable token short-circuits the network call. Two callers
/// racing before the cookie exists may both prime; the endpoint is idempotent
/// and the cookie store keeps a single value per name.
pub struct CsrfTokenAcquirer {
    reader: Arc<CsrfTokenReader>,
    transport: Arc<dyn HttpTransport>,
    origin: String,
    timeout: Duration,
}

impl CsrfTokenAcquirer {
    pub fn new(
        reader: Arc<CsrfTokenReader>,
        transport: Arc<dyn HttpTransport>,
        origin: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            reader,
            transport,
            origin: origin.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn reader(&self) -> &Arc<CsrfTokenReader> {
        &self.reader
    }

    pub fn read_token(&self) -> Result<Option<String>, String> {
        self.reader.read()
    }

    // Never fails: `false` means "proceed without a guaranteed token".
    pub async fn ensure_token(&self) -> bool {
        match self.reader.read() {
            Ok(Some(_)) => {
                debug!("csrf token already exists, reusing it");
                return true;
            }
            Ok(None) => {}
            Err(err) => {
                error!(error = %err, "failed to read csrf token");
                return false;
            }
        }

        match self.prime(PRIMING_PATH).await {
            Ok(()) => {
                info!("csrf cookie retrieved successfully");
                true
            }
            Err(err) => {
                error!(error = %err, "failed to fetch csrf token");
                false
            }
        }
    }

    // Only used at startup when the primary endpoint did not answer.
    pub async fn prime_fallback(&self) -> bool {
        match self.prime(FALLBACK_PRIMING_PATH).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "fallback csrf endpoint failed");
                false
            }
        }
    }

    async fn prime(&self, path: &str) -> Result<(), ApiError> {
        let target = format!("{}{}", self.origin, path);
        let url = Url::parse(&target).map_err(|err| ApiError::setup(Method::GET, &target, err))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let request = PreparedRequest {
            method: Method::GET,
            url,
            headers,
            body: None,
            timeout: Some(self.timeout),
        };

        // The server sets the cookie as a side effect; the body is ignored.
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| ApiError::NoResponse {
                method: Method::GET,
                url: target.clone(),
                source,
            })?;

        if response.status.is_success() {
            return Ok(());
        }

        Err(ApiError::Response {
            method: Method::GET,
            url: target,
            status: response.status,
            body: response.data(),
        })
    }
}

pub fn decode_cookie_value(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

pub fn encode_cookie_value(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn fallback_token() -> String {
    let mut seed = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(FALLBACK_SUFFIX_LEN);
    for _ in 0..FALLBACK_SUFFIX_LEN {
        let digit = (seed % 36) as u32;
        suffix.push(char::from_digit(digit, 36).unwrap_or('0'));
        seed /= 36;
    }
    format!("{DEV_FALLBACK_PREFIX}{suffix}")
}

fn preview(token: &str) -> String {
    let head: String = token.chars().take(10).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ApiResponse;
    use crate::domain::errors::TransportError;
    use crate::use_cases::test_support::{FailureFlags, RecordingStore, RecordingTransport};
    use reqwest::StatusCode;

    fn acquirer(
        store: &RecordingStore,
        transport: &Arc<RecordingTransport>,
        mode: ExecutionMode,
    ) -> CsrfTokenAcquirer {
        let reader = Arc::new(CsrfTokenReader::new(Arc::new(store.clone()), mode));
        CsrfTokenAcquirer::new(
            reader,
            transport.clone(),
            "http://localhost:8000",
            DEFAULT_PRIMING_TIMEOUT,
        )
    }

    // Transport that behaves like the backend: priming sets the cookie.
    fn priming_backend(store: &RecordingStore) -> Arc<RecordingTransport> {
        let cookies = store.clone();
        Arc::new(RecordingTransport::responding(move |request| {
            if request.url.path().ends_with("csrf-cookie") {
                cookies
                    .set(XSRF_COOKIE_NAME, "server%2Btoken%3D%3D")
                    .expect("cookie write");
            }
            Ok(ApiResponse::new(StatusCode::NO_CONTENT, Vec::new()))
        }))
    }

    #[test]
    fn when_cookie_is_encoded_then_reader_returns_decoded_value() {
        let store = RecordingStore::new().with_entry(XSRF_COOKIE_NAME, "abc%2Bdef%3D%3D");
        let reader = CsrfTokenReader::new(Arc::new(store.clone()), ExecutionMode::Production);

        let token = reader.read().expect("read should succeed");

        assert_eq!(token.as_deref(), Some("abc+def=="));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn when_cookie_is_missing_in_development_then_one_fallback_is_created_and_reused() {
        let store = RecordingStore::new();
        let reader = CsrfTokenReader::new(Arc::new(store.clone()), ExecutionMode::Development);

        let first = reader
            .read()
            .expect("read should succeed")
            .expect("fallback token expected");
        let second = reader
            .read()
            .expect("read should succeed")
            .expect("stored fallback expected");

        assert!(first.starts_with("dev-fallback-csrf-"));
        assert_eq!(first.len(), "dev-fallback-csrf-".len() + 11);
        assert_eq!(first, second);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.value(XSRF_COOKIE_NAME), Some(first));
    }

    #[test]
    fn when_cookie_is_missing_in_production_then_reader_returns_none_without_writing() {
        let store = RecordingStore::new();
        let reader = CsrfTokenReader::new(Arc::new(store.clone()), ExecutionMode::Production);

        assert_eq!(reader.read().expect("read should succeed"), None);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn when_cookie_store_fails_then_reader_returns_error() {
        let store = RecordingStore::new().with_failures(FailureFlags {
            get: true,
            ..FailureFlags::default()
        });
        let reader = CsrfTokenReader::new(Arc::new(store), ExecutionMode::Development);

        assert!(reader.read().is_err());
    }

    #[tokio::test]
    async fn when_token_exists_then_ensure_token_performs_no_network_call() {
        let store = RecordingStore::new().with_entry(XSRF_COOKIE_NAME, "existing");
        let transport = Arc::new(RecordingTransport::ok());
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        assert!(acquirer.ensure_token().await);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn when_token_is_missing_then_ensure_token_primes_sanctum_endpoint_with_timeout() {
        let store = RecordingStore::new();
        let transport = priming_backend(&store);
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        assert!(acquirer.ensure_token().await);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "http://localhost:8000/sanctum/csrf-cookie"
        );
        assert_eq!(requests[0].timeout, Some(DEFAULT_PRIMING_TIMEOUT));
        assert_eq!(
            acquirer.read_token().expect("read"),
            Some("server+token==".to_string())
        );
    }

    #[tokio::test]
    async fn when_priming_times_out_then_ensure_token_returns_false() {
        let store = RecordingStore::new();
        let transport = Arc::new(RecordingTransport::failing(TransportError::Timeout));
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        assert!(!acquirer.ensure_token().await);
    }

    #[tokio::test]
    async fn when_priming_returns_server_error_then_ensure_token_returns_false() {
        let store = RecordingStore::new();
        let transport = Arc::new(RecordingTransport::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "{}",
        ));
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        assert!(!acquirer.ensure_token().await);
    }

    #[tokio::test]
    async fn when_fallback_priming_is_requested_then_csrf_cookie_path_is_used() {
        let store = RecordingStore::new();
        let transport = priming_backend(&store);
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        assert!(acquirer.prime_fallback().await);
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://localhost:8000/csrf-cookie"
        );
    }

    #[tokio::test]
    async fn when_two_callers_race_before_cookie_exists_then_both_succeed_with_one_cookie() {
        let store = RecordingStore::new();
        let transport = priming_backend(&store);
        let acquirer = acquirer(&store, &transport, ExecutionMode::Production);

        let (first, second) = tokio::join!(acquirer.ensure_token(), acquirer.ensure_token());

        assert!(first && second);
        // Both may prime; the cookie still converges to one value.
        assert!((1..=2).contains(&transport.request_count()));
        assert_eq!(
            acquirer.read_token().expect("read"),
            Some("server+token==".to_string())
        );
    }

    #[tokio::test]
    async fn when_two_callers_race_in_development_then_one_fallback_value_remains() {
        let store = RecordingStore::new();
        let transport = Arc::new(RecordingTransport::ok());
        let acquirer = acquirer(&store, &transport, ExecutionMode::Development);

        let (first, second) = tokio::join!(acquirer.ensure_token(), acquirer.ensure_token());

        assert!(first && second);
        assert_eq!(transport.request_count(), 0);
        let stored = store.value(XSRF_COOKIE_NAME).expect("fallback cookie stored");
        assert_eq!(acquirer.read_token().expect("read"), Some(stored));
    }

    #[test]
    fn encode_matches_uri_component_rules() {
        assert_eq!(encode_cookie_value("a b+c=/"), "a%20b%2Bc%3D%2F");
        assert_eq!(encode_cookie_value("dev-fallback_x.y"), "dev-fallback_x.y");
    }
}
