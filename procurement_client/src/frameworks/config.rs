use std::path::PathBuf;
use std::{env, fmt, time::Duration};
use url::Url;

use crate::domain::entities::ExecutionMode;
use crate::use_cases::csrf::DEFAULT_PRIMING_TIMEOUT;

// Runtime settings, read from the environment with defaults.

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_STORAGE_PATH: &str = "procurement_session.toml";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    api_base_url: String,
    // Derived from `api_base_url` once, at construction.
    origin: String,
    api_host: String,
    pub mode: ExecutionMode,
    pub csrf_timeout: Duration,
    pub storage_path: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidApiUrl { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidApiUrl { value, reason } => {
                write!(f, "invalid PROCUREMENT_API_URL {value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>, mode: ExecutionMode) -> Result<Self, ConfigError> {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        let invalid = |reason: String| ConfigError::InvalidApiUrl {
            value: api_base_url.clone(),
            reason,
        };

        let url = Url::parse(&api_base_url).map_err(|err| invalid(err.to_string()))?;
        let api_host = url
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?
            .to_ascii_lowercase();

        // Priming endpoints sit beside the API prefix, so only a trailing
        // `/api` path segment is dropped. The host is never touched.
        let path = url.path().trim_end_matches('/');
        let prefix = path.strip_suffix("/api").unwrap_or(path);
        let origin = format!("{}{prefix}", url.origin().ascii_serialization());

        Ok(Self {
            api_base_url,
            origin,
            api_host,
            mode,
            csrf_timeout: DEFAULT_PRIMING_TIMEOUT,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Same as `from_env` with an injectable source, so tests never touch the
    // process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base_url =
            lookup("PROCUREMENT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mode = ExecutionMode::from_env_value(lookup("APP_ENV").as_deref());
        let mut config = Self::new(api_base_url, mode)?;

        if let Some(millis) = lookup("CSRF_PRIMING_TIMEOUT_MS").and_then(|v| v.parse::<u64>().ok())
        {
            config.csrf_timeout = Duration::from_millis(millis);
        }
        if let Some(path) = lookup("PROCUREMENT_STORAGE_PATH").filter(|v| !v.is_empty()) {
            config.storage_path = PathBuf::from(path);
        }
        Ok(config)
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Base address the priming endpoints live on.
    ///
    /// `http://localhost:8000/api` becomes `http://localhost:8000`; a base
    /// without a trailing `/api` segment is used as is.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    // Host the session cookies belong to.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    pub fn with_csrf_timeout(mut self, timeout: Duration) -> Self {
        self.csrf_timeout = timeout;
        self
    }

    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }
}
