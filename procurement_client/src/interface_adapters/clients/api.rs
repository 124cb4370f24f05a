use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::domain::entities::{ApiResponse, PreparedRequest, RequestSummary};
use crate::domain::errors::{ApiError, TransportError};
use crate::domain::ports::{HttpTransport, RequestDecorator, ResponseObserver};

/// Shared HTTP client core used by every service wrapper.
///
/// Holds the API base address, default JSON headers and the pipeline composed
/// at build time: decorators run in order before each request, observers run
/// in order once it settles. Non-2xx statuses come back as
/// [`ApiError::Response`]; nothing is retried.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    default_headers: HeaderMap,
    decorators: Vec<Arc<dyn RequestDecorator>>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

pub struct ApiClientBuilder {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    default_headers: HeaderMap,
    decorators: Vec<Arc<dyn RequestDecorator>>,
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl ApiClientBuilder {
    pub fn decorator(mut self, decorator: Arc<dyn RequestDecorator>) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            base_url: self.base_url,
            transport: self.transport,
            default_headers: self.default_headers,
            decorators: self.decorators,
            observers: self.observers,
        }
    }
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> ApiClientBuilder {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        ApiClientBuilder {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            default_headers,
            decorators: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn get_with<Q>(&self, path: &str, query: &Q) -> Result<ApiResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let query = self.encode(&Method::GET, path, query)?;
        self.send(Method::GET, path, Some(query), None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode(&Method::POST, path, body)?;
        self.send(Method::POST, path, None, Some(body)).await
    }

    pub async fn post_empty(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::POST, path, None, None).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode(&Method::PUT, path, body)?;
        self.send(Method::PUT, path, None, Some(body)).await
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode(&Method::PATCH, path, body)?;
        self.send(Method::PATCH, path, None, Some(body)).await
    }

    pub async fn patch_empty(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::PATCH, path, None, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, path, None, None).await
    }

    /// Issues one request through the full pipeline.
    ///
    /// `query` must be a JSON object (or null); arrays become repeated
    /// `key[]` pairs and null entries are skipped.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<Value>,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        // Build the full request, decorators included, before touching the network.
        let request = self
            .prepare(method.clone(), path, query.as_ref(), body.as_ref())
            .map_err(|err| self.fail(err))?;
        let summary = RequestSummary {
            method: method.clone(),
            url: request.url.to_string(),
        };

        // Builder errors mean the request was unusable; anything else got no response.
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(TransportError::Builder(message)) => {
                return Err(self.fail(ApiError::Setup {
                    method,
                    target: summary.url,
                    message,
                }));
            }
            Err(source) => {
                return Err(self.fail(ApiError::NoResponse {
                    method,
                    url: summary.url,
                    source,
                }));
            }
        };

        // Keep upstream status and body so callers can branch on them.
        if !response.status.is_success() {
            return Err(self.fail(ApiError::Response {
                method,
                url: summary.url,
                status: response.status,
                body: response.data(),
            }));
        }

        // Observers see successes in registration order.
        for observer in &self.observers {
            observer.on_success(&summary, &response);
        }
        Ok(response)
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<&Value>,
    ) -> Result<PreparedRequest, ApiError> {
        // Compose the target URL from the base address and append the query.
        let target = format!("{}{}", self.base_url, path);
        let mut url =
            Url::parse(&target).map_err(|err| ApiError::setup(method.clone(), &target, err))?;
        if let Some(query) = query {
            append_query(&mut url, query)
                .map_err(|err| ApiError::setup(method.clone(), &target, err))?;
        }

        // Serialize the JSON body up front so encoding errors surface as setup errors.
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| ApiError::setup(method.clone(), &target, err))?;

        // Default headers first, then each decorator adds its own.
        let mut headers = self.default_headers.clone();
        self.decorate(&mut headers);

        Ok(PreparedRequest {
            method,
            url,
            headers,
            body,
            timeout: None,
        })
    }

    // A failing decorator contributes nothing; the request still goes out.
    fn decorate(&self, headers: &mut HeaderMap) {
        for decorator in &self.decorators {
            let mut scratch = HeaderMap::new();
            match decorator.decorate(&mut scratch) {
                Ok(()) => {
                    for (name, value) in &scratch {
                        headers.insert(name.clone(), value.clone());
                    }
                }
                Err(err) => {
                    warn!(decorator = decorator.name(), error = %err, "request decorator failed");
                }
            }
        }
    }

    fn encode<T>(&self, method: &Method, path: &str, value: &T) -> Result<Value, ApiError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_value(value)
            .map_err(|err| self.fail(ApiError::setup(method.clone(), path, err)))
    }

    fn fail(&self, error: ApiError) -> ApiError {
        for observer in &self.observers {
            observer.on_failure(&error);
        }
        error
    }
}

fn append_query(url: &mut Url, query: &Value) -> Result<(), String> {
    let entries = match query {
        Value::Null => return Ok(()),
        Value::Object(entries) => entries,
        _ => return Err("query parameters must serialize to a map".to_string()),
    };

    let mut pairs = Vec::new();
    for (key, value) in entries {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                let key = format!("{key}[]");
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((key.clone(), query_value(item)));
                }
            }
            other => pairs.push((key.clone(), query_value(other))),
        }
    }

    if !pairs.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
    }
    Ok(())
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
