use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::domain::entities::{ApiResponse, PreparedRequest};
use crate::domain::errors::TransportError;
use crate::domain::ports::HttpTransport;
use crate::interface_adapters::storage::CookieJar;

// Thin wrapper around reqwest. Cookies flow through the shared jar so the
// CSRF reader sees what the server sets.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    pub fn new(cookies: Arc<CookieJar>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().cookie_provider(cookies).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_error)?;

        Ok(ApiResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn map_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_builder() {
        TransportError::Builder(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}
