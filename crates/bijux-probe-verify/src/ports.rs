// SPDX-License-Identifier: Apache-2.0

use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub url: Url,
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Connect { url: String, detail: String },
    Timeout { url: String },
    /// 401/403. Terminal for the current case, never retried.
    Unauthorized { url: String, status: u16 },
    Status { url: String, status: u16 },
    Decode { url: String, detail: String },
    InvalidUrl { value: String, detail: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { url, detail } => write!(f, "connection to {url} failed: {detail}"),
            Self::Timeout { url } => write!(f, "request to {url} timed out"),
            Self::Unauthorized { url, status } => {
                write!(f, "session rejected by server ({status}) for {url}")
            }
            Self::Status { url, status } => write!(f, "unexpected status {status} from {url}"),
            Self::Decode { url, detail } => write!(f, "undecodable body from {url}: {detail}"),
            Self::InvalidUrl { value, detail } => write!(f, "invalid request url `{value}`: {detail}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Blocking request/response port. Implementations attach the session cookie
/// and enforce the per-request timeout.
pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Scripted transport keyed by method and full URL.
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: BTreeMap<(String, String), Result<HttpResponse, TransportError>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    #[must_use]
    pub fn with_response(mut self, method: &str, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            (method.to_ascii_uppercase(), url.to_string()),
            Ok(HttpResponse::new(status, body)),
        );
        self
    }

    #[must_use]
    pub fn with_error(mut self, method: &str, url: &str, error: TransportError) -> Self {
        self.responses
            .insert((method.to_ascii_uppercase(), url.to_string()), Err(error));
        self
    }

    #[must_use]
    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        let key = (request.method.to_ascii_uppercase(), request.url.to_string());
        self.responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Connect {
                    url: request.url.to_string(),
                    detail: "request not stubbed in FakeTransport".to_string(),
                })
            })
    }
}
