// SPDX-License-Identifier: Apache-2.0

use bijux_probe_core::ProbeConfig;
use bijux_probe_verify::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use reqwest::redirect::Policy;
use reqwest::Method;
use tracing::debug;

/// Blocking HTTP client shared by every request of a run.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    session_cookie: Option<String>,
}

impl ReqwestTransport {
    pub fn new(config: &ProbeConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| TransportError::Connect {
                url: config.server_url.to_string(),
                detail: format!("failed to build http client: {e}"),
            })?;
        Ok(Self {
            client,
            session_cookie: config
                .session_cookie
                .clone()
                .filter(|cookie| !cookie.trim().is_empty()),
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        let method = Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            TransportError::InvalidUrl {
                value: format!("{} {url}", request.method),
                detail: e.to_string(),
            }
        })?;
        let mut builder = self.client.request(method, request.url.clone());
        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(|e| classify(&url, &e))?;
        let status = response.status().as_u16();
        debug!(method = %request.method, url = %url, status, "http response");
        if status == 401 || status == 403 {
            return Err(TransportError::Unauthorized { url, status });
        }
        let body = response.text().map_err(|e| TransportError::Decode {
            url: url.clone(),
            detail: e.to_string(),
        })?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(url: &str, err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Connect {
            url: url.to_string(),
            detail: err.to_string(),
        }
    }
}

/// Stand-in for recorded-only runs. Any request is a usage mistake.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct OfflineTransport;

impl HttpTransport for OfflineTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        Err(TransportError::Connect {
            url: request.url.to_string(),
            detail: "live replay is disabled; pass --live".to_string(),
        })
    }
}
