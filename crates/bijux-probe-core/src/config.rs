// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::time::Duration;
use url::Url;

pub const ENV_SERVER_URL: &str = "BIJUX_PROBE_SERVER_URL";
pub const ENV_SESSION_COOKIE: &str = "BIJUX_PROBE_SESSION_COOKIE";
pub const ENV_TIMEOUT_MS: &str = "BIJUX_PROBE_TIMEOUT_MS";
pub const ENV_CASE_SENSITIVE: &str = "BIJUX_PROBE_CASE_SENSITIVE";
pub const ENV_MAX_PAGES: &str = "BIJUX_PROBE_MAX_PAGES";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_PAGES: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    InvalidServerUrl { value: String, reason: String },
    InvalidEndpoint { value: String, reason: String },
    ZeroTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidServerUrl { value, reason } => {
                write!(f, "invalid server url `{value}`: {reason}")
            }
            Self::InvalidEndpoint { value, reason } => {
                write!(f, "invalid endpoint `{value}`: {reason}")
            }
            Self::ZeroTimeout => f.write_str("request timeout must be greater than zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied on the command line. `None` keeps the env/default value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub session_cookie: Option<String>,
    pub timeout_ms: Option<u64>,
    pub case_insensitive: bool,
    pub verbosity: u8,
    pub live: bool,
}

/// Run-wide settings. Built once at startup and passed by reference to every
/// component that talks to the server or depends on verbosity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub server_url: Url,
    pub session_cookie: Option<String>,
    pub request_timeout: Duration,
    pub case_sensitive: bool,
    /// Detail level for case output; `1` and above adds the response body.
    pub verbosity: u8,
    pub live: bool,
    pub max_pages: u64,
}

impl ProbeConfig {
    pub fn new(server_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            server_url: parse_server_url(server_url)?,
            session_cookie: None,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            case_sensitive: true,
            verbosity: 0,
            live: false,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through `lookup` so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup(ENV_SERVER_URL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&server)?;
        config.session_cookie = lookup(ENV_SESSION_COOKIE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let timeout_ms = lookup_u64(&lookup, ENV_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        config.request_timeout = Duration::from_millis(timeout_ms);
        config.case_sensitive = lookup_bool(&lookup, ENV_CASE_SENSITIVE, true);
        config.max_pages = lookup_u64(&lookup, ENV_MAX_PAGES, DEFAULT_MAX_PAGES).max(1);
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(server) = &overrides.server_url {
            self.server_url = parse_server_url(server)?;
        }
        if let Some(cookie) = &overrides.session_cookie {
            let trimmed = cookie.trim();
            self.session_cookie = (!trimmed.is_empty()).then(|| trimmed.to_string());
        }
        if let Some(ms) = overrides.timeout_ms {
            if ms == 0 {
                return Err(ConfigError::ZeroTimeout);
            }
            self.request_timeout = Duration::from_millis(ms);
        }
        self.verbosity = overrides.verbosity;
        if overrides.case_insensitive {
            self.case_sensitive = false;
        }
        self.live = overrides.live;
        Ok(self)
    }

    /// Resolves a recorded request target against the configured server.
    ///
    /// Absolute recorded URLs keep only their path and query, so a corpus
    /// captured against one deployment can be replayed against another.
    pub fn endpoint(&self, target: &str) -> Result<Url, ConfigError> {
        let trimmed = target.trim();
        let path_and_query = match Url::parse(trimmed) {
            Ok(absolute) if absolute.has_host() => match absolute.query() {
                Some(query) => format!("{}?{}", absolute.path(), query),
                None => absolute.path().to_string(),
            },
            _ => trimmed.to_string(),
        };
        let base = self.server_url.as_str().trim_end_matches('/');
        let joined = if path_and_query.starts_with('/') {
            format!("{base}{path_and_query}")
        } else {
            format!("{base}/{path_and_query}")
        };
        Url::parse(&joined).map_err(|e| ConfigError::InvalidEndpoint {
            value: target.to_string(),
            reason: e.to_string(),
        })
    }

    /// `GET <base>/api/<entity>?page=<page>&pageSize=<page_size>`.
    pub fn page_url(&self, entity: &str, page: u64, page_size: u64) -> Result<Url, ConfigError> {
        let mut url = self.endpoint(&format!("/api/{}", entity.trim_matches('/')))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }
}

fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidServerUrl {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidServerUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    if !url.has_host() {
        return Err(ConfigError::InvalidServerUrl {
            value: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}

/// Boolean env value: `1/true/yes` or `0/false/no`, upper or lower case.
#[must_use]
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

fn lookup_bool<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .as_deref()
        .and_then(parse_bool_flag)
        .unwrap_or(default)
}

fn lookup_u64<F>(lookup: &F, name: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
