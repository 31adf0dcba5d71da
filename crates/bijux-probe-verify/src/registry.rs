use crate::pagination::{check_pagination, check_past_last_page, PaginationError};
use crate::ports::HttpTransport;
use crate::result::VerificationResult;
use bijux_probe_core::ProbeConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckName {
    Pagination,
    PastLastPage,
}

impl CheckName {
    pub const ALL: [Self; 2] = [Self::Pagination, Self::PastLastPage];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pagination => "pagination",
            Self::PastLastPage => "past-last-page",
        }
    }

    pub fn run(
        self,
        transport: &dyn HttpTransport,
        config: &ProbeConfig,
        params: &CheckParams,
    ) -> Result<VerificationResult, PaginationError> {
        match self {
            Self::Pagination => check_pagination(
                transport,
                config,
                &params.entity,
                params.expected_total,
                params.page_size,
            ),
            Self::PastLastPage => {
                check_past_last_page(transport, config, &params.entity, params.page_size)
            }
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    NotFound { name: String, known: Vec<String> },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name, known } => {
                write!(f, "unknown check `{name}` (known: {})", known.join(", "))
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckParams {
    pub entity: String,
    pub page_size: u64,
    pub expected_total: u64,
}

/// Named end-to-end checks, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRegistry {
    checks: Vec<CheckName>,
}

impl CheckRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            checks: CheckName::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|name| name.as_str()).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<CheckName, RegistryError> {
        let wanted = name.trim().to_ascii_lowercase();
        self.checks
            .iter()
            .copied()
            .find(|check| check.as_str() == wanted)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
                known: self.names().into_iter().map(str::to_string).collect(),
            })
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        let registry = CheckRegistry::builtin();
        assert_eq!(registry.resolve("pagination"), Ok(CheckName::Pagination));
        assert_eq!(registry.resolve(" Past-Last-Page "), Ok(CheckName::PastLastPage));
        assert_eq!(registry.names(), vec!["pagination", "past-last-page"]);
    }

    #[test]
    fn unknown_names_list_the_known_checks() {
        let err = CheckRegistry::builtin()
            .resolve("sorting")
            .expect_err("unknown");
        assert_eq!(
            err,
            RegistryError::NotFound {
                name: "sorting".to_string(),
                known: vec!["pagination".to_string(), "past-last-page".to_string()],
            }
        );
    }
}
