#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpecError {
    pub value: String,
    pub reason: String,
}

impl QuerySpecError {
    #[must_use]
    pub fn invalid_url(value: &str, reason: &url::ParseError) -> Self {
        Self {
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for QuerySpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid url `{}`: {}", self.value, self.reason)
    }
}

impl std::error::Error for QuerySpecError {}
