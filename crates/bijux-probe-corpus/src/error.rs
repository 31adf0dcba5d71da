// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CorpusErrorCode {
    Io,
    Parse,
    OrdinalOutOfRange,
    InvalidSelection,
    InvalidKey,
}

impl CorpusErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "corpus_io_error",
            Self::Parse => "corpus_parse_error",
            Self::OrdinalOutOfRange => "ordinal_out_of_range",
            Self::InvalidSelection => "invalid_selection",
            Self::InvalidKey => "invalid_corpus_key",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusError {
    pub code: CorpusErrorCode,
    pub message: String,
}

impl CorpusError {
    #[must_use]
    pub fn new(code: CorpusErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn out_of_range(ordinal: usize, count: usize) -> Self {
        Self::new(
            CorpusErrorCode::OrdinalOutOfRange,
            format!("ordinal {ordinal} is out of range 1..={count}"),
        )
    }
}

impl Display for CorpusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CorpusError {}
