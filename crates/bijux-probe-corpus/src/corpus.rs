// SPDX-License-Identifier: Apache-2.0

use crate::case::TestCase;
use crate::definition::{CaseDefinition, RecordedResponse};
use crate::error::{CorpusError, CorpusErrorCode};
use bijux_probe_query::request_path;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Ordinal-addressed access to recorded cases.
pub trait CaseSource {
    fn count(&self) -> Result<usize, CorpusError>;
    fn load(&self, ordinal: usize) -> Result<TestCase, CorpusError>;
}

/// Corpus held in memory. Ordinal `n` is the `n`-th key in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    entries: IndexMap<String, CaseDefinition>,
}

impl Corpus {
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            CorpusError::new(
                CorpusErrorCode::Io,
                format!("failed to read corpus {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&raw).map_err(|e| {
            CorpusError::new(e.code, format!("{}: {}", path.display(), e.message))
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CorpusError> {
        let entries: IndexMap<String, CaseDefinition> = serde_json::from_str(raw).map_err(|e| {
            CorpusError::new(CorpusErrorCode::Parse, format!("invalid corpus json: {e}"))
        })?;
        Ok(Self { entries })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self, ordinal: usize) -> Result<&str, CorpusError> {
        self.entry(ordinal).map(|(key, _)| key)
    }

    /// `(ordinal, key)` pairs in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries
            .keys()
            .enumerate()
            .map(|(idx, key)| (idx + 1, key.as_str()))
    }

    #[must_use]
    pub fn ordinal_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key).map(|idx| idx + 1)
    }

    /// Recorded record total for `/api/<entity>`, read from the first matching
    /// case whose envelope carries `pagination.totalRecords` (or `total`).
    #[must_use]
    pub fn expected_total(&self, entity: &str) -> Option<u64> {
        let suffix = format!("/api/{}", entity.trim_matches('/'));
        self.entries.iter().find_map(|(key, definition)| {
            let target = definition.url.as_deref().unwrap_or(key);
            let path = request_path(target).ok()?;
            if path.trim_end_matches('/') != suffix {
                return None;
            }
            match RecordedResponse::from_value(definition.response.as_ref()) {
                RecordedResponse::Envelope(envelope) => envelope.total_records(),
                RecordedResponse::Placeholder(_) => None,
            }
        })
    }

    fn entry(&self, ordinal: usize) -> Result<(&str, &CaseDefinition), CorpusError> {
        if ordinal == 0 || ordinal > self.entries.len() {
            return Err(CorpusError::out_of_range(ordinal, self.entries.len()));
        }
        self.entries
            .get_index(ordinal - 1)
            .map(|(key, definition)| (key.as_str(), definition))
            .ok_or_else(|| CorpusError::out_of_range(ordinal, self.entries.len()))
    }
}

impl CaseSource for Corpus {
    fn count(&self) -> Result<usize, CorpusError> {
        Ok(self.entries.len())
    }

    fn load(&self, ordinal: usize) -> Result<TestCase, CorpusError> {
        let (key, definition) = self.entry(ordinal)?;
        debug!(ordinal, key, "loading corpus case");
        TestCase::from_definition(ordinal, key, definition)
    }
}

/// Corpus read from disk on every access, so edits to the file between
/// review steps are picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    path: PathBuf,
}

impl CorpusFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<Corpus, CorpusError> {
        Corpus::from_path(&self.path)
    }
}

impl CaseSource for CorpusFile {
    fn count(&self) -> Result<usize, CorpusError> {
        Ok(self.read()?.len())
    }

    fn load(&self, ordinal: usize) -> Result<TestCase, CorpusError> {
        self.read()?.load(ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_CASES: &str = r#"{
        "/api/Zeta?sort=name": {"status": 200, "response": {"data": [], "status": "200"}},
        "/api/Alpha": {"status": 200, "response": {"data": [], "pagination": {"totalRecords": 42}}},
        "/api/Mid?filter=age:25": {"status": 404, "response": "Not Found"}
    }"#;

    #[test]
    fn ordinals_follow_insertion_order_not_lexicographic_order() {
        let corpus = Corpus::from_json_str(THREE_CASES).expect("corpus");
        assert_eq!(corpus.count().expect("count"), 3);
        assert_eq!(corpus.key(1).expect("key"), "/api/Zeta?sort=name");
        assert_eq!(corpus.load(2).expect("case").key(), "/api/Alpha");
        assert_eq!(corpus.load(3).expect("case").actual_status(), 404);
        assert_eq!(corpus.ordinal_of("/api/Mid?filter=age:25"), Some(3));
    }

    #[test]
    fn out_of_range_ordinals_are_errors() {
        let corpus = Corpus::from_json_str(THREE_CASES).expect("corpus");
        for ordinal in [0, 4, usize::MAX] {
            let err = corpus.load(ordinal).expect_err("out of range");
            assert_eq!(err.code, CorpusErrorCode::OrdinalOutOfRange);
        }
    }

    #[test]
    fn malformed_corpus_is_a_parse_error() {
        let err = Corpus::from_json_str("[1, 2]").expect_err("array corpus");
        assert_eq!(err.code, CorpusErrorCode::Parse);
        let err = Corpus::from_json_str("{\"k\": {\"status\": \"ok\"}}").expect_err("bad status");
        assert_eq!(err.code, CorpusErrorCode::Parse);
    }

    #[test]
    fn expected_total_reads_recorded_pagination() {
        let corpus = Corpus::from_json_str(THREE_CASES).expect("corpus");
        assert_eq!(corpus.expected_total("Alpha"), Some(42));
        assert_eq!(corpus.expected_total("Zeta"), None);
        assert_eq!(corpus.expected_total("Missing"), None);
    }
}
