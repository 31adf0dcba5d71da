use crate::error::{CorpusError, CorpusErrorCode};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A 1-based ordinal (`7`) or inclusive range (`3-9`) given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdinalSelection {
    pub first: usize,
    pub last: usize,
}

impl OrdinalSelection {
    pub fn parse(raw: &str) -> Result<Self, CorpusError> {
        let invalid = |reason: &str| {
            CorpusError::new(
                CorpusErrorCode::InvalidSelection,
                format!("invalid ordinal selection `{raw}`: {reason}"),
            )
        };
        let trimmed = raw.trim();
        let (first, last) = match trimmed.split_once('-') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (trimmed, trimmed),
        };
        let first = first
            .parse::<usize>()
            .map_err(|_| invalid("expected N or A-B"))?;
        let last = last
            .parse::<usize>()
            .map_err(|_| invalid("expected N or A-B"))?;
        if first == 0 {
            return Err(invalid("ordinals start at 1"));
        }
        if last < first {
            return Err(invalid("range end precedes start"));
        }
        Ok(Self { first, last })
    }

    /// Checks the selection against a corpus of `count` cases.
    pub fn resolve(self, count: usize) -> Result<RangeInclusive<usize>, CorpusError> {
        if self.first > count {
            return Err(CorpusError::out_of_range(self.first, count));
        }
        if self.last > count {
            return Err(CorpusError::out_of_range(self.last, count));
        }
        Ok(self.first..=self.last)
    }

    #[must_use]
    pub fn is_single(self) -> bool {
        self.first == self.last
    }
}

impl FromStr for OrdinalSelection {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OrdinalSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}
