#![forbid(unsafe_code)]

mod case;
mod corpus;
mod definition;
mod error;
mod selection;

pub use case::{TestCase, DEFAULT_EXPECTED_STATUS, DEFAULT_METHOD, PLACEHOLDER_STATUS};
pub use corpus::{CaseSource, Corpus, CorpusFile};
pub use definition::{CaseDefinition, Record, RecordedResponse, ResponseEnvelope};
pub use error::{CorpusError, CorpusErrorCode};
pub use selection::OrdinalSelection;

pub const CRATE_NAME: &str = "bijux-probe-corpus";
