#![forbid(unsafe_code)]

mod engine;
mod extract;
mod pagination;
mod ports;
mod registry;
mod replay;
mod result;

pub use engine::{verify_case, verify_test_case, VerifyOptions};
pub use extract::{extract_fields, view_key, FieldExtraction};
pub use pagination::{
    audit_ids, audit_pages, check_pagination, check_past_last_page, PaginationError,
};
pub use ports::{FakeTransport, HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use registry::{CheckName, CheckParams, CheckRegistry, RegistryError};
pub use replay::{replay_case, run_case, CaseOutcome};
pub use result::VerificationResult;

pub const CRATE_NAME: &str = "bijux-probe-verify";
