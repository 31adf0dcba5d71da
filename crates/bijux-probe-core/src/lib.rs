#![forbid(unsafe_code)]

pub mod config;
pub mod errors;
pub mod json;

pub use config::{parse_bool_flag, ConfigError, ConfigOverrides, ProbeConfig};
pub use errors::{ExitCode, MachineError};

pub const CRATE_NAME: &str = "bijux-probe-core";

pub const ENV_BIJUX_LOG_LEVEL: &str = "BIJUX_LOG_LEVEL";
pub const ENV_BIJUX_PROBE_LOG_JSON: &str = "BIJUX_PROBE_LOG_JSON";
pub const ENV_BIJUX_PROBE_CORPUS: &str = "BIJUX_PROBE_CORPUS";

pub const DEFAULT_CORPUS_FILE: &str = "tests.json";

/// Corpus path from the environment, falling back to `tests.json` in the
/// working directory.
#[must_use]
pub fn resolve_corpus_path() -> std::path::PathBuf {
    if let Ok(explicit) = std::env::var(ENV_BIJUX_PROBE_CORPUS) {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return std::path::PathBuf::from(trimmed);
        }
    }
    std::path::PathBuf::from(DEFAULT_CORPUS_FILE)
}
