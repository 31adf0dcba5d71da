use crate::helpers::env_bool;
use crate::LogFlags;
use bijux_probe_core::{ENV_BIJUX_LOG_LEVEL, ENV_BIJUX_PROBE_LOG_JSON};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

impl LogFlags {
    fn level_override(self) -> Option<&'static str> {
        if self.trace {
            Some("trace")
        } else if self.verbose > 0 {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}

/// Logs go to stderr; stdout carries only the report.
pub(crate) fn init_tracing(flags: LogFlags) {
    let filter = match flags.level_override() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(ENV_BIJUX_LOG_LEVEL)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    };
    let installed = if env_bool(ENV_BIJUX_PROBE_LOG_JSON, false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
