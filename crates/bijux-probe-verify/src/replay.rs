use crate::engine::{verify_test_case, VerifyOptions};
use crate::ports::{HttpRequest, HttpTransport, TransportError};
use crate::result::VerificationResult;
use bijux_probe_core::ProbeConfig;
use bijux_probe_corpus::TestCase;
use tracing::{info, warn};

/// Re-issues the recorded request against the configured server and returns
/// the case with the live status and body in place of the recording.
pub fn replay_case(
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    case: &TestCase,
) -> Result<TestCase, TransportError> {
    let url = config
        .endpoint(case.request_url())
        .map_err(|e| TransportError::InvalidUrl {
            value: case.request_url().to_string(),
            detail: e.to_string(),
        })?;
    let request = HttpRequest {
        method: case.method().to_string(),
        url,
        body: case.request_body().cloned(),
    };
    let response = transport.send(&request)?;
    info!(
        ordinal = case.ordinal(),
        key = case.key(),
        status = response.status,
        "replayed case"
    );
    Ok(case.clone().with_response(response.status, &response.body))
}

/// A verified case together with the data it was verified against.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseOutcome {
    pub case: TestCase,
    pub result: VerificationResult,
}

/// Verifies the recording, or a live replay when `config.live` is set.
/// Transport failures during a replay end the case as a failed result.
#[must_use]
pub fn run_case(
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    case: TestCase,
    options: &VerifyOptions,
) -> CaseOutcome {
    if !config.live {
        let result = verify_test_case(&case, options);
        return CaseOutcome { case, result };
    }
    match replay_case(transport, config, &case) {
        Ok(live) => {
            let result = verify_test_case(&live, options);
            CaseOutcome { case: live, result }
        }
        Err(err) => {
            let mut result = VerificationResult::new(Some(case.ordinal()), case.key());
            match &err {
                TransportError::Unauthorized { status, .. } => {
                    warn!(
                        ordinal = case.ordinal(),
                        key = case.key(),
                        status = *status,
                        "unauthorized response ends case"
                    );
                    result.issue(format!(
                        "unauthorized: session rejected by server ({status})"
                    ));
                }
                other => {
                    warn!(ordinal = case.ordinal(), key = case.key(), error = %other, "replay failed");
                    result.issue(format!("transport: {other}"));
                }
            }
            CaseOutcome { case, result }
        }
    }
}
