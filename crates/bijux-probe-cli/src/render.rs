use crate::helpers::truncate;
use crate::OutputMode;
use bijux_probe_verify::{CaseOutcome, VerificationResult};
use colored::{ColoredString, Colorize};
use std::fmt::Write as _;
use std::io::IsTerminal;

const ISSUE_COLUMN_CHARS: usize = 72;
const BODY_PREVIEW_CHARS: usize = 240;

pub(crate) fn configure_color(output_mode: OutputMode) {
    if output_mode.json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }
}

pub(crate) fn marker(passed: bool) -> ColoredString {
    if passed {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    }
}

pub(crate) fn table_header() -> String {
    format!(
        "{:>4}  {:<6}  {:>7}  {:<4}  {}",
        "#", "METHOD", "STATUS", "", "KEY / FIRST ISSUE"
    )
}

pub(crate) fn table_row(outcome: &CaseOutcome) -> String {
    let case = &outcome.case;
    let status = format!("{}/{}", case.expected_status(), case.actual_status());
    let mut row = format!(
        "{:>4}  {:<6}  {:>7}  {}  {}",
        case.ordinal(),
        case.method(),
        status,
        marker(outcome.result.passed()),
        case.key()
    );
    if let Some(issue) = outcome.result.first_issue() {
        let _ = write!(
            row,
            "\n{:>27}{}",
            "",
            truncate(issue, ISSUE_COLUMN_CHARS).dimmed()
        );
    }
    row
}

pub(crate) fn summary(outcomes: &[CaseOutcome]) -> String {
    let failed: Vec<String> = outcomes
        .iter()
        .filter(|outcome| !outcome.result.passed())
        .map(|outcome| outcome.case.ordinal().to_string())
        .collect();
    let passed = outcomes.len() - failed.len();
    let mut text = format!(
        "{} passed, {} failed, {} total",
        passed.to_string().green(),
        failed.len().to_string().red(),
        outcomes.len()
    );
    if !failed.is_empty() {
        let _ = write!(text, "\nfailed ordinals: {}", failed.join(", "));
    }
    text
}

/// Full issue and note listing for one case. A `verbosity` of 1 or more
/// also prints the start of the response body.
pub(crate) fn case_detail(outcome: &CaseOutcome, verbosity: u8) -> String {
    let case = &outcome.case;
    let mut text = format!(
        "[{}] {} {} {}",
        case.ordinal(),
        marker(outcome.result.passed()),
        case.method(),
        case.key()
    );
    if !case.description().is_empty() {
        let _ = write!(text, "\n  {}", case.description());
    }
    let _ = write!(
        text,
        "\n  status: expected {}, actual {}\n  records: {}",
        case.expected_status(),
        case.actual_status(),
        case.data().len()
    );
    if verbosity > 0 && !case.raw_body().is_empty() {
        let _ = write!(
            text,
            "\n  body: {}",
            truncate(case.raw_body().trim(), BODY_PREVIEW_CHARS).dimmed()
        );
    }
    push_findings(&mut text, &outcome.result);
    text
}

pub(crate) fn check_detail(result: &VerificationResult) -> String {
    let mut text = format!("{} {}", marker(result.passed()), result.subject());
    push_findings(&mut text, result);
    text
}

fn push_findings(text: &mut String, result: &VerificationResult) {
    for issue in result.issues() {
        let _ = write!(text, "\n  - {}", issue.red());
    }
    for note in result.notes() {
        let _ = write!(text, "\n  note: {note}");
    }
}
