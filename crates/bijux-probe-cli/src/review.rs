// SPDX-License-Identifier: Apache-2.0

//! Interactive review: a cursor over corpus ordinals driven by one-line
//! commands. Every move reloads and re-verifies the case under the cursor.

use crate::render::case_detail;
use crate::transport::{OfflineTransport, ReqwestTransport};
use crate::CliError;
use bijux_probe_core::ProbeConfig;
use bijux_probe_corpus::{CaseSource, CorpusError, CorpusErrorCode, CorpusFile};
use bijux_probe_verify::{run_case, HttpTransport, VerifyOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::debug;

const HELP_TEXT: &str = "\
commands:
  n, next          move to the next case
  p, prev          move to the previous case
  <N>              jump to case N
  h, help, ?       show this help
  q, quit, exit    leave the review";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Next,
    Previous,
    Jump(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Action {
    pub(crate) fn parse(input: &str) -> Self {
        let token = input.trim();
        match token.to_ascii_lowercase().as_str() {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => token
                .parse::<usize>()
                .map_or_else(|_| Self::Unknown(token.to_string()), Self::Jump),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Moved,
    AlreadyAtFirst,
    AlreadyAtLast,
    InvalidOrdinal(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Event {
    fn message(&self) -> Option<String> {
        match self {
            Self::AlreadyAtFirst => Some("already at first".to_string()),
            Self::AlreadyAtLast => Some("already at last".to_string()),
            Self::InvalidOrdinal(n) => Some(format!("invalid ordinal: {n}")),
            Self::Unknown(token) => Some(format!("unknown action: `{token}` (h for help)")),
            Self::Help => Some(HELP_TEXT.to_string()),
            Self::Moved | Self::Quit => None,
        }
    }
}

/// Cursor over `1..=count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReviewSession {
    cur: usize,
    count: usize,
}

impl ReviewSession {
    /// The start ordinal is clamped into range.
    pub(crate) fn new(count: usize, start: Option<usize>) -> Result<Self, CorpusError> {
        if count == 0 {
            return Err(CorpusError::new(
                CorpusErrorCode::OrdinalOutOfRange,
                "corpus is empty; nothing to review",
            ));
        }
        Ok(Self {
            cur: start.unwrap_or(1).clamp(1, count),
            count,
        })
    }

    pub(crate) fn current(&self) -> usize {
        self.cur
    }

    pub(crate) fn at_end(&self) -> bool {
        self.cur == self.count
    }

    pub(crate) fn apply(&mut self, action: Action) -> Event {
        match action {
            Action::Next if self.cur >= self.count => Event::AlreadyAtLast,
            Action::Next => {
                self.cur += 1;
                Event::Moved
            }
            Action::Previous if self.cur <= 1 => Event::AlreadyAtFirst,
            Action::Previous => {
                self.cur -= 1;
                Event::Moved
            }
            Action::Jump(n) if n == 0 || n > self.count => Event::InvalidOrdinal(n),
            Action::Jump(n) => {
                self.cur = n;
                Event::Moved
            }
            Action::Help => Event::Help,
            Action::Quit => Event::Quit,
            Action::Unknown(token) => Event::Unknown(token),
        }
    }
}

pub(crate) fn run_interactive(
    config: &ProbeConfig,
    corpus_path: &Path,
    start: Option<usize>,
) -> Result<(), CliError> {
    let source = CorpusFile::new(corpus_path);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let displays = if config.live {
        let transport = ReqwestTransport::new(config).map_err(|e| CliError::transport(&e))?;
        review_loop(&source, &transport, config, start, stdin.lock(), &mut stdout)?
    } else {
        review_loop(&source, &OfflineTransport, config, start, stdin.lock(), &mut stdout)?
    };
    debug!(displays, "review session ended");
    Ok(())
}

/// Runs until `quit` or end of input. Returns the number of case displays.
pub(crate) fn review_loop<S, R, W>(
    source: &S,
    transport: &dyn HttpTransport,
    config: &ProbeConfig,
    start: Option<usize>,
    mut input: R,
    output: &mut W,
) -> Result<usize, CliError>
where
    S: CaseSource + ?Sized,
    R: BufRead,
    W: Write,
{
    let options = VerifyOptions::from_config(config);
    let count = source.count().map_err(CliError::corpus)?;
    let mut session = ReviewSession::new(count, start).map_err(CliError::corpus)?;
    let mut displays = 0usize;

    let mut display = |session: &ReviewSession, output: &mut W| -> Result<(), CliError> {
        let case = source.load(session.current()).map_err(CliError::corpus)?;
        let outcome = run_case(transport, config, case, &options);
        writeln!(output, "{}", case_detail(&outcome, config.verbosity))
            .map_err(|e| CliError::io(&e))?;
        if session.at_end() {
            writeln!(
                output,
                "end of suite: case {count} of {count} (q to quit)"
            )
            .map_err(|e| CliError::io(&e))?;
        }
        displays += 1;
        Ok(())
    };

    display(&session, output)?;
    loop {
        write!(output, "[{}/{count}] > ", session.current()).map_err(|e| CliError::io(&e))?;
        output.flush().map_err(|e| CliError::io(&e))?;
        let mut line = String::new();
        let read = input.read_line(&mut line).map_err(|e| CliError::io(&e))?;
        if read == 0 {
            writeln!(output).map_err(|e| CliError::io(&e))?;
            break;
        }
        let event = session.apply(Action::parse(&line));
        debug!(ordinal = session.current(), event = ?event, "review step");
        match event {
            Event::Quit => break,
            Event::Moved => display(&session, output)?,
            other => {
                if let Some(message) = other.message() {
                    writeln!(output, "{message}").map_err(|e| CliError::io(&e))?;
                }
            }
        }
    }
    Ok(displays)
}
