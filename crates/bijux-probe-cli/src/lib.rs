#![forbid(unsafe_code)]

mod batch;
mod commands;
mod helpers;
mod logging;
mod render;
mod review;
mod transport;

use bijux_probe_core::{
    resolve_corpus_path, ConfigError, ConfigOverrides, ExitCode, MachineError, ProbeConfig,
};
use bijux_probe_corpus::{CorpusError, CorpusErrorCode};
use bijux_probe_verify::{PaginationError, RegistryError, TransportError};
use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Generator};
use commands::Commands;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

pub use transport::ReqwestTransport;

pub const CRATE_NAME: &str = "bijux-probe-cli";

const BIJUX_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "bijux-probe")]
#[command(version)]
#[command(about = "Verify REST API responses against a recorded query corpus")]
#[command(help_template = BIJUX_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  BIJUX_PROBE_SERVER_URL      Server base url\n  BIJUX_PROBE_SESSION_COOKIE  Cookie header sent with every request\n  BIJUX_PROBE_TIMEOUT_MS      Per-request timeout\n  BIJUX_PROBE_CASE_SENSITIVE  String comparison mode (default true)\n  BIJUX_PROBE_CORPUS          Default corpus file\n  BIJUX_LOG_LEVEL             Log verbosity override\n  BIJUX_PROBE_LOG_JSON        Emit logs as JSON"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    trace: bool,
    #[arg(long, global = true)]
    server: Option<String>,
    #[arg(long, global = true)]
    session_cookie: Option<String>,
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
    #[arg(long, global = true, default_value_t = false)]
    case_insensitive: bool,
    /// Replay each recorded request against the server instead of using the recording.
    #[arg(long, global = true, default_value_t = false)]
    live: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError::usage("invalid command line arguments")
                    .with_detail("error", &err.to_string()));
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    if let Commands::Completion { shell } = command {
        print_completion(shell);
        return Ok(());
    }

    let log_flags = LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
        trace: cli.trace,
    };
    logging::init_tracing(log_flags);
    render::configure_color(output_mode);

    let overrides = ConfigOverrides {
        server_url: cli.server,
        session_cookie: cli.session_cookie,
        timeout_ms: cli.timeout_ms,
        case_insensitive: cli.case_insensitive,
        verbosity: cli.verbose,
        live: cli.live,
    };
    let config = ProbeConfig::from_env()
        .and_then(|config| config.with_overrides(&overrides))
        .map_err(CliError::config)?;

    match command {
        Commands::Run { corpus, mode } => {
            batch::run_all(&config, &corpus_path(corpus), mode, output_mode)
        }
        Commands::Test { corpus, selection } => {
            batch::run_selection(&config, &corpus_path(corpus), &selection, output_mode)
        }
        Commands::Review { corpus, start } => {
            review::run_interactive(&config, &corpus_path(corpus), start)
        }
        Commands::Paginate(args) => batch::run_paginate(&config, &args, output_mode),
        Commands::Check { name, page } => batch::run_check(&config, &name, &page, output_mode),
        Commands::List { corpus } => batch::run_list(&corpus_path(corpus), output_mode),
        Commands::Completion { .. } => Ok(()),
    }
}

fn corpus_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(resolve_corpus_path)
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
    trace: bool,
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", message),
        }
    }

    fn dependency(message: &str) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", message),
        }
    }

    fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("verification_failed", message),
        }
    }

    fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.machine = self.machine.with_detail(key, value);
        self
    }

    fn config(err: ConfigError) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("invalid_config", &err.to_string()),
        }
    }

    fn corpus(err: CorpusError) -> Self {
        let exit_code = if err.code == CorpusErrorCode::InvalidSelection {
            ExitCode::Usage
        } else {
            ExitCode::Internal
        };
        Self {
            exit_code,
            machine: MachineError::new(err.code.as_str(), &err.message),
        }
    }

    fn transport(err: &TransportError) -> Self {
        Self::dependency(&err.to_string())
    }

    fn pagination(err: PaginationError) -> Self {
        match err {
            PaginationError::InvalidPageSize => Self::usage(&err.to_string()),
            PaginationError::Config(inner) => Self::config(inner),
            other => Self::dependency(&other.to_string()),
        }
    }

    fn registry(err: &RegistryError) -> Self {
        match err {
            RegistryError::NotFound { known, .. } => {
                Self::usage(&err.to_string()).with_detail("known", &known.join(","))
            }
        }
    }

    fn io(err: &std::io::Error) -> Self {
        Self::internal(&format!("terminal i/o failed: {err}"))
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
