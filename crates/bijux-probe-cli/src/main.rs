#![forbid(unsafe_code)]

fn main() -> std::process::ExitCode {
    bijux_probe_cli::main_entry()
}
