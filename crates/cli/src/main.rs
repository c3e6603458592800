use std::process::ExitCode;

fn main() -> ExitCode {
    jimbo_cli::run()
}
