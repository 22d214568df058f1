use std::process::ExitCode;

fn main() -> ExitCode {
    docflow_cli::run()
}
