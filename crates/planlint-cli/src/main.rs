use planlint_cli::{cli, load_config, logging, run, Outcome};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Outcome::Rejected.exit_code();
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("warning: {e:#}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&matches, config, &mut out) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e:#}");
            Outcome::Rejected.exit_code()
        }
    }
}
