use clap::Parser;
use monolint::cli::{self, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli::dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            let hint = e.is_config_error();
            eprintln!("{:?}", miette::Report::new(e));
            if hint {
                eprintln!("Run `monolint config show` to inspect the resolved configuration.");
            }
            ExitCode::from(1)
        }
    }
}
