//! Pinpoint CLI - resolves container image tags to content digests.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::resolve::EXIT_UNEXPECTED;
use commands::{Cli, Commands};

fn main() -> ExitCode {
    // Initialize tracing. Diagnostics go to stderr; stdout is reserved for
    // the resolved digest.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinpoint=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // clap exits 2 on usage errors, which would collide with the
    // repository-not-found code. Bad arguments are an unexpected-failure
    // condition here.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                EXIT_UNEXPECTED
            } else {
                // --help and --version print to stdout and are not failures.
                0
            };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(&args),
        Commands::Version => {
            println!("pinpoint {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
    }
}
