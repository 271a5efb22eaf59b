//! CLI commands and argument parsing.

pub mod resolve;

use clap::{Parser, Subcommand};

/// Pinpoint - resolve container image tags to content digests
#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a repository tag to its content digest
    Resolve(resolve::ResolveArgs),

    /// Print version information
    Version,
}
