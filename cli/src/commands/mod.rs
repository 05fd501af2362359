//! CLI command definitions and dispatch.

mod inspect;
mod resolve;

use clap::{Parser, Subcommand};

/// Packstone — Cloud Native Buildpacks stack resolution.
#[derive(Parser)]
#[command(name = "packstone", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve a build/run image pair into a stack descriptor
    Resolve(resolve::ResolveArgs),
    /// Display the stack metadata of a single image
    Inspect(inspect::InspectArgs),
}

/// Dispatch a parsed CLI to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Resolve(args) => resolve::execute(args).await,
        Command::Inspect(args) => inspect::execute(args).await,
    }
}
