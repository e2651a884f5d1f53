//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Render command configurations into container task specifications
#[derive(Parser)]
#[command(
    name = "taskspec",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a command task spec as JSON
    Render(commands::render::RenderArgs),

    /// List packaged static resources
    Assets(OutputArgs),

    /// Show version
    Version(OutputArgs),
}

/// Output format for commands that print plain text by default.
#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Render(args) => commands::render::run(&args),
            Command::Assets(out) => commands::assets::run(out.json),
            Command::Version(out) => commands::version::run(out.json),
        }
    }
}
