//! Command-line interface wiring for the `badgepress` binary.
//!
//! This module owns the clap definitions and delegates execution to the
//! submodule handling each command family.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod designs;
pub mod render;
pub mod utils;

/// Parsed CLI entrypoint for the `badgepress` binary.
#[derive(Parser, Debug)]
#[command(
    name = "badgepress",
    version,
    about = "Render attendee badges into print-ready TIFF pages"
)]
pub struct Cli {
    /// Top-level command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// High-level command families made available to end users.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render badge pages for every attendee group.
    Render(render::RenderArgs),
    #[command(subcommand)]
    Designs(designs::DesignCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(args) => render::handle(args),
        Command::Designs(cmd) => designs::handle(cmd),
    }
}
