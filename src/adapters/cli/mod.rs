//! CLI Adapter
//!
//! Command-line interface for the meme sniper.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{render_text, CheckCmd, CliApp, Command, HuntCmd, OutputFormat};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
