//! Binary crate for the `dashboard` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and the tabbed widget shell
//! - Human-friendly output formatting

use clap::Parser;

mod app;
mod cli;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.debug);
    cmd.run().await
}
