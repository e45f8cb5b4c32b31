//! Sitegen CLI application
//!
//! Drives the Sitegen engine from the command line. Generated output is
//! written to stdout; logs go to stderr.
//!
//! # Commands
//!
//! ## generate
//! One conversational turn for a target. Output streams as raw text, or as
//! server-sent event frames with `--sse`:
//!
//! ```text
//! data: {"d":"<chunk>"}
//! event: done
//! ```
//!
//! ## workflow
//! The automated pipeline. Prints the final state as JSON, or every progress
//! event with `--stream`.
//!
//! ## classify
//! Prints the output type a prompt routes to.
//!
//! Ctrl-C cancels the running operation.

mod args;
mod commands;
mod logging;
mod router;
mod signal_handler;
mod sse;

use args::Cli;
use clap::Parser;
use sitegen_core::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.clone())?;
    // Set RUST_LOG=debug for verbose logging
    logging::init(&config.logging, cli.log_format);

    router::route(cli, config).await
}
