//! CLI argument definitions using clap
//!
//! - sitegen generate --target <id> [--type <t>] "<message>"   # conversational generation
//! - sitegen workflow "<prompt>" [--stream]                     # automated pipeline
//! - sitegen classify "<prompt>"                                # output-type routing only
//! - sitegen config show|validate                               # inspect configuration

use clap::{Parser, Subcommand, ValueEnum};
use sitegen_core::config::LogFormat;
use sitegen_core::types::OutputType;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitegen")]
#[command(about = "Sitegen - conversational website code generation")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML, YAML or JSON configuration file
    #[arg(long, global = true, env = "SITEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format; overrides `logging.format`
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Persist chat history as JSON lines in this directory
    #[arg(long, global = true)]
    pub history_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate code for a target, continuing its conversation
    Generate {
        /// Target (application) id the conversation belongs to
        #[arg(long)]
        target: String,

        /// Output type: vanilla_html, multi_files or vite_project.
        /// Classified from the message when omitted.
        #[arg(long = "type")]
        output_type: Option<OutputType>,

        /// Emit server-sent event frames instead of raw text
        #[arg(long)]
        sse: bool,

        /// The instruction for this turn
        message: String,
    },

    /// Run the automated generate, check and build pipeline
    Workflow {
        /// What to build
        prompt: String,

        /// Print progress events as they happen
        #[arg(long)]
        stream: bool,

        /// Share a target's session and output directory
        #[arg(long)]
        target: Option<String>,
    },

    /// Print the output type a prompt would be routed to
    Classify { prompt: String },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Show the effective configuration with secrets redacted
    Show,
    /// Check the effective configuration
    Validate,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
