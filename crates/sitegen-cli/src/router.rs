//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;
use crate::signal_handler::cancel_on_interrupt;
use sitegen_core::config::Config;
use sitegen_sdk::SitegenClient;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: Config) -> anyhow::Result<()> {
    let history_dir = cli.history_dir.as_deref();

    match cli.command {
        Commands::Generate {
            target,
            output_type,
            sse,
            message,
        } => {
            let (client, cancel) = engine(config, history_dir)?;
            commands::generate::run(&client, &target, output_type, &message, sse, &cancel).await
        }
        Commands::Workflow {
            prompt,
            stream,
            target,
        } => {
            let (client, cancel) = engine(config, history_dir)?;
            commands::workflow::run(&client, &prompt, target.as_deref(), stream, cancel).await
        }
        Commands::Classify { prompt } => {
            let (client, _) = engine(config, history_dir)?;
            commands::classify::run(&client, &prompt).await
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Validate => commands::config::validate(&config),
        },
    }
}

/// Build the client and arm Ctrl-C cancellation
fn engine(config: Config, history_dir: Option<&Path>) -> anyhow::Result<(SitegenClient, CancellationToken)> {
    let mut builder = SitegenClient::builder(config);
    if let Some(dir) = history_dir {
        builder = builder.with_history_dir(dir);
    }
    Ok((builder.build()?, cancel_on_interrupt()))
}
