//! Automated workflow command

use futures::StreamExt;
use sitegen_core::workflow::WORKFLOW_ERROR;
use sitegen_sdk::SitegenClient;
use std::io::Write;
use tokio_util::sync::CancellationToken;

pub async fn run(
    client: &SitegenClient,
    prompt: &str,
    target_id: Option<&str>,
    stream: bool,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    if stream {
        return run_streaming(client, prompt, target_id, cancel).await;
    }

    let state = client.run_workflow(prompt, target_id, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&state)?);

    match state.error {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}

async fn run_streaming(
    client: &SitegenClient,
    prompt: &str,
    target_id: Option<&str>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let events = client.workflow_stream(prompt, target_id, cancel);
    tokio::pin!(events);

    let mut stdout = std::io::stdout();
    let mut failure = None;
    while let Some(event) = events.next().await {
        stdout.write_all(event.to_sse().as_bytes())?;
        stdout.flush()?;

        if event.event == WORKFLOW_ERROR {
            failure = event.data["error"].as_str().map(str::to_string);
        } else if event.is_terminal() {
            failure = event.data["state"]["error"].as_str().map(str::to_string);
        }
    }

    match failure {
        Some(error) => anyhow::bail!(error),
        None => Ok(()),
    }
}
