//! Conversational generation command

use crate::sse;
use sitegen_core::error::UnifiedError;
use sitegen_sdk::{GenerationEvent, OutputType, SitegenClient};
use std::io::Write;
use tokio_util::sync::CancellationToken;

pub async fn run(
    client: &SitegenClient,
    target_id: &str,
    output_type: Option<OutputType>,
    message: &str,
    sse_frames: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let output_type = match output_type {
        Some(output_type) => output_type,
        None => client.classify(message).await,
    };
    tracing::info!(target_id, output_type = %output_type, "Generating");

    let mut stdout = std::io::stdout();
    let mut on_event = |event: GenerationEvent| {
        let _ = stdout.write_all(render(&event, sse_frames).as_bytes());
        let _ = stdout.flush();
    };
    let result = client
        .chat_to_codegen(target_id, message, output_type, &mut on_event, cancel)
        .await;

    let mut stdout = std::io::stdout();
    match result {
        Ok(outcome) => {
            if sse_frames {
                stdout.write_all(sse::DONE_FRAME.as_bytes())?;
            } else {
                writeln!(stdout)?;
            }
            if let Some(dir) = outcome.output_dir {
                eprintln!("Saved to {}", dir.display());
            }
            Ok(())
        }
        Err(e) => {
            if sse_frames {
                stdout.write_all(sse::business_error_frame(e.error_code(), &e.to_string()).as_bytes())?;
            }
            Err(e.into())
        }
    }
}

fn render(event: &GenerationEvent, sse_frames: bool) -> String {
    let chunk = event.to_wire();
    if sse_frames { sse::data_frame(&chunk) } else { chunk }
}
