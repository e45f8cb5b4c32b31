//! Output-type classification
//!
//! Asks the route model which output type suits a free-text request. The
//! classifier never fails: any model error falls back to a single HTML file.

use crate::error::SitegenResult;
use crate::llm::{LlmMessage, ModelProvider, ModelRole};
use crate::prompts::ROUTE_SYSTEM_PROMPT;
use crate::types::OutputType;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Classifies prompts into an [`OutputType`]
pub struct PromptClassifier {
    models: Arc<dyn ModelProvider>,
}

impl PromptClassifier {
    pub fn new(models: Arc<dyn ModelProvider>) -> Self {
        Self { models }
    }

    #[instrument(skip(self, prompt))]
    pub async fn classify(&self, prompt: &str) -> OutputType {
        match self.request(prompt).await {
            Ok(answer) => {
                let output_type = parse_route(&answer);
                debug!(answer = answer.trim(), output_type = %output_type, "Prompt classified");
                output_type
            }
            Err(e) => {
                error!(error = %e, "Route classification failed, defaulting to {}", OutputType::SingleFile);
                OutputType::SingleFile
            }
        }
    }

    async fn request(&self, prompt: &str) -> SitegenResult<String> {
        let model = self.models.model(ModelRole::Route)?;
        let response = model
            .invoke(&[LlmMessage::system(ROUTE_SYSTEM_PROMPT), LlmMessage::user(prompt)])
            .await?;
        Ok(response.content)
    }
}

/// Map a route model answer to an output type
pub fn parse_route(answer: &str) -> OutputType {
    let upper = answer.trim().to_uppercase();
    if upper.contains("VITE_PROJECT") {
        OutputType::ProjectScaffold
    } else if upper.contains("MULTI_FILES") || upper.contains("MULTIPLE_FILES") {
        OutputType::MultiFile
    } else {
        OutputType::SingleFile
    }
}
