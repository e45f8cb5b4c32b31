//! Guarded generate-and-save entry point

use super::events::GenerationEvent;
use super::extractor::CodeExtractor;
use super::persister::ArtifactPersister;
use super::service::GenerationService;
use crate::error::SitegenResult;
use crate::guardrail::PromptGuardrail;
use crate::types::OutputType;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// What a generate-and-save call produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Every relayed chunk concatenated, tool events included
    pub content: String,
    /// Where files were written, if any
    pub output_dir: Option<PathBuf>,
}

/// Validates input, streams generation and persists extracted files
pub struct CodegenFacade {
    guardrail: PromptGuardrail,
    service: Arc<GenerationService>,
    persister: ArtifactPersister,
}

impl CodegenFacade {
    pub fn new(service: Arc<GenerationService>, persister: ArtifactPersister) -> Self {
        Self {
            guardrail: PromptGuardrail::new(),
            service,
            persister,
        }
    }

    pub fn guardrail(&self) -> &PromptGuardrail {
        &self.guardrail
    }

    pub fn service(&self) -> &Arc<GenerationService> {
        &self.service
    }

    /// Run one generation for a target
    ///
    /// Input is rejected before any model call. Project scaffolds are written
    /// by the agent's tools; for the other types the concatenated response is
    /// extracted and saved under `<output_root>/<output_type>_<target_id>`.
    #[instrument(skip(self, message, on_event, cancel), fields(output_type = %output_type))]
    pub async fn generate_and_save(
        &self,
        target_id: &str,
        message: &str,
        output_type: OutputType,
        on_event: &mut (dyn FnMut(GenerationEvent) + Send),
        cancel: &CancellationToken,
    ) -> SitegenResult<GenerationOutcome> {
        self.guardrail.validate(message)?;

        let mut outcome = GenerationOutcome::default();
        {
            let mut relay = |event: GenerationEvent| {
                outcome.content.push_str(&event.to_wire());
                on_event(event);
            };
            self.service
                .generate(target_id, message, output_type, &mut relay, cancel)
                .await?;
        }

        if output_type.policy().agent_mode {
            outcome.output_dir = Some(self.service.work_dir(target_id)?);
        } else if !outcome.content.is_empty() {
            let artifact = CodeExtractor::extract(&outcome.content, output_type);
            if !artifact.is_empty() {
                let dir = self.persister.save(&artifact, target_id, output_type).await?;
                outcome.output_dir = Some(dir);
            }
        }

        info!(
            target_id,
            chars = outcome.content.len(),
            output_dir = ?outcome.output_dir,
            "Generation saved"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::error::SitegenError;
    use crate::llm::ScriptedChatModel;
    use crate::llm::provider::SingleModelProvider;
    use crate::session::{InMemoryChatHistory, SessionCache};
    use crate::tools::ToolSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn facade(model: Arc<ScriptedChatModel>, root: &Path) -> CodegenFacade {
        let sessions = SessionCache::new(Arc::new(InMemoryChatHistory::new()), &SessionConfig::default());
        let service = GenerationService::new(
            Arc::new(SingleModelProvider(model)),
            sessions,
            Arc::new(|_: &Path| ToolSet::new()),
            root,
        );
        CodegenFacade::new(Arc::new(service), ArtifactPersister::new(root))
    }

    #[tokio::test]
    async fn test_rejected_input_never_reaches_the_model() {
        let temp_dir = TempDir::new().unwrap();
        let model = Arc::new(ScriptedChatModel::new("standard").with_fallback("x"));
        let facade = facade(model.clone(), temp_dir.path());

        let long_input = "a".repeat(1001);
        let mut on_event = |_: GenerationEvent| {};
        let result = facade
            .generate_and_save("1", &long_input, OutputType::SingleFile, &mut on_event, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(SitegenError::InputRejected { .. })));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_multi_file_response_is_saved() {
        let temp_dir = TempDir::new().unwrap();
        let response = "```html\n<main></main>\n```\n```css\nmain{}\n```";
        let model = Arc::new(ScriptedChatModel::new("standard").with_text_chunked(response, 7));
        let facade = facade(model, temp_dir.path());

        let mut chunks = Vec::new();
        let mut on_event = |event: GenerationEvent| chunks.push(event.to_wire());
        let outcome = facade
            .generate_and_save("5", "portfolio", OutputType::MultiFile, &mut on_event, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(chunks.concat(), response);
        assert_eq!(outcome.content, response);
        let dir = outcome.output_dir.unwrap();
        assert_eq!(dir, temp_dir.path().join("multi_files_5"));
        assert_eq!(std::fs::read_to_string(dir.join("index.css")).unwrap(), "main{}");
        assert_eq!(std::fs::read_to_string(dir.join("index.js")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_empty_response_saves_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let model = Arc::new(ScriptedChatModel::new("standard").with_text(""));
        let facade = facade(model, temp_dir.path());

        let mut on_event = |_: GenerationEvent| {};
        let outcome = facade
            .generate_and_save("6", "page", OutputType::SingleFile, &mut on_event, &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.output_dir.is_none());
        assert!(!temp_dir.path().join("vanilla_html_6").exists());
    }
}
