use super::WorkflowNode;
use crate::error::{SitegenError, SitegenResult};
use crate::llm::{LlmMessage, ModelProvider, ModelRole};
use crate::prompts::{CODE_QUALITY_CHECK_SYSTEM_PROMPT, QUALITY_CHECK_RESPONSE_FORMAT};
use crate::workflow::state::{NodeName, StatePatch, WorkflowState};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// Parsed reviewer verdict
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QualityVerdict {
    pub passed: Option<bool>,
    pub score: Option<f64>,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl QualityVerdict {
    pub fn is_pass(&self, pass_score: f64) -> bool {
        self.passed != Some(false) && self.score.unwrap_or(0.0) >= pass_score
    }
}

/// Reviews generated code with the standard model
///
/// The gate fails open: an unreadable verdict or a failed model call lets the
/// code through.
pub struct QualityCheckNode {
    models: Arc<dyn ModelProvider>,
    pass_score: f64,
}

impl QualityCheckNode {
    pub fn new(models: Arc<dyn ModelProvider>, pass_score: f64) -> Self {
        Self { models, pass_score }
    }

    async fn review(&self, code: &str) -> SitegenResult<String> {
        let model = self.models.model(ModelRole::Standard)?;
        let system = format!("{}\n{}", CODE_QUALITY_CHECK_SYSTEM_PROMPT, QUALITY_CHECK_RESPONSE_FORMAT);
        let response = model
            .invoke(&[
                LlmMessage::system(system),
                LlmMessage::user(format!("Check this code:\n\n{}", code)),
            ])
            .await?;
        Ok(response.content)
    }

    fn judge(&self, content: String) -> StatePatch {
        let Some(json) = extract_json_object(&content) else {
            debug!("Quality verdict has no JSON object, passing");
            return StatePatch::quality(true, content);
        };

        match serde_json::from_str::<QualityVerdict>(json) {
            Ok(verdict) => {
                let passed = verdict.is_pass(self.pass_score);
                debug!(passed, score = ?verdict.score, issues = verdict.issues.len(), "Quality verdict");
                StatePatch::quality(passed, content)
            }
            Err(e) => {
                warn!(error = %e, "Quality verdict is not valid JSON, passing");
                StatePatch::quality(true, content)
            }
        }
    }
}

#[async_trait]
impl WorkflowNode for QualityCheckNode {
    fn name(&self) -> NodeName {
        NodeName::CodeQualityCheck
    }

    async fn run(&self, state: &WorkflowState, cancel: &CancellationToken) -> SitegenResult<StatePatch> {
        if state.generated_code.trim().is_empty() {
            return Ok(StatePatch::quality(false, "No code generated"));
        }

        let review = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
            review = self.review(&state.generated_code) => review,
        };

        match review {
            Ok(content) => Ok(self.judge(content)),
            Err(e) => {
                error!(error = %e, "Code quality check failed");
                Ok(StatePatch::quality(true, "Quality check skipped due to error"))
            }
        }
    }
}

/// First balanced `{...}` object in `text`, honouring JSON string escapes
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedChatModel;
    use crate::llm::provider::SingleModelProvider;

    fn node(model: Arc<ScriptedChatModel>) -> QualityCheckNode {
        QualityCheckNode::new(Arc::new(SingleModelProvider(model)), 60.0)
    }

    fn state_with_code(code: &str) -> WorkflowState {
        WorkflowState {
            generated_code: code.to_string(),
            ..WorkflowState::new("page")
        }
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(
            extract_json_object("Verdict: {\"passed\": true, \"issues\": [\"a}b\"]} trailing {}"),
            Some("{\"passed\": true, \"issues\": [\"a}b\"]}")
        );
        assert_eq!(extract_json_object("{\"a\": {\"b\": 1}}"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ unterminated"), None);
    }

    #[test]
    fn test_verdict_rules() {
        let verdict = |passed, score| QualityVerdict { passed, score, issues: vec![] };
        assert!(verdict(Some(true), Some(60.0)).is_pass(60.0));
        assert!(verdict(None, Some(75.0)).is_pass(60.0));
        assert!(!verdict(Some(false), Some(95.0)).is_pass(60.0));
        assert!(!verdict(Some(true), None).is_pass(60.0));
        assert!(!verdict(Some(true), Some(59.5)).is_pass(60.0));
    }

    #[tokio::test]
    async fn test_empty_code_fails_without_model_call() {
        let model = Arc::new(ScriptedChatModel::new("standard"));
        let patch = node(model.clone())
            .run(&state_with_code("  \n"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(patch.quality_check_passed, Some(false));
        assert_eq!(patch.quality_check_message.as_deref(), Some("No code generated"));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_low_score_fails() {
        let reply = "```json\n{\"passed\": true, \"score\": 40, \"issues\": [\"no styles\"]}\n```";
        let model = Arc::new(ScriptedChatModel::new("standard").with_text(reply));
        let patch = node(model.clone())
            .run(&state_with_code("<html></html>"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(patch.quality_check_passed, Some(false));
        assert_eq!(patch.quality_check_message.as_deref(), Some(reply));

        let call = &model.calls()[0];
        assert!(call.messages[0].content.ends_with(QUALITY_CHECK_RESPONSE_FORMAT));
        assert_eq!(call.messages[1].content, "Check this code:\n\n<html></html>");
    }

    #[tokio::test]
    async fn test_unparseable_verdict_passes_with_raw_text() {
        let model = Arc::new(ScriptedChatModel::new("standard").with_text("Looks fine to me"));
        let patch = node(model)
            .run(&state_with_code("<html></html>"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(patch.quality_check_passed, Some(true));
        assert_eq!(patch.quality_check_message.as_deref(), Some("Looks fine to me"));
    }

    #[tokio::test]
    async fn test_model_error_passes() {
        let model = Arc::new(ScriptedChatModel::new("standard").with_error("rate limited"));
        let patch = node(model)
            .run(&state_with_code("<html></html>"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(patch.quality_check_passed, Some(true));
        assert_eq!(
            patch.quality_check_message.as_deref(),
            Some("Quality check skipped due to error")
        );
    }
}
