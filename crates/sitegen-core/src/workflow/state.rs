//! Workflow state record and node patches

use crate::types::OutputType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifiers, as reported in step events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeName {
    #[serde(rename = "promptEnhance")]
    PromptEnhance,
    #[serde(rename = "router")]
    Router,
    #[serde(rename = "codegen")]
    Codegen,
    #[serde(rename = "codeQualityCheck")]
    CodeQualityCheck,
    #[serde(rename = "projectBuild")]
    ProjectBuild,
}

impl NodeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeName::PromptEnhance => "promptEnhance",
            NodeName::Router => "router",
            NodeName::Codegen => "codegen",
            NodeName::CodeQualityCheck => "codeQualityCheck",
            NodeName::ProjectBuild => "projectBuild",
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record threaded through the workflow graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub user_prompt: String,
    pub enhanced_prompt: String,
    pub output_type: Option<OutputType>,
    pub generated_code: String,
    pub quality_check_passed: bool,
    pub quality_check_message: String,
    pub build_success: bool,
    pub target_id: Option<String>,
    pub error: Option<String>,
    /// Code generations repeated after a failed quality check
    pub retry_count: u32,
}

impl WorkflowState {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }

    /// Prompt handed to routing and generation
    pub fn effective_prompt(&self) -> &str {
        if self.enhanced_prompt.is_empty() {
            &self.user_prompt
        } else {
            &self.enhanced_prompt
        }
    }

    /// Session and output directory id used by the workflow
    pub fn effective_target_id(&self) -> &str {
        match self.target_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => "workflow",
        }
    }

    /// Apply the fields a node set, leaving the rest untouched
    pub fn merge(&mut self, patch: StatePatch) {
        if let Some(v) = patch.enhanced_prompt {
            self.enhanced_prompt = v;
        }
        if let Some(v) = patch.output_type {
            self.output_type = Some(v);
        }
        if let Some(v) = patch.generated_code {
            self.generated_code = v;
        }
        if let Some(v) = patch.quality_check_passed {
            self.quality_check_passed = v;
        }
        if let Some(v) = patch.quality_check_message {
            self.quality_check_message = v;
        }
        if let Some(v) = patch.build_success {
            self.build_success = v;
        }
        if let Some(v) = patch.error {
            self.error = Some(v);
        }
    }
}

/// Partial update returned by a node
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_type: Option<OutputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_check_passed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_check_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatePatch {
    pub fn quality(passed: bool, message: impl Into<String>) -> Self {
        Self {
            quality_check_passed: Some(passed),
            quality_check_message: Some(message.into()),
            ..Self::default()
        }
    }
}
