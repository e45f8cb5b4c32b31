//! Output types and the per-type policy table
//!
//! Everything that varies by output type (prompt, model variant, extraction
//! and build behaviour) is a column of [`OutputPolicy`]. Adding a type means
//! adding a variant and one row to `POLICIES`.

use crate::error::SitegenError;
use crate::llm::ModelRole;
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The structural shape of generated artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// One self-contained `index.html`
    #[serde(rename = "vanilla_html")]
    SingleFile,
    /// Sibling `index.html`, `index.css` and `index.js`
    #[serde(rename = "multi_files")]
    MultiFile,
    /// A buildable project written by the agent through tools
    #[serde(rename = "vite_project")]
    ProjectScaffold,
}

/// How generated text is turned into files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// HTML block, falling back to the raw text
    SingleHtml,
    /// HTML, CSS and JS blocks
    HtmlCssJs,
    /// Files already exist on disk
    None,
}

/// One row of the output-type policy table
#[derive(Debug)]
pub struct OutputPolicy {
    pub output_type: OutputType,
    pub system_prompt: &'static str,
    pub model_role: ModelRole,
    pub extraction: ExtractionStrategy,
    /// Tools are bound and invoked during generation
    pub agent_mode: bool,
    /// The workflow runs the build node after a passing quality check
    pub requires_build: bool,
}

static POLICIES: [OutputPolicy; 3] = [
    OutputPolicy {
        output_type: OutputType::SingleFile,
        system_prompt: prompts::VANILLA_HTML_SYSTEM_PROMPT,
        model_role: ModelRole::Standard,
        extraction: ExtractionStrategy::SingleHtml,
        agent_mode: false,
        requires_build: false,
    },
    OutputPolicy {
        output_type: OutputType::MultiFile,
        system_prompt: prompts::MULTI_FILES_SYSTEM_PROMPT,
        model_role: ModelRole::Standard,
        extraction: ExtractionStrategy::HtmlCssJs,
        agent_mode: false,
        requires_build: false,
    },
    OutputPolicy {
        output_type: OutputType::ProjectScaffold,
        system_prompt: prompts::VITE_PROJECT_SYSTEM_PROMPT,
        model_role: ModelRole::Reasoning,
        extraction: ExtractionStrategy::None,
        agent_mode: true,
        requires_build: true,
    },
];

impl OutputType {
    /// All output types, in table order
    pub const ALL: [OutputType; 3] = [
        OutputType::SingleFile,
        OutputType::MultiFile,
        OutputType::ProjectScaffold,
    ];

    /// Policy row for this output type
    pub fn policy(self) -> &'static OutputPolicy {
        &POLICIES[self as usize]
    }

    /// Stable identifier used in session keys and directory names
    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::SingleFile => "vanilla_html",
            OutputType::MultiFile => "multi_files",
            OutputType::ProjectScaffold => "vite_project",
        }
    }
}

impl Default for OutputType {
    fn default() -> Self {
        OutputType::SingleFile
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = SitegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "vanilla_html" | "single_file" | "html" => Ok(OutputType::SingleFile),
            "multi_files" | "multi_file" | "multiple_files" => Ok(OutputType::MultiFile),
            "vite_project" | "project_scaffold" | "project" => Ok(OutputType::ProjectScaffold),
            other => Err(SitegenError::config(format!("Unknown output type: {}", other))),
        }
    }
}
