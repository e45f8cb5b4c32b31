//! System prompts embedded at compile time
//!
//! One prompt per output type plus the routing and quality-check prompts.
//! [`OutputType::policy`](crate::types::OutputType::policy) selects the
//! generation prompt.

/// Prompt for single-file HTML generation
pub const VANILLA_HTML_SYSTEM_PROMPT: &str = include_str!("vanilla_html_system_prompt.md");

/// Prompt for HTML/CSS/JS sibling-file generation
pub const MULTI_FILES_SYSTEM_PROMPT: &str = include_str!("multi_files_system_prompt.md");

/// Prompt for the tool-driven project scaffold agent
pub const VITE_PROJECT_SYSTEM_PROMPT: &str = include_str!("vite_project_system_prompt.md");

/// Prompt for the output-type classifier
pub const ROUTE_SYSTEM_PROMPT: &str = include_str!("route_system_prompt.md");

/// Rubric for the workflow quality gate
pub const CODE_QUALITY_CHECK_SYSTEM_PROMPT: &str =
    include_str!("code_quality_check_system_prompt.md");

/// Appended to the rubric so the verdict can be parsed
pub const QUALITY_CHECK_RESPONSE_FORMAT: &str =
    "Respond with JSON: {\"passed\": boolean, \"score\": number, \"issues\": string[]}";
