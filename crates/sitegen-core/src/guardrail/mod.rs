//! Input guardrail
//!
//! Rejects user instructions before any model call or filesystem change.
//! Rules are checked in order and the first violation wins.

use crate::error::{SitegenError, SitegenResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum instruction length, in characters
pub const MAX_INPUT_CHARS: usize = 1000;

const SENSITIVE_PHRASES: &[&str] = &[
    "ignore above",
    "ignore previous",
    "disregard",
    "forget previous",
    "jailbreak",
    "bypass",
    "override instructions",
    "忽略以上指令",
    "忽略之前的指令",
    "越狱",
    "绕过",
    "覆盖指令",
];

static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\{\{.*?\}\}",
        r"(?i)ignore all previous commands",
        r"(?i)act as if you are",
        r"(?i)pretend you are",
        r"(?i)you are now",
        r"(?i)new instructions",
        r"(?i)system:\s",
        r"(?i)\[INST\]",
        r"(?i)\[/INST\]",
        r"(?i)<\|im_start\|>",
        r"(?i)<\|im_end\|>",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid injection pattern"))
    .collect()
});

/// Guardrail rule names, reported in rejections and logs
pub mod rules {
    pub const EMPTY: &str = "empty";
    pub const TOO_LONG: &str = "length";
    pub const SENSITIVE_WORD: &str = "sensitive_word";
    pub const INJECTION: &str = "injection_pattern";
}

/// Stateless validator for user instructions
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptGuardrail;

impl PromptGuardrail {
    pub fn new() -> Self {
        Self
    }

    /// Validate an instruction, returning [`SitegenError::InputRejected`] on the first violation
    pub fn validate(&self, input: &str) -> SitegenResult<()> {
        if input.trim().is_empty() {
            return Err(reject(rules::EMPTY, "Input cannot be empty"));
        }

        if input.chars().count() > MAX_INPUT_CHARS {
            return Err(reject(
                rules::TOO_LONG,
                format!("The input cannot exceed {} characters.", MAX_INPUT_CHARS),
            ));
        }

        let lowered = input.to_lowercase();
        if let Some(phrase) = SENSITIVE_PHRASES.iter().find(|p| lowered.contains(*p)) {
            tracing::warn!(rule = rules::SENSITIVE_WORD, phrase, "Input rejected");
            return Err(SitegenError::input_rejected(
                rules::SENSITIVE_WORD,
                "Sensitive word detected",
            ));
        }

        if let Some(pattern) = INJECTION_PATTERNS.iter().find(|re| re.is_match(input)) {
            tracing::warn!(rule = rules::INJECTION, pattern = pattern.as_str(), "Input rejected");
            return Err(SitegenError::input_rejected(
                rules::INJECTION,
                "Injection pattern detected",
            ));
        }

        Ok(())
    }
}

fn reject(rule: &str, message: impl Into<String>) -> SitegenError {
    tracing::warn!(rule, "Input rejected");
    SitegenError::input_rejected(rule, message)
}
