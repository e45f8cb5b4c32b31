//! Fenced code block extraction

use crate::types::{ExtractionStrategy, OutputType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HTML_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```html\s*\n(.*?)```").expect("valid html fence regex"));
static CSS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```css\s*\n(.*?)```").expect("valid css fence regex"));
static JS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)```(?:js|javascript)\s*\n(.*?)```").expect("valid js fence regex")
});

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Path relative to the output directory
    pub filename: String,
    pub content: String,
}

impl ArtifactFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Files recovered from a model response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArtifact {
    pub files: Vec<ArtifactFile>,
}

impl ParsedArtifact {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, filename: &str) -> Option<&ArtifactFile> {
        self.files.iter().find(|f| f.filename == filename)
    }
}

/// Turns a complete model response into files for an output type
#[derive(Debug, Default, Clone, Copy)]
pub struct CodeExtractor;

impl CodeExtractor {
    pub fn extract(text: &str, output_type: OutputType) -> ParsedArtifact {
        match output_type.policy().extraction {
            ExtractionStrategy::SingleHtml => ParsedArtifact {
                files: vec![ArtifactFile::new(
                    "index.html",
                    first_block(&HTML_BLOCK, text).unwrap_or(text),
                )],
            },
            ExtractionStrategy::HtmlCssJs => ParsedArtifact {
                files: vec![
                    ArtifactFile::new("index.html", first_block(&HTML_BLOCK, text).unwrap_or(text)),
                    ArtifactFile::new("index.css", first_block(&CSS_BLOCK, text).unwrap_or_default()),
                    ArtifactFile::new("index.js", first_block(&JS_BLOCK, text).unwrap_or_default()),
                ],
            },
            ExtractionStrategy::None => ParsedArtifact::default(),
        }
    }
}

fn first_block<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_file_uses_html_block() {
        let text = "Here you go:\n```html\n<html><body>Hi</body></html>\n```\nEnjoy!";
        let artifact = CodeExtractor::extract(text, OutputType::SingleFile);

        assert_eq!(artifact.files.len(), 1);
        assert_eq!(artifact.files[0].filename, "index.html");
        assert_eq!(artifact.files[0].content, "<html><body>Hi</body></html>");
    }

    #[test]
    fn test_single_file_falls_back_to_raw_text() {
        let text = "  <h1>No fences</h1>\n";
        let artifact = CodeExtractor::extract(text, OutputType::SingleFile);
        assert_eq!(artifact.files[0].content, text);
    }

    #[test]
    fn test_multi_file_missing_js_is_empty() {
        let text = "```HTML\n<div id=\"app\"></div>\n```\n\n```css\nbody { margin: 0; }\n```";
        let artifact = CodeExtractor::extract(text, OutputType::MultiFile);

        assert_eq!(artifact.files.len(), 3);
        assert_eq!(artifact.file("index.html").unwrap().content, "<div id=\"app\"></div>");
        assert_eq!(artifact.file("index.css").unwrap().content, "body { margin: 0; }");
        assert_eq!(artifact.file("index.js").unwrap().content, "");
    }

    #[test]
    fn test_javascript_fence_alias_and_first_match() {
        let text = "```javascript\nconsole.log(1);\n```\n```js\nconsole.log(2);\n```";
        let artifact = CodeExtractor::extract(text, OutputType::MultiFile);
        assert_eq!(artifact.file("index.js").unwrap().content, "console.log(1);");
    }

    #[test]
    fn test_project_scaffold_yields_no_files() {
        let artifact = CodeExtractor::extract("```html\n<p/>\n```", OutputType::ProjectScaffold);
        assert!(artifact.is_empty());
    }
}
