//! Writes extracted artifacts to disk

use super::extractor::ParsedArtifact;
use crate::error::{SitegenError, SitegenResult};
use crate::types::OutputType;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Persists artifacts under `<output_root>/<output_type>_<target_id>`
#[derive(Debug, Clone)]
pub struct ArtifactPersister {
    output_root: PathBuf,
}

impl ArtifactPersister {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Directory holding the artifacts of one target
    pub fn output_dir(&self, target_id: &str, output_type: OutputType) -> SitegenResult<PathBuf> {
        target_dir(&self.output_root, output_type, target_id)
    }

    /// Write every file of the artifact, overwriting earlier versions
    pub async fn save(
        &self,
        artifact: &ParsedArtifact,
        target_id: &str,
        output_type: OutputType,
    ) -> SitegenResult<PathBuf> {
        let dir = self.output_dir(target_id, output_type)?;
        fs::create_dir_all(&dir).await.map_err(|e| {
            SitegenError::io_with_path(
                format!("Failed to create output directory: {}", e),
                dir.display().to_string(),
            )
        })?;

        for file in &artifact.files {
            let relative = confined_path(&file.filename)?;
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &file.content).await.map_err(|e| {
                SitegenError::io_with_path(
                    format!("Failed to write artifact: {}", e),
                    path.display().to_string(),
                )
            })?;
            debug!(path = %path.display(), bytes = file.content.len(), "Wrote artifact file");
        }

        info!(
            target_id,
            output_type = %output_type,
            files = artifact.files.len(),
            dir = %dir.display(),
            "Saved generated code"
        );
        Ok(dir)
    }
}

/// `<output_root>/<output_type>_<target_id>`, rejecting ids that are not a single path segment
pub fn target_dir(output_root: &Path, output_type: OutputType, target_id: &str) -> SitegenResult<PathBuf> {
    if target_id.is_empty()
        || target_id.contains(['/', '\\'])
        || target_id == "."
        || target_id == ".."
    {
        return Err(SitegenError::io_with_path(
            "Invalid target id for output directory",
            target_id,
        ));
    }
    Ok(output_root.join(format!("{}_{}", output_type, target_id)))
}

/// Accept only plain relative paths without parent components
fn confined_path(filename: &str) -> SitegenResult<&Path> {
    let path = Path::new(filename);
    let plain = !filename.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if plain {
        Ok(path)
    } else {
        Err(SitegenError::io_with_path(
            "Artifact filename escapes the output directory",
            filename,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::extractor::ArtifactFile;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_files_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let persister = ArtifactPersister::new(temp_dir.path());
        let artifact = ParsedArtifact {
            files: vec![
                ArtifactFile::new("index.html", "<p>v1</p>"),
                ArtifactFile::new("assets/app.js", "run()"),
            ],
        };

        let dir = persister.save(&artifact, "12", OutputType::MultiFile).await.unwrap();
        assert_eq!(dir, temp_dir.path().join("multi_files_12"));
        assert_eq!(std::fs::read_to_string(dir.join("assets/app.js")).unwrap(), "run()");

        let updated = ParsedArtifact {
            files: vec![ArtifactFile::new("index.html", "<p>v2</p>")],
        };
        persister.save(&updated, "12", OutputType::MultiFile).await.unwrap();
        assert_eq!(std::fs::read_to_string(dir.join("index.html")).unwrap(), "<p>v2</p>");
    }

    #[tokio::test]
    async fn test_escaping_filename_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let persister = ArtifactPersister::new(temp_dir.path().join("out"));
        let artifact = ParsedArtifact {
            files: vec![ArtifactFile::new("../escape.html", "x")],
        };

        assert!(persister.save(&artifact, "1", OutputType::SingleFile).await.is_err());
        assert!(!temp_dir.path().join("out").join("escape.html").exists());
        assert!(!temp_dir.path().join("escape.html").exists());
    }

    #[test]
    fn test_target_id_cannot_contain_separators() {
        let persister = ArtifactPersister::new("/tmp/out");
        assert!(persister.output_dir("../x", OutputType::SingleFile).is_err());
        assert!(persister.output_dir("abc", OutputType::SingleFile).is_ok());
    }
}
