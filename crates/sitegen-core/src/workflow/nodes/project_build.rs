use super::WorkflowNode;
use crate::codegen::target_dir;
use crate::config::WorkflowConfig;
use crate::error::{SitegenError, SitegenResult};
use crate::types::OutputType;
use crate::workflow::state::{NodeName, StatePatch, WorkflowState};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Installs dependencies and builds a generated project
pub struct ProjectBuildNode {
    output_root: PathBuf,
    install_command: Vec<String>,
    build_command: Vec<String>,
    timeout: Duration,
}

impl ProjectBuildNode {
    pub fn new(output_root: impl Into<PathBuf>, config: &WorkflowConfig) -> Self {
        Self {
            output_root: output_root.into(),
            install_command: config.install_command.clone(),
            build_command: config.build_command.clone(),
            timeout: config.build_timeout,
        }
    }

    async fn build(&self, project_dir: &Path, cancel: &CancellationToken) -> SitegenResult<()> {
        tokio::fs::create_dir_all(project_dir).await.map_err(|e| {
            SitegenError::io_with_path(
                format!("Failed to create project directory: {}", e),
                project_dir.display().to_string(),
            )
        })?;

        run_command(&self.install_command, project_dir, self.timeout, cancel).await?;
        run_command(&self.build_command, project_dir, self.timeout, cancel).await
    }
}

#[async_trait]
impl WorkflowNode for ProjectBuildNode {
    fn name(&self) -> NodeName {
        NodeName::ProjectBuild
    }

    async fn run(&self, state: &WorkflowState, cancel: &CancellationToken) -> SitegenResult<StatePatch> {
        if state.output_type != Some(OutputType::ProjectScaffold) {
            return Ok(StatePatch {
                build_success: Some(true),
                ..StatePatch::default()
            });
        }

        let project_dir = target_dir(
            &self.output_root,
            OutputType::ProjectScaffold,
            state.effective_target_id(),
        )?;
        info!(dir = %project_dir.display(), "Building generated project");

        match self.build(&project_dir, cancel).await {
            Ok(()) => Ok(StatePatch {
                build_success: Some(true),
                ..StatePatch::default()
            }),
            Err(SitegenError::Cancelled) => Err(SitegenError::Cancelled),
            Err(e) => {
                error!(error = %e, "Project build failed");
                Ok(StatePatch {
                    build_success: Some(false),
                    error: Some(format!("Build failed: {}", e)),
                    ..StatePatch::default()
                })
            }
        }
    }
}

async fn run_command(
    command: &[String],
    cwd: &Path,
    timeout: Duration,
    cancel: &CancellationToken,
) -> SitegenResult<()> {
    let shown = command.join(" ");
    let (program, args) = command
        .split_first()
        .ok_or_else(|| SitegenError::build("Empty build command", shown.clone()))?;

    debug!(command = %shown, "Running build command");
    let child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| SitegenError::build(format!("Failed to start `{}`: {}", shown, e), shown.clone()))?;

    // Dropping the output future kills the child.
    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(SitegenError::Cancelled),
        output = tokio::time::timeout(timeout, child.wait_with_output()) => match output {
            Ok(output) => output.map_err(|e| {
                SitegenError::build(format!("`{}` failed: {}", shown, e), shown.clone())
            })?,
            Err(_) => {
                return Err(SitegenError::build(
                    format!("`{}` timed out after {}s", shown, timeout.as_secs()),
                    shown.clone(),
                ));
            }
        },
    };

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SitegenError::build(
            format!("`{}` exited with {}: {}", shown, output.status, stderr.trim()),
            shown,
        ))
    }
}
