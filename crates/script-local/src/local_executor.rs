use script_core::config::TargetConfig;
use script_core::error::ScriptError;
use script_core::{ExecutionResult, Executor};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// Local executor: the target is the machine ci-script runs on.
pub struct LocalExecutor {
    config: TargetConfig,
}

impl LocalExecutor {
    pub fn new(config: TargetConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl Executor for LocalExecutor {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn executor_type(&self) -> &str {
        "local"
    }

    async fn path_exists(&self, path: &Path) -> Result<bool, ScriptError> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn transfer(&self, local: &Path, remote: &Path) -> Result<(), ScriptError> {
        let bytes = tokio::fs::copy(local, remote).await.map_err(|e| {
            ScriptError::Transfer(format!(
                "copy {} to {}: {}",
                local.display(),
                remote.display(),
                e
            ))
        })?;
        debug!("Copied {} bytes to {}", bytes, remote.display());
        Ok(())
    }

    async fn mark_executable(&self, remote: &Path) -> Result<(), ScriptError> {
        let meta = tokio::fs::metadata(remote)
            .await
            .map_err(|e| ScriptError::Permission(format!("stat {}: {}", remote.display(), e)))?;
        let mut perms = meta.permissions();
        perms.set_mode(perms.mode() | 0o111);
        tokio::fs::set_permissions(remote, perms)
            .await
            .map_err(|e| ScriptError::Permission(format!("chmod {}: {}", remote.display(), e)))?;
        Ok(())
    }

    async fn run(
        &self,
        remote_script: &Path,
        executable: Option<&str>,
        working_dir: &Path,
    ) -> Result<ExecutionResult, ScriptError> {
        let mut cmd = match executable {
            Some(exe) => {
                let mut cmd = Command::new(exe);
                cmd.arg(remote_script);
                cmd
            }
            None => Command::new(remote_script),
        };
        cmd.current_dir(working_dir);

        info!("Running locally: {}", remote_script.display());
        let started = chrono::Utc::now();
        let output = cmd.output().await.map_err(|e| {
            ScriptError::Command(format!("Failed to spawn {}: {}", remote_script.display(), e))
        })?;
        let finished = chrono::Utc::now();

        // Killed by a signal: no exit code
        let rc = output.status.code().unwrap_or(-1);
        let result = ExecutionResult::from_output(
            rc,
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        );
        Ok(result.with_timing(started, finished))
    }
}
