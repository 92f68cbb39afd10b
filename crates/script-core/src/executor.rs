use crate::error::ScriptError;
use crate::result::ExecutionResult;
use std::path::Path;

/// Access to the host the wrapper runs on. Every target type implements this.
///
/// Implementations add no retries or timeouts of their own.
#[async_trait::async_trait]
pub trait Executor: Send + Sync {
    /// Name of this target (from config).
    fn name(&self) -> &str;

    /// Target type string ("ssh", "local").
    fn executor_type(&self) -> &str;

    /// Whether `path` exists on the target.
    async fn path_exists(&self, path: &Path) -> Result<bool, ScriptError>;

    /// Copy a local file to `remote` on the target, byte for byte.
    async fn transfer(&self, local: &Path, remote: &Path) -> Result<(), ScriptError>;

    /// Add the execute bits to `remote`.
    async fn mark_executable(&self, remote: &Path) -> Result<(), ScriptError>;

    /// Run `remote_script` in `working_dir`, through `executable` if given.
    /// A nonzero exit status is reported in the result, not as an error.
    async fn run(
        &self,
        remote_script: &Path,
        executable: Option<&str>,
        working_dir: &Path,
    ) -> Result<ExecutionResult, ScriptError>;
}

/// The command line used to start `remote_script`.
pub fn invocation(remote_script: &Path, executable: Option<&str>) -> String {
    let script = crate::template::shell_escape(&remote_script.to_string_lossy());
    match executable {
        Some(exe) => format!("{} {}", exe, script),
        None => script,
    }
}
