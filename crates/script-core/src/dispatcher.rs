use crate::error::ScriptError;
use crate::executor::Executor;
use crate::request::ScriptRequest;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip(String),
    DryRun,
}

/// Decide whether a request is staged and executed.
///
/// Dry-run wins and never touches the target. Otherwise `creates` is checked
/// before `removes`.
pub async fn should_run(
    request: &ScriptRequest,
    executor: &dyn Executor,
) -> Result<Decision, ScriptError> {
    if request.dry_run {
        return Ok(Decision::DryRun);
    }

    if let Some(marker) = &request.creates_marker {
        if executor.path_exists(marker).await? {
            debug!("creates marker {} present on {}", marker.display(), executor.name());
            return Ok(Decision::Skip(format!(
                "skipped, since {} exists",
                marker.display()
            )));
        }
    }

    if let Some(marker) = &request.removes_marker {
        if !executor.path_exists(marker).await? {
            debug!("removes marker {} absent on {}", marker.display(), executor.name());
            return Ok(Decision::Skip(format!(
                "skipped, since {} does not exist",
                marker.display()
            )));
        }
    }

    Ok(Decision::Run)
}
