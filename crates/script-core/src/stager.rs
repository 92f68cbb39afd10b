use crate::error::ScriptError;
use crate::template::RenderedScript;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes rendered wrappers to uniquely named local files before transfer.
#[derive(Debug, Clone)]
pub struct Stager {
    tmp_dir: PathBuf,
}

impl Stager {
    pub fn new(tmp_dir: PathBuf) -> Self {
        Self { tmp_dir }
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    /// Write `script` to `<tmp_dir>/<uuid>`, creating `tmp_dir` as needed.
    pub fn stage(&self, script: &RenderedScript) -> Result<PathBuf, ScriptError> {
        std::fs::create_dir_all(&self.tmp_dir).map_err(|e| {
            ScriptError::Transfer(format!("create {}: {}", self.tmp_dir.display(), e))
        })?;
        let path = self.tmp_dir.join(uuid::Uuid::new_v4().simple().to_string());
        std::fs::write(&path, script.as_bytes())
            .map_err(|e| ScriptError::Transfer(format!("write {}: {}", path.display(), e)))?;
        debug!("Staged wrapper at {}", path.display());
        Ok(path)
    }

    /// Remove a staged file. Failures are logged, not returned.
    pub fn discard(&self, path: &Path) {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Failed to remove staged wrapper {}: {}", path.display(), e);
        }
    }
}
