use crate::error::ScriptError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_true() -> bool {
    true
}

/// Raw parameters for one invocation, as read from a params file or CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptParams {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub script: Option<String>,
    /// Exported to the environment before the script runs, in order.
    #[serde(default)]
    pub extra_args: IndexMap<String, String>,
    #[serde(default)]
    pub chdir: Option<PathBuf>,
    #[serde(default)]
    pub creates: Option<PathBuf>,
    #[serde(default)]
    pub removes: Option<PathBuf>,
    /// Accepted for compatibility; decryption happens before the script
    /// reaches this crate.
    #[serde(default = "default_true")]
    pub decrypt: bool,
    #[serde(default)]
    pub executable: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ScriptParams {
    fn default() -> Self {
        Self {
            output_dir: None,
            script: None,
            extra_args: IndexMap::new(),
            chdir: None,
            creates: None,
            removes: None,
            decrypt: default_true(),
            executable: None,
            debug: false,
            dry_run: false,
        }
    }
}

/// A validated request. Construct through [`ScriptRequest::from_params`].
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    pub script_body: String,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub extra_env: IndexMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub debug_trace: bool,
    pub creates_marker: Option<PathBuf>,
    pub removes_marker: Option<PathBuf>,
    pub dry_run: bool,
    pub executable: Option<String>,
    pub decrypt: bool,
}

impl ScriptRequest {
    /// Validate parameters and check that `output_dir` and its sibling
    /// `logs` directory exist. Nothing is written. A relative `output_dir`
    /// is made absolute against the current directory.
    pub fn from_params(params: ScriptParams) -> Result<Self, ScriptError> {
        let output_dir = params
            .output_dir
            .ok_or(ScriptError::MissingParameter("output_dir"))?;
        let script_body = params
            .script
            .ok_or(ScriptError::MissingParameter("script"))?;

        if !output_dir.is_dir() {
            return Err(ScriptError::OutputDirMissing(output_dir));
        }
        // The script runs with output_dir as its cwd, so a relative path
        // would be resolved twice.
        let output_dir = std::path::absolute(&output_dir)?;

        let log_dir = logs_dir_for(&output_dir);
        if !log_dir.is_dir() {
            return Err(ScriptError::LogDirMissing(log_dir));
        }

        if let Some(key) = params.extra_args.keys().find(|k| !is_env_key(k)) {
            return Err(ScriptError::InvalidEnvKey(key.clone()));
        }

        Ok(Self {
            script_body,
            output_dir,
            log_dir,
            extra_env: params.extra_args,
            working_dir: params.chdir,
            debug_trace: params.debug,
            creates_marker: params.creates,
            removes_marker: params.removes,
            dry_run: params.dry_run,
            executable: params.executable,
            decrypt: params.decrypt,
        })
    }
}

/// `<output_dir>/../logs`
pub fn logs_dir_for(output_dir: &Path) -> PathBuf {
    output_dir
        .parent()
        .unwrap_or(output_dir)
        .join("logs")
}

fn is_env_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
