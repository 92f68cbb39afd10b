use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("{0} parameter is missing")]
    MissingParameter(&'static str),

    #[error("output_dir points to a non-existing directory: {}", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("logs dir, {} doesn't exist", .0.display())]
    LogDirMissing(PathBuf),

    #[error("Invalid environment variable name: {0:?}")]
    InvalidEnvKey(String),

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Permission fixup failed: {0}")]
    Permission(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Coarse classification of a [`ScriptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised before anything is written.
    Precondition,
    Transfer,
    Permission,
    /// The target could not be reached or the command could not be launched.
    Transport,
    Config,
    Io,
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::MissingParameter(_)
            | ScriptError::OutputDirMissing(_)
            | ScriptError::LogDirMissing(_)
            | ScriptError::InvalidEnvKey(_) => ErrorKind::Precondition,
            ScriptError::Transfer(_) => ErrorKind::Transfer,
            ScriptError::Permission(_) => ErrorKind::Permission,
            ScriptError::Connection(_) | ScriptError::Command(_) => ErrorKind::Transport,
            ScriptError::Config(_)
            | ScriptError::TargetNotFound(_)
            | ScriptError::Json(_)
            | ScriptError::Yaml(_) => ErrorKind::Config,
            ScriptError::Io(_) => ErrorKind::Io,
        }
    }
}
