use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one invocation. Returned for runs, skips and dry-runs alike.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    pub changed: bool,
    pub failed: bool,
    pub rc: i32,
    pub stdout: String,
    #[serde(rename = "stdout_line")]
    pub stdout_lines: Vec<String>,
    pub stderr: String,
    #[serde(rename = "stderr_line")]
    pub stderr_lines: Vec<String>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// What would have run, set for dry-runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Wall time in seconds between `start` and `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl ExecutionResult {
    /// Result of a script that actually ran. A nonzero `rc` marks it failed.
    pub fn from_output(rc: i32, stdout: String, stderr: String) -> Self {
        Self {
            changed: true,
            failed: rc != 0,
            rc,
            stdout_lines: split_lines(&stdout),
            stdout,
            stderr_lines: split_lines(&stderr),
            stderr,
            ..Self::default()
        }
    }

    /// No-op result for a satisfied `creates`/`removes` guard.
    pub fn skipped(msg: impl Into<String>) -> Self {
        Self {
            skipped: true,
            msg: Some(msg.into()),
            ..Self::default()
        }
    }

    /// No-op result describing what a dry-run would have done.
    pub fn dry_run(command: serde_json::Value) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }

    /// Record wall-clock bounds of the run.
    pub fn with_timing(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.delta = Some((end - start).num_milliseconds() as f64 / 1000.0);
        self.start = Some(start);
        self.end = Some(end);
        self
    }
}

fn split_lines(s: &str) -> Vec<String> {
    s.lines().map(|l| l.to_string()).collect()
}
