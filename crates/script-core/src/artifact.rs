use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

pub const DEFAULT_PREFIX: &str = "ci_script";

static LABEL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\x00-\x7F]|\s)+").expect("static regex"));

/// Names for the script and log written by one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub prefix: String,
    pub sequence: u32,
    pub label: String,
}

impl Artifacts {
    pub fn new(prefix: &str, sequence: u32, task_name: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            sequence,
            label: normalize_label(task_name),
        }
    }

    /// `<prefix>_NNN_<label>`
    pub fn stem(&self) -> String {
        format!("{}_{:03}_{}", self.prefix, self.sequence, self.label)
    }

    pub fn script_name(&self) -> String {
        format!("{}.sh", self.stem())
    }

    pub fn log_name(&self) -> String {
        format!("{}.log", self.stem())
    }
}

/// Collapse runs of whitespace and non-ASCII characters into a single `_`
/// and lowercase the result.
pub fn normalize_label(task_name: &str) -> String {
    LABEL_SEPARATORS
        .replace_all(task_name, "_")
        .to_lowercase()
}

/// Count entries in `dir` named `<prefix>_NNN_*`. The count is the next
/// sequence number.
///
/// Two processes listing the same directory at once can get the same
/// number; nothing here serializes them.
///
/// `dir` is read on the machine running ci-script. For a remote target the
/// uploaded scripts never appear here, so unless the directory is shared
/// with the target every run gets the same number and overwrites the
/// previous remote script.
pub fn next_sequence(dir: &Path, prefix: &str) -> Result<u32, std::io::Error> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if is_artifact_name(&entry.file_name().to_string_lossy(), prefix) {
            count += 1;
        }
    }
    Ok(count)
}

fn is_artifact_name(name: &str, prefix: &str) -> bool {
    let Some(rest) = name.strip_prefix(prefix).and_then(|r| r.strip_prefix('_')) else {
        return false;
    };
    let bytes = rest.as_bytes();
    bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b'_'
}
