use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
/// Loaded from ~/.config/ci-script/config.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Ssh,
    Local,
}

impl std::fmt::Display for TargetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetType::Ssh => write!(f, "ssh"),
            TargetType::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Artifact name prefix: `<prefix>_NNN_<label>.sh`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Where wrappers are staged before transfer.
    #[serde(default)]
    pub tmp_dir: Option<PathBuf>,
    /// Turn on `set -x` for every run.
    #[serde(default)]
    pub debug: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            tmp_dir: None,
            debug: false,
        }
    }
}

fn default_prefix() -> String {
    crate::artifact::DEFAULT_PREFIX.to_string()
}

/// Built-in target that needs no configuration.
pub const LOCAL_TARGET: &str = "local";

impl Config {
    /// Load config from the default path (~/.config/ci-script/config.yaml).
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::empty())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/etc"))
            .join("ci-script")
            .join("config.yaml")
    }

    /// Empty config with no targets.
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
            defaults: Defaults::default(),
        }
    }

    /// Find a target config by name. The built-in `local` target is
    /// returned when no configured target shadows it.
    pub fn find_target(&self, name: &str) -> Option<TargetConfig> {
        self.targets
            .iter()
            .find(|t| t.name == name)
            .cloned()
            .or_else(|| (name == LOCAL_TARGET).then(TargetConfig::local))
    }

    /// Staging directory for rendered wrappers.
    pub fn tmp_dir(&self) -> PathBuf {
        self.defaults.tmp_dir.clone().unwrap_or_else(default_tmp_dir)
    }
}

impl TargetConfig {
    pub fn local() -> Self {
        Self {
            name: LOCAL_TARGET.to_string(),
            target_type: TargetType::Local,
            host: None,
            port: None,
            user: None,
            key_path: None,
        }
    }

    /// Get the SSH port, falling back to 22.
    pub fn ssh_port(&self) -> u16 {
        self.port.unwrap_or(22)
    }
}

/// ~/.ci-script/tmp
pub fn default_tmp_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".ci-script")
        .join("tmp")
}
