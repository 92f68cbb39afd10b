pub mod config;
pub mod render;
pub mod run;
pub mod targets;

use script_core::config::Config;

/// Load config from `path`, or the default location.
pub fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(p) => Config::load_from(p),
        None => Config::load_default(),
    }
}
