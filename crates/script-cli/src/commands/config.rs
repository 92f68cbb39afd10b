use script_core::Config;
use std::path::Path;

const SAMPLE_CONFIG: &str = r#"# ci-script configuration

targets:
  - name: controller
    type: local

  - name: builder
    type: ssh
    host: 192.168.0.152
    port: 22
    user: zuul
    key_path: ~/.ssh/id_ed25519

defaults:
  prefix: ci_script
  # tmp_dir: /home/zuul/.ci-script/tmp
  debug: false
"#;

/// `config_path` is the global `--config` override, if given.
pub async fn run(path: bool, init: bool, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config already exists at: {}", config_path.display());
            println!("Remove it first if you want to reinitialize.");
            return Ok(());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&config_path, SAMPLE_CONFIG)?;
        println!("Sample config written to: {}", config_path.display());
        return Ok(());
    }

    println!("Config path: {}", config_path.display());
    if config_path.exists() {
        let config = Config::load_from(&config_path)?;
        println!("Targets:     {}", config.targets.len());
        for t in &config.targets {
            println!("  - {} ({})", t.name, t.target_type);
        }
        println!("Prefix:      {}", config.defaults.prefix);
        println!("Staging:     {}", config.tmp_dir().display());
    } else {
        println!("Status:      not found");
        println!("Run `ci-script config --init` to create one.");
    }

    Ok(())
}
