use script_core::config::{Config, LOCAL_TARGET};

pub async fn run(config: &Config, json: bool) -> anyhow::Result<()> {
    let builtin_local = config.targets.iter().all(|t| t.name != LOCAL_TARGET);

    if json {
        let mut entries: Vec<serde_json::Value> = config
            .targets
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "type": t.target_type.to_string(),
                    "host": t.host,
                    "user": t.user,
                    "port": t.ssh_port(),
                })
            })
            .collect();
        if builtin_local {
            entries.push(serde_json::json!({"name": LOCAL_TARGET, "type": "local", "builtin": true}));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{:<15} {:<8} {:<25} {}", "NAME", "TYPE", "HOST", "USER");
        println!("{}", "-".repeat(60));
        for t in &config.targets {
            println!(
                "{:<15} {:<8} {:<25} {}",
                t.name,
                t.target_type,
                t.host
                    .as_deref()
                    .map(|h| format!("{}:{}", h, t.ssh_port()))
                    .unwrap_or_else(|| "-".into()),
                t.user.as_deref().unwrap_or("-"),
            );
        }
        if builtin_local {
            println!("{:<15} {:<8} {:<25} {}", LOCAL_TARGET, "local", "(builtin)", "-");
        }
    }

    Ok(())
}
