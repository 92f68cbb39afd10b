use crate::args::RequestArgs;
use crate::dispatch;
use script_core::config::Config;
use script_core::{ExecutionResult, RunnerSettings, ScriptRequest, ScriptRunner};
use tracing::debug;

/// Run a script on `target_name`. Returns the process exit code.
pub async fn run(
    config: &Config,
    target_name: &str,
    args: &RequestArgs,
    json: bool,
) -> anyhow::Result<i32> {
    let request = ScriptRequest::from_params(args.to_params()?)?;
    if !request.decrypt {
        debug!("decrypt disabled; script content is used as given");
    }

    let executor = dispatch::create_executor(config, target_name)?;
    let runner = ScriptRunner::new(executor, RunnerSettings::from_config(config));
    let result = runner.run(&args.name, &request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(exit_code(&result))
}

fn exit_code(result: &ExecutionResult) -> i32 {
    match (result.failed, result.rc) {
        (false, _) => 0,
        (true, rc) if (1..=255).contains(&rc) => rc,
        (true, _) => 1,
    }
}

fn print_result(result: &ExecutionResult) {
    if let Some(command) = &result.command {
        println!("Dry run:");
        println!("  Command:  {}", command["cmd"].as_str().unwrap_or("-"));
        println!("  Chdir:    {}", command["chdir"].as_str().unwrap_or("-"));
        if let Some(log) = &result.log_path {
            println!("  Log:      {}", log.display());
        }
        return;
    }

    if result.skipped {
        println!("Skipped: {}", result.msg.as_deref().unwrap_or("guard satisfied"));
        return;
    }

    for line in &result.stdout_lines {
        println!("{}", line);
    }
    for line in &result.stderr_lines {
        eprintln!("{}", line);
    }
    println!();
    println!("Script finished:");
    if let Some(script) = &result.script_path {
        println!("  Script:   {}", script.display());
    }
    if let Some(log) = &result.log_path {
        println!("  Log:      {}", log.display());
    }
    println!("  RC:       {}", result.rc);
    println!("  Status:   {}", if result.failed { "failed" } else { "ok" });
    if let Some(delta) = result.delta {
        println!("  Duration: {:.3}s", delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let ok = ExecutionResult::from_output(0, String::new(), String::new());
        assert_eq!(exit_code(&ok), 0);

        let failed = ExecutionResult::from_output(4, String::new(), String::new());
        assert_eq!(exit_code(&failed), 4);

        let signalled = ExecutionResult::from_output(-1, String::new(), String::new());
        assert_eq!(exit_code(&signalled), 1);

        assert_eq!(exit_code(&ExecutionResult::skipped("x")), 0);
    }
}
