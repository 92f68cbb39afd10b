use crate::args::RequestArgs;
use crate::dispatch;
use script_core::config::{Config, LOCAL_TARGET};
use script_core::{RunnerSettings, ScriptRequest, ScriptRunner};

/// Print the wrapper a run would produce. Writes nothing.
pub async fn run(config: &Config, args: &RequestArgs) -> anyhow::Result<()> {
    let request = ScriptRequest::from_params(args.to_params()?)?;
    let executor = dispatch::create_executor(config, LOCAL_TARGET)?;
    let runner = ScriptRunner::new(executor, RunnerSettings::from_config(config));
    let plan = runner.plan(&args.name, &request)?;

    eprintln!("# script: {}", plan.script_path.display());
    eprintln!("# log:    {}", plan.log_path.display());
    print!("{}", plan.rendered);
    Ok(())
}
