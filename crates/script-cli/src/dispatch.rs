use script_core::config::{Config, TargetConfig, TargetType};
use script_core::error::ScriptError;
use script_core::Executor;

/// Create an executor instance from config by target name.
pub fn create_executor(
    config: &Config,
    target_name: &str,
) -> Result<Box<dyn Executor>, ScriptError> {
    let target = config
        .find_target(target_name)
        .ok_or_else(|| ScriptError::TargetNotFound(target_name.to_string()))?;

    Ok(create_executor_from_config(target))
}

/// Create an executor from a TargetConfig.
pub fn create_executor_from_config(target: TargetConfig) -> Box<dyn Executor> {
    match target.target_type {
        TargetType::Ssh => Box::new(script_ssh::SshExecutor::new(target)),
        TargetType::Local => Box::new(script_local::LocalExecutor::new(target)),
    }
}
