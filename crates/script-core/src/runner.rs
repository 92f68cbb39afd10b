use crate::artifact::{next_sequence, Artifacts};
use crate::config::Config;
use crate::dispatcher::{should_run, Decision};
use crate::error::ScriptError;
use crate::executor::{invocation, Executor};
use crate::request::ScriptRequest;
use crate::result::ExecutionResult;
use crate::stager::Stager;
use crate::template::{render, RenderedScript};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Settings shared by every invocation of a runner.
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    pub prefix: String,
    pub tmp_dir: PathBuf,
    /// Forces tracing on regardless of the request.
    pub debug: bool,
}

impl RunnerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefix: config.defaults.prefix.clone(),
            tmp_dir: config.tmp_dir(),
            debug: config.defaults.debug,
        }
    }
}

/// Everything computed for a request before anything is written.
#[derive(Debug, Clone)]
pub struct Plan {
    pub artifacts: Artifacts,
    pub script_path: PathBuf,
    pub log_path: PathBuf,
    pub rendered: RenderedScript,
}

/// Renders, gates, stages and runs script requests against one target.
pub struct ScriptRunner {
    executor: Box<dyn Executor>,
    settings: RunnerSettings,
    stager: Stager,
}

impl ScriptRunner {
    pub fn new(executor: Box<dyn Executor>, settings: RunnerSettings) -> Self {
        let stager = Stager::new(settings.tmp_dir.clone());
        Self {
            executor,
            settings,
            stager,
        }
    }

    pub fn executor(&self) -> &dyn Executor {
        self.executor.as_ref()
    }

    /// Compute artifact names and render the wrapper. Reads `output_dir` to
    /// pick the sequence number; writes nothing.
    pub fn plan(&self, task_name: &str, request: &ScriptRequest) -> Result<Plan, ScriptError> {
        let sequence = next_sequence(&request.output_dir, &self.settings.prefix)?;
        let artifacts = Artifacts::new(&self.settings.prefix, sequence, task_name);
        let script_path = request.output_dir.join(artifacts.script_name());
        let log_path = request.log_dir.join(artifacts.log_name());

        let rendered = if self.settings.debug && !request.debug_trace {
            let mut traced = request.clone();
            traced.debug_trace = true;
            render(&traced, &log_path)
        } else {
            render(request, &log_path)
        };

        Ok(Plan {
            artifacts,
            script_path,
            log_path,
            rendered,
        })
    }

    /// Run one request end to end.
    pub async fn run(
        &self,
        task_name: &str,
        request: &ScriptRequest,
    ) -> Result<ExecutionResult, ScriptError> {
        let plan = self.plan(task_name, request)?;
        let executable = request.executable.as_deref();

        match should_run(request, self.executor()).await? {
            Decision::DryRun => {
                info!("Dry run of {} on {}", plan.artifacts.stem(), self.executor.name());
                let mut result = ExecutionResult::dry_run(dry_run_command(request, &plan));
                result.script_path = Some(plan.script_path);
                result.log_path = Some(plan.log_path);
                return Ok(result);
            }
            Decision::Skip(msg) => {
                info!("{}: {}", plan.artifacts.stem(), msg);
                return Ok(ExecutionResult::skipped(msg));
            }
            Decision::Run => {}
        }

        let local = self.stager.stage(&plan.rendered)?;
        let transferred = self.executor.transfer(&local, &plan.script_path).await;
        self.stager.discard(&local);
        transferred?;
        debug!(
            "Transferred wrapper to {}:{}",
            self.executor.name(),
            plan.script_path.display()
        );

        self.executor.mark_executable(&plan.script_path).await?;

        info!(
            "Running {} on {} ({})",
            plan.script_path.display(),
            self.executor.name(),
            self.executor.executor_type()
        );
        let started = chrono::Utc::now();
        let mut result = self
            .executor
            .run(&plan.script_path, executable, &request.output_dir)
            .await?;
        let finished = chrono::Utc::now();

        if result.failed {
            warn!("{} exited with rc={}", plan.artifacts.stem(), result.rc);
        }
        if result.start.is_none() {
            result = result.with_timing(started, finished);
        }
        result.script_path = Some(plan.script_path);
        result.log_path = Some(plan.log_path);
        Ok(result)
    }
}

fn dry_run_command(request: &ScriptRequest, plan: &Plan) -> serde_json::Value {
    serde_json::json!({
        "cmd": invocation(&plan.script_path, request.executable.as_deref()),
        "chdir": request.output_dir,
        "script_path": plan.script_path,
        "log_path": plan.log_path,
        "creates": request.creates_marker,
        "removes": request.removes_marker,
        "executable": request.executable,
        "extra_args": request.extra_env,
    })
}
