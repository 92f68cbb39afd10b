use anyhow::Context;
use clap::Args;
use script_core::ScriptParams;
use std::path::PathBuf;

/// Request flags shared by `run` and `render`.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Task name, used to label the script and log artifacts
    #[arg(short, long, default_value = "script")]
    pub name: String,

    /// YAML file with request parameters; flags below override it
    #[arg(short, long)]
    pub params: Option<PathBuf>,

    /// Directory the wrapper is written to (its sibling `logs` gets the log)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Script content
    #[arg(short, long, conflicts_with = "script_file")]
    pub script: Option<String>,

    /// Read the script content from a file
    #[arg(long)]
    pub script_file: Option<PathBuf>,

    /// Export KEY=VALUE before the script runs (repeatable, kept in order)
    #[arg(short, long = "env", value_parser = parse_key_val)]
    pub env: Vec<(String, String)>,

    /// Change into this directory before running the script
    #[arg(long)]
    pub chdir: Option<PathBuf>,

    /// Skip when this path already exists on the target
    #[arg(long)]
    pub creates: Option<PathBuf>,

    /// Skip when this path does not exist on the target
    #[arg(long)]
    pub removes: Option<PathBuf>,

    /// Interpreter to invoke the script with
    #[arg(long)]
    pub executable: Option<String>,

    /// Trace the script with `set -x`
    #[arg(short, long)]
    pub debug: bool,

    /// Compute everything but stage and run nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Mark the script content as already decrypted
    #[arg(long)]
    pub no_decrypt: bool,
}

impl RequestArgs {
    /// Merge the params file (if any) with the flags.
    pub fn to_params(&self) -> anyhow::Result<ScriptParams> {
        let mut params = match &self.params {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_yaml::from_str::<ScriptParams>(&contents)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ScriptParams::default(),
        };

        if let Some(dir) = &self.output_dir {
            params.output_dir = Some(dir.clone());
        }
        if let Some(script) = &self.script {
            params.script = Some(script.clone());
        }
        if let Some(path) = &self.script_file {
            let body = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            params.script = Some(body);
        }
        for (key, value) in &self.env {
            params.extra_args.insert(key.clone(), value.clone());
        }
        if self.chdir.is_some() {
            params.chdir = self.chdir.clone();
        }
        if self.creates.is_some() {
            params.creates = self.creates.clone();
        }
        if self.removes.is_some() {
            params.removes = self.removes.clone();
        }
        if self.executable.is_some() {
            params.executable = self.executable.clone();
        }
        params.debug |= self.debug;
        params.dry_run |= self.dry_run;
        if self.no_decrypt {
            params.decrypt = false;
        }

        Ok(params)
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}
