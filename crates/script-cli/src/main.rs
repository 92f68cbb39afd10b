use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod dispatch;

#[derive(Parser)]
#[command(name = "ci-script")]
#[command(about = "Run shell scripts on a target with logging", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/ci-script/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render, upload and run a script
    Run {
        /// Target name from config
        #[arg(short, long, default_value = "local")]
        target: String,

        /// Output the result as JSON
        #[arg(short, long)]
        json: bool,

        #[command(flatten)]
        request: args::RequestArgs,
    },

    /// Print the wrapper script without writing anything
    Render {
        #[command(flatten)]
        request: args::RequestArgs,
    },

    /// List configured targets
    Targets {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show or initialize the config file
    Config {
        /// Print the config file path
        #[arg(long)]
        path: bool,

        /// Write a sample config
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            target,
            json,
            request,
        } => {
            let config = commands::load_config(config_path)?;
            let code = commands::run::run(&config, &target, &request, json).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Render { request } => {
            let config = commands::load_config(config_path)?;
            commands::render::run(&config, &request).await?;
        }
        Commands::Targets { json } => {
            let config = commands::load_config(config_path)?;
            commands::targets::run(&config, json).await?;
        }
        Commands::Config { path, init } => {
            commands::config::run(path, init, config_path).await?;
        }
    }

    Ok(())
}
