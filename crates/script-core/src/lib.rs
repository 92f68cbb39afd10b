pub mod artifact;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod request;
pub mod result;
pub mod runner;
pub mod stager;
pub mod template;

pub use config::Config;
pub use error::{ErrorKind, ScriptError};
pub use executor::Executor;
pub use request::{ScriptParams, ScriptRequest};
pub use result::ExecutionResult;
pub use runner::{RunnerSettings, ScriptRunner};
pub use template::RenderedScript;
