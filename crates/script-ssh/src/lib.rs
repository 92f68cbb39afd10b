mod ssh_executor;

pub use ssh_executor::SshExecutor;
