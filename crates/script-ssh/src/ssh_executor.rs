use script_core::config::TargetConfig;
use script_core::error::ScriptError;
use script_core::executor::invocation;
use script_core::template::shell_escape;
use script_core::{ExecutionResult, Executor};
use ssh2::{ErrorCode, OpenFlags, OpenType, Session};
use std::io::Read;
use std::net::TcpStream;
use std::path::Path;
use tracing::{debug, info};

/// SSH executor: uploads wrappers over SFTP and runs them in an exec channel.
///
/// Sequence numbers are counted from the local `output_dir`, which does not
/// see files uploaded here; repeated runs reuse `_000_` and overwrite the
/// remote script unless that directory is shared with the host.
pub struct SshExecutor {
    config: TargetConfig,
}

impl SshExecutor {
    pub fn new(config: TargetConfig) -> Self {
        Self { config }
    }

    /// Establish an SSH session to the configured host.
    fn connect(&self) -> Result<Session, ScriptError> {
        let host = self
            .config
            .host
            .as_deref()
            .ok_or_else(|| ScriptError::Config("SSH target requires 'host'".into()))?;
        let user = self
            .config
            .user
            .as_deref()
            .ok_or_else(|| ScriptError::Config("SSH target requires 'user'".into()))?;
        let port = self.config.ssh_port();

        debug!("Connecting to {}@{}:{}", user, host, port);
        let tcp = TcpStream::connect(format!("{}:{}", host, port))
            .map_err(|e| ScriptError::Connection(format!("TCP connect to {}:{}: {}", host, port, e)))?;

        let mut sess = Session::new()
            .map_err(|e| ScriptError::Connection(format!("Session::new: {}", e)))?;
        sess.set_tcp_stream(tcp);
        sess.handshake()
            .map_err(|e| ScriptError::Connection(format!("Handshake: {}", e)))?;

        // Key file if configured, agent otherwise
        if let Some(key_path) = &self.config.key_path {
            sess.userauth_pubkey_file(user, None, Path::new(key_path), None)
                .map_err(|e| ScriptError::Connection(format!("Pubkey auth: {}", e)))?;
        } else {
            sess.userauth_agent(user)
                .map_err(|e| ScriptError::Connection(format!("Agent auth: {}", e)))?;
        }

        if !sess.authenticated() {
            return Err(ScriptError::Connection("Authentication failed".into()));
        }

        info!("SSH connected to {}@{}:{}", user, host, port);
        Ok(sess)
    }

    /// Execute a command on the remote host and capture both streams.
    fn exec_remote(&self, sess: &Session, cmd: &str) -> Result<ExecutionResult, ScriptError> {
        debug!("Remote exec: {}", cmd);
        let mut channel = sess
            .channel_session()
            .map_err(|e| ScriptError::Command(format!("Channel: {}", e)))?;
        channel
            .exec(cmd)
            .map_err(|e| ScriptError::Command(format!("Exec '{}': {}", cmd, e)))?;

        let stdout = read_lossy(&mut channel)
            .map_err(|e| ScriptError::Command(format!("Read output: {}", e)))?;
        let stderr = read_lossy(&mut channel.stderr())
            .map_err(|e| ScriptError::Command(format!("Read stderr: {}", e)))?;

        channel
            .wait_close()
            .map_err(|e| ScriptError::Command(format!("Close channel: {}", e)))?;
        let rc = channel
            .exit_status()
            .map_err(|e| ScriptError::Command(format!("Exit status: {}", e)))?;

        if rc != 0 && !stderr.is_empty() {
            debug!("Remote command stderr: {}", stderr.trim());
        }

        Ok(ExecutionResult::from_output(rc, stdout, stderr))
    }
}

#[async_trait::async_trait]
impl Executor for SshExecutor {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn executor_type(&self) -> &str {
        "ssh"
    }

    async fn path_exists(&self, path: &Path) -> Result<bool, ScriptError> {
        let sess = self.connect()?;
        let sftp = sess
            .sftp()
            .map_err(|e| ScriptError::Connection(format!("SFTP: {}", e)))?;
        match sftp.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if is_no_such_file(&e) => Ok(false),
            Err(e) => Err(ScriptError::Connection(format!(
                "stat {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn transfer(&self, local: &Path, remote: &Path) -> Result<(), ScriptError> {
        let sess = self.connect()?;
        let sftp = sess
            .sftp()
            .map_err(|e| ScriptError::Transfer(format!("SFTP: {}", e)))?;

        let mut local_file = std::fs::File::open(local)
            .map_err(|e| ScriptError::Transfer(format!("open {}: {}", local.display(), e)))?;
        let mut remote_file = sftp
            .open_mode(
                remote,
                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
                0o600,
                OpenType::File,
            )
            .map_err(|e| ScriptError::Transfer(format!("open {}: {}", remote.display(), e)))?;
        let bytes = std::io::copy(&mut local_file, &mut remote_file)
            .map_err(|e| ScriptError::Transfer(format!("copy to {}: {}", remote.display(), e)))?;

        debug!("Uploaded {} bytes to {}:{}", bytes, self.name(), remote.display());
        Ok(())
    }

    async fn mark_executable(&self, remote: &Path) -> Result<(), ScriptError> {
        let sess = self.connect()?;
        let sftp = sess
            .sftp()
            .map_err(|e| ScriptError::Permission(format!("SFTP: {}", e)))?;

        let mut stat = sftp
            .stat(remote)
            .map_err(|e| ScriptError::Permission(format!("stat {}: {}", remote.display(), e)))?;
        let perm = stat.perm.unwrap_or(0o600) & 0o7777;
        stat.perm = Some(perm | 0o111);
        sftp.setstat(remote, stat)
            .map_err(|e| ScriptError::Permission(format!("chmod {}: {}", remote.display(), e)))?;
        Ok(())
    }

    async fn run(
        &self,
        remote_script: &Path,
        executable: Option<&str>,
        working_dir: &Path,
    ) -> Result<ExecutionResult, ScriptError> {
        let sess = self.connect()?;
        let cmd = format!(
            "cd {} && {}",
            shell_escape(&working_dir.to_string_lossy()),
            invocation(remote_script, executable)
        );
        info!("Running on {}: {}", self.name(), cmd);

        let started = chrono::Utc::now();
        let result = self.exec_remote(&sess, &cmd)?;
        Ok(result.with_timing(started, chrono::Utc::now()))
    }
}

/// SSH_FX_NO_SUCH_FILE
const SFTP_NO_SUCH_FILE: i32 = 2;

fn is_no_such_file(err: &ssh2::Error) -> bool {
    err.code() == ErrorCode::SFTP(SFTP_NO_SUCH_FILE)
}

/// Read a stream to the end; invalid UTF-8 is replaced rather than rejected.
fn read_lossy(reader: &mut impl Read) -> std::io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_core::config::TargetType;

    fn target(host: Option<&str>, user: Option<&str>) -> TargetConfig {
        TargetConfig {
            name: "remote".into(),
            target_type: TargetType::Ssh,
            host: host.map(String::from),
            port: None,
            user: user.map(String::from),
            key_path: None,
        }
    }

    #[test]
    fn test_connect_requires_host() {
        let exec = SshExecutor::new(target(None, Some("zuul")));
        match exec.connect() {
            Err(ScriptError::Config(msg)) => assert!(msg.contains("host")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected without a host"),
        }
    }

    #[test]
    fn test_connect_requires_user() {
        let exec = SshExecutor::new(target(Some("127.0.0.1"), None));
        assert!(matches!(exec.connect(), Err(ScriptError::Config(_))));
    }

    #[test]
    fn test_read_lossy_accepts_invalid_utf8() {
        let mut bytes: &[u8] = b"ok\n\xff\xfe done\n";
        let text = read_lossy(&mut bytes).unwrap();
        assert_eq!(text, "ok\n\u{FFFD}\u{FFFD} done\n");

        let result = ExecutionResult::from_output(0, text, String::new());
        assert_eq!(result.stdout_lines.len(), 2);
        assert!(!result.failed);
    }

    #[test]
    fn test_only_no_such_file_means_absent() {
        let missing = ssh2::Error::new(ErrorCode::SFTP(2), "no such file");
        assert!(is_no_such_file(&missing));

        let denied = ssh2::Error::new(ErrorCode::SFTP(3), "permission denied");
        assert!(!is_no_such_file(&denied));

        let dropped = ssh2::Error::new(ErrorCode::Session(-7), "socket send");
        assert!(!is_no_such_file(&dropped));
    }

    #[test]
    fn test_identity() {
        let exec = SshExecutor::new(target(Some("h"), Some("u")));
        assert_eq!(exec.name(), "remote");
        assert_eq!(exec.executor_type(), "ssh");
    }
}
