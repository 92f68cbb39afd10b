use crate::request::ScriptRequest;
use std::fmt;
use std::path::Path;

/// Wrapper script text. Produced once per request and never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript(String);

impl RenderedScript {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for RenderedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const INTERPRETER_LINE: &str = "#!/bin/bash";
pub const STRICT_MODE: &str = "set -euo pipefail";
pub const TRACE: &str = "set -x";

/// Build the wrapper around `request.script_body`.
///
/// Sections, in order: interpreter, strict mode, trace (debug only), output
/// duplication into `log_path`, pushd (chdir only), exports, body, popd.
/// The body is copied byte for byte.
///
/// Export values are wrapped in double quotes and not escaped, so a value
/// containing `"` or `$` is interpreted by the shell.
pub fn render(request: &ScriptRequest, log_path: &Path) -> RenderedScript {
    let mut out = String::with_capacity(request.script_body.len() + 256);

    push_line(&mut out, INTERPRETER_LINE);
    push_line(&mut out, STRICT_MODE);
    if request.debug_trace {
        push_line(&mut out, TRACE);
    }
    push_line(
        &mut out,
        &format!(
            "exec > >(tee -i -a {}) 2>&1",
            shell_escape(&log_path.to_string_lossy())
        ),
    );
    if let Some(dir) = &request.working_dir {
        push_line(&mut out, &format!("pushd {}", dir.display()));
    }
    for (key, value) in &request.extra_env {
        push_line(&mut out, &format!("export {}=\"{}\"", key, value));
    }

    out.push_str(&request.script_body);
    if !request.script_body.is_empty() && !request.script_body.ends_with('\n') {
        out.push('\n');
    }

    if request.working_dir.is_some() {
        push_line(&mut out, "popd");
    }

    RenderedScript(out)
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Shell-escape a string for safe use in generated commands.
pub fn shell_escape(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
