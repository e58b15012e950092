//! Python child-process engine
//!
//! The source is fed to the interpreter on stdin and executed by a small
//! harness that swaps `sys.stdout` for a buffer, then writes a single JSON
//! report `{"stdout": ..., "trace": execution_log}` to the real stdout. A
//! program that raises, or records a log that cannot be serialized, exits
//! non-zero and its traceback becomes the failure message.

use super::{EngineError, EngineOutput, ExecutionEngine};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default interpreter command
pub const DEFAULT_PYTHON: &str = "python3";

const HARNESS: &str = r#"
import io
import json
import sys

_source = sys.stdin.read()
_real_stdout = sys.stdout
_captured = io.StringIO()
_globals = {"__name__": "__main__"}
sys.stdout = _captured
try:
    exec(compile(_source, "<editor>", "exec"), _globals)
finally:
    sys.stdout = _real_stdout
_report = json.dumps({"stdout": _captured.getvalue(), "trace": _globals.get("execution_log")})
_real_stdout.write(_report)
"#;

/// Runs source through an external Python interpreter
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
}

impl CommandEngine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandEngine {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        CommandEngine::new(DEFAULT_PYTHON)
    }
}

impl ExecutionEngine for CommandEngine {
    fn run(&self, source: &str) -> Result<EngineOutput, EngineError> {
        let spawn_error = |source| EngineError::Spawn {
            command: self.program.clone(),
            source,
        };

        debug!(program = %self.program, bytes = source.len(), "spawning engine");
        let mut child = Command::new(&self.program)
            .arg("-c")
            .arg(HARNESS)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // The harness reads all of stdin before printing anything
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(EngineError::Failed {
                message: if message.is_empty() {
                    format!("engine exited with {}", output.status)
                } else {
                    message.to_string()
                },
            });
        }

        parse_report(&output.stdout)
    }
}

/// Decode the harness report written on stdout
pub(crate) fn parse_report(bytes: &[u8]) -> Result<EngineOutput, EngineError> {
    serde_json::from_slice(bytes).map_err(|e| EngineError::InvalidOutput {
        message: e.to_string(),
    })
}
