//! Recorded-trace engine
//!
//! Replays a trace saved from an earlier run instead of executing anything.
//! The file holds either a bare step array or a full report object with
//! `stdout` and `trace` keys.

use super::{EngineError, EngineOutput, ExecutionEngine};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// Serves the same recorded trace for every run
#[derive(Debug, Clone)]
pub struct TraceFileEngine {
    path: PathBuf,
}

impl TraceFileEngine {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TraceFileEngine { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExecutionEngine for TraceFileEngine {
    fn run(&self, _source: &str) -> Result<EngineOutput, EngineError> {
        let text = fs::read_to_string(&self.path).map_err(|source| EngineError::TraceFile {
            path: self.path.display().to_string(),
            source,
        })?;
        parse_recording(&text)
    }
}

/// Accept either a bare trace array or a report object
pub(crate) fn parse_recording(text: &str) -> Result<EngineOutput, EngineError> {
    let value: JsonValue =
        serde_json::from_str(text).map_err(|e| EngineError::InvalidOutput {
            message: e.to_string(),
        })?;

    match value {
        JsonValue::Array(_) => Ok(EngineOutput::new(String::new(), Some(value))),
        JsonValue::Object(_) => {
            serde_json::from_value(value).map_err(|e| EngineError::InvalidOutput {
                message: e.to_string(),
            })
        }
        other => Err(EngineError::InvalidOutput {
            message: format!("expected a trace array or report object, found {}", other),
        }),
    }
}
