//! Adapters for the external execution engine
//!
//! The visualizer never interprets source itself. An [`ExecutionEngine`]
//! takes the editor text and hands back captured stdout plus the raw
//! execution log that the traced program recorded:
//! - [`command`]: runs a Python interpreter as a child process
//! - [`file`]: replays a trace recorded earlier to a JSON file
//! - [`samples`]: demo programs that record a trace for each structure kind
//!
//! The raw log is only shape-checked later, by
//! [`TraceModel::from_json`](crate::trace::TraceModel::from_json).

pub mod command;
pub mod errors;
pub mod file;
pub mod samples;

use serde::Deserialize;
use serde_json::Value as JsonValue;

pub use command::CommandEngine;
pub use errors::EngineError;
pub use file::TraceFileEngine;

/// Everything one successful run produced
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EngineOutput {
    /// Text the program printed
    #[serde(default)]
    pub stdout: String,
    /// The program's execution log, `None` when it never recorded one
    #[serde(default)]
    pub trace: Option<JsonValue>,
}

impl EngineOutput {
    pub fn new(stdout: impl Into<String>, trace: Option<JsonValue>) -> Self {
        EngineOutput {
            stdout: stdout.into(),
            trace,
        }
    }
}

/// Runs user source and reports its output and execution log
pub trait ExecutionEngine: Send + Sync {
    fn run(&self, source: &str) -> Result<EngineOutput, EngineError>;
}
