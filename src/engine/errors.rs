//! Failure types for engine runs
//!
//! Every variant ends the run the same way: the session drops the current
//! trace, clears the highlight and shows the message in the output pane.

use crate::trace::TraceError;
use std::io;

/// A run of the external engine that did not complete cleanly
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine process could not be started or talked to
    #[error("could not run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The traced program raised; carries the engine's own message
    #[error("{message}")]
    Failed { message: String },

    /// The engine produced something other than the expected report
    #[error("engine returned unreadable output: {message}")]
    InvalidOutput { message: String },

    /// The program ran but never recorded an execution log
    #[error("program did not record an execution log")]
    MissingTrace,

    /// The recorded log does not have the step shape
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// A recorded trace file could not be read
    #[error("could not read trace file '{path}': {source}")]
    TraceFile {
        path: String,
        #[source]
        source: io::Error,
    },
}
