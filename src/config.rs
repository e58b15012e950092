//! Runtime settings resolved from the command line

use crate::engine::command::DEFAULT_PYTHON;
use crate::model::{StructureKind, ValueToken};
use crate::trace::DEFAULT_MAX_STEPS;
use std::path::PathBuf;

/// Settings shared by the build and replay front ends
#[derive(Debug, Clone)]
pub struct Config {
    pub kind: StructureKind,
    /// Interpreter used by the command engine
    pub python: String,
    /// Recorded trace to replay instead of running the interpreter
    pub trace_file: Option<PathBuf>,
    /// Largest trace accepted from one run
    pub max_steps: usize,
    /// Values offered for dragging in build mode
    pub palette: Vec<ValueToken>,
}

impl Config {
    pub fn new(kind: StructureKind) -> Self {
        Config {
            kind,
            python: DEFAULT_PYTHON.to_string(),
            trace_file: None,
            max_steps: DEFAULT_MAX_STEPS,
            palette: default_palette(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(StructureKind::List)
    }
}

/// `10, 20, ..., 90`
pub fn default_palette() -> Vec<ValueToken> {
    (1..=9).map(|i| ValueToken::new((i * 10).to_string())).collect()
}

/// Split a comma-separated palette, dropping blank entries
pub fn parse_palette(list: &str) -> Vec<ValueToken> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ValueToken::from)
        .collect()
}
