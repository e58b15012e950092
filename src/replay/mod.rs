//! Bounds-checked cursor over a recorded trace
//!
//! The navigator owns the [`TraceModel`] it walks, so the cursor can never
//! outlive or point past its trace. A new run builds a new navigator.
//!
//! # States
//!
//! ```text
//! Empty ──(new non-empty trace)──▶ AtStep(0) ◀──retreat── AtStep(1) ... AtStep(N-1)
//!                                            ──advance──▶
//! ```
//!
//! Stepping past either end is a no-op rather than an error: the UI disables
//! the matching control at the boundary.

use crate::trace::{StepRecord, TraceModel};

/// Cursor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Empty,
    AtStep(usize),
}

/// What the replay pane should show right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepView<'a> {
    /// No trace, or a trace without steps
    Nothing,
    Step {
        index: usize,
        total: usize,
        record: &'a StepRecord,
    },
}

impl StepView<'_> {
    /// Source line to highlight, if any
    pub fn highlight_line(&self) -> Option<usize> {
        match self {
            StepView::Nothing => None,
            StepView::Step { record, .. } => Some(record.line_number()).filter(|&line| line > 0),
        }
    }
}

/// Enabled state of the previous/next controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavControls {
    pub prev: bool,
    pub next: bool,
}

/// Replay cursor over one trace
#[derive(Debug, Clone, Default)]
pub struct ReplayNavigator {
    trace: TraceModel,
    cursor: Option<usize>,
}

impl ReplayNavigator {
    /// Start a navigator at the first step of `trace`
    pub fn new(trace: TraceModel) -> Self {
        let cursor = if trace.is_empty() { None } else { Some(0) };
        ReplayNavigator { trace, cursor }
    }

    /// A navigator with nothing to show
    pub fn empty() -> Self {
        ReplayNavigator::default()
    }

    pub fn state(&self) -> ReplayState {
        match self.cursor {
            Some(c) => ReplayState::AtStep(c),
            None => ReplayState::Empty,
        }
    }

    pub fn trace(&self) -> &TraceModel {
        &self.trace
    }

    /// Current step index, `None` when empty
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.trace.len()
    }

    pub fn can_advance(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.trace.len())
    }

    pub fn can_retreat(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn controls(&self) -> NavControls {
        NavControls {
            prev: self.can_retreat(),
            next: self.can_advance(),
        }
    }

    /// Move one step forward; returns whether the cursor moved
    pub fn advance(&mut self) -> bool {
        match self.cursor {
            Some(c) if c + 1 < self.trace.len() => {
                self.cursor = Some(c + 1);
                true
            }
            _ => false,
        }
    }

    /// Move one step back; returns whether the cursor moved
    pub fn retreat(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                true
            }
            _ => false,
        }
    }

    /// Jump to the first step
    pub fn rewind(&mut self) -> bool {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(0);
                true
            }
            _ => false,
        }
    }

    /// Jump to the last step
    pub fn jump_to_end(&mut self) -> bool {
        let last = self.trace.len().saturating_sub(1);
        match self.cursor {
            Some(c) if c < last => {
                self.cursor = Some(last);
                true
            }
            _ => false,
        }
    }

    pub fn current_view(&self) -> StepView<'_> {
        match self.cursor.and_then(|c| self.trace.get(c).map(|record| (c, record))) {
            Some((index, record)) => StepView::Step {
                index,
                total: self.trace.len(),
                record,
            },
            None => StepView::Nothing,
        }
    }
}
