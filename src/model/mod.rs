//! Sequence model shared by both authoring modes
//!
//! This module provides the structure-building abstractions:
//! - [`sequence`]: [`SequenceModel`], the ordered token container backing one
//!   list or stack
//! - [`errors`]: [`ModelError`] for out-of-range and variant-forbidden
//!   mutations
//!
//! # Visual Layout
//!
//! A list surface renders a connector between neighbouring values, so the
//! visual children of a surface holding `k` tokens look like:
//! ```text
//! v0  →  v1  →  v2
//! 0   1  2   3  4
//! ```
//! Token `i` therefore sits at visual index `2i`. [`logical_position`] maps a
//! visual index back to the token position.

pub mod errors;
pub mod sequence;

use std::fmt;
use std::str::FromStr;

pub use errors::ModelError;
pub use sequence::SequenceModel;

/// The two structure kinds the visualizer knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    List,
    Stack,
}

impl StructureKind {
    /// Class name used by the traced runtime for instances of this kind
    pub fn class_name(self) -> &'static str {
        match self {
            StructureKind::List => "LinkedList",
            StructureKind::Stack => "Stack",
        }
    }

    /// Lowercase noun used in labels ("list", "stack")
    pub fn noun(self) -> &'static str {
        match self {
            StructureKind::List => "list",
            StructureKind::Stack => "stack",
        }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for StructureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" | "linked-list" | "linkedlist" => Ok(StructureKind::List),
            "stack" => Ok(StructureKind::Stack),
            other => Err(format!(
                "unknown structure kind '{}' (expected 'list' or 'stack')",
                other
            )),
        }
    }
}

/// A single user-supplied value placed into a structure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueToken(String);

impl ValueToken {
    pub fn new(text: impl Into<String>) -> Self {
        ValueToken(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ValueToken {
    fn from(s: &str) -> Self {
        ValueToken(s.to_string())
    }
}

impl From<String> for ValueToken {
    fn from(s: String) -> Self {
        ValueToken(s)
    }
}

/// Map a visual child index on a list surface to a token position.
///
/// Values occupy the even visual slots and connectors the odd ones; a
/// connector resolves to the value before it.
pub fn logical_position(visual_index: usize) -> usize {
    visual_index / 2
}

/// Visual child index of the token at `position` on a list surface
pub fn visual_index(position: usize) -> usize {
    position * 2
}
