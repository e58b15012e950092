//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Program text with syntax highlighting and the current line indicator
//! - [`structure`]: Replay visualization, build surfaces and the value palette
//! - [`output`]: Captured program output or the failure message of a run
//! - [`status`]: Status bar with keybindings and replay state
//!
//! Each pane module exports a primary `render_*` function plus any scroll
//! state it keeps between frames.

pub mod output;
pub mod source;
pub mod status;
pub mod structure;

// Re-export render functions for convenience
pub use output::render_output_pane;
pub use source::{render_source_pane, SourceBuffer, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use structure::{render_palette, render_replay_pane, render_surface_pane, structure_lines};
