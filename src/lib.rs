//! # Introduction
//!
//! dsviz is a teaching aid for two data structures: a singly-linked list and
//! a LIFO stack.  Values are assembled on a build surface, turned into an
//! equivalent Python program, and recorded programs are replayed one step at
//! a time through a terminal UI built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Palette → SequenceModel → codegen → source ─┐
//!                                             ▼
//!                        engine → TraceModel → ReplayNavigator → render → TUI
//! ```
//!
//! 1. [`model`]: ordered value sequences with list or stack discipline.
//! 2. [`codegen`]: deterministic program text for a sequence.
//! 3. [`engine`]: runs a program and returns captured output plus its trace.
//! 4. [`trace`]: validated, immutable step records.
//! 5. [`replay`]: cursor over a trace with prev/next availability.
//! 6. [`render`]: terminal-independent projection of steps and sequences.
//! 7. [`session`]: the controller wiring the above together, including the
//!    generation counter that discards stale runs.
//! 8. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod codegen;
pub mod config;
pub mod engine;
pub mod model;
pub mod render;
pub mod replay;
pub mod session;
pub mod trace;
pub mod ui;
