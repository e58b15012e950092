//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, background runs
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   structure, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Config`](crate::config::Config) and an [`ExecutionEngine`], then call
//! [`App::run`] to start the event loop.
//!
//! [`ExecutionEngine`]: crate::engine::ExecutionEngine
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{App, Mode};
