//! Input signals and output effects of a session

use crate::model::ValueToken;
use crate::replay::NavControls;

/// Where a dragged value came from or was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Source of fresh values; dropping onto it removes
    Palette,
    /// Linked-list building surface
    Canvas,
    /// Stack building surface
    Stack,
}

/// Signals delivered by the drag-and-drop input source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// A value was dropped onto `target`.
    ///
    /// Dropping onto the palette takes the value off `origin`, using
    /// `origin_position` the same way [`DragEvent::Removed`] does.
    Dropped {
        value: ValueToken,
        origin: Surface,
        target: Surface,
        origin_position: Option<usize>,
    },
    /// A value was dragged off `origin`.
    ///
    /// `origin_position` is the visual child index on the origin surface, as
    /// reported by the rendering layer.
    Removed {
        value: ValueToken,
        origin: Surface,
        origin_position: Option<usize>,
    },
}

/// Changes a front end must apply to its widgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the editor contents
    SetEditorText(String),
    /// Highlight a 1-based editor line, or clear the highlight
    HighlightLine(Option<usize>),
    /// Replace the output area text
    SetOutput(String),
    /// Enable or disable the previous/next controls
    Controls(NavControls),
}

/// The text-editing widget the session drives
pub trait Editor {
    fn text(&self) -> String;
    fn set_text(&mut self, text: String);
    fn highlight_line(&mut self, line: Option<usize>);
}
