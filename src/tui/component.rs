use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a region of the frame.
///
/// Props are struct fields; `render` takes `&mut self` so a component can
/// refresh caches or scroll state while drawing (same contract as ratatui's
/// `StatefulWidget`).
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The high-level event this component emits.
    type Event;

    /// Returns `None` when the event was not consumed, so the caller can
    /// offer it to the next handler.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}

/// Rows a component needs at a given width. Used to lay out scrollable
/// content before anything is drawn.
pub trait Measure {
    fn height(&self, width: u16) -> u16;
}
