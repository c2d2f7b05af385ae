use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::{Component, Measure};
use crate::tui::components::{LandingPage, MessageList, TitleBar};

/// Draws one frame.
///
/// ```text
/// ┌ title bar (1 row) ───────────────┐
/// │ landing page  or  message list   │
/// ├ input box (grows to 5 rows) ─────┤
/// ```
///
/// `now` drives the intro typing animation, `tick` the loading dots.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant, tick: usize) {
    use Constraint::{Length, Min};
    let input_height = tui.input_box.height(frame.area().width);
    let layout = Layout::vertical([Length(1), Min(0), Length(input_height)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    let view = app.view();
    if view.is_introduction() {
        LandingPage::new(&tui.intro, now).render(frame, main_area);
    } else {
        MessageList::new(
            &mut tui.message_list,
            view.items(),
            app.store.epoch(),
            app.store.revision(),
            tick,
        )
        .render(frame, main_area);
    }

    // After the list so the unseen-content flag reflects this frame
    TitleBar::new(
        app.backend_label.clone(),
        app.status_message.clone(),
        app.error.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
