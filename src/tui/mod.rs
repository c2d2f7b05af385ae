//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (intro still typing, loading dots): draws every ~80ms.
//! - **Idle** (conversation, no input): sleeps up to 500ms, only redraws on events,
//!   terminal resize or transport results.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::Backend;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::transport::{
    EchoTransport, HttpTransport, SendRequest, StreamChunk, Transport, TransportError,
};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DelayedReveal, InputBox, InputEvent, LandingPage, MessageListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_FRAME: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);
const DOT_PERIOD_MS: u128 = 300;

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Timer for the second intro line
    pub intro: DelayedReveal,
}

impl TuiState {
    pub fn new(intro: DelayedReveal) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            intro,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// Build the transport the resolved config asks for.
pub fn build_transport(config: &ResolvedConfig) -> Result<Arc<dyn Transport>, TransportError> {
    match config.backend {
        Backend::Http => Ok(Arc::new(HttpTransport::new(
            config.base_url.clone(),
            config.request_timeout,
        )?)),
        Backend::Echo => Ok(Arc::new(EchoTransport::new(config.echo_word_delay))),
    }
}

fn abort_all(handles: &mut Vec<AbortHandle>) {
    for handle in handles.drain(..) {
        handle.abort();
    }
}

/// Offers submitted text to the reducer. Only an accepted send clears the
/// input and jumps the transcript to the newest turn; a rejected one leaves
/// everything as typed.
pub fn handle_submit(app: &mut App, tui: &mut TuiState, text: String) -> Option<SendRequest> {
    match update(app, Action::Submit(text)) {
        Effect::SpawnRequest(request) => {
            tui.input_box.clear();
            tui.message_list.pin_to_bottom();
            Some(request)
        }
        _ => None,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let transport = build_transport(&config).map_err(std::io::Error::other)?;
    info!("Using {} transport", transport.name());

    let mut app = App::new(transport.name().to_string());
    let mut tui = TuiState::new(DelayedReveal::new(config.intro_reveal_delay));

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles of the in-flight request (used by clear)
    let mut active_abort_handles: Vec<AbortHandle> = Vec::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        let now = Instant::now();

        // The intro is mounted exactly while the transcript is empty
        if app.store.is_empty() {
            tui.intro.mount(now);
        } else {
            tui.intro.unmount();
        }
        tui.input_box.pending = app.pending;

        let animating = app.pending || LandingPage::is_animating(&tui.intro, now);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let tick = (start_time.elapsed().as_millis() / DOT_PERIOD_MS) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, now, tick))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_FRAME } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match event {
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    if update(&mut app, Action::Quit) == Effect::Quit {
                        break 'event_loop;
                    }
                }
                TuiEvent::Clear => {
                    if update(&mut app, Action::Clear) == Effect::CancelRequest {
                        info!("Clear aborted the in-flight request");
                        abort_all(&mut active_abort_handles);
                    }
                    tui.message_list = MessageListState::new();
                }
                other => {
                    if let Some(input_event) = tui.input_box.handle_event(&other) {
                        if let InputEvent::Submit(text) = input_event
                            && let Some(request) = handle_submit(&mut app, &mut tui, text)
                        {
                            active_abort_handles =
                                spawn_request(transport.clone(), request, tx.clone());
                        }
                    } else {
                        // Cursor keys at the edge of the input scroll the transcript
                        tui.message_list.handle_event(&other);
                    }
                }
            }
        }

        // Handle background task actions (streaming responses)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if update(&mut app, action) == Effect::Quit {
                break 'event_loop;
            }
        }
    }

    abort_all(&mut active_abort_handles);
    ratatui::restore();
    Ok(())
}

/// Runs `request` on its own task and reports back over `tx`.
///
/// Two tasks: one drives the transport, the other forwards its chunks as
/// `Action::Stream` and, once the chunk channel closes, sends the single
/// `Action::Finished`. Every action carries the request's generation.
pub fn spawn_request(
    transport: Arc<dyn Transport>,
    request: SendRequest,
    tx: mpsc::Sender<Action>,
) -> Vec<AbortHandle> {
    let generation = request.generation;
    info!(
        "Spawning {} request (generation {})",
        transport.name(),
        generation
    );

    // Async channel for streaming chunks
    let (chunk_tx, mut chunk_rx) = tokio::sync::mpsc::channel::<StreamChunk>(100);

    let stream_handle =
        tokio::spawn(async move { transport.send_messages(request, chunk_tx).await });
    let stream_abort = stream_handle.abort_handle();

    let forward_handle = tokio::spawn(async move {
        let mut forwarded_count = 0usize;

        while let Some(chunk) = chunk_rx.recv().await {
            forwarded_count += 1;
            debug!("Forwarding chunk {} for generation {}", forwarded_count, generation);
            if tx.send(Action::Stream { generation, chunk }).is_err() {
                warn!("Failed to forward chunk: receiver dropped");
                return;
            }
        }

        let result = match stream_handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                debug!("Transport task for generation {} cancelled", generation);
                return;
            }
            Err(e) => Err(TransportError::Network(format!("transport task failed: {e}"))),
        };

        match &result {
            Ok(()) => info!(
                "Request for generation {} completed: {} chunks",
                generation, forwarded_count
            ),
            Err(e) => warn!("Request for generation {} failed: {}", generation, e),
        }
        if tx.send(Action::Finished { generation, result }).is_err() {
            warn!("Failed to send Finished: receiver dropped");
        }
    });

    vec![stream_abort, forward_handle.abort_handle()]
}
