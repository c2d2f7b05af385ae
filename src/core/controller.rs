//! # Send Controller
//!
//! Orchestrates one user-initiated turn over the [`App`] state:
//!
//! ```text
//! send()       validate → append user turn → pending=true → SendRequest
//! reconcile()  transport chunk → amend/append assistant turn
//! finish()     transport done/failed → pending=false
//! clear()      empty transcript, pending=false, orphan in-flight request
//! ```
//!
//! Every accepted send and every clear bumps `App::generation`. Results are
//! applied only if they carry the current generation, so a reply that lands
//! after a clear can't resurrect the old conversation.

use std::fmt;

use log::{debug, info, warn};

use crate::core::message::{Message, Part, Role};
use crate::core::state::App;
use crate::transport::{SendRequest, StreamChunk, TransportError};

/// Why a `send` did not start a turn. Neither case is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Input was empty after trimming.
    EmptyInput,
    /// A previous send has not resolved yet.
    AlreadyPending,
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::EmptyInput => write!(f, "empty input"),
            SendRejected::AlreadyPending => write!(f, "a reply is still pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Applied,
    /// The result belongs to a request that was cleared or superseded.
    Stale,
}

/// Starts a turn. On success the user message is already in the transcript
/// and the returned request must be handed to the transport.
pub fn send(app: &mut App, raw_input: &str) -> Result<SendRequest, SendRejected> {
    if raw_input.trim().is_empty() {
        debug!("Ignoring send: empty input");
        return Err(SendRejected::EmptyInput);
    }
    if app.pending {
        debug!("Ignoring send: generation {} still pending", app.generation);
        return Err(SendRejected::AlreadyPending);
    }

    let history = app.store.get().to_vec();
    app.store.append(Message::user(raw_input));

    app.pending = true;
    app.generation += 1;
    app.error = None;
    app.status_message = String::from("Thinking...");

    info!(
        "Send accepted: generation={}, history_len={}",
        app.generation,
        history.len()
    );

    Ok(SendRequest {
        generation: app.generation,
        message: raw_input.to_string(),
        history,
    })
}

/// Folds one transport chunk into the transcript.
pub fn reconcile(app: &mut App, generation: u64, chunk: StreamChunk) -> Reconciled {
    if generation != app.generation {
        debug!(
            "Discarding stale chunk: generation={} current={}",
            generation, app.generation
        );
        return Reconciled::Stale;
    }

    match chunk {
        StreamChunk::Placeholder => {
            if !last_is_assistant_placeholder(app) {
                app.store.append(Message::assistant_placeholder());
            }
        }
        StreamChunk::Content(text) => append_assistant_text(app, &text),
        StreamChunk::Message(message) => {
            if last_is_assistant_placeholder(app) {
                app.store.amend_last(|last| *last = message);
            } else {
                app.store.append(message);
            }
        }
    }
    Reconciled::Applied
}

/// Resolves the pending turn. Pending is always cleared for the current
/// generation, success or not.
pub fn finish(
    app: &mut App,
    generation: u64,
    result: Result<(), TransportError>,
) -> Reconciled {
    if generation != app.generation {
        debug!(
            "Discarding stale completion: generation={} current={}",
            generation, app.generation
        );
        return Reconciled::Stale;
    }

    app.pending = false;
    match result {
        Ok(()) => {
            app.status_message = String::from("Ready");
            info!("Turn complete: generation={}", generation);
        }
        Err(e) => {
            warn!("Transport failed for generation {}: {}", generation, e);
            let apology = format!(
                "Sorry, something went wrong. Please try again. Error details: {e}"
            );
            if last_is_assistant_placeholder(app) {
                app.store
                    .amend_last(|last| *last = Message::assistant(apology));
            } else {
                app.store.append(Message::assistant(apology));
            }
            app.status_message = String::from("Request failed");
            app.error = Some(e.to_string());
        }
    }
    Reconciled::Applied
}

/// Resets the conversation. Safe while a send is pending: the in-flight
/// request's generation no longer matches and its result is dropped.
pub fn clear(app: &mut App) {
    app.store.replace_all(vec![]);
    app.pending = false;
    app.generation += 1;
    app.error = None;
    app.status_message = String::from("Conversation cleared");
    info!("Conversation cleared: generation={}", app.generation);
}

fn last_is_assistant_placeholder(app: &App) -> bool {
    app.store
        .last()
        .is_some_and(|m| m.role == Role::Assistant && m.is_placeholder())
}

fn append_assistant_text(app: &mut App, text: &str) {
    if text.is_empty() {
        return;
    }
    let last_is_assistant = app
        .store
        .last()
        .is_some_and(|m| m.role == Role::Assistant);

    if !last_is_assistant {
        app.store.append(Message::assistant(text));
        return;
    }

    app.store.amend_last(|last| match last.parts.last_mut() {
        Some(part) if part.is_placeholder() => *part = Part::text(text),
        Some(Part { text: Some(existing) }) => existing.push_str(text),
        _ => last.parts.push(Part::text(text)),
    });
}
