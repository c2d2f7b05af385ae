//! # Actions
//!
//! Everything that can happen in the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend streams a piece of the reply? That's `Action::Stream { .. }`.
//!
//! The `update()` function applies an action to the state and returns the
//! `Effect` the event loop has to carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::debug;

use crate::core::controller::{self, Reconciled};
use crate::core::state::App;
use crate::transport::{SendRequest, StreamChunk, TransportError};

#[derive(Debug)]
pub enum Action {
    /// User submitted the input box.
    Submit(String),
    /// A transport chunk for the request issued under `generation`.
    Stream { generation: u64, chunk: StreamChunk },
    /// The transport for `generation` returned.
    Finished {
        generation: u64,
        result: Result<(), TransportError>,
    },
    /// Drop the whole conversation.
    Clear,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Hand this request to the transport. The caller also clears the input
    /// field and re-attaches the transcript viewport.
    SpawnRequest(SendRequest),
    /// Abort the in-flight transport task.
    CancelRequest,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Submit(text) => match controller::send(app, &text) {
            Ok(request) => Effect::SpawnRequest(request),
            Err(reason) => {
                debug!("Submit ignored: {}", reason);
                Effect::None
            }
        },
        Action::Stream { generation, chunk } => {
            controller::reconcile(app, generation, chunk);
            Effect::None
        }
        Action::Finished { generation, result } => {
            if controller::finish(app, generation, result) == Reconciled::Stale {
                debug!("Late completion ignored (generation {})", generation);
            }
            Effect::None
        }
        Action::Clear => {
            let was_pending = app.pending;
            controller::clear(app);
            if was_pending {
                Effect::CancelRequest
            } else {
                Effect::None
            }
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use crate::core::view::RenderItem;
    use crate::test_support::test_app;

    #[test]
    fn test_submit_spawns_request() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("hello".into()));
        match effect {
            Effect::SpawnRequest(req) => {
                assert_eq!(req.message, "hello");
                assert_eq!(req.generation, 1);
            }
            other => panic!("expected SpawnRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_submit_has_no_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("   ".into())), Effect::None);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_double_submit_yields_one_request() {
        let mut app = test_app();
        let first = update(&mut app, Action::Submit("What does this data cover?".into()));
        let second = update(&mut app, Action::Submit("What does this data cover?".into()));
        assert!(matches!(first, Effect::SpawnRequest(_)));
        assert_eq!(second, Effect::None);
        assert_eq!(app.store.len(), 1);
    }

    #[test]
    fn test_full_turn_render_sequence() {
        let mut app = test_app();
        let Effect::SpawnRequest(req) = update(&mut app, Action::Submit("Hi".into())) else {
            panic!("expected request");
        };

        // User turn visible with the indicator before the transport resolves
        assert_eq!(
            app.view().items(),
            &[
                RenderItem::Message {
                    index: 0,
                    role: crate::core::message::Role::User,
                    parts: vec!["Hi"],
                },
                RenderItem::LoadingIndicator,
            ]
        );

        update(
            &mut app,
            Action::Stream {
                generation: req.generation,
                chunk: StreamChunk::Message(Message::assistant("Hello")),
            },
        );
        update(
            &mut app,
            Action::Finished {
                generation: req.generation,
                result: Ok(()),
            },
        );

        let view = app.view();
        assert_eq!(view.items().len(), 2);
        assert!(!view.items().contains(&RenderItem::LoadingIndicator));
    }

    #[test]
    fn test_clear_cancels_only_when_pending() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Clear), Effect::None);

        update(&mut app, Action::Submit("Hi".into()));
        assert_eq!(update(&mut app, Action::Clear), Effect::CancelRequest);
        assert!(app.view().is_introduction());
    }

    #[test]
    fn test_quit() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
