use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio_test::{assert_err, assert_ok};
use truenotion::core::action::{Action, Effect, update};
use truenotion::core::message::{Message, Role};
use truenotion::core::state::App;
use truenotion::core::view::RenderItem;
use truenotion::transport::{
    EchoTransport, HttpTransport, SendRequest, StreamChunk, Transport, TransportError,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn request(message: &str, history: Vec<Message>) -> SendRequest {
    SendRequest {
        generation: 1,
        message: message.to_string(),
        history,
    }
}

fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap()
}

/// Sends one request and collects every chunk it produced.
async fn run_to_completion(
    transport: &dyn Transport,
    request: SendRequest,
) -> (Vec<StreamChunk>, Result<(), TransportError>) {
    let (tx, mut rx) = mpsc::channel(256);
    let result = transport.send_messages(request, tx).await;
    let mut chunks = Vec::new();
    while let Some(chunk) = rx.recv().await {
        chunks.push(chunk);
    }
    (chunks, result)
}

fn assistant_text(app: &App, index: usize) -> String {
    app.store.get()[index].text_parts().collect()
}

// ============================================================================
// HTTP Transport Tests
// ============================================================================

#[tokio::test]
async fn test_http_success_emits_placeholder_then_answer() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "Your notes cover Q3." })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    let (chunks, result) = run_to_completion(&transport, request("Summarize", vec![])).await;

    assert_ok!(result);
    assert_eq!(
        chunks,
        vec![
            StreamChunk::Placeholder,
            StreamChunk::Message(Message::assistant("Your notes cover Q3.")),
        ]
    );
}

#[tokio::test]
async fn test_http_sends_question_and_history_pairs() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "question": "And Q4?",
            "history": [["What about Q3?", "Q3 was strong."]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "Q4 too." })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let history = vec![
        Message::user("What about Q3?"),
        Message::assistant("Q3 was strong."),
    ];
    let transport = transport_for(&mock_server);
    let (_, result) = run_to_completion(&transport, request("And Q4?", history)).await;

    assert_ok!(result);
}

#[tokio::test]
async fn test_http_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("crew crashed"))
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    let (_, result) = run_to_completion(&transport, request("Hi", vec![])).await;

    assert_eq!(
        result,
        Err(TransportError::Api {
            status: 500,
            message: "crew crashed".into()
        })
    );
}

#[tokio::test]
async fn test_http_client_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(422).set_body_string("missing question"))
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    let (_, result) = run_to_completion(&transport, request("Hi", vec![])).await;

    let err = assert_err!(result);
    assert_eq!(
        err,
        TransportError::Api {
            status: 422,
            message: "missing question".into()
        }
    );
}

#[tokio::test]
async fn test_http_malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    let (_, result) = run_to_completion(&transport, request("Hi", vec![])).await;

    assert!(matches!(result, Err(TransportError::Parse(_))));
}

#[tokio::test]
async fn test_http_unreachable_maps_to_network_error() {
    // Nothing listens on the discard port
    let transport = HttpTransport::new("http://127.0.0.1:9".into(), Duration::from_secs(2)).unwrap();
    let (_, result) = run_to_completion(&transport, request("Hi", vec![])).await;

    assert!(matches!(result, Err(TransportError::Network(_))));
}

// ============================================================================
// End-to-end through the reducer
// ============================================================================

#[tokio::test]
async fn test_echo_stream_reconciles_into_one_assistant_message() {
    let mut app = App::new("echo".into());
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit("ping".into())) else {
        panic!("expected request");
    };
    let generation = req.generation;

    let transport = EchoTransport::new(Duration::ZERO);
    let (chunks, result) = run_to_completion(&transport, req).await;
    for chunk in chunks {
        update(&mut app, Action::Stream { generation, chunk });
    }
    update(&mut app, Action::Finished { generation, result });

    assert!(!app.pending);
    assert_eq!(app.store.len(), 2);
    assert_eq!(app.store.get()[1].role, Role::Assistant);
    let reply = assistant_text(&app, 1);
    assert!(reply.starts_with("You said:"));
    assert!(reply.contains("> ping"));
    assert!(!app.view().items().contains(&RenderItem::LoadingIndicator));
}

#[tokio::test]
async fn test_http_failure_keeps_user_message_and_clears_pending() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&mock_server)
        .await;

    let mut app = App::new("http".into());
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit("Hi".into())) else {
        panic!("expected request");
    };
    let generation = req.generation;

    let transport = transport_for(&mock_server);
    let (chunks, result) = run_to_completion(&transport, req).await;
    for chunk in chunks {
        update(&mut app, Action::Stream { generation, chunk });
    }
    update(&mut app, Action::Finished { generation, result });

    assert!(!app.pending);
    assert_eq!(app.store.get()[0], Message::user("Hi"));
    assert!(assistant_text(&app, 1).contains("API error (HTTP 503): busy"));
    assert!(app.error.is_some());
}

#[tokio::test]
async fn test_reply_after_clear_is_discarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "late" })))
        .mount(&mock_server)
        .await;

    let mut app = App::new("http".into());
    let Effect::SpawnRequest(req) = update(&mut app, Action::Submit("Hi".into())) else {
        panic!("expected request");
    };
    let generation = req.generation;
    assert_eq!(update(&mut app, Action::Clear), Effect::CancelRequest);

    let transport = transport_for(&mock_server);
    let (chunks, result) = run_to_completion(&transport, req).await;
    for chunk in chunks {
        update(&mut app, Action::Stream { generation, chunk });
    }
    update(&mut app, Action::Finished { generation, result });

    assert!(app.store.is_empty());
    assert!(app.view().is_introduction());
}
