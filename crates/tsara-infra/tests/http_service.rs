//! HttpAnswerService against a stub answer service served by axum.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use tsara_core::answer::AnswerService;
use tsara_core::conversation::ConversationController;
use tsara_core::dispatch::RequestDispatcher;
use tsara_core::render::{build_view, Affordance, MessageView, ReplySection};
use tsara_infra::http::HttpAnswerService;
use tsara_types::error::DispatchError;
use tsara_types::message::MessageRole;
use tsara_types::research::ChatRequest;

async fn chat(Json(req): Json<ChatRequest>) -> axum::response::Response {
    match req.message.as_str() {
        "find hotels" => Json(json!({
            "summary": "Here are results",
            "sources": ["gov.ma/tourism"],
            "entities": [{"name": "Tourism Office", "phone": "+212500000"}]
        }))
        .into_response(),
        "explode" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Error in treating request: agent crashed"})),
        )
            .into_response(),
        "teapot" => (StatusCode::IM_A_TEAPOT, "short and stout").into_response(),
        "garbled" => (StatusCode::OK, "<html>not json</html>").into_response(),
        "no summary" => Json(json!({"topic": "missing"})).into_response(),
        "a" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!({"summary": "reply to a"})).into_response()
        }
        other => Json(json!({"summary": format!("You asked: {other}")})).into_response(),
    }
}

async fn health() -> Json<Value> {
    Json(json!({"status": "healthy", "message": "Service is running"}))
}

async fn reload() -> Json<Value> {
    Json(json!({"message": "System RAG reloaded successfully"}))
}

async fn spawn_stub() -> String {
    let router = Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .route("/reload", post(reload));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

#[tokio::test]
async fn ask_returns_structured_response() {
    let base = spawn_stub().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    let resp = service.ask("find hotels").await.unwrap();
    assert_eq!(resp.summary, "Here are results");
    assert_eq!(resp.sources.unwrap(), vec!["gov.ma/tourism"]);
    let entities = resp.entities.unwrap();
    assert_eq!(entities[0].name, "Tourism Office");
    assert_eq!(entities[0].phone.as_deref(), Some("+212500000"));
    assert!(resp.topic.is_none());
    assert!(resp.tools_used.is_none());
}

#[tokio::test]
async fn error_status_keeps_service_detail() {
    let base = spawn_stub().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    let err = service.ask("explode").await.unwrap_err();
    assert_eq!(
        err,
        DispatchError::Status {
            status: 500,
            detail: Some("Error in treating request: agent crashed".to_string()),
        }
    );
    assert_eq!(
        err.fallback_content(),
        "Error in treating request: agent crashed"
    );
}

#[tokio::test]
async fn error_status_without_detail() {
    let base = spawn_stub().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    let err = service.ask("teapot").await.unwrap_err();
    assert_eq!(
        err,
        DispatchError::Status {
            status: 418,
            detail: None,
        }
    );
}

#[tokio::test]
async fn unparseable_bodies_are_failures() {
    let base = spawn_stub().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    assert!(matches!(
        service.ask("garbled").await,
        Err(DispatchError::MalformedBody(_))
    ));
    assert!(matches!(
        service.ask("no summary").await,
        Err(DispatchError::MalformedBody(_))
    ));
}

#[tokio::test]
async fn unreachable_host_is_transport_failure() {
    let base = unreachable_url().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    let err = service.ask("test").await.unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)));
    assert!(!err.fallback_content().is_empty());
}

#[tokio::test]
async fn health_and_reload() {
    let base = spawn_stub().await;
    let service = HttpAnswerService::new(&base, None).unwrap();

    let health = service.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.message, "Service is running");

    let reloaded = service.reload().await.unwrap();
    assert_eq!(reloaded.message, "System RAG reloaded successfully");
}

#[tokio::test]
async fn controller_round_trip_renders_research_card() {
    let base = spawn_stub().await;
    let service = Arc::new(HttpAnswerService::new(&base, None).unwrap());
    let (dispatcher, mut settlements) = RequestDispatcher::new(service);
    let mut controller = ConversationController::new(dispatcher);

    controller.submit("find hotels");
    assert_eq!(controller.messages().len(), 1);
    assert!(controller.is_pending());

    let settlement = settlements.recv().await.unwrap();
    controller.on_dispatch_settled(settlement);
    assert!(!controller.is_pending());

    let MessageView::Reply(card) = build_view(&controller.messages()[1]) else {
        panic!("expected a reply card");
    };
    assert_eq!(card.content, "Here are results");
    assert_eq!(card.sections.len(), 2);

    let ReplySection::Entities(entities) = &card.sections[0] else {
        panic!("expected entities first");
    };
    assert_eq!(entities[0].lines.len(), 1);
    assert_eq!(
        entities[0].lines[0].action,
        Affordance::Dial("tel:+212500000".to_string())
    );
    assert_eq!(
        card.sections[1],
        ReplySection::Sources(vec!["gov.ma/tourism".to_string()])
    );
}

#[tokio::test]
async fn controller_appends_fallback_when_unreachable() {
    let base = unreachable_url().await;
    let service = Arc::new(HttpAnswerService::new(&base, None).unwrap());
    let (dispatcher, mut settlements) = RequestDispatcher::new(service);
    let mut controller = ConversationController::new(dispatcher);

    controller.submit("test");
    let settlement = settlements.recv().await.unwrap();
    controller.on_dispatch_settled(settlement);

    assert_eq!(controller.messages().len(), 2);
    let reply = &controller.messages()[1];
    assert_eq!(reply.role(), MessageRole::Assistant);
    assert!(!reply.content().is_empty());
    assert!(reply.research().is_none());
    assert!(!controller.is_pending());
}

#[tokio::test]
async fn overlapping_questions_append_in_settlement_order() {
    let base = spawn_stub().await;
    let service = Arc::new(HttpAnswerService::new(&base, None).unwrap());
    let (dispatcher, mut settlements) = RequestDispatcher::new(service);
    let mut controller = ConversationController::new(dispatcher);

    controller.submit("a");
    controller.submit("b");

    while controller.outstanding() > 0 {
        let settlement = settlements.recv().await.unwrap();
        controller.on_dispatch_settled(settlement);
    }

    let contents: Vec<&str> = controller.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, vec!["a", "b", "You asked: b", "reply to a"]);
    assert!(!controller.is_pending());
}
