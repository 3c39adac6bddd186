//! Integration tests for the Frontdesk API.
//!
//! Each test drives the full router over an in-memory store and a scripted
//! completion client, covering happy paths and error paths per endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use frontdesk_agent::ConversationOrchestrator;
use frontdesk_api::{create_router, AppState};
use frontdesk_core::config::AgentConfig;
use frontdesk_escalation::HelpRequestEngine;
use frontdesk_knowledge::KnowledgeEngine;
use frontdesk_llm::{CompletionClient, StubCompletion};
use frontdesk_notify::{LogSink, NotificationDispatcher};
use frontdesk_store::{DocumentStore, MemoryStore};

// =============================================================================
// Helpers
// =============================================================================

/// Build a fresh router over in-memory state.
///
/// `timeout_secs` controls how long help requests stay pending; 0 makes
/// every request immediately sweepable.
fn make_app_with(completion: StubCompletion, timeout_secs: u64) -> axum::Router {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let completion: Arc<dyn CompletionClient> = Arc::new(completion);
    let knowledge = Arc::new(KnowledgeEngine::new(
        Arc::clone(&store),
        Arc::clone(&completion),
    ));
    let dispatcher = Arc::new(NotificationDispatcher::new(Arc::new(LogSink::new()), 3));
    let escalation = Arc::new(HelpRequestEngine::new(
        Arc::clone(&store),
        dispatcher,
        Arc::clone(&knowledge),
        timeout_secs,
    ));
    let agent = Arc::new(ConversationOrchestrator::new(
        Arc::clone(&knowledge),
        Arc::clone(&escalation),
        completion,
        store,
        AgentConfig::default(),
    ));
    create_router(AppState::new(escalation, knowledge, agent))
}

fn make_app() -> axum::Router {
    make_app_with(
        StubCompletion::with_reply("ok").with_keywords(vec!["k"]),
        3600,
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a help request through the API and return its id.
async fn create_request(app: &axum::Router, question: &str) -> String {
    let resp = app
        .clone()
        .oneshot(post_json(
            "/help-requests",
            &format!(
                r#"{{"customer_phone": "+15551234567", "question": "{}"}}"#,
                question
            ),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = make_app();
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "frontdesk");
}

// =============================================================================
// Help requests
// =============================================================================

#[tokio::test]
async fn test_create_help_request_201() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/help-requests",
            r#"{"customer_phone": "+15551234567", "customer_name": "Dana",
                "question": "Do you do balayage on Sundays?", "context": "user: hi"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = body_json(resp).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["customer_phone"], "+15551234567");
    assert_eq!(body["customer_name"], "Dana");
    assert_eq!(body["question"], "Do you do balayage on Sundays?");
    assert!(body["resolved_at"].is_null());
    assert!(body["timeout_at"].is_string());
}

#[tokio::test]
async fn test_create_help_request_invalid_phone_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/help-requests",
            r#"{"customer_phone": "nope", "question": "q"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_create_help_request_empty_question_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/help-requests",
            r#"{"customer_phone": "+15551234567", "question": "  "}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_help_request_overlong_question_400() {
    let app = make_app();
    let question = "q".repeat(1001);
    let resp = app
        .oneshot(post_json(
            "/help-requests",
            &format!(
                r#"{{"customer_phone": "+15551234567", "question": "{}"}}"#,
                question
            ),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_help_request_by_id() {
    let app = make_app();
    let id = create_request(&app, "question one").await;

    let resp = app
        .oneshot(get(&format!("/help-requests/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], id.as_str());
}

#[tokio::test]
async fn test_get_help_request_missing_404() {
    let app = make_app();
    let resp = app
        .oneshot(get(&format!("/help-requests/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_get_help_request_bad_id_400() {
    let app = make_app();
    let resp = app.oneshot(get("/help-requests/not-a-uuid")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_help_requests_with_status_filter() {
    let app = make_app();
    let id = create_request(&app, "first").await;
    create_request(&app, "second").await;

    // Resolve the first.
    let resp = app
        .clone()
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", id),
            r#"{"supervisor_answer": "answer"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(get("/help-requests?status=pending"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["question"], "second");

    let resp = app
        .clone()
        .oneshot(get("/help-requests?status=resolved"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // No filter returns all, newest first.
    let resp = app.oneshot(get("/help-requests")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["question"], "second");
}

#[tokio::test]
async fn test_list_help_requests_unknown_status_400() {
    let app = make_app();
    let resp = app
        .oneshot(get("/help-requests?status=cancelled"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_check_timeouts_sweeps_expired() {
    let app = make_app_with(
        StubCompletion::with_reply("ok").with_keywords(vec!["k"]),
        0,
    );
    create_request(&app, "will expire").await;

    let resp = app
        .clone()
        .oneshot(post_empty("/help-requests/check-timeouts"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["timed_out_count"], 1);

    // Second sweep finds nothing.
    let resp = app
        .oneshot(post_empty("/help-requests/check-timeouts"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["timed_out_count"], 0);
}

// =============================================================================
// Supervisor
// =============================================================================

#[tokio::test]
async fn test_resolve_creates_knowledge_entry() {
    let app = make_app();
    let id = create_request(&app, "Do you do balayage on Sundays?").await;

    let resp = app
        .clone()
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", id),
            r#"{"supervisor_answer": "Yes, by appointment"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["supervisor_answer"], "Yes, by appointment");
    assert_eq!(body["supervisor_id"], "supervisor_1");
    assert_eq!(body["customer_notified"], true);

    // The learned entry is visible through the knowledge surface.
    let resp = app.oneshot(get("/knowledge")).await.unwrap();
    let body = body_json(resp).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["question"], "Do you do balayage on Sundays?");
    assert_eq!(entries[0]["answer"], "Yes, by appointment");
    assert_eq!(entries[0]["source_request_id"], id.as_str());
    assert_eq!(entries[0]["source"], "supervisor");
}

#[tokio::test]
async fn test_resolve_twice_is_idempotent() {
    let app = make_app();
    let id = create_request(&app, "question").await;

    let resp = app
        .clone()
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", id),
            r#"{"supervisor_answer": "first answer"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", id),
            r#"{"supervisor_answer": "second answer"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["supervisor_answer"], "first answer");

    // Exactly one knowledge entry.
    let resp = app.oneshot(get("/knowledge")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resolve_missing_404() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", Uuid::new_v4()),
            r#"{"supervisor_answer": "answer"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_stats() {
    let app = make_app();
    let id = create_request(&app, "first").await;
    create_request(&app, "second").await;
    app.clone()
        .oneshot(post_json(
            &format!("/supervisor/{}/resolve", id),
            r#"{"supervisor_answer": "answer"}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .oneshot(get("/supervisor/dashboard/stats"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total_requests"], 2);
    assert_eq!(body["pending_requests"], 1);
    assert_eq!(body["resolved_requests"], 1);
    assert_eq!(body["timed_out_requests"], 0);
    assert_eq!(body["knowledge_entries"], 1);
}

// =============================================================================
// Knowledge base
// =============================================================================

#[tokio::test]
async fn test_create_and_search_knowledge() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/knowledge",
            r#"{"question": "How much does a women's haircut cost?",
                "answer": "$45 to $75.",
                "category": "pricing",
                "keywords": ["haircut", "women", "price"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["source"], "manual");

    let resp = app
        .oneshot(get("/knowledge/search?query=haircut"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = make_app();
    let resp = app.oneshot(get("/knowledge/search")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_rejects_out_of_range_limit() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(get("/knowledge/search?query=x&limit=0"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(get("/knowledge/search?query=x&limit=21"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_knowledge_empty_fields_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json(
            "/knowledge",
            r#"{"question": "", "answer": "a"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_knowledge_entry_and_missing() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(post_json(
            "/knowledge",
            r#"{"question": "q", "answer": "a", "keywords": ["k"]}"#,
        ))
        .await
        .unwrap();
    let created = body_json(resp).await;
    let id = created["id"].as_str().unwrap();

    let resp = app
        .clone()
        .oneshot(get(&format!("/knowledge/{}", id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(get(&format!("/knowledge/{}", Uuid::new_v4())))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_knowledge_summary_stats() {
    let app = make_app();
    app.clone()
        .oneshot(post_json(
            "/knowledge",
            r#"{"question": "q1", "answer": "a1", "category": "hours", "keywords": ["k"]}"#,
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json(
            "/knowledge",
            r#"{"question": "q2", "answer": "a2", "keywords": ["k"]}"#,
        ))
        .await
        .unwrap();

    let resp = app.oneshot(get("/knowledge/summary/stats")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["total_entries"], 2);
    assert_eq!(body["total_usage"], 0);
    assert_eq!(body["categories"]["hours"], 1);
    assert_eq!(body["categories"]["uncategorized"], 1);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_answers_directly() {
    let app = make_app_with(
        StubCompletion::with_reply("We open at 9 AM.").with_keywords(vec!["k"]),
        3600,
    );
    let resp = app
        .oneshot(post_json(
            "/chat/session-1",
            r#"{"message": "when do you open?"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["reply"], "We open at 9 AM.");
}

#[tokio::test]
async fn test_chat_escalates_on_sentinel() {
    let app = make_app_with(
        StubCompletion::with_reply("NEEDS_HELP").with_keywords(vec!["k"]),
        3600,
    );
    let resp = app
        .clone()
        .oneshot(post_json(
            "/chat/session-1",
            r#"{"message": "do you sell gift cards?",
                "customer_phone": "+15551234567"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["reply"].as_str().unwrap().contains("supervisor"));

    // The escalation is visible as a pending help request.
    let resp = app
        .oneshot(get("/help-requests?status=pending"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    let requests = body.as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["question"], "do you sell gift cards?");
    assert_eq!(requests[0]["customer_phone"], "+15551234567");
}

#[tokio::test]
async fn test_chat_empty_message_400() {
    let app = make_app();
    let resp = app
        .oneshot(post_json("/chat/session-1", r#"{"message": "  "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
