//! HTTP-level tests for the guide service.
//!
//! Drives `build_router` in-process with `oneshot`; no socket is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::Router;
use base64::Engine;
use http_body_util::BodyExt;
use hyper::{Request, StatusCode};
use sarmobi_guide_lib::identify::{FixedDecision, SimulatedIdentifier, SimulationTimings};
use server::config::ServerConfig;
use server::{build_router, AppContext};
use shared::Catalog;
use tower::ServiceExt;

// ── Test app builder ───────────────────────────────────────────

fn test_app(photo_recognized: bool) -> Router {
    test_app_with(
        photo_recognized,
        ServerConfig {
            chat_delay: Duration::ZERO,
            simulation_scale: 0.0,
            ..ServerConfig::default()
        },
    )
}

fn test_app_with(photo_recognized: bool, config: ServerConfig) -> Router {
    let catalog = Catalog::builtin().unwrap();
    let identifier = SimulatedIdentifier::new(
        &catalog,
        SimulationTimings::instant(),
        Box::new(FixedDecision(photo_recognized)),
    );
    build_router(Arc::new(AppContext::with_identifier(
        catalog,
        config,
        Arc::new(identifier),
    )))
}

// ── Request helpers ────────────────────────────────────────────

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = body_bytes(resp).await;
    serde_json::from_slice(&bytes).unwrap_or_else(
        |_| serde_json::json!({ "raw": String::from_utf8_lossy(&bytes).to_string() }),
    )
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn delete(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn new_session(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await["id"].as_str().unwrap().to_string()
}

// ── Tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let app = test_app(true);
    let resp = get(&app, "/api/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "ok");
}

#[tokio::test]
async fn test_catalog() {
    let app = test_app(true);
    let resp = get(&app, "/api/catalog").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let product = body_json(resp).await;
    assert_eq!(product["id"], "SMB-CLST-001");
    assert_eq!(product["steps"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = test_app(true);
    let resp = get(&app, "/api/sessions/not-a-session/views/guide").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "session_not_found");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let resp = get(&app, &format!("/api/sessions/{id}/views/checkout")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "unknown_route");
}

#[tokio::test]
async fn test_guide_view_with_chat_open() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let resp = get(&app, &format!("/api/sessions/{id}/views/guide?chat=open")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view = body_json(resp).await;
    assert_eq!(view["route"], "guide");
    assert_eq!(view["chat_open"], true);
    assert_eq!(view["step_label"], "Step 1 of 5");
}

#[tokio::test]
async fn test_commands_drive_navigation() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let uri = format!("/api/sessions/{id}/commands");

    let resp = post_json(&app, &uri, serde_json::json!({ "command": "advance" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["to"], 2);

    let resp = post_json(&app, &uri, serde_json::json!({ "command": "inspect" })).await;
    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["current_step"], 2);
    assert_eq!(data["completed_steps"], serde_json::json!([1]));
}

#[tokio::test]
async fn test_rejected_command_is_422() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/commands"),
        serde_json::json!({ "command": "go_to_step", "step": 0 }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["error"]["code"], "action_rejected");
}

#[tokio::test]
async fn test_malformed_command_is_400() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/commands"),
        serde_json::json!({ "command": "teleport" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_identify_by_model_number() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let uri = format!("/api/sessions/{id}/identify");

    let resp = post_json(
        &app,
        &uri,
        serde_json::json!({ "method": "model", "model_number": "  " }),
    )
    .await;
    assert_eq!(body_json(resp).await["status"], "disabled");

    let resp = post_json(
        &app,
        &uri,
        serde_json::json!({ "method": "model", "model_number": "Sarmobi Closet" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "identified");
    assert_eq!(body["product_id"], "SMB-CLST-001");

    let resp = get(&app, &format!("/api/sessions/{id}/views/identify")).await;
    let view = body_json(resp).await;
    assert_eq!(view["identified_product"]["name"], "Sarmobi Closet");
}

#[tokio::test]
async fn test_identify_photo_warning() {
    let app = test_app(false);
    let id = new_session(&app).await;
    let content = base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/identify"),
        serde_json::json!({ "method": "photo", "file_name": "closet.jpg", "content_base64": content }),
    )
    .await;
    let body = body_json(resp).await;
    assert_eq!(body["status"], "needs_retry");
    assert_eq!(body["analysis"], "warning");
}

#[tokio::test]
async fn test_identify_photo_bad_base64() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/identify"),
        serde_json::json!({ "method": "photo", "file_name": "x.jpg", "content_base64": "***" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_reply() {
    let app = test_app(true);
    let id = new_session(&app).await;
    let uri = format!("/api/sessions/{id}/chat");

    let resp = post_json(&app, &uri, serde_json::json!({ "text": "what tools do I need" })).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert!(body["reply"]
        .as_str()
        .unwrap()
        .contains("Phillips screwdriver"));
    assert_eq!(body["transcript_len"], 2);

    let resp = post_json(&app, &uri, serde_json::json!({ "text": "   " })).await;
    let body = body_json(resp).await;
    assert!(body["reply"].is_null());
    assert_eq!(body["transcript_len"], 2);
}

#[tokio::test]
async fn test_summary_download() {
    let app = test_app(true);
    let id = new_session(&app).await;
    post_json(
        &app,
        &format!("/api/sessions/{id}/commands"),
        serde_json::json!({ "command": "advance" }),
    )
    .await;

    let resp = get(&app, &format!("/api/sessions/{id}/summary")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    let disposition = resp.headers()["content-disposition"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("sarmobi-assembly-summary-"));

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(text.starts_with("SARMOBI ASSEMBLY SUMMARY"));
    assert!(text.contains("- Steps Completed: 1/5"));
    assert!(text.contains("- Completion Rate: 20%"));
}

#[tokio::test]
async fn test_delete_session() {
    let app = test_app(true);
    let id = new_session(&app).await;

    let resp = delete(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = get(&app, &format!("/api/sessions/{id}/views/guide")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["code"], "session_not_found");

    let resp = delete(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_idle_sessions_expire() {
    let app = test_app_with(
        true,
        ServerConfig {
            chat_delay: Duration::ZERO,
            simulation_scale: 0.0,
            session_ttl: Duration::from_millis(10),
            ..ServerConfig::default()
        },
    );
    let idle = new_session(&app).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fresh = new_session(&app).await;
    let resp = get(&app, &format!("/api/sessions/{idle}/views/overview")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = get(&app, &format!("/api/sessions/{fresh}/views/overview")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_chat_reply_dropped_after_reset() {
    let app = test_app_with(
        true,
        ServerConfig {
            chat_delay: Duration::from_millis(200),
            simulation_scale: 0.0,
            ..ServerConfig::default()
        },
    );
    let id = new_session(&app).await;

    let chat_uri = format!("/api/sessions/{id}/chat");
    let pending = post_json(&app, &chat_uri, serde_json::json!({ "text": "what tools do I need" }));
    let reset = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        get(&app, &format!("/api/sessions/{id}/views/entry")).await
    };
    let (chat_resp, reset_resp) = tokio::join!(pending, reset);
    assert_eq!(reset_resp.status(), StatusCode::OK);
    let body = body_json(chat_resp).await;
    assert!(body["reply"].is_null());
    assert_eq!(body["transcript_len"], 0);

    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/commands"),
        serde_json::json!({ "command": "open_chat" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = post_json(
        &app,
        &format!("/api/sessions/{id}/commands"),
        serde_json::json!({ "command": "inspect" }),
    )
    .await;
    let transcript = body_json(resp).await["data"]["transcript"].clone();
    let transcript = transcript.as_array().unwrap();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0]["role"], "bot");
}
