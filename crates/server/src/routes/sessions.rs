use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{Local, Utc};
use sarmobi_guide_lib::command::{execute_json, CommandResponse};
use sarmobi_guide_lib::views::{Route, View};
use serde::Deserialize;
use shared::{ChatRequest, ChatResponse, SessionCreated};

use crate::error::ApiError;
use crate::AppState;

/// Create a session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let id = state.create_session().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated { id: id.to_string() }),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub chat: Option<String>,
}

/// Render a route view
pub async fn render_view(
    State(state): State<AppState>,
    Path((id, route)): Path<(String, String)>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<View>, ApiError> {
    let route = match Route::parse(&route)? {
        Route::Guide { .. } => Route::Guide {
            chat_open: query.chat.as_deref() == Some("open"),
        },
        other => other,
    };
    let view = state.with_session(&id, |h| h.render(route)).await?;
    Ok(Json(view))
}

/// Execute one JSON session command. The body is parsed by the command
/// protocol so malformed commands get its error message.
pub async fn run_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<CommandResponse>, ApiError> {
    let resp = state
        .with_session(&id, |h| execute_json(h, &body))
        .await?
        .map_err(ApiError::BadRequest)?;

    if !resp.success {
        let message = resp
            .error
            .unwrap_or_else(|| "command was rejected".to_string());
        return Err(ApiError::Guide(message));
    }
    Ok(Json(resp))
}

/// Post a chat message; the reply follows after the typing delay.
pub async fn chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let text = request.text.trim().to_string();
    let (posted, epoch, transcript_len) = state
        .with_session(&id, |h| {
            (h.post_user_message(&text), h.epoch(), h.transcript_len())
        })
        .await?;
    if !posted {
        return Ok(Json(ChatResponse {
            reply: None,
            transcript_len,
        }));
    }

    if !state.config.chat_delay.is_zero() {
        tokio::time::sleep(state.config.chat_delay).await;
    }

    // A reset during the delay makes the reply stale.
    let (reply, transcript_len) = state
        .with_session(&id, |h| (h.reply_if_current(&text, epoch), h.transcript_len()))
        .await?;
    Ok(Json(ChatResponse {
        reply,
        transcript_len,
    }))
}

/// End a session and drop its state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.remove_session(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the assembly summary as plain text
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let doc = state
        .with_session(&id, |h| h.summary(Local::now().date_naive(), Utc::now()))
        .await?;
    tracing::info!("Summary {} generated for session {id}", doc.file_name);

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.file_name),
        ),
    ];
    Ok((headers, doc.content).into_response())
}
