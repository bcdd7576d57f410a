//! Axum route handlers for advisory chat sessions.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::chat::advisor::ask;
use crate::chat::session::{SessionHandle, SessionSnapshot};
use crate::errors::AppError;
use crate::sections::document::{extract_text, DocumentFormat};
use crate::sections::handlers::SectionReport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AttachResumeRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Either the model's reply or a mapped error message; the caller cannot tell
/// them apart structurally.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub reply: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    let active_sessions = state.sessions.len().await;
    info!(%session_id, active_sessions, "Session created");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!(session_id = %id, "Session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// PUT /api/v1/sessions/:id/resume
pub async fn handle_attach_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AttachResumeRequest>,
) -> Result<Json<SectionReport>, AppError> {
    let session = find_session(&state, id).await?;
    attach_resume(&state, &session, req.text).await.map(Json)
}

/// POST /api/v1/sessions/:id/resume/upload
///
/// Accepts one multipart file field (`.pdf` or `.txt`).
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SectionReport>, AppError> {
    let session = find_session(&state, id).await?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
        .ok_or_else(|| AppError::Validation("No file in upload".to_string()))?;

    let file_name = field.file_name().unwrap_or_default().to_string();
    let format = DocumentFormat::from_file_name(&file_name)?;
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

    info!(session_id = %id, %file_name, bytes = bytes.len(), "Resume uploaded");
    let text = extract_text(format, bytes).await?;
    attach_resume(&state, &session, text).await.map(Json)
}

/// POST /api/v1/sessions/:id/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let session = find_session(&state, id).await?;
    // Held across the advisory call so exchanges in one session stay ordered.
    let mut session = session.lock().await;
    let reply = ask(&state.llm, &mut session, question).await;

    Ok(Json(AskResponse { reply }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

async fn attach_resume(
    state: &AppState,
    session: &SessionHandle,
    text: String,
) -> Result<SectionReport, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume text cannot be empty".to_string()));
    }

    let report = SectionReport::build(state.classifier.as_ref(), &text);
    let mut session = session.lock().await;
    session.resume_text = Some(text);
    session.touch();
    Ok(report)
}
