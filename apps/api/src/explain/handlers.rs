//! Axum route handlers for the explanation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::explain::explainer::explain_fit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub resume_text: String,
    pub job_title: String,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// POST /api/v1/explain
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, AppError> {
    let job_title = req.job_title.trim();
    if job_title.is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let explanation = explain_fit(&state.llm, &req.resume_text, job_title).await;
    Ok(Json(ExplainResponse { explanation }))
}
