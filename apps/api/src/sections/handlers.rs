//! Axum route handlers for stateless section parsing.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::sections::accumulator::{accumulate_with, missing_section_warning};
use crate::sections::{LineClassifier, SectionMap};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseSectionsRequest {
    pub text: String,
}

/// Parsed sections plus soft "nothing detected" notices for empty ones.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReport {
    pub sections: SectionMap,
    pub warnings: Vec<String>,
}

impl SectionReport {
    pub fn build(classifier: &dyn LineClassifier, text: &str) -> Self {
        let sections = accumulate_with(classifier, text);
        let warnings = sections
            .empty_sections()
            .into_iter()
            .filter_map(missing_section_warning)
            .map(String::from)
            .collect();
        Self { sections, warnings }
    }
}

/// POST /api/v1/resume/sections
pub async fn handle_parse_sections(
    State(state): State<AppState>,
    Json(req): Json<ParseSectionsRequest>,
) -> Result<Json<SectionReport>, AppError> {
    Ok(Json(SectionReport::build(state.classifier.as_ref(), &req.text)))
}
