//! Axum route handlers for the Drafting API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembly::drive::{canonical_view_url, extract_file_id};
use crate::drafting::generator::DraftedApplication;
use crate::drafting::JobRequest;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub job: JobRequest,
}

#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub subject: String,
}

#[derive(Debug, Deserialize)]
pub struct CanonicalQuery {
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct CanonicalResponse {
    pub file_id: Option<String>,
    pub canonical_url: String,
}

/// POST /api/v1/emails/draft
///
/// Full pipeline: recipient → profile → body + subject generation → artifact.
pub async fn handle_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<DraftedApplication>, AppError> {
    let drafted = state
        .drafter()
        .draft_application(request.user_id, request.job)
        .await?;
    Ok(Json(drafted))
}

/// POST /api/v1/emails/subject
///
/// Subject-only generation, used after a draft failed on the subject call.
pub async fn handle_regenerate_subject(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<SubjectResponse>, AppError> {
    let subject = state
        .drafter()
        .regenerate_subject(request.user_id, request.job)
        .await?;
    Ok(Json(SubjectResponse { subject }))
}

/// GET /api/v1/drive/canonical
pub async fn handle_canonical_link(Query(query): Query<CanonicalQuery>) -> Json<CanonicalResponse> {
    Json(CanonicalResponse {
        file_id: extract_file_id(&query.link).map(str::to_string),
        canonical_url: canonical_view_url(&query.link),
    })
}
