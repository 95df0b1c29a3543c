//! Axum route handlers for the profile, resume upload, and form-state API.

use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::mask_credential;
use crate::models::profile::{FormState, ProfileView, ResumeFile, ResumeFileSummary};
use crate::profile::form_state::restore_form_state;
use crate::profile::validation::{validate_profile, validate_resume_upload, SaveProfileRequest};
use crate::state::AppState;

const DEFAULT_UPLOAD_NAME: &str = "resume.pdf";

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct CredentialTestRequest {
    pub api_key: String,
}

#[derive(Serialize)]
pub struct CredentialTestResponse {
    pub valid: bool,
}

#[derive(Deserialize)]
pub struct SaveFormStateRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub recruiter_email: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_title: String,
}

#[derive(Serialize)]
pub struct FormStateResponse {
    pub form_state: Option<FormState>,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = state
        .store
        .load_profile(params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No profile for user {}", params.user_id)))?;
    Ok(Json(ProfileView::from(&profile)))
}

/// PUT /api/v1/profile
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let mut profile = validate_profile(request)?;
    state.store.save_profile(&profile).await?;
    profile.resume_file = state.store.load_resume_file(profile.user_id).await?;

    info!(
        "Saved profile for user {} (key {})",
        profile.user_id,
        mask_credential(&profile.api_key)
    );
    Ok(Json(ProfileView::from(&profile)))
}

/// POST /api/v1/profile/credential/test
///
/// Checks the key against the provider without saving anything.
pub async fn handle_test_credential(
    State(state): State<AppState>,
    Json(request): Json<CredentialTestRequest>,
) -> Result<Json<CredentialTestResponse>, AppError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation(
            "Please enter your API key first.".to_string(),
        ));
    }
    state.llm.validate_credential(api_key).await?;
    Ok(Json(CredentialTestResponse { valid: true }))
}

/// POST /api/v1/profile/resume (multipart/form-data, first file field)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeFileSummary>), AppError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Invalid upload: {e}"))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid)?;

        validate_resume_upload(content_type.as_deref(), &bytes)?;

        let file = ResumeFile {
            file_name: if file_name.trim().is_empty() {
                DEFAULT_UPLOAD_NAME.to_string()
            } else {
                file_name
            },
            bytes: bytes.to_vec(),
            uploaded_at: Utc::now(),
        };
        state.store.save_resume_file(params.user_id, &file).await?;

        info!(
            "Stored resume '{}' ({} bytes) for user {}",
            file.file_name,
            file.bytes.len(),
            params.user_id
        );
        return Ok((StatusCode::CREATED, Json(ResumeFileSummary::from(&file))));
    }

    Err(AppError::Validation("No file was uploaded".to_string()))
}

/// GET /api/v1/profile/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let file = state
        .store
        .load_resume_file(params.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No resume uploaded".to_string()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.file_name.replace(['"', '\\', '\r', '\n'], "_")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

/// DELETE /api/v1/profile/resume
pub async fn handle_remove_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if state.store.remove_resume_file(params.user_id).await? {
        info!("Removed resume for user {}", params.user_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("No resume uploaded".to_string()))
    }
}

/// GET /api/v1/form-state
pub async fn handle_get_form_state(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FormStateResponse>, AppError> {
    let form_state = restore_form_state(state.store.as_ref(), params.user_id, Utc::now()).await?;
    Ok(Json(FormStateResponse { form_state }))
}

/// PUT /api/v1/form-state
pub async fn handle_save_form_state(
    State(state): State<AppState>,
    Json(request): Json<SaveFormStateRequest>,
) -> Result<Json<FormState>, AppError> {
    let form_state = FormState {
        recruiter_email: request.recruiter_email,
        job_description: request.job_description,
        job_title: request.job_title,
        timestamp: Utc::now(),
    };
    state
        .store
        .save_form_state(request.user_id, &form_state)
        .await?;
    Ok(Json(form_state))
}

/// DELETE /api/v1/form-state
pub async fn handle_clear_form_state(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    state.store.clear_form_state(params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
