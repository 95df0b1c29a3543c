pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::drafting::handlers as drafting;
use crate::profile::handlers as profile;
use crate::profile::validation::MAX_RESUME_BYTES;
use crate::state::AppState;

/// Multipart framing on top of the largest accepted resume.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_save_profile),
        )
        .route(
            "/api/v1/profile/credential/test",
            post(profile::handle_test_credential),
        )
        .route(
            "/api/v1/profile/resume",
            get(profile::handle_download_resume)
                .post(profile::handle_upload_resume)
                .delete(profile::handle_remove_resume),
        )
        .route(
            "/api/v1/form-state",
            get(profile::handle_get_form_state)
                .put(profile::handle_save_form_state)
                .delete(profile::handle_clear_form_state),
        )
        // Drafting API
        .route("/api/v1/emails/draft", post(drafting::handle_draft))
        .route(
            "/api/v1/emails/subject",
            post(drafting::handle_regenerate_subject),
        )
        .route("/api/v1/drive/canonical", get(drafting::handle_canonical_link))
        .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + UPLOAD_OVERHEAD_BYTES))
        .with_state(state)
}
