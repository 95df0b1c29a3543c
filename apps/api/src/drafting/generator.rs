//! Drafting pipeline.
//!
//! Flow: resolve recipient → load profile → build prompts → generate body →
//!       generate subject → assemble artifact → clear saved form state.
//!
//! Validation failures return before any network call. Assembly starts only after
//! both generation calls succeed.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assembly::drive::ResumeFetcher;
use crate::assembly::{assemble, Artifact, MailSettings};
use crate::drafting::prompts::{build_body_prompt, build_subject_prompt};
use crate::drafting::{normalize_subject, GeneratedEmail, JobRequest};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::profile::Profile;
use crate::profile::store::ProfileStore;

/// Everything the caller needs to open the drafted email.
#[derive(Debug, Clone, Serialize)]
pub struct DraftedApplication {
    pub recipient: String,
    pub recipient_was_derived: bool,
    pub email: GeneratedEmail,
    pub artifact: Artifact,
}

/// Collaborators the pipeline needs, borrowed from application state.
pub struct Drafter<'a> {
    pub store: &'a dyn ProfileStore,
    pub llm: &'a LlmClient,
    pub fetcher: &'a dyn ResumeFetcher,
    pub mail: &'a MailSettings,
}

impl Drafter<'_> {
    /// Runs the full pipeline for one job.
    pub async fn draft_application(
        &self,
        user_id: Uuid,
        request: JobRequest,
    ) -> Result<DraftedApplication, AppError> {
        let job = request.resolve()?;
        if job.recipient_was_derived {
            info!("Recipient derived from job description: {}", job.recipient);
        }

        let profile = load_ready_profile(self.store, user_id).await?;

        let email = generate_email(self.llm, &job.request, &profile).await?;

        let artifact = assemble(&email, &profile, &job.recipient, self.fetcher, self.mail).await;

        if let Err(e) = self.store.clear_form_state(user_id).await {
            warn!("Drafted email but could not clear form state for user {user_id}: {e}");
        }

        info!("Drafted application email for user {user_id}");

        Ok(DraftedApplication {
            recipient: job.recipient,
            recipient_was_derived: job.recipient_was_derived,
            email,
            artifact,
        })
    }

    /// Generates only a subject line, for retrying after a subject failure.
    pub async fn regenerate_subject(
        &self,
        user_id: Uuid,
        request: JobRequest,
    ) -> Result<String, AppError> {
        let job = request.resolve()?;
        let profile = load_ready_profile(self.store, user_id).await?;

        let raw = self
            .llm
            .generate(&build_subject_prompt(&job.request, &profile), &profile.api_key)
            .await?;
        Ok(normalize_subject(&raw))
    }
}

/// Body first, then subject. A subject failure carries the finished body back.
pub async fn generate_email(
    llm: &LlmClient,
    job: &JobRequest,
    profile: &Profile,
) -> Result<GeneratedEmail, AppError> {
    let body_prompt = build_body_prompt(job, profile);
    let subject_prompt = build_subject_prompt(job, profile);

    info!("Generating email body for user {}", profile.user_id);
    let body = llm.generate(&body_prompt, &profile.api_key).await?;

    info!("Generating subject line for user {}", profile.user_id);
    let subject = match llm.generate(&subject_prompt, &profile.api_key).await {
        Ok(raw) => normalize_subject(&raw),
        Err(e) => {
            warn!("Subject generation failed after body succeeded: {e}");
            return Err(AppError::from(e).with_partial_body(body));
        }
    };

    Ok(GeneratedEmail { subject, body })
}

/// Loads the profile and checks the fields generation cannot do without.
async fn load_ready_profile(store: &dyn ProfileStore, user_id: Uuid) -> Result<Profile, AppError> {
    let profile = store.load_profile(user_id).await?.ok_or_else(|| {
        AppError::Validation("Please complete your profile in settings.".to_string())
    })?;

    if profile.api_key.trim().is_empty() {
        return Err(AppError::Validation(
            "Please set your API key in settings.".to_string(),
        ));
    }
    if profile.name.trim().is_empty() || profile.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Please complete your profile in settings.".to_string(),
        ));
    }
    Ok(profile)
}
