// Drafting: recipient resolution, prompt building, and the two-call generation pipeline.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod recipient;

use serde::{Deserialize, Serialize};

use crate::drafting::prompts::TITLE_PLACEHOLDER;
use crate::drafting::recipient::resolve_recipient;
use crate::errors::AppError;

/// One job to apply for, as typed into the form.
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub job_title: Option<String>,
    pub job_description: String,
    #[serde(default)]
    pub recruiter_email: Option<String>,
}

/// A job request whose recipient is known and valid.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    /// `recruiter_email` is always `Some` here.
    pub request: JobRequest,
    pub recipient: String,
    pub recipient_was_derived: bool,
}

impl JobRequest {
    pub fn title_or_placeholder(&self) -> &str {
        self.job_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(TITLE_PLACEHOLDER)
    }

    /// Validates the description and settles the recipient. Never touches the network.
    pub fn resolve(self) -> Result<ResolvedJob, AppError> {
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter a job description".to_string(),
            ));
        }

        let (recipient, derived) =
            resolve_recipient(self.recruiter_email.as_deref(), &self.job_description)
                .map_err(|e| AppError::Validation(e.user_message()))?;

        Ok(ResolvedJob {
            request: JobRequest {
                recruiter_email: Some(recipient.clone()),
                ..self
            },
            recipient,
            recipient_was_derived: derived,
        })
    }
}

/// Subject and body as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedEmail {
    pub subject: String,
    pub body: String,
}

/// Strips the decorations models like to put around a subject line.
pub fn normalize_subject(raw: &str) -> String {
    let mut subject = raw.trim();

    if subject
        .get(..8)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("subject:"))
    {
        subject = subject[8..].trim_start();
    }

    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if let Some(inner) = subject
            .strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
        {
            subject = inner.trim();
            break;
        }
    }

    subject.to_string()
}
