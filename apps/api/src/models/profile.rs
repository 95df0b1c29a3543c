use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The job seeker's stored profile. `api_key` is the text-generation credential.
///
/// The uploaded resume lives in its own table and is attached on load.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub api_key: String,
    pub resume_drive_link: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip)]
    pub resume_file: Option<ResumeFile>,
}

/// An uploaded resume, stored as raw bytes.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

/// How the resume is made available to the recruiter. A Drive link wins over an upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResumeReference<'a> {
    None,
    DriveLink(&'a str),
    Uploaded(&'a ResumeFile),
}

impl Profile {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        email: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            phone: None,
            experience: None,
            skills: None,
            education: None,
            linkedin: None,
            github: None,
            portfolio: None,
            api_key: api_key.into(),
            resume_drive_link: None,
            updated_at: Utc::now(),
            resume_file: None,
        }
    }

    pub fn resume_reference(&self) -> ResumeReference<'_> {
        if let Some(link) = self.resume_drive_link.as_deref().filter(|l| !l.trim().is_empty()) {
            return ResumeReference::DriveLink(link);
        }
        match self.resume_file.as_ref() {
            Some(file) => ResumeReference::Uploaded(file),
            None => ResumeReference::None,
        }
    }
}

/// Public projection of a profile: credential masked, resume reduced to metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub api_key_hint: String,
    pub resume_drive_link: Option<String>,
    pub resume_file: Option<ResumeFileSummary>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeFileSummary {
    pub file_name: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&ResumeFile> for ResumeFileSummary {
    fn from(file: &ResumeFile) -> Self {
        Self {
            file_name: file.file_name.clone(),
            size_bytes: file.bytes.len(),
            uploaded_at: file.uploaded_at,
        }
    }
}

impl From<&Profile> for ProfileView {
    fn from(p: &Profile) -> Self {
        Self {
            user_id: p.user_id,
            name: p.name.clone(),
            email: p.email.clone(),
            phone: p.phone.clone(),
            experience: p.experience.clone(),
            skills: p.skills.clone(),
            education: p.education.clone(),
            linkedin: p.linkedin.clone(),
            github: p.github.clone(),
            portfolio: p.portfolio.clone(),
            api_key_hint: crate::llm_client::mask_credential(&p.api_key),
            resume_drive_link: p.resume_drive_link.clone(),
            resume_file: p.resume_file.as_ref().map(ResumeFileSummary::from),
            updated_at: p.updated_at,
        }
    }
}

/// Half-typed job form, kept so an abandoned form can be repopulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FormState {
    pub recruiter_email: String,
    pub job_description: String,
    pub job_title: String,
    pub timestamp: DateTime<Utc>,
}
