//! Profile Store: persistence for profiles, uploaded resumes and form state.
//!
//! The generation pipeline only ever reads through this trait.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::profile::{FormState, Profile, ResumeFile};

/// SQLSTATE class 53: insufficient resources.
const INSUFFICIENT_RESOURCES_CLASS: &str = "53";
/// `too_many_connections` is in class 53 but says nothing about space.
const TOO_MANY_CONNECTIONS: &str = "53300";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("storage quota exceeded ({limit_bytes} bytes)")]
    QuotaExceeded { limit_bytes: usize },

    #[error("database out of space (SQLSTATE {0})")]
    StorageFull(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(code) = db.code() {
                if is_storage_exhausted(&code) {
                    return StoreError::StorageFull(code.into_owned());
                }
            }
        }
        StoreError::Database(err)
    }
}

fn is_storage_exhausted(sqlstate: &str) -> bool {
    sqlstate.starts_with(INSUFFICIENT_RESOURCES_CLASS) && sqlstate != TOO_MANY_CONNECTIONS
}

/// Rejects a resume whose size, added to everyone else's, would pass the limit.
fn check_resume_quota(limit: Option<usize>, others: usize, incoming: usize) -> Result<(), StoreError> {
    match limit {
        Some(limit_bytes) if others + incoming > limit_bytes => {
            Err(StoreError::QuotaExceeded { limit_bytes })
        }
        _ => Ok(()),
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads the profile with its uploaded resume attached, if any.
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    async fn load_resume_file(&self, user_id: Uuid) -> Result<Option<ResumeFile>, StoreError>;
    async fn save_resume_file(&self, user_id: Uuid, file: &ResumeFile) -> Result<(), StoreError>;
    /// Returns whether a file was removed.
    async fn remove_resume_file(&self, user_id: Uuid) -> Result<bool, StoreError>;

    async fn load_form_state(&self, user_id: Uuid) -> Result<Option<FormState>, StoreError>;
    async fn save_form_state(&self, user_id: Uuid, state: &FormState) -> Result<(), StoreError>;
    async fn clear_form_state(&self, user_id: Uuid) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProfileStore {
    pool: PgPool,
    resume_quota_bytes: Option<usize>,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            resume_quota_bytes: None,
        }
    }

    /// Caps the total bytes of all stored resumes. `None` leaves it to the database.
    pub fn with_resume_quota(mut self, limit_bytes: Option<usize>) -> Self {
        self.resume_quota_bytes = limit_bytes;
        self
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match profile {
            Some(mut profile) => {
                profile.resume_file = self.load_resume_file(user_id).await?;
                Ok(Some(profile))
            }
            None => Ok(None),
        }
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles
                (user_id, name, email, phone, experience, skills, education,
                 linkedin, github, portfolio, api_key, resume_drive_link, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                experience = EXCLUDED.experience,
                skills = EXCLUDED.skills,
                education = EXCLUDED.education,
                linkedin = EXCLUDED.linkedin,
                github = EXCLUDED.github,
                portfolio = EXCLUDED.portfolio,
                api_key = EXCLUDED.api_key,
                resume_drive_link = EXCLUDED.resume_drive_link,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.experience)
        .bind(&profile.skills)
        .bind(&profile.education)
        .bind(&profile.linkedin)
        .bind(&profile.github)
        .bind(&profile.portfolio)
        .bind(&profile.api_key)
        .bind(&profile.resume_drive_link)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn load_resume_file(&self, user_id: Uuid) -> Result<Option<ResumeFile>, StoreError> {
        let file = sqlx::query_as::<_, ResumeFile>(
            "SELECT file_name, bytes, uploaded_at FROM resume_files WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(file)
    }

    async fn save_resume_file(&self, user_id: Uuid, file: &ResumeFile) -> Result<(), StoreError> {
        if self.resume_quota_bytes.is_some() {
            let (others,): (i64,) = sqlx::query_as(
                "SELECT COALESCE(SUM(octet_length(bytes)), 0)::BIGINT FROM resume_files WHERE user_id <> $1",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
            check_resume_quota(
                self.resume_quota_bytes,
                usize::try_from(others).unwrap_or(usize::MAX),
                file.bytes.len(),
            )?;
        }

        sqlx::query(
            r#"
            INSERT INTO resume_files (user_id, file_name, bytes, uploaded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                file_name = EXCLUDED.file_name,
                bytes = EXCLUDED.bytes,
                uploaded_at = EXCLUDED.uploaded_at
            "#,
        )
        .bind(user_id)
        .bind(&file.file_name)
        .bind(&file.bytes)
        .bind(file.uploaded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_resume_file(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resume_files WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn load_form_state(&self, user_id: Uuid) -> Result<Option<FormState>, StoreError> {
        let state = sqlx::query_as::<_, FormState>(
            r#"
            SELECT recruiter_email, job_description, job_title, timestamp
            FROM form_states WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(state)
    }

    async fn save_form_state(&self, user_id: Uuid, state: &FormState) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO form_states (user_id, recruiter_email, job_description, job_title, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                recruiter_email = EXCLUDED.recruiter_email,
                job_description = EXCLUDED.job_description,
                job_title = EXCLUDED.job_title,
                timestamp = EXCLUDED.timestamp
            "#,
        )
        .bind(user_id)
        .bind(&state.recruiter_email)
        .bind(&state.job_description)
        .bind(&state.job_title)
        .bind(state.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_form_state(&self, user_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM form_states WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    profiles: HashMap<Uuid, Profile>,
    resumes: HashMap<Uuid, ResumeFile>,
    form_states: HashMap<Uuid, FormState>,
}

/// Process-local store. Used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryProfileStore {
    state: RwLock<MemoryState>,
    /// Upper bound on the total bytes of all stored resumes.
    resume_quota_bytes: Option<usize>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the total bytes of all stored resumes. `None` means unlimited.
    pub fn with_resume_quota(mut self, limit_bytes: Option<usize>) -> Self {
        self.resume_quota_bytes = limit_bytes;
        self
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn load_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let state = self.state.read().await;
        Ok(state.profiles.get(&user_id).cloned().map(|mut p| {
            p.resume_file = state.resumes.get(&user_id).cloned();
            p
        }))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut stored = profile.clone();
        stored.resume_file = None;
        self.state
            .write()
            .await
            .profiles
            .insert(profile.user_id, stored);
        Ok(())
    }

    async fn load_resume_file(&self, user_id: Uuid) -> Result<Option<ResumeFile>, StoreError> {
        Ok(self.state.read().await.resumes.get(&user_id).cloned())
    }

    async fn save_resume_file(&self, user_id: Uuid, file: &ResumeFile) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let others: usize = state
            .resumes
            .iter()
            .filter(|(id, _)| **id != user_id)
            .map(|(_, f)| f.bytes.len())
            .sum();
        check_resume_quota(self.resume_quota_bytes, others, file.bytes.len())?;
        state.resumes.insert(user_id, file.clone());
        Ok(())
    }

    async fn remove_resume_file(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.write().await.resumes.remove(&user_id).is_some())
    }

    async fn load_form_state(&self, user_id: Uuid) -> Result<Option<FormState>, StoreError> {
        Ok(self.state.read().await.form_states.get(&user_id).cloned())
    }

    async fn save_form_state(&self, user_id: Uuid, form: &FormState) -> Result<(), StoreError> {
        self.state
            .write()
            .await
            .form_states
            .insert(user_id, form.clone());
        Ok(())
    }

    async fn clear_form_state(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.state.write().await.form_states.remove(&user_id);
        Ok(())
    }
}
