//! Form-state persistence: an abandoned job form is restored for 24 hours, then purged.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::profile::FormState;
use crate::profile::store::{ProfileStore, StoreError};

/// Saved form state older than this is never restored.
pub const FORM_STATE_TTL_HOURS: i64 = 24;

pub fn is_fresh(state: &FormState, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(state.timestamp) < Duration::hours(FORM_STATE_TTL_HOURS)
}

/// Returns the saved form state if it is still fresh. A stale record is deleted.
pub async fn restore_form_state(
    store: &dyn ProfileStore,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<FormState>, StoreError> {
    let Some(state) = store.load_form_state(user_id).await? else {
        return Ok(None);
    };

    if is_fresh(&state, now) {
        debug!("Restoring form state for user {user_id}");
        return Ok(Some(state));
    }

    info!(
        "Purging form state for user {user_id} saved at {}",
        state.timestamp
    );
    store.clear_form_state(user_id).await?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::store::MemoryProfileStore;

    fn state_at(timestamp: DateTime<Utc>) -> FormState {
        FormState {
            recruiter_email: "hr@acme.test".to_string(),
            job_description: "Acme Corp is hiring a backend engineer.".to_string(),
            job_title: "Backend Engineer".to_string(),
            timestamp,
        }
    }

    #[test]
    fn test_is_fresh_boundary() {
        let now = Utc::now();
        assert!(is_fresh(&state_at(now - Duration::hours(23)), now));
        assert!(!is_fresh(&state_at(now - Duration::hours(24)), now));
        assert!(!is_fresh(&state_at(now - Duration::days(3)), now));
    }

    #[tokio::test]
    async fn test_fresh_state_is_restored_verbatim() {
        let store = MemoryProfileStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let saved = state_at(now - Duration::hours(2));
        store.save_form_state(user_id, &saved).await.unwrap();

        let restored = restore_form_state(&store, user_id, now).await.unwrap();
        assert_eq!(restored, Some(saved.clone()));
        // Restoring does not consume it.
        assert_eq!(store.load_form_state(user_id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_stale_state_is_purged() {
        let store = MemoryProfileStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        store
            .save_form_state(user_id, &state_at(now - Duration::hours(25)))
            .await
            .unwrap();

        assert_eq!(restore_form_state(&store, user_id, now).await.unwrap(), None);
        assert_eq!(store.load_form_state(user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_state() {
        let store = MemoryProfileStore::new();
        let restored = restore_form_state(&store, Uuid::new_v4(), Utc::now())
            .await
            .unwrap();
        assert!(restored.is_none());
    }
}
