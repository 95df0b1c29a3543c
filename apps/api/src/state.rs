use std::sync::Arc;

use crate::assembly::drive::ResumeFetcher;
use crate::assembly::MailSettings;
use crate::drafting::generator::Drafter;
use crate::llm_client::LlmClient;
use crate::profile::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL when `DATABASE_URL` is set, otherwise in-memory.
    pub store: Arc<dyn ProfileStore>,
    pub llm: LlmClient,
    /// Best-effort resume download for Drive links.
    pub drive: Arc<dyn ResumeFetcher>,
    pub mail: MailSettings,
}

impl AppState {
    pub fn drafter(&self) -> Drafter<'_> {
        Drafter {
            store: self.store.as_ref(),
            llm: &self.llm,
            fetcher: self.drive.as_ref(),
            mail: &self.mail,
        }
    }
}
