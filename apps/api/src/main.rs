mod assembly;
mod config;
mod db;
mod drafting;
mod errors;
mod llm_client;
mod models;
mod profile;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assembly::drive::DriveClient;
use crate::assembly::MailSettings;
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::profile::store::{MemoryProfileStore, PgProfileStore, ProfileStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pitchmail API v{}", env!("CARGO_PKG_VERSION"));

    // One HTTP client shared by the LLM and Drive calls
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let store: Arc<dyn ProfileStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgProfileStore::new(pool).with_resume_quota(config.resume_quota_bytes))
        }
        None => {
            warn!("DATABASE_URL not set; profiles are kept in memory and lost on restart");
            Arc::new(MemoryProfileStore::new().with_resume_quota(config.resume_quota_bytes))
        }
    };

    if let Some(limit) = config.resume_quota_bytes {
        info!("Resume storage quota: {limit} bytes");
    }

    let llm = LlmClient::new(http.clone(), config.llm_api_base.clone());
    info!(
        "LLM client initialized (model: {}, base: {})",
        llm_client::MODEL,
        config.llm_api_base
    );

    let drive = Arc::new(DriveClient::new(http, config.drive_base_url.clone()));

    let state = AppState {
        store,
        llm,
        drive,
        mail: MailSettings {
            webmail_host: config.webmail_host.clone(),
        },
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
