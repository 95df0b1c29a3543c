use anyhow::{Context, Result};

const DEFAULT_LLM_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_DRIVE_BASE_URL: &str = "https://drive.google.com";
const DEFAULT_WEBMAIL_HOST: &str = "mail.google.com";

/// Application configuration loaded from environment variables.
/// Only `DATABASE_URL` selects the storage backend; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset the service keeps profiles in memory for the life of the process.
    pub database_url: Option<String>,
    pub llm_api_base: String,
    pub drive_base_url: String,
    pub webmail_host: String,
    pub http_timeout_secs: u64,
    /// Total bytes allowed across all stored resumes. Unset means no limit.
    pub resume_quota_bytes: Option<usize>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            llm_api_base: env_or("LLM_API_BASE", DEFAULT_LLM_API_BASE),
            drive_base_url: env_or("DRIVE_BASE_URL", DEFAULT_DRIVE_BASE_URL),
            webmail_host: env_or("WEBMAIL_HOST", DEFAULT_WEBMAIL_HOST),
            http_timeout_secs: env_or("HTTP_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            resume_quota_bytes: optional_env("RESUME_QUOTA_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("RESUME_QUOTA_BYTES must be a whole number of bytes")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}
