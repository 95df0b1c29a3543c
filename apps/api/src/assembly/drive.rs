//! Google Drive resume links: file-id extraction, canonical view URL, best-effort download.

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use thiserror::Error;

const CANONICAL_DRIVE_HOST: &str = "https://drive.google.com";

static DRIVE_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://drive\.google\.com/(file/d/|open\?id=)")
        .expect("DRIVE_LINK_REGEX should compile")
});

static FILE_PATH_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/file/d/([^/?#]+)").expect("FILE_PATH_ID_REGEX should compile"));

static QUERY_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"id=([^&#]+)").expect("QUERY_ID_REGEX should compile"));

/// True for the two sharing-link shapes accepted on profile save.
pub fn is_drive_link(link: &str) -> bool {
    DRIVE_LINK_REGEX.is_match(link)
}

/// Pulls the file id out of `/file/d/{id}/...` or `...?id={id}...`.
/// The path shape is checked first; a link containing it never falls back to `id=`.
pub fn extract_file_id(link: &str) -> Option<&str> {
    let regex: &Regex = if link.contains("/file/d/") {
        &FILE_PATH_ID_REGEX
    } else if link.contains("id=") {
        &QUERY_ID_REGEX
    } else {
        return None;
    };

    regex
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Rebuilds a sharing link as the directly clickable viewer URL.
/// Links without a recognizable file id come back unchanged.
pub fn canonical_view_url(link: &str) -> String {
    match extract_file_id(link) {
        Some(id) => format!("{CANONICAL_DRIVE_HOST}/file/d/{id}/view?usp=drive_link"),
        None => link.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download returned status {0}")]
    Status(u16),
}

/// Source of resume bytes for a Drive file id.
#[async_trait]
pub trait ResumeFetcher: Send + Sync {
    async fn fetch(&self, file_id: &str) -> Result<Bytes, FetchError>;
}

/// Downloads Drive files through the public `uc?export=download` endpoint.
#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    base_url: String,
}

impl DriveClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn download_url(&self, file_id: &str) -> String {
        format!(
            "{}/uc?export=download&id={}",
            self.base_url,
            urlencoding::encode(file_id)
        )
    }
}

#[async_trait]
impl ResumeFetcher for DriveClient {
    async fn fetch(&self, file_id: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(self.download_url(file_id)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?)
    }
}
