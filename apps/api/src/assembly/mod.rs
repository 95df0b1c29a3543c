//! Email Assembler: turns a generated email plus the profile's resume reference into
//! something the caller can open: a mailto link, or a web-mail compose URL with the
//! resume offered as a download or as a canonical Drive link.

pub mod compose;
pub mod document;
pub mod drive;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::assembly::compose::{
    augment_html, augment_plain, compose_url, mailto_url, ATTACHMENT_NOTICE,
};
use crate::assembly::document::{render_fallback_document, FallbackContent};
use crate::assembly::drive::{canonical_view_url, extract_file_id, ResumeFetcher};
use crate::drafting::GeneratedEmail;
use crate::models::profile::{Profile, ResumeReference};

/// Prefix added to downloaded resume file names so they are easy to spot.
pub const DOWNLOAD_PREFIX: &str = "RESUME_";
const DEFAULT_RESUME_FILE_NAME: &str = "resume.pdf";

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub webmail_host: String,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&BASE64.encode(bytes))
}

/// Resume bytes fetched from Drive, offered as a convenience download.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeDownload {
    pub file_name: String,
    #[serde(serialize_with = "serialize_base64")]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    /// No resume on file.
    SimpleMailLink {
        to: String,
        subject: String,
        body: String,
        mailto_url: String,
    },
    /// Uploaded resume: the caller downloads the bytes and attaches them by hand.
    ComposeWithAttachment {
        compose_url: String,
        body: String,
        download_file_name: String,
        #[serde(serialize_with = "serialize_base64")]
        downloadable_bytes: Vec<u8>,
    },
    /// Drive resume: the canonical link is appended to the body.
    ComposeWithLink {
        compose_url: String,
        canonical_resume_view_url: String,
        plain_text_copy: String,
        html_copy: String,
        fallback_document: String,
        downloaded_resume: Option<ResumeDownload>,
    },
}

impl Artifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::SimpleMailLink { .. } => "simple_mail_link",
            Artifact::ComposeWithAttachment { .. } => "compose_with_attachment",
            Artifact::ComposeWithLink { .. } => "compose_with_link",
        }
    }
}

/// Builds the artifact for one generated email. The Drive download is best effort:
/// any failure leaves `downloaded_resume` empty.
pub async fn assemble(
    email: &GeneratedEmail,
    profile: &Profile,
    recipient: &str,
    fetcher: &dyn ResumeFetcher,
    settings: &MailSettings,
) -> Artifact {
    let artifact = match profile.resume_reference() {
        ResumeReference::None => Artifact::SimpleMailLink {
            to: recipient.to_string(),
            subject: email.subject.clone(),
            body: email.body.clone(),
            mailto_url: mailto_url(recipient, &email.subject, &email.body),
        },
        ResumeReference::Uploaded(file) => {
            let body = format!("{}{ATTACHMENT_NOTICE}", email.body);
            Artifact::ComposeWithAttachment {
                compose_url: compose_url(&settings.webmail_host, recipient, &email.subject, &body),
                body,
                download_file_name: format!("{DOWNLOAD_PREFIX}{}", file.file_name),
                downloadable_bytes: file.bytes.clone(),
            }
        }
        ResumeReference::DriveLink(link) => {
            let canonical = canonical_view_url(link);
            let plain_text_copy = augment_plain(&email.body, profile);
            let html_copy = augment_html(&email.body, profile);
            let fallback_document = render_fallback_document(&FallbackContent {
                to: recipient,
                subject: &email.subject,
                plain_text: &plain_text_copy,
                html_text: &html_copy,
                resume_url: &canonical,
            });
            let downloaded_resume = fetch_drive_resume(link, fetcher).await;

            Artifact::ComposeWithLink {
                compose_url: compose_url(
                    &settings.webmail_host,
                    recipient,
                    &email.subject,
                    &plain_text_copy,
                ),
                canonical_resume_view_url: canonical,
                plain_text_copy,
                html_copy,
                fallback_document,
                downloaded_resume,
            }
        }
    };

    info!("Assembled {} for {}", artifact.kind(), recipient);
    artifact
}

/// Drive bytes are always offered under the default name, never the uploaded file's.
async fn fetch_drive_resume(link: &str, fetcher: &dyn ResumeFetcher) -> Option<ResumeDownload> {
    let Some(file_id) = extract_file_id(link) else {
        warn!("Could not extract a file id from Drive link; offering link only");
        return None;
    };

    match fetcher.fetch(file_id).await {
        Ok(bytes) => Some(ResumeDownload {
            file_name: format!("{DOWNLOAD_PREFIX}{DEFAULT_RESUME_FILE_NAME}"),
            bytes: bytes.to_vec(),
        }),
        Err(e) => {
            warn!("Failed to download resume from Drive: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::drive::FetchError;
    use crate::models::profile::ResumeFile;
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct StaticFetcher {
        result: Option<&'static [u8]>,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn ok(bytes: &'static [u8]) -> Self {
            Self { result: Some(bytes), calls: AtomicUsize::new(0) }
        }

        fn failing() -> Self {
            Self { result: None, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ResumeFetcher for StaticFetcher {
        async fn fetch(&self, _file_id: &str) -> Result<Bytes, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(Bytes::from_static)
                .ok_or(FetchError::Status(404))
        }
    }

    fn settings() -> MailSettings {
        MailSettings {
            webmail_host: "mail.google.com".to_string(),
        }
    }

    fn email() -> GeneratedEmail {
        GeneratedEmail {
            subject: "Application for Backend Engineer at Acme Corp".to_string(),
            body: "Dear Hiring Manager,\n\nI am excited to apply.".to_string(),
        }
    }

    fn uploaded() -> ResumeFile {
        ResumeFile {
            file_name: "jane.pdf".to_string(),
            bytes: b"%PDF-1.4 jane".to_vec(),
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_no_resume_yields_simple_mail_link() {
        let profile = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        let fetcher = StaticFetcher::ok(b"");
        let artifact = assemble(&email(), &profile, "hr@acme.test", &fetcher, &settings()).await;

        match artifact {
            Artifact::SimpleMailLink { to, mailto_url, body, .. } => {
                assert_eq!(to, "hr@acme.test");
                assert_eq!(body, email().body);
                assert!(mailto_url.starts_with("mailto:hr%40acme.test?subject=Application%20for"));
            }
            other => panic!("expected SimpleMailLink, got {}", other.kind()),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upload_only_yields_attachment() {
        let mut profile = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        profile.linkedin = Some("https://linkedin.com/in/jane".to_string());
        profile.resume_file = Some(uploaded());

        let artifact =
            assemble(&email(), &profile, "hr@acme.test", &StaticFetcher::failing(), &settings()).await;

        match artifact {
            Artifact::ComposeWithAttachment { compose_url, body, download_file_name, downloadable_bytes } => {
                assert!(compose_url.starts_with("https://mail.google.com/mail/?view=cm&fs=1&to=hr%40acme.test&su="));
                assert!(body.ends_with("Note: My resume is attached to this email."));
                assert_eq!(download_file_name, "RESUME_jane.pdf");
                assert_eq!(downloadable_bytes, b"%PDF-1.4 jane".to_vec());
            }
            other => panic!("expected ComposeWithAttachment, got {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_drive_link_wins_and_download_is_attached() {
        let mut profile = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        profile.resume_file = Some(uploaded());
        profile.resume_drive_link = Some("https://drive.google.com/file/d/FID1/view".to_string());
        let fetcher = StaticFetcher::ok(b"%PDF-drive");

        let artifact = assemble(&email(), &profile, "hr@acme.test", &fetcher, &settings()).await;

        match artifact {
            Artifact::ComposeWithLink {
                canonical_resume_view_url,
                plain_text_copy,
                downloaded_resume,
                fallback_document,
                ..
            } => {
                assert_eq!(
                    canonical_resume_view_url,
                    "https://drive.google.com/file/d/FID1/view?usp=drive_link"
                );
                assert!(plain_text_copy
                    .ends_with("\n\nResume: https://drive.google.com/file/d/FID1/view?usp=drive_link"));
                let download = downloaded_resume.unwrap();
                assert_eq!(download.file_name, "RESUME_resume.pdf");
                assert_eq!(download.bytes, b"%PDF-drive".to_vec());
                assert!(fallback_document.contains("hr@acme.test"));
            }
            other => panic!("expected ComposeWithLink, got {}", other.kind()),
        }
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drive_fetch_failure_degrades_to_link_only() {
        let mut profile = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        profile.resume_drive_link = Some("https://drive.google.com/open?id=XYZ".to_string());

        let artifact =
            assemble(&email(), &profile, "hr@acme.test", &StaticFetcher::failing(), &settings()).await;

        match artifact {
            Artifact::ComposeWithLink { downloaded_resume, canonical_resume_view_url, .. } => {
                assert!(downloaded_resume.is_none());
                assert_eq!(
                    canonical_resume_view_url,
                    "https://drive.google.com/file/d/XYZ/view?usp=drive_link"
                );
            }
            other => panic!("expected ComposeWithLink, got {}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_drive_link_without_id_skips_fetch() {
        let mut profile = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        profile.resume_drive_link = Some("https://drive.google.com/drive/folders".to_string());
        let fetcher = StaticFetcher::ok(b"unused");

        let artifact = assemble(&email(), &profile, "hr@acme.test", &fetcher, &settings()).await;

        assert_eq!(artifact.kind(), "compose_with_link");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_artifact_serializes_bytes_as_base64_with_kind_tag() {
        let artifact = Artifact::ComposeWithAttachment {
            compose_url: "https://mail.google.com/mail/".to_string(),
            body: "b".to_string(),
            download_file_name: "RESUME_a.pdf".to_string(),
            downloadable_bytes: b"hi".to_vec(),
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["kind"], "compose_with_attachment");
        assert_eq!(json["downloadable_bytes"], "aGk=");
    }
}
