//! Checks applied before a profile or resume upload is stored.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::assembly::drive::is_drive_link;
use crate::errors::AppError;
use crate::models::profile::Profile;

/// Largest accepted resume upload.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_CONTENT_TYPE: &str = "application/pdf";

static PROFILE_EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("PROFILE_EMAIL_REGEX should compile"));

/// Profile form as submitted. Every field is raw user input.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProfileRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub experience: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    #[serde(default)]
    pub api_key: String,
    pub resume_drive_link: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates the form and turns it into a storable profile (trimmed, blanks as `None`).
pub fn validate_profile(request: SaveProfileRequest) -> Result<Profile, AppError> {
    let name = request.name.trim();
    let email = request.email.trim();
    let api_key = request.api_key.trim();

    if name.is_empty() || email.is_empty() || api_key.is_empty() {
        return Err(AppError::Validation(
            "Please fill in all required fields (Name, Email, and API Key).".to_string(),
        ));
    }

    if !PROFILE_EMAIL_REGEX.is_match(email) {
        return Err(AppError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }

    let resume_drive_link = clean(request.resume_drive_link);
    if let Some(link) = resume_drive_link.as_deref() {
        if !is_drive_link(link) {
            return Err(AppError::Validation(
                "Please enter a valid Google Drive sharing link.".to_string(),
            ));
        }
    }

    Ok(Profile {
        user_id: request.user_id,
        name: name.to_string(),
        email: email.to_string(),
        phone: clean(request.phone),
        experience: clean(request.experience),
        skills: clean(request.skills),
        education: clean(request.education),
        linkedin: clean(request.linkedin),
        github: clean(request.github),
        portfolio: clean(request.portfolio),
        api_key: api_key.to_string(),
        resume_drive_link,
        updated_at: Utc::now(),
        resume_file: None,
    })
}

/// Accepts non-empty PDFs up to [`MAX_RESUME_BYTES`].
pub fn validate_resume_upload(content_type: Option<&str>, bytes: &[u8]) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }

    if bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(
            "File size too large. Please select a file under 5MB".to_string(),
        ));
    }

    let declared_pdf = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case(PDF_CONTENT_TYPE));
    if !declared_pdf && !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("Please select a PDF file".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SaveProfileRequest {
        SaveProfileRequest {
            user_id: Uuid::new_v4(),
            name: " Jane Doe ".to_string(),
            email: "jane@doe.test".to_string(),
            phone: Some("   ".to_string()),
            experience: None,
            skills: Some("Rust".to_string()),
            education: None,
            linkedin: None,
            github: None,
            portfolio: None,
            api_key: "sk-test".to_string(),
            resume_drive_link: Some("https://drive.google.com/open?id=abc".to_string()),
        }
    }

    #[test]
    fn test_valid_profile_is_normalized() {
        let profile = validate_profile(request()).unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.phone, None);
        assert_eq!(profile.skills.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_required_fields() {
        let mut r = request();
        r.api_key = "  ".to_string();
        assert!(matches!(validate_profile(r), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_bad_email() {
        let mut r = request();
        r.email = "jane at doe".to_string();
        assert!(matches!(validate_profile(r), Err(AppError::Validation(m)) if m.contains("email")));
    }

    #[test]
    fn test_bad_drive_link() {
        let mut r = request();
        r.resume_drive_link = Some("https://dropbox.com/s/abc".to_string());
        assert!(matches!(validate_profile(r), Err(AppError::Validation(m)) if m.contains("Drive")));
    }

    #[test]
    fn test_blank_drive_link_is_allowed() {
        let mut r = request();
        r.resume_drive_link = Some(String::new());
        assert_eq!(validate_profile(r).unwrap().resume_drive_link, None);
    }

    #[test]
    fn test_resume_upload_rules() {
        assert!(validate_resume_upload(Some("application/pdf"), b"anything").is_ok());
        assert!(validate_resume_upload(None, b"%PDF-1.7 ...").is_ok());
        assert!(validate_resume_upload(Some("text/plain"), b"hello").is_err());
        assert!(validate_resume_upload(Some("application/pdf"), b"").is_err());
        let big = vec![b'%'; MAX_RESUME_BYTES + 1];
        assert!(validate_resume_upload(Some("application/pdf"), &big).is_err());
    }
}
