//! Recruiter address resolution: explicit address, or the first one found in the posting.

use once_cell::sync::Lazy;
use regex::Regex;

const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

static EMAIL_SEARCH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_SEARCH_REGEX should compile"));

static EMAIL_EXACT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{EMAIL_PATTERN}$")).expect("EMAIL_EXACT_REGEX should compile")
});

/// First address in left-to-right order, if any.
pub fn find_first_email(text: &str) -> Option<&str> {
    EMAIL_SEARCH_REGEX.find(text).map(|m| m.as_str())
}

pub fn is_valid_recipient(address: &str) -> bool {
    EMAIL_EXACT_REGEX.is_match(address)
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipientError {
    NotFound,
    Invalid(String),
}

impl RecipientError {
    pub fn user_message(&self) -> String {
        match self {
            RecipientError::NotFound => {
                "No email found in job description. Please enter recruiter email manually."
                    .to_string()
            }
            RecipientError::Invalid(address) => {
                format!("Please enter a valid email address (got '{address}')")
            }
        }
    }
}

/// Returns the address to send to and whether it was taken from the description.
pub fn resolve_recipient(
    explicit: Option<&str>,
    description: &str,
) -> Result<(String, bool), RecipientError> {
    let explicit = explicit.map(str::trim).filter(|s| !s.is_empty());

    let (address, derived) = match explicit {
        Some(address) => (address, false),
        None => (
            find_first_email(description).ok_or(RecipientError::NotFound)?,
            true,
        ),
    };

    if !is_valid_recipient(address) {
        return Err(RecipientError::Invalid(address.to_string()));
    }
    Ok((address.to_string(), derived))
}
