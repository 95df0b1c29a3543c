//! Body augmentation and mail URL construction.

use crate::assembly::drive::canonical_view_url;
use crate::models::profile::Profile;

/// Appended to the body when the resume travels as an attachment.
pub const ATTACHMENT_NOTICE: &str = "\n\n---\nNote: My resume is attached to this email.";

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Contact and resume lines, in the fixed order LinkedIn, GitHub, Portfolio, Resume.
fn link_lines(profile: &Profile) -> Vec<(&'static str, String)> {
    let mut lines = Vec::new();

    if let Some(url) = present(&profile.linkedin) {
        lines.push(("LinkedIn", url));
    }
    if let Some(url) = present(&profile.github) {
        lines.push(("GitHub", url));
    }
    if let Some(url) = present(&profile.portfolio) {
        lines.push(("Portfolio", url));
    }
    if let Some(link) = present(&profile.resume_drive_link) {
        lines.push(("Resume", canonical_view_url(&link)));
    }
    lines
}

fn append_block(body: &str, lines: Vec<String>) -> String {
    if lines.is_empty() {
        return body.to_string();
    }
    format!("{body}\n\n{}", lines.join("\n"))
}

/// Generated body followed by one `Label: url` line per available link.
pub fn augment_plain(body: &str, profile: &Profile) -> String {
    let lines = link_lines(profile)
        .into_iter()
        .map(|(label, url)| format!("{label}: {url}"))
        .collect();
    append_block(body, lines)
}

/// Same as [`augment_plain`] but with HTML-escaped text and anchors for each link.
pub fn augment_html(body: &str, profile: &Profile) -> String {
    let lines = link_lines(profile)
        .into_iter()
        .map(|(label, url)| {
            let url = html_escape(&url);
            format!(r#"{label}: <a href="{url}" target="_blank">{url}</a>"#)
        })
        .collect();
    append_block(&html_escape(body), lines)
}

/// Web-mail compose URL. Every parameter value is percent-encoded.
pub fn compose_url(host: &str, to: &str, subject: &str, body: &str) -> String {
    format!(
        "https://{host}/mail/?view=cm&fs=1&to={}&su={}&body={}",
        urlencoding::encode(to),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

pub fn mailto_url(to: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        urlencoding::encode(to),
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

/// HTML escaping for text and attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn profile() -> Profile {
        let mut p = Profile::new(Uuid::new_v4(), "Jane Doe", "jane@x.test", "sk");
        p.linkedin = Some("https://linkedin.com/in/jane".to_string());
        p.github = Some("https://github.com/jane".to_string());
        p.portfolio = Some("https://jane.dev".to_string());
        p.resume_drive_link = Some("https://drive.google.com/open?id=R1".to_string());
        p
    }

    /// Splits a URL query into decoded values for the given keys.
    fn query_value(url: &str, key: &str) -> String {
        let query = url.split_once('?').unwrap().1;
        let raw = query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{key}=")))
            .unwrap();
        urlencoding::decode(raw).unwrap().into_owned()
    }

    #[test]
    fn test_augment_plain_order() {
        let out = augment_plain("Body.", &profile());
        assert_eq!(
            out,
            "Body.\n\nLinkedIn: https://linkedin.com/in/jane\nGitHub: https://github.com/jane\n\
             Portfolio: https://jane.dev\nResume: https://drive.google.com/file/d/R1/view?usp=drive_link"
        );
    }

    #[test]
    fn test_augment_plain_skips_absent_fields() {
        let mut p = profile();
        p.linkedin = None;
        p.portfolio = Some(String::new());
        let out = augment_plain("Body.", &p);
        assert_eq!(
            out,
            "Body.\n\nGitHub: https://github.com/jane\nResume: https://drive.google.com/file/d/R1/view?usp=drive_link"
        );
    }

    #[test]
    fn test_present_trims_and_drops_blank_values() {
        assert_eq!(present(&Some("  https://jane.dev ".to_string())).as_deref(), Some("https://jane.dev"));
        assert_eq!(present(&Some("   ".to_string())), None);
        assert_eq!(present(&None), None);
    }

    #[test]
    fn test_augment_plain_without_links_is_identity() {
        let p = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        assert_eq!(augment_plain("Body.", &p), "Body.");
    }

    #[test]
    fn test_augment_html_escapes_body_and_links() {
        let mut p = Profile::new(Uuid::new_v4(), "Jane", "jane@x.test", "sk");
        p.portfolio = Some("https://jane.dev/?a=1&b=2".to_string());
        let out = augment_html("R&D <team>", &p);
        assert_eq!(
            out,
            "R&amp;D &lt;team&gt;\n\nPortfolio: <a href=\"https://jane.dev/?a=1&amp;b=2\" target=\"_blank\">https://jane.dev/?a=1&amp;b=2</a>"
        );
    }

    #[test]
    fn test_compose_url_round_trips_every_field() {
        let to = "jane.o'neil+jobs@acme.test";
        let subject = "Application for R&D Engineer at A=B Corp";
        let body = "Dear Hiring Manager,\n\n100% ready & excited?\n#hash é\r\nBest,\nJane";

        let url = compose_url("mail.google.com", to, subject, body);
        assert!(url.starts_with("https://mail.google.com/mail/?view=cm&fs=1&to="));
        assert!(!url.contains('\n'));
        assert_eq!(query_value(&url, "to"), to);
        assert_eq!(query_value(&url, "su"), subject);
        assert_eq!(query_value(&url, "body"), body);
    }

    #[test]
    fn test_mailto_url_encodes_subject_and_body() {
        let url = mailto_url("hr@acme.test", "Hi & bye", "a=b\nc");
        assert_eq!(url, "mailto:hr%40acme.test?subject=Hi%20%26%20bye&body=a%3Db%0Ac");
    }
}
