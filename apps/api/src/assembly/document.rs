//! Standalone HTML page offering copy-to-clipboard versions of the drafted email.

use crate::assembly::compose::html_escape;

/// Everything shown on the fallback page.
pub struct FallbackContent<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub plain_text: &'a str,
    pub html_text: &'a str,
    pub resume_url: &'a str,
}

/// A string literal safe to embed inside a `<script>` element.
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn with_line_breaks(s: &str) -> String {
    s.replace('\n', "<br>\n")
}

pub fn render_fallback_document(content: &FallbackContent<'_>) -> String {
    let template = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Email Content with Clickable Links</title>
  <style>
    body { font-family: Arial, sans-serif; padding: 20px; max-width: 800px; margin: 0 auto; }
    .email-content { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; }
    .email-content a { color: #007bff; text-decoration: underline; }
    .copy-btn { background: #007bff; color: white; padding: 10px 20px; border: none; border-radius: 5px; cursor: pointer; margin: 5px; }
    .info { background: #e3f2fd; padding: 15px; border-radius: 5px; margin: 15px 0; }
  </style>
</head>
<body>
  <h2>Email Content with Clickable Links</h2>
  <div class="info">
    <strong>To:</strong> {to}<br>
    <strong>Subject:</strong> {subject}
  </div>

  <h3>Plain Text</h3>
  <div class="email-content">{plain_html}</div>
  <button class="copy-btn" onclick="copyText(PLAIN, 'Plain text copied to clipboard!')">Copy Plain Text</button>

  <h3>Rich Text</h3>
  <div class="email-content">{rich_html}</div>
  <button class="copy-btn" onclick="copyText(RICH, 'Rich text copied to clipboard!')">Copy Rich Text</button>

  <div>
    <button class="copy-btn" onclick="copyText(RESUME, 'Resume link copied to clipboard!')">Copy Resume Link</button>
    <button class="copy-btn" onclick="window.close()">Close</button>
  </div>

  <div class="info">
    <strong>Instructions:</strong><br>
    Plain Text: use this for web-mail compose, links are auto-detected.<br>
    Rich Text: use this for email clients that support HTML.<br>
    Resume Link: copy separately if you attach the resume by hand.
  </div>

  <script>
    const PLAIN = {plain_js};
    const RICH = {rich_js};
    const RESUME = {resume_js};
    function copyText(text, message) {
      navigator.clipboard.writeText(text).then(() => alert(message)).catch(() => {
        const area = document.createElement('textarea');
        area.value = text;
        document.body.appendChild(area);
        area.select();
        document.execCommand('copy');
        document.body.removeChild(area);
        alert(message);
      });
    }
  </script>
</body>
</html>
"#;

    fill_placeholders(
        template,
        &[
            ("{to}", html_escape(content.to)),
            ("{subject}", html_escape(content.subject)),
            ("{plain_html}", with_line_breaks(&html_escape(content.plain_text))),
            ("{rich_html}", with_line_breaks(content.html_text)),
            ("{plain_js}", js_string(content.plain_text)),
            ("{rich_js}", js_string(content.html_text)),
            ("{resume_js}", js_string(content.resume_url)),
        ],
    )
}

/// Substitutes every placeholder in one left-to-right pass. Inserted values are
/// never rescanned, so placeholder text inside a value stays literal.
fn fill_placeholders(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(plain: &str) -> String {
        render_fallback_document(&FallbackContent {
            to: "hr@acme.test",
            subject: "Application for <Backend> Engineer",
            plain_text: plain,
            html_text: "Hi<br>Resume: <a href=\"https://x\">https://x</a>",
            resume_url: "https://drive.google.com/file/d/FID1/view?usp=drive_link",
        })
    }

    #[test]
    fn test_document_shows_recipient_and_escaped_subject() {
        let html = render("Hello");
        assert!(html.contains("<strong>To:</strong> hr@acme.test"));
        assert!(html.contains("Application for &lt;Backend&gt; Engineer"));
        assert!(html.contains(r#"const RESUME = "https://drive.google.com/file/d/FID1/view?usp=drive_link";"#));
    }

    #[test]
    fn test_document_cannot_be_broken_out_of_by_body_text() {
        let html = render("</script><script>alert(1)</script>");
        assert!(!html.contains("</script><script>alert(1)"));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn test_plain_copy_keeps_line_breaks() {
        let html = render("line one\nline two");
        assert!(html.contains("line one<br>\nline two"));
        assert!(html.contains(r#"const PLAIN = "line one\nline two";"#));
    }

    #[test]
    fn test_placeholder_text_in_body_is_left_alone() {
        let html = render_fallback_document(&FallbackContent {
            to: "hr@acme.test",
            subject: "Hi {resume_js}",
            plain_text: "Portfolio: https://jane.dev/{rich_js}",
            html_text: "RICH",
            resume_url: "https://drive.google.com/file/d/FID1/view?usp=drive_link",
        });
        assert!(html.contains(r#"const PLAIN = "Portfolio: https://jane.dev/{rich_js}";"#));
        assert!(html.contains(r#"const RICH = "RICH";"#));
        assert!(html.contains("<strong>Subject:</strong> Hi {resume_js}"));
    }

    #[test]
    fn test_unknown_braces_are_copied_through() {
        let filled = fill_placeholders("a { b } {x} {y}", &[("{x}", "X".to_string())]);
        assert_eq!(filled, "a { b } X {y}");
    }
}
