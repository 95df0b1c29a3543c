// Prompt templates for the Drafting module.
// Placeholders are `{name}` tokens replaced in build_body_prompt / build_subject_prompt.

use crate::drafting::JobRequest;
use crate::models::profile::{Profile, ResumeReference};

/// Used when the caller leaves the job title empty.
pub const TITLE_PLACEHOLDER: &str = "Software Position";

/// How much of the description the subject prompt sees.
const SUBJECT_DESCRIPTION_CHARS: usize = 200;

/// Body prompt template.
/// Replace: {job_title}, {recruiter_email}, {job_description}, {candidate}, {resume_section}
pub const BODY_PROMPT_TEMPLATE: &str = r#"
Generate a professional job application email for the following position:

JOB TITLE: {job_title}
RECRUITER EMAIL: {recruiter_email}

JOB DESCRIPTION:
{job_description}

CANDIDATE INFORMATION:
{candidate}
{resume_section}
Please create a professional email that:
1. Addresses the recruiter professionally - if a recruiter name is mentioned in the job description, use "Dear [Name]". If no name is found, use "Dear Hiring Manager"
2. Opens with a strong, specific hook that shows enthusiasm for the company/role
3. Demonstrates understanding of the company and role requirements
4. Highlights 2-3 specific achievements or experiences that directly relate to the job requirements
5. Shows how your skills solve their specific problems or contribute to their goals
6. Includes a clear call to action (requesting an interview or next steps)
7. Naturally mentions the resume (either as a link or attachment)
8. Ends with a professional signature including name, email, and phone
9. Keep the tone confident but humble, professional but enthusiastic
10. Use specific examples and metrics when possible
11. Show genuine interest in the company's mission/technology
12. If the job description names the role, use that exact title rather than the JOB TITLE above

Make the email personalized and specific to this job opportunity. Keep it concise (150-200 words) but compelling. Focus on value you can bring to the company, not just listing your skills.
"#;

/// Replace: {drive_link}
pub const DRIVE_RESUME_SECTION: &str = r#"
RESUME: The candidate has provided a Google Drive link to their resume: {drive_link}
Please naturally mention this resume link in the email, such as "You can find my detailed resume at the link below" or "I've attached my resume for your review".
The resume link will be added as a clickable link after the email content, so you don't need to include the actual URL in your response.
"#;

/// Replace: {file_name}
pub const UPLOADED_RESUME_SECTION: &str = r#"
RESUME: The candidate has uploaded a resume file named "{file_name}" which will be attached to this email.
Please mention that the resume is attached to the email.
"#;

/// Subject prompt template.
/// Replace: {job_title}, {candidate_name}, {description_excerpt}
pub const SUBJECT_PROMPT_TEMPLATE: &str = r#"
Generate a professional email subject line for a job application.

JOB TITLE: {job_title}
CANDIDATE NAME: {candidate_name}
JOB DESCRIPTION: {description_excerpt}...

Requirements for the subject line:
1. Use the format: "Application for [Position Title] at [Company Name]"
2. Extract the company name from the job description if mentioned
3. Use the exact job title from the job description
4. Keep it professional and concise (under 60 characters)
5. If company name is not found, use "Application for [Position Title]"
6. Make it specific to the role and company
7. Avoid generic phrases or personal information

Examples of good subject lines:
- "Application for Software Engineer at Google"
- "Application for Data Scientist at Microsoft"
- "Application for Frontend Developer at Startup Inc"
- "Application for AI/ML Engineer at TechCorp"

Generate ONLY the subject line text, nothing else.
"#;

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

fn candidate_block(profile: &Profile) -> String {
    [
        format!("- Name: {}", profile.name),
        format!("- Email: {}", profile.email),
        format!("- Phone: {}", or_default(&profile.phone, "Not provided")),
        format!("- Experience: {}", or_default(&profile.experience, "Not specified")),
        format!("- Skills: {}", or_default(&profile.skills, "Not specified")),
        format!("- Education: {}", or_default(&profile.education, "Not specified")),
        format!("- LinkedIn: {}", or_default(&profile.linkedin, "Not provided")),
        format!("- GitHub: {}", or_default(&profile.github, "Not provided")),
        format!("- Portfolio: {}", or_default(&profile.portfolio, "Not provided")),
    ]
    .join("\n")
}

fn resume_section(profile: &Profile) -> String {
    match profile.resume_reference() {
        ResumeReference::DriveLink(link) => DRIVE_RESUME_SECTION.replace("{drive_link}", link),
        ResumeReference::Uploaded(file) => {
            UPLOADED_RESUME_SECTION.replace("{file_name}", &file.file_name)
        }
        ResumeReference::None => String::new(),
    }
}

/// Leading `max_chars` characters, never splitting a code point.
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Prompt for the email body. Pure: same inputs, same prompt.
pub fn build_body_prompt(job: &JobRequest, profile: &Profile) -> String {
    BODY_PROMPT_TEMPLATE
        .replace("{job_title}", job.title_or_placeholder())
        .replace("{recruiter_email}", job.recruiter_email.as_deref().unwrap_or(""))
        .replace("{candidate}", &candidate_block(profile))
        .replace("{resume_section}", &resume_section(profile))
        // Free text goes in last so user content is never scanned for placeholders.
        .replace("{job_description}", &job.job_description)
}

/// Prompt for the subject line.
pub fn build_subject_prompt(job: &JobRequest, profile: &Profile) -> String {
    SUBJECT_PROMPT_TEMPLATE
        .replace("{job_title}", job.title_or_placeholder())
        .replace("{candidate_name}", &profile.name)
        .replace(
            "{description_excerpt}",
            excerpt(&job.job_description, SUBJECT_DESCRIPTION_CHARS),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ResumeFile;
    use chrono::Utc;
    use uuid::Uuid;

    fn job(title: Option<&str>) -> JobRequest {
        JobRequest {
            job_title: title.map(str::to_string),
            job_description: "Acme Corp is hiring a Backend Engineer. Reach us at hr@acme.test."
                .to_string(),
            recruiter_email: Some("hr@acme.test".to_string()),
        }
    }

    fn profile() -> Profile {
        let mut p = Profile::new(Uuid::new_v4(), "Jane Doe", "jane@doe.test", "sk-test");
        p.phone = Some("+1 555 0100".to_string());
        p.skills = Some("Rust, Postgres".to_string());
        p.linkedin = Some("https://linkedin.com/in/jane".to_string());
        p
    }

    #[test]
    fn test_body_prompt_embeds_job_and_profile_fields() {
        let prompt = build_body_prompt(&job(Some("Backend Engineer")), &profile());
        assert!(prompt.contains("JOB TITLE: Backend Engineer"));
        assert!(prompt.contains("RECRUITER EMAIL: hr@acme.test"));
        assert!(prompt.contains("Acme Corp is hiring a Backend Engineer."));
        assert!(prompt.contains("- Name: Jane Doe"));
        assert!(prompt.contains("- Phone: +1 555 0100"));
        assert!(prompt.contains("- Skills: Rust, Postgres"));
        assert!(prompt.contains("- Experience: Not specified"));
        assert!(prompt.contains("- GitHub: Not provided"));
        assert!(prompt.contains("Dear Hiring Manager"));
        assert!(prompt.contains("150-200 words"));
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let prompt = build_body_prompt(&job(None), &profile());
        assert!(prompt.contains("JOB TITLE: Software Position"));
        let prompt = build_body_prompt(&job(Some("   ")), &profile());
        assert!(prompt.contains("JOB TITLE: Software Position"));
    }

    #[test]
    fn test_drive_resume_section_forbids_inline_url() {
        let mut p = profile();
        p.resume_drive_link = Some("https://drive.google.com/file/d/FID1/view".to_string());
        let prompt = build_body_prompt(&job(None), &p);
        assert!(prompt.contains("Google Drive link to their resume: https://drive.google.com/file/d/FID1/view"));
        assert!(prompt.contains("you don't need to include the actual URL"));
    }

    #[test]
    fn test_uploaded_resume_section() {
        let mut p = profile();
        p.resume_file = Some(ResumeFile {
            file_name: "jane.pdf".to_string(),
            bytes: vec![],
            uploaded_at: Utc::now(),
        });
        let prompt = build_body_prompt(&job(None), &p);
        assert!(prompt.contains(r#"resume file named "jane.pdf""#));
    }

    #[test]
    fn test_no_resume_section_without_reference() {
        let prompt = build_body_prompt(&job(None), &profile());
        assert!(!prompt.contains("RESUME:"));
    }

    #[test]
    fn test_body_prompt_is_deterministic() {
        let j = job(Some("Backend Engineer"));
        let p = profile();
        assert_eq!(build_body_prompt(&j, &p), build_body_prompt(&j, &p));
    }

    #[test]
    fn test_description_placeholders_are_not_expanded() {
        let mut j = job(None);
        j.job_description = "Literal {candidate} and {job_title} in the posting".to_string();
        let prompt = build_body_prompt(&j, &profile());
        assert!(prompt.contains("Literal {candidate} and {job_title} in the posting"));
    }

    #[test]
    fn test_subject_prompt_truncates_description() {
        let mut j = job(Some("Backend Engineer"));
        j.job_description = "é".repeat(300);
        let prompt = build_subject_prompt(&j, &profile());
        assert!(prompt.contains(&format!("JOB DESCRIPTION: {}...", "é".repeat(200))));
        assert!(!prompt.contains(&"é".repeat(201)));
        assert!(prompt.contains("CANDIDATE NAME: Jane Doe"));
        assert!(prompt.contains("under 60 characters"));
        assert!(prompt.contains("Application for [Position Title] at [Company Name]"));
    }
}
