//! Prompt constants for materials generation.

/// Materials prompt template. Replace `{candidate_header}`, `{skills}`,
/// `{experience}`, `{projects}`, `{job_title}`, `{company}` and
/// `{job_description}` before sending.
pub const MATERIALS_PROMPT_TEMPLATE: &str = r#"Create tailored resume and cover letter for this job application.

CANDIDATE:
{candidate_header}

SKILLS:
{skills}

EXPERIENCE:
{experience}

KEY PROJECTS:
{projects}

JOB POSTING:
Title: {job_title}
Company: {company}
Description: {job_description}

Create professional, tailored application materials that:
1. Highlight relevant skills and projects
2. Show genuine enthusiasm for the role
3. Demonstrate fit with company culture
4. Keep resume to 1 page worth of content
5. Make cover letter warm and personable (3-4 paragraphs)

Return ONLY valid JSON, no other text:
{
  "resume": "<full resume text, organized with clear sections>",
  "coverLetter": "<full cover letter text, 3-4 paragraphs>",
  "projects": "<comma-separated list of 2-3 most relevant projects>"
}"#;
