//! Prompt constants for job scoring. Placeholders are filled with
//! `.replace` before the prompt is sent.

/// Scoring prompt template. Replace `{candidate_name}`, `{location}`,
/// `{skills}`, `{summary}`, `{experience}`, `{education}`, `{portfolio}`,
/// `{job_title}`, `{company}`, `{job_location}`, `{job_description}` and
/// `{boosts}` before sending.
pub const SCORE_PROMPT_TEMPLATE: &str = r#"You are helping {candidate_name} find the perfect job.

ABOUT THE CANDIDATE:
- Location: {location}
- Skills: {skills}
- Summary: {summary}
- Experience: {experience}
- Education: {education}
- Portfolio: {portfolio}

JOB:
Title: {job_title}
Company: {company}
Location: {job_location}
Description: {job_description}

Score 0-10 based on how well this job matches the candidate's profile, skills, and career goals. BE GENEROUS.

SCORING:
- 10 = Perfect match (aligns with all key skills, location, and career goals)
- 9 = Excellent match (strong alignment with skills and goals)
- 8 = Very strong match (good skill overlap and career fit)
- 7 = Good match (solid skill overlap, entry-level friendly)
- 6 = Worth considering (some skill overlap, interesting opportunity)
- 5 = Possible match (transferable skills, room to learn)
- 0 = Wrong (unpaid, irrelevant, or blacklisted)

BOOSTS:
{boosts}

Return ONLY valid JSON, no other text:
{"score": <0-10>, "reason": "<1-2 sentences>", "keywords": ["skill1", "skill2", "skill3"]}"#;

pub const BOOST_REMOTE: &str = "- Remote work: +0.5";
pub const BOOST_ENTRY_LEVEL: &str = "- Entry-level/internship (if recent grad): +0.5";

/// Filled with the configured location. Replace `{preferred_location}`.
pub const BOOST_PREFERRED_LOCATION_TEMPLATE: &str = "- {preferred_location} jobs: +0.5";
