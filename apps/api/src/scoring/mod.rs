//! Scoring engine. Builds a rubric prompt from a job plus the candidate
//! profile, asks the text backend, and defensively parses the reply.
//!
//! `AppState` holds an `Arc<dyn JobScorer>`, so tests and future backends
//! can swap the implementation without touching callers.

use crate::llm::json_extract::extract_json_object;
use crate::llm::TextGenerator;
use crate::models::job::Job;
use crate::models::profile::Profile;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod prompts;

const SCORING_TEMPERATURE: f32 = 0.5;
const DESCRIPTION_PROMPT_LIMIT: usize = 1000;

const FALLBACK_PARSE_REASON: &str = "Could not parse score";
const FALLBACK_ERROR_REASON: &str = "Error scoring job";

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scoring failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: i64,
    pub reason: String,
    pub keywords: Vec<String>,
}

impl ScoreResult {
    fn fallback(reason: &str) -> Self {
        Self {
            score: 5,
            reason: reason.to_string(),
            keywords: Vec::new(),
        }
    }
}

#[async_trait]
pub trait JobScorer: Send + Sync {
    async fn score(&self, job: &Job, profile: &Profile) -> Result<ScoreResult, ScoringError>;
}

/// Extra knobs fed into the prompt as boost instructions. The backend
/// applies boosts itself; nothing here does score arithmetic.
#[derive(Debug, Clone, Default)]
pub struct ScoringOptions {
    pub preferred_location: Option<String>,
}

pub struct LlmJobScorer {
    llm: Arc<dyn TextGenerator>,
    options: ScoringOptions,
}

impl LlmJobScorer {
    pub fn new(llm: Arc<dyn TextGenerator>, options: ScoringOptions) -> Self {
        Self { llm, options }
    }

    fn build_prompt(&self, job: &Job, profile: &Profile) -> String {
        let description = job
            .description
            .as_deref()
            .unwrap_or("No description");
        let description = crate::ingest::adapters::truncate(description, DESCRIPTION_PROMPT_LIMIT);

        let mut boosts = vec![prompts::BOOST_REMOTE.to_string()];
        if let Some(preferred) = &self.options.preferred_location {
            boosts.push(
                prompts::BOOST_PREFERRED_LOCATION_TEMPLATE
                    .replace("{preferred_location}", preferred),
            );
        }
        boosts.push(prompts::BOOST_ENTRY_LEVEL.to_string());

        prompts::SCORE_PROMPT_TEMPLATE
            .replace("{candidate_name}", &profile.name)
            .replace("{location}", profile.location.as_deref().unwrap_or("Not specified"))
            .replace("{skills}", &profile.skills)
            .replace("{summary}", &profile.summary)
            .replace("{experience}", &profile.experience)
            .replace("{education}", profile.education.as_deref().unwrap_or("Not specified"))
            .replace("{portfolio}", profile.portfolio_url.as_deref().unwrap_or("Not specified"))
            .replace("{job_title}", &job.title)
            .replace("{company}", &job.company)
            .replace("{job_location}", job.location.as_deref().unwrap_or("Not specified"))
            .replace("{job_description}", &description)
            .replace("{boosts}", &boosts.join("\n"))
    }
}

#[async_trait]
impl JobScorer for LlmJobScorer {
    /// Never fails: backend errors and unparseable replies both degrade
    /// to the safe default so a batch is never aborted by one reply.
    async fn score(&self, job: &Job, profile: &Profile) -> Result<ScoreResult, ScoringError> {
        let prompt = self.build_prompt(job, profile);

        let reply = match self.llm.generate(&prompt, SCORING_TEMPERATURE).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(job_id = job.id, %err, "scoring backend call failed");
                return Ok(ScoreResult::fallback(FALLBACK_ERROR_REASON));
            }
        };

        let result = parse_score_reply(&reply);
        info!(job_id = job.id, score = result.score, "job scored");
        Ok(result)
    }
}

/// Turns a raw backend reply into a validated result. Out-of-range or
/// non-numeric scores are discarded, not clamped.
fn parse_score_reply(reply: &str) -> ScoreResult {
    let Some(value) = extract_json_object(reply) else {
        return ScoreResult::fallback(FALLBACK_PARSE_REASON);
    };

    let Some(score) = value.get("score").and_then(|s| s.as_f64()) else {
        return ScoreResult::fallback(FALLBACK_PARSE_REASON);
    };
    if !(0.0..=10.0).contains(&score) {
        return ScoreResult::fallback(FALLBACK_PARSE_REASON);
    }

    let reason = value
        .get("reason")
        .and_then(|r| r.as_str())
        .unwrap_or("No reason provided")
        .to_string();
    let keywords = value
        .get("keywords")
        .and_then(|k| k.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    ScoreResult {
        score: score.round() as i64,
        reason,
        keywords,
    }
}
