//! Materials generation. Unlike scoring, failures here propagate: a
//! half-generated resume is worse than none, so the caller marks the one
//! job as failed and moves on.

use crate::ingest::adapters::truncate;
use crate::llm::json_extract::extract_json_object;
use crate::llm::{LlmError, TextGenerator};
use crate::models::job::{Job, JobStatus, JobUpdate};
use crate::models::material::MaterialKind;
use crate::models::profile::{Profile, Project};
use crate::store::{JobStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

pub mod prompts;

const MATERIALS_TEMPERATURE: f32 = 0.7;
const DESCRIPTION_PROMPT_LIMIT: usize = 1500;

#[derive(Debug, Error)]
pub enum MaterialsError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("backend reply was not usable materials JSON: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedMaterials {
    pub resume: String,
    pub cover_letter: String,
    /// Comma-separated names of the projects the backend chose to feature.
    pub projects: String,
}

/// Builds the prompt and parses the reply. No persistence.
pub async fn generate_materials(
    llm: &dyn TextGenerator,
    job: &Job,
    profile: &Profile,
    projects: &[Project],
) -> Result<GeneratedMaterials, MaterialsError> {
    let prompt = build_prompt(job, profile, projects);
    let reply = llm.generate(&prompt, MATERIALS_TEMPERATURE).await?;
    parse_materials_reply(&reply)
}

/// Generates and persists materials for one job: both records are saved
/// via upsert and the job moves to materials_ready.
pub async fn generate_for_job(
    store: &JobStore,
    llm: &dyn TextGenerator,
    job_id: i64,
) -> Result<GeneratedMaterials, MaterialsError> {
    let job = store.get_job(job_id).await?;
    let profile = store.profile_or_default().await?;
    let projects = store.list_projects().await?;

    let generated = generate_materials(llm, &job, &profile, &projects).await?;

    store
        .upsert_material(job_id, MaterialKind::Resume, &generated.resume)
        .await?;
    store
        .upsert_material(job_id, MaterialKind::CoverLetter, &generated.cover_letter)
        .await?;
    store
        .update_job(
            job_id,
            &JobUpdate {
                status: Some(JobStatus::MaterialsReady),
                ..Default::default()
            },
        )
        .await?;

    info!(job_id, "materials generated and saved");
    Ok(generated)
}

fn build_prompt(job: &Job, profile: &Profile, projects: &[Project]) -> String {
    let mut header = profile.name.clone();
    if let Some(location) = &profile.location {
        header.push_str(&format!(" | {location}"));
    }
    if let Some(email) = &profile.email {
        header.push_str(&format!(" | {email}"));
    }
    header.push('\n');
    header.push_str(&profile.summary);
    if let Some(education) = &profile.education {
        header.push('\n');
        header.push_str(education);
    }

    let projects_block = if projects.is_empty() {
        "None listed".to_string()
    } else {
        projects
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let mut block = format!("{}. {}\n   - {}", i + 1, project.name, project.description);
                if let Some(skills) = &project.skills {
                    block.push_str(&format!("\n   - Skills: {skills}"));
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let description = job.description.as_deref().unwrap_or("No description");

    prompts::MATERIALS_PROMPT_TEMPLATE
        .replace("{candidate_header}", &header)
        .replace("{skills}", &profile.skills)
        .replace("{experience}", &profile.experience)
        .replace("{projects}", &projects_block)
        .replace("{job_title}", &job.title)
        .replace("{company}", &job.company)
        .replace(
            "{job_description}",
            &truncate(description, DESCRIPTION_PROMPT_LIMIT),
        )
}

/// Both documents must be present; a reply missing either is an error,
/// never silently persisted.
fn parse_materials_reply(reply: &str) -> Result<GeneratedMaterials, MaterialsError> {
    let value = extract_json_object(reply)
        .ok_or_else(|| MaterialsError::Parse("no JSON object in reply".to_string()))?;

    let resume = non_empty_str(&value, "resume")
        .ok_or_else(|| MaterialsError::Parse("missing resume".to_string()))?;
    let cover_letter = non_empty_str(&value, "coverLetter")
        .ok_or_else(|| MaterialsError::Parse("missing coverLetter".to_string()))?;
    let projects = non_empty_str(&value, "projects").unwrap_or_default();

    Ok(GeneratedMaterials {
        resume,
        cover_letter,
        projects,
    })
}

fn non_empty_str(value: &serde_json::Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
