use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Where a posting was scraped from. The serde form must match `as_str`,
/// which is what the source column stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Linkedin,
    Remotive,
    Weworkremotely,
    Remoteok,
    Indeed,
    EntertainmentCareers,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Linkedin => "linkedin",
            Source::Remotive => "remotive",
            Source::Weworkremotely => "weworkremotely",
            Source::Remoteok => "remoteok",
            Source::Indeed => "indeed",
            Source::EntertainmentCareers => "entertainmentcareers",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Reviewing,
    MaterialsReady,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Reviewing => "reviewing",
            JobStatus::MaterialsReady => "materials_ready",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A posting as it comes off a source adapter, before persistence.
#[derive(Debug, Clone)]
pub struct Posting {
    pub title: String,
    pub company: String,
    pub url: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub remote: bool,
    pub salary_range: Option<String>,
    pub source: Source,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub url: String,
    pub normalized_url: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub remote: bool,
    pub salary_range: Option<String>,
    pub source: String,
    /// 0 means not yet scored; assigned scores run 1..=10.
    pub score: i64,
    pub score_reason: Option<String>,
    /// Comma-joined keywords the scorer matched.
    pub keywords: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_scored(&self) -> bool {
        self.score > 0
    }
}

/// Partial update applied to a stored job. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub score: Option<i64>,
    pub score_reason: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.score.is_none()
            && self.score_reason.is_none()
            && self.keywords.is_none()
            && self.notes.is_none()
    }
}
