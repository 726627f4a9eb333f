use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single candidate profile; the store keeps exactly one row (id = 1).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: Option<String>,
    pub portfolio_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Stand-in used before the owner has saved a profile, so scoring
    /// still produces something rather than failing the batch.
    pub fn placeholder() -> Self {
        Self {
            id: 1,
            name: "the candidate".to_string(),
            email: None,
            phone: None,
            location: None,
            summary: "Not specified".to_string(),
            skills: "Not specified".to_string(),
            experience: "Not specified".to_string(),
            education: None,
            portfolio_url: None,
            updated_at: Utc::now(),
        }
    }
}

/// Payload for creating or replacing the profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: String,
    pub skills: String,
    pub experience: String,
    pub education: Option<String>,
    pub portfolio_url: Option<String>,
}

/// A portfolio project referenced by the materials generator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub skills: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub skills: Option<String>,
    pub url: Option<String>,
}
