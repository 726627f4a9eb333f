//! Persistence layer over SQLite. All reads and writes go through
//! `JobStore`; nothing else in the crate touches the pool directly.

use sqlx::SqlitePool;
use thiserror::Error;

mod jobs;
mod materials;
mod profile;

pub use jobs::{InsertOutcome, JobListFilter};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("job {0} not found")]
    JobNotFound(i64),

    #[error("no candidate profile has been saved")]
    ProfileMissing,

    #[error("update contains no fields")]
    EmptyUpdate,
}

#[derive(Clone)]
pub struct JobStore {
    pool: SqlitePool,
}

impl JobStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
