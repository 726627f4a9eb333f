use super::{JobStore, StoreError};
use crate::models::job::{Job, JobStatus, JobUpdate, Posting};
use chrono::Utc;
use sqlx::error::ErrorKind;
use sqlx::QueryBuilder;

/// Result of attempting to persist a scraped posting.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    Duplicate,
}

/// Optional criteria for listing jobs. All present criteria must match.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct JobListFilter {
    pub status: Option<JobStatus>,
    pub source: Option<String>,
    pub min_score: Option<i64>,
    pub remote: Option<bool>,
    /// Substring match against title, company, and description.
    pub search: Option<String>,
    /// Sort column; anything outside the allow-list falls back to score.
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Sort columns are interpolated into SQL, so only known names pass.
fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("created_at") => "created_at",
        Some("updated_at") => "updated_at",
        Some("title") => "title",
        Some("company") => "company",
        _ => "score",
    }
}

impl JobStore {
    /// Inserts a scraped posting. A second posting with the same url is
    /// reported as `Duplicate`, not an error; this is the only dedup
    /// mechanism, keyed on the unique url column.
    pub async fn insert_posting(
        &self,
        posting: &Posting,
        normalized_url: &str,
    ) -> Result<InsertOutcome, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO jobs
                (title, company, url, normalized_url, description, location,
                 remote, salary_range, source, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.url)
        .bind(normalized_url)
        .bind(&posting.description)
        .bind(&posting.location)
        .bind(posting.remote)
        .bind(&posting.salary_range)
        .bind(posting.source.as_str())
        .bind(JobStatus::Reviewing.as_str())
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await;

        match result {
            Ok(done) => Ok(InsertOutcome::Inserted(done.last_insert_rowid())),
            Err(sqlx::Error::Database(db)) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
                Ok(InsertOutcome::Duplicate)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_job(&self, id: i64) -> Result<Job, StoreError> {
        sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::JobNotFound(id))
    }

    pub async fn list_jobs(&self, filter: &JobListFilter) -> Result<Vec<Job>, StoreError> {
        let mut query = QueryBuilder::new("SELECT * FROM jobs WHERE 1 = 1");

        if let Some(status) = &filter.status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }
        if let Some(source) = &filter.source {
            query.push(" AND source = ");
            query.push_bind(source.clone());
        }
        if let Some(min_score) = filter.min_score {
            query.push(" AND score >= ");
            query.push_bind(min_score);
        }
        if let Some(remote) = filter.remote {
            query.push(" AND remote = ");
            query.push_bind(remote);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query.push(" AND (title LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR company LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR description LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        let direction = match filter.order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };
        query.push(format!(
            " ORDER BY {} {}, id DESC",
            sort_column(filter.sort.as_deref()),
            direction
        ));
        if let Some(limit) = filter.limit {
            query.push(" LIMIT ");
            query.push_bind(limit);
            if let Some(offset) = filter.offset {
                query.push(" OFFSET ");
                query.push_bind(offset);
            }
        }

        Ok(query
            .build_query_as::<Job>()
            .fetch_all(self.pool())
            .await?)
    }

    /// Jobs the scoring batch still has to visit.
    pub async fn unscored_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(
            sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE score = 0 ORDER BY id")
                .fetch_all(self.pool())
                .await?,
        )
    }

    /// Scored jobs above the threshold that have no materials yet. Status
    /// is deliberately not consulted; the materials check alone decides.
    pub async fn jobs_needing_materials(&self, min_score: i64) -> Result<Vec<Job>, StoreError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE score >= ?
              AND NOT EXISTS (SELECT 1 FROM materials WHERE materials.job_id = jobs.id)
            ORDER BY score DESC
            "#,
        )
        .bind(min_score)
        .fetch_all(self.pool())
        .await?)
    }

    /// Applies a partial update and returns the fresh row.
    pub async fn update_job(&self, id: i64, update: &JobUpdate) -> Result<Job, StoreError> {
        if update.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut query = QueryBuilder::new("UPDATE jobs SET updated_at = ");
        query.push_bind(Utc::now());

        if let Some(status) = &update.status {
            query.push(", status = ");
            query.push_bind(status.as_str());
        }
        if let Some(score) = update.score {
            query.push(", score = ");
            query.push_bind(score);
        }
        if let Some(reason) = &update.score_reason {
            query.push(", score_reason = ");
            query.push_bind(reason.clone());
        }
        if let Some(keywords) = &update.keywords {
            query.push(", keywords = ");
            query.push_bind(keywords.join(", "));
        }
        if let Some(notes) = &update.notes {
            query.push(", notes = ");
            query.push_bind(notes.clone());
        }
        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::JobNotFound(id));
        }
        self.get_job(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Source;
    use crate::store::test_support::memory_store;

    fn posting(title: &str, url: &str) -> Posting {
        Posting {
            title: title.to_string(),
            company: "Acme Studios".to_string(),
            url: url.to_string(),
            description: Some("description".to_string()),
            location: Some("Remote".to_string()),
            remote: true,
            salary_range: None,
            source: Source::Remotive,
        }
    }

    #[tokio::test]
    async fn duplicate_url_is_a_no_op() {
        let store = memory_store().await;
        let p = posting("Product Designer", "https://example.com/job/1");

        let first = store.insert_posting(&p, "https://example.com/job/1").await.unwrap();
        assert!(matches!(first, InsertOutcome::Inserted(_)));

        let second = store.insert_posting(&p, "https://example.com/job/1").await.unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);

        let jobs = store.list_jobs(&JobListFilter::default()).await.unwrap();
        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn get_job_reports_missing_ids() {
        let store = memory_store().await;
        let err = store.get_job(42).await.unwrap_err();
        assert!(matches!(err, StoreError::JobNotFound(42)));
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = memory_store().await;
        let p = posting("Product Designer", "https://example.com/job/1");
        let InsertOutcome::Inserted(id) =
            store.insert_posting(&p, "https://example.com/job/1").await.unwrap()
        else {
            panic!("expected insert");
        };

        let update = JobUpdate {
            score: Some(8),
            score_reason: Some("strong fit".to_string()),
            keywords: Some(vec!["figma".to_string(), "research".to_string()]),
            ..Default::default()
        };
        let job = store.update_job(id, &update).await.unwrap();

        assert_eq!(job.score, 8);
        assert_eq!(job.keywords.as_deref(), Some("figma, research"));
        // Untouched fields keep their values.
        assert_eq!(job.status, "reviewing");
        assert_eq!(job.title, "Product Designer");
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let store = memory_store().await;
        let err = store.update_job(1, &JobUpdate::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyUpdate));
    }

    #[tokio::test]
    async fn unscored_and_needs_materials_queries() {
        let store = memory_store().await;
        for (i, title) in ["A", "B", "C"].iter().enumerate() {
            let url = format!("https://example.com/job/{i}");
            store
                .insert_posting(&posting(title, &url), &url)
                .await
                .unwrap();
        }

        // Score two of the three.
        store
            .update_job(1, &JobUpdate { score: Some(9), ..Default::default() })
            .await
            .unwrap();
        store
            .update_job(2, &JobUpdate { score: Some(4), ..Default::default() })
            .await
            .unwrap();

        let unscored = store.unscored_jobs().await.unwrap();
        assert_eq!(unscored.len(), 1);
        assert_eq!(unscored[0].title, "C");

        let needing = store.jobs_needing_materials(7).await.unwrap();
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].id, 1);
    }

    #[tokio::test]
    async fn needs_materials_ignores_status() {
        let store = memory_store().await;
        let url = "https://example.com/job/1";
        store
            .insert_posting(&posting("Product Designer", url), url)
            .await
            .unwrap();
        // High-scoring job whose status already moved past reviewing but
        // which still has no materials rows.
        store
            .update_job(
                1,
                &JobUpdate {
                    score: Some(9),
                    status: Some(JobStatus::Applied),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let needing = store.jobs_needing_materials(7).await.unwrap();
        assert_eq!(needing.len(), 1);
        assert_eq!(needing[0].id, 1);
    }

    #[tokio::test]
    async fn list_filters_compose() {
        let store = memory_store().await;
        let mut p = posting("Product Designer", "https://example.com/job/1");
        store.insert_posting(&p, &p.url.clone()).await.unwrap();
        p = posting("UX Researcher", "https://example.com/job/2");
        p.remote = false;
        store.insert_posting(&p, &p.url.clone()).await.unwrap();

        let filter = JobListFilter {
            remote: Some(true),
            search: Some("designer".to_string()),
            ..Default::default()
        };
        let jobs = store.list_jobs(&filter).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Product Designer");
    }

    #[tokio::test]
    async fn sorting_and_pagination() {
        let store = memory_store().await;
        for (i, title) in ["Alpha", "Beta", "Gamma"].iter().enumerate() {
            let url = format!("https://example.com/job/{i}");
            store
                .insert_posting(&posting(title, &url), &url)
                .await
                .unwrap();
        }

        let filter = JobListFilter {
            sort: Some("title".to_string()),
            order: Some("asc".to_string()),
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        };
        let jobs = store.list_jobs(&filter).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Beta");
        assert_eq!(jobs[1].title, "Gamma");

        // Unknown sort columns fall back instead of reaching the SQL.
        let filter = JobListFilter {
            sort: Some("4; DROP TABLE jobs".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list_jobs(&filter).await.unwrap().len(), 3);
    }
}
