use super::{JobStore, StoreError};
use crate::models::material::{Material, MaterialKind};
use chrono::Utc;

impl JobStore {
    /// Saves a material, replacing any previous one of the same kind for
    /// the job. Regeneration therefore never accumulates stale copies.
    pub async fn upsert_material(
        &self,
        job_id: i64,
        kind: MaterialKind,
        content: &str,
    ) -> Result<Material, StoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM materials WHERE job_id = ? AND kind = ?")
            .bind(job_id)
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO materials (job_id, kind, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(job_id)
        .bind(kind.as_str())
        .bind(content)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Material {
            id: result.last_insert_rowid(),
            job_id,
            kind: kind.as_str().to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }

    pub async fn materials_for_job(&self, job_id: i64) -> Result<Vec<Material>, StoreError> {
        Ok(sqlx::query_as::<_, Material>(
            "SELECT * FROM materials WHERE job_id = ? ORDER BY kind",
        )
        .bind(job_id)
        .fetch_all(self.pool())
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{Posting, Source};
    use crate::store::jobs::InsertOutcome;
    use crate::store::test_support::memory_store;

    async fn seeded_job(store: &JobStore) -> i64 {
        let posting = Posting {
            title: "Product Designer".to_string(),
            company: "Acme Studios".to_string(),
            url: "https://example.com/job/1".to_string(),
            description: None,
            location: None,
            remote: false,
            salary_range: None,
            source: Source::Indeed,
        };
        match store
            .insert_posting(&posting, "https://example.com/job/1")
            .await
            .unwrap()
        {
            InsertOutcome::Inserted(id) => id,
            InsertOutcome::Duplicate => panic!("unexpected duplicate"),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_same_kind() {
        let store = memory_store().await;
        let job_id = seeded_job(&store).await;

        store
            .upsert_material(job_id, MaterialKind::Resume, "resume v1")
            .await
            .unwrap();
        store
            .upsert_material(job_id, MaterialKind::CoverLetter, "letter v1")
            .await
            .unwrap();
        store
            .upsert_material(job_id, MaterialKind::Resume, "resume v2")
            .await
            .unwrap();

        let materials = store.materials_for_job(job_id).await.unwrap();
        assert_eq!(materials.len(), 2);
        let resume = materials
            .iter()
            .find(|m| m.kind == "resume")
            .expect("resume present");
        assert_eq!(resume.content, "resume v2");
    }

    #[tokio::test]
    async fn returns_empty_for_job_without_materials() {
        let store = memory_store().await;
        let job_id = seeded_job(&store).await;
        assert!(store.materials_for_job(job_id).await.unwrap().is_empty());
    }
}
