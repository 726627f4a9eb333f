use super::{JobStore, StoreError};
use crate::models::profile::{Profile, ProfileInput, Project, ProjectInput};
use chrono::Utc;

impl JobStore {
    /// The profile the scorer and generator read. `ProfileMissing` until
    /// one has been saved.
    pub async fn get_profile(&self) -> Result<Profile, StoreError> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE id = 1")
            .fetch_optional(self.pool())
            .await?
            .ok_or(StoreError::ProfileMissing)
    }

    /// Profile for prompt building; falls back to the placeholder so a
    /// missing profile degrades scoring instead of failing it.
    pub async fn profile_or_default(&self) -> Result<Profile, StoreError> {
        match self.get_profile().await {
            Ok(profile) => Ok(profile),
            Err(StoreError::ProfileMissing) => Ok(Profile::placeholder()),
            Err(err) => Err(err),
        }
    }

    /// Creates or replaces the single profile row.
    pub async fn upsert_profile(&self, input: &ProfileInput) -> Result<Profile, StoreError> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO profile
                (id, name, email, phone, location, summary, skills,
                 experience, education, portfolio_url, updated_at)
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.location)
        .bind(&input.summary)
        .bind(&input.skills)
        .bind(&input.experience)
        .bind(&input.education)
        .bind(&input.portfolio_url)
        .bind(Utc::now())
        .execute(self.pool())
        .await?;

        self.get_profile().await
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY id")
                .fetch_all(self.pool())
                .await?,
        )
    }

    pub async fn add_project(&self, input: &ProjectInput) -> Result<Project, StoreError> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO projects (name, description, skills, url, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.skills)
        .bind(&input.url)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(Project {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            skills: input.skills.clone(),
            url: input.url.clone(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;

    fn input(name: &str) -> ProfileInput {
        ProfileInput {
            name: name.to_string(),
            email: Some("drew@example.com".to_string()),
            phone: None,
            location: Some("Orlando, FL".to_string()),
            summary: "UX designer focused on themed entertainment".to_string(),
            skills: "Figma, user research, prototyping".to_string(),
            experience: "5 years of product design".to_string(),
            education: None,
            portfolio_url: None,
        }
    }

    #[tokio::test]
    async fn profile_is_a_singleton() {
        let store = memory_store().await;
        assert!(matches!(
            store.get_profile().await.unwrap_err(),
            StoreError::ProfileMissing
        ));

        store.upsert_profile(&input("Drew")).await.unwrap();
        let replaced = store.upsert_profile(&input("Drew Again")).await.unwrap();

        assert_eq!(replaced.id, 1);
        assert_eq!(replaced.name, "Drew Again");
    }

    #[tokio::test]
    async fn projects_persist_in_insertion_order() {
        let store = memory_store().await;
        for name in ["Museum kiosk", "Queue redesign"] {
            store
                .add_project(&ProjectInput {
                    name: name.to_string(),
                    description: "case study".to_string(),
                    skills: None,
                    url: None,
                })
                .await
                .unwrap();
        }
        let projects = store.list_projects().await.unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Museum kiosk");
    }
}
