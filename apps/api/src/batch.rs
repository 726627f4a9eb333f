//! Batch runners over the job store. Items run sequentially with a fixed
//! inter-item delay so the local backend is never hammered; per-item
//! failures are counted and the batch keeps going.

use crate::ingest::fetch::polite_delay;
use crate::llm::TextGenerator;
use crate::materials;
use crate::models::job::JobUpdate;
use crate::scoring::JobScorer;
use crate::store::{JobStore, StoreError};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Cooperative cancellation, consulted between items. A cancelled batch
/// stops cleanly after the item in flight.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Rearms the flag for the next run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub processed: usize,
    pub errors: usize,
}

/// Scores every job that has no score yet, persisting each result as it
/// lands. Fetching the candidate set is the only failure that aborts.
pub async fn score_all_unscored(
    store: &JobStore,
    scorer: &dyn JobScorer,
    delay_ms: u64,
    cancel: &CancelFlag,
) -> Result<BatchOutcome, StoreError> {
    let jobs = store.unscored_jobs().await?;
    let profile = store.profile_or_default().await?;
    info!(count = jobs.len(), "scoring batch started");

    let mut outcome = BatchOutcome::default();
    for job in jobs {
        if cancel.is_cancelled() {
            info!("scoring batch cancelled");
            break;
        }

        match scorer.score(&job, &profile).await {
            Ok(result) => {
                let update = JobUpdate {
                    score: Some(result.score),
                    score_reason: Some(result.reason),
                    keywords: Some(result.keywords),
                    ..Default::default()
                };
                match store.update_job(job.id, &update).await {
                    Ok(_) => outcome.processed += 1,
                    Err(err) => {
                        warn!(job_id = job.id, %err, "failed to persist score");
                        outcome.errors += 1;
                    }
                }
            }
            Err(err) => {
                warn!(job_id = job.id, %err, "scoring failed for job");
                outcome.errors += 1;
            }
        }

        polite_delay(delay_ms).await;
    }

    info!(
        processed = outcome.processed,
        errors = outcome.errors,
        "scoring batch finished"
    );
    Ok(outcome)
}

/// Generates materials for every scored job at or above the threshold
/// that has none yet. A failed item is counted and skipped; its siblings
/// are unaffected.
pub async fn generate_all_materials(
    store: &JobStore,
    llm: &dyn TextGenerator,
    min_score: i64,
    delay_ms: u64,
    cancel: &CancelFlag,
) -> Result<BatchOutcome, StoreError> {
    let jobs = store.jobs_needing_materials(min_score).await?;
    info!(count = jobs.len(), min_score, "materials batch started");

    let mut outcome = BatchOutcome::default();
    for job in jobs {
        if cancel.is_cancelled() {
            info!("materials batch cancelled");
            break;
        }

        match materials::generate_for_job(store, llm, job.id).await {
            Ok(_) => outcome.processed += 1,
            Err(err) => {
                warn!(job_id = job.id, %err, "materials generation failed for job");
                outcome.errors += 1;
            }
        }

        polite_delay(delay_ms).await;
    }

    info!(
        processed = outcome.processed,
        errors = outcome.errors,
        "materials batch finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::models::job::{Job, Posting, Source};
    use crate::models::profile::Profile;
    use crate::scoring::{ScoreResult, ScoringError};
    use crate::store::test_support::memory_store;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    async fn seed_jobs(store: &JobStore, count: usize) {
        for i in 0..count {
            let url = format!("https://example.com/job/{i}");
            let posting = Posting {
                title: format!("Product Designer {i}"),
                company: "Acme Studios".to_string(),
                url: url.clone(),
                description: None,
                location: Some("Remote".to_string()),
                remote: true,
                salary_range: None,
                source: Source::Remotive,
            };
            store.insert_posting(&posting, &url).await.unwrap();
        }
    }

    /// Scores 8 for every call except the nth, which errors.
    struct FailsOnNth {
        calls: AtomicUsize,
        failing_call: usize,
    }

    #[async_trait]
    impl JobScorer for FailsOnNth {
        async fn score(&self, _job: &Job, _profile: &Profile) -> Result<ScoreResult, ScoringError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.failing_call {
                return Err(ScoringError::Failed("backend unavailable".to_string()));
            }
            Ok(ScoreResult {
                score: 8,
                reason: "good fit".to_string(),
                keywords: vec!["figma".to_string()],
            })
        }
    }

    struct FailsOnNthGenerator {
        calls: AtomicUsize,
        failing_call: usize,
    }

    #[async_trait]
    impl TextGenerator for FailsOnNthGenerator {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.failing_call {
                return Err(LlmError::EmptyContent);
            }
            Ok(r#"{"resume": "R", "coverLetter": "C", "projects": "P"}"#.to_string())
        }
    }

    #[tokio::test]
    async fn scoring_batch_isolates_failures() {
        let store = memory_store().await;
        seed_jobs(&store, 3).await;
        let scorer = FailsOnNth {
            calls: AtomicUsize::new(0),
            failing_call: 2,
        };

        let outcome = score_all_unscored(&store, &scorer, 0, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 2, errors: 1 });

        // Siblings of the failed item are persisted; the failed one stays
        // unscored and is picked up by the next run.
        let unscored = store.unscored_jobs().await.unwrap();
        assert_eq!(unscored.len(), 1);
        assert_eq!(unscored[0].id, 2);
        assert!(!store.get_job(2).await.unwrap().is_scored());
        assert_eq!(store.get_job(1).await.unwrap().score, 8);
        assert_eq!(store.get_job(3).await.unwrap().score, 8);
    }

    #[tokio::test]
    async fn materials_batch_isolates_failures() {
        let store = memory_store().await;
        seed_jobs(&store, 3).await;
        for id in 1..=3 {
            store
                .update_job(id, &JobUpdate { score: Some(9), ..Default::default() })
                .await
                .unwrap();
        }
        let llm = FailsOnNthGenerator {
            calls: AtomicUsize::new(0),
            failing_call: 2,
        };

        let outcome = generate_all_materials(&store, &llm, 7, 0, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 2, errors: 1 });
        assert_eq!(store.materials_for_job(1).await.unwrap().len(), 2);
        assert!(store.materials_for_job(2).await.unwrap().is_empty());
        assert_eq!(store.get_job(2).await.unwrap().status, "reviewing");
        assert_eq!(store.get_job(3).await.unwrap().status, "materials_ready");
    }

    #[tokio::test]
    async fn cancelled_batch_stops_between_items() {
        let store = memory_store().await;
        seed_jobs(&store, 3).await;
        let scorer = FailsOnNth {
            calls: AtomicUsize::new(0),
            failing_call: usize::MAX,
        };

        let cancel = CancelFlag::new();
        cancel.cancel();
        let outcome = score_all_unscored(&store, &scorer, 0, &cancel)
            .await
            .unwrap();

        assert_eq!(outcome, BatchOutcome::default());
        assert_eq!(store.unscored_jobs().await.unwrap().len(), 3);

        cancel.reset();
        let outcome = score_all_unscored(&store, &scorer, 0, &cancel)
            .await
            .unwrap();
        assert_eq!(outcome.processed, 3);
    }

    #[tokio::test]
    async fn materials_batch_respects_threshold() {
        let store = memory_store().await;
        seed_jobs(&store, 2).await;
        store
            .update_job(1, &JobUpdate { score: Some(9), ..Default::default() })
            .await
            .unwrap();
        store
            .update_job(2, &JobUpdate { score: Some(5), ..Default::default() })
            .await
            .unwrap();
        let llm = FailsOnNthGenerator {
            calls: AtomicUsize::new(0),
            failing_call: usize::MAX,
        };

        let outcome = generate_all_materials(&store, &llm, 7, 0, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(outcome, BatchOutcome { processed: 1, errors: 0 });
        assert!(store.materials_for_job(2).await.unwrap().is_empty());
    }
}
