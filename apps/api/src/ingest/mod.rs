//! Scraping pipeline: adapters produce screened candidates, the
//! orchestrator normalizes and persists them.

use crate::batch::CancelFlag;
use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fetch::{polite_delay, HttpClient};
use crate::ingest::filter::RelevanceFilter;
use crate::store::{InsertOutcome, JobStore, StoreError};
use serde::Serialize;
use tracing::{info, warn};

pub mod adapters;
pub mod fetch;
pub mod filter;
pub mod normalize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeSummary {
    /// Candidates that passed screening, before dedup.
    pub total: usize,
    pub saved: usize,
    pub duplicates: usize,
}

pub struct Ingestor {
    adapters: Vec<Box<dyn SourceAdapter>>,
    http: HttpClient,
    filter: RelevanceFilter,
    source_delay_ms: u64,
}

impl Ingestor {
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        http: HttpClient,
        filter: RelevanceFilter,
        source_delay_ms: u64,
    ) -> Self {
        Self {
            adapters,
            http,
            filter,
            source_delay_ms,
        }
    }

    /// Runs every adapter in sequence and persists what they return.
    ///
    /// Adapters run one at a time on purpose: the politeness delays only
    /// mean something when calls are not concurrent. A failing adapter
    /// yields zero candidates and the run continues; the summary is
    /// always returned.
    pub async fn scrape_all(
        &self,
        store: &JobStore,
        cancel: &CancelFlag,
    ) -> Result<ScrapeSummary, StoreError> {
        let mut candidates = Vec::new();

        for adapter in &self.adapters {
            if cancel.is_cancelled() {
                info!("scrape cancelled before {}", adapter.source());
                break;
            }
            match adapter.fetch_candidates(&self.http, &self.filter).await {
                Ok(postings) => candidates.extend(postings),
                Err(err) => {
                    warn!(source = %adapter.source(), %err, "adapter failed, continuing");
                }
            }
            polite_delay(self.source_delay_ms).await;
        }

        let mut summary = ScrapeSummary {
            total: candidates.len(),
            ..Default::default()
        };

        for posting in &candidates {
            let normalized = normalize::normalize_url(&posting.url);
            match store.insert_posting(posting, &normalized).await? {
                InsertOutcome::Inserted(_) => summary.saved += 1,
                InsertOutcome::Duplicate => summary.duplicates += 1,
            }
        }

        info!(
            total = summary.total,
            saved = summary.saved,
            duplicates = summary.duplicates,
            "scrape complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::adapters::AdapterError;
    use crate::ingest::filter::FilterRules;
    use crate::models::job::{Posting, Source};
    use crate::store::test_support::memory_store;
    use async_trait::async_trait;

    struct CannedAdapter {
        postings: Vec<Posting>,
    }

    #[async_trait]
    impl SourceAdapter for CannedAdapter {
        fn source(&self) -> Source {
            Source::Remotive
        }

        async fn fetch_candidates(
            &self,
            _http: &HttpClient,
            _filter: &RelevanceFilter,
        ) -> Result<Vec<Posting>, AdapterError> {
            Ok(self.postings.clone())
        }
    }

    struct FailingAdapter;

    #[async_trait]
    impl SourceAdapter for FailingAdapter {
        fn source(&self) -> Source {
            Source::Linkedin
        }

        async fn fetch_candidates(
            &self,
            _http: &HttpClient,
            _filter: &RelevanceFilter,
        ) -> Result<Vec<Posting>, AdapterError> {
            Err(AdapterError::Message("boom".to_string()))
        }
    }

    fn posting(url: &str) -> Posting {
        Posting {
            title: "Product Designer".to_string(),
            company: "Acme Studios".to_string(),
            url: url.to_string(),
            description: None,
            location: Some("Remote".to_string()),
            remote: true,
            salary_range: None,
            source: Source::Remotive,
        }
    }

    fn ingestor(adapters: Vec<Box<dyn SourceAdapter>>) -> Ingestor {
        Ingestor::new(
            adapters,
            HttpClient::new().unwrap(),
            RelevanceFilter::new(FilterRules::default()),
            0,
        )
    }

    #[tokio::test]
    async fn dedups_across_adapters_and_survives_failures() {
        let store = memory_store().await;
        let ingestor = ingestor(vec![
            Box::new(FailingAdapter),
            Box::new(CannedAdapter {
                postings: vec![
                    posting("https://example.com/job/1?utm_source=feed"),
                    posting("https://example.com/job/2"),
                ],
            }),
            Box::new(CannedAdapter {
                // Same url as one already saved; counted as a duplicate.
                postings: vec![posting("https://example.com/job/2")],
            }),
        ]);

        let summary = ingestor
            .scrape_all(&store, &CancelFlag::new())
            .await
            .unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.saved, 2);
        assert_eq!(summary.duplicates, 1);
    }

    #[tokio::test]
    async fn cancelled_run_skips_adapters() {
        let store = memory_store().await;
        let ingestor = ingestor(vec![Box::new(CannedAdapter {
            postings: vec![posting("https://example.com/job/1")],
        })]);

        let cancel = CancelFlag::new();
        cancel.cancel();
        let summary = ingestor.scrape_all(&store, &cancel).await.unwrap();
        assert_eq!(summary, ScrapeSummary::default());
    }
}
