//! Remotive adapter. Free JSON API, design category; descriptions also
//! count toward the positive match since themed-entertainment studios
//! rarely put the domain in the title.

use super::{truncate, AdapterError, SourceAdapter};
use crate::ingest::fetch::HttpClient;
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

const API_URL: &str = "https://remotive.com/api/remote-jobs?category=design";
const DESCRIPTION_LIMIT: usize = 2000;

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    #[serde(default)]
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: String,
    #[serde(default)]
    url: String,
    description: Option<String>,
    candidate_required_location: Option<String>,
    salary: Option<String>,
}

pub struct RemotiveAdapter;

#[async_trait]
impl SourceAdapter for RemotiveAdapter {
    fn source(&self) -> Source {
        Source::Remotive
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let response: RemotiveResponse = http.get_json(API_URL).await?;
        let postings = screen_jobs(response.jobs, filter);
        info!(count = postings.len(), "remotive scrape finished");
        Ok(postings)
    }
}

fn screen_jobs(jobs: Vec<RemotiveJob>, filter: &RelevanceFilter) -> Vec<Posting> {
    jobs.into_iter()
        .filter_map(|job| {
            let posting = Posting {
                title: job.title,
                company: job.company_name,
                url: job.url,
                description: job
                    .description
                    .map(|d| truncate(&d, DESCRIPTION_LIMIT)),
                location: Some(
                    job.candidate_required_location
                        .unwrap_or_else(|| "Remote".to_string()),
                ),
                remote: true,
                salary_range: job.salary.filter(|s| !s.trim().is_empty()),
                source: Source::Remotive,
            };
            filter
                .accepts(&posting, &[], SourcePolicy::TITLE_AND_DESCRIPTION)
                .then_some(posting)
        })
        .collect()
}
