//! RemoteOK adapter. JSON API whose first array element is metadata, not
//! a listing. Structured tags participate in the positive match, with a
//! carve-out so a bare "ux" tag on a backend role does not slip through.

use super::{AdapterError, SourceAdapter};
use crate::ingest::fetch::HttpClient;
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

const API_URL: &str = "https://remoteok.com/api";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteOkItem {
    position: Option<String>,
    company: Option<String>,
    url: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    location: Option<String>,
    tags: Vec<String>,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
}

pub struct RemoteOkAdapter;

#[async_trait]
impl SourceAdapter for RemoteOkAdapter {
    fn source(&self) -> Source {
        Source::Remoteok
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let items: Vec<RemoteOkItem> = http.get_json(API_URL).await?;
        let postings = screen_items(items, filter);
        info!(count = postings.len(), "remoteok scrape finished");
        Ok(postings)
    }
}

fn screen_items(items: Vec<RemoteOkItem>, filter: &RelevanceFilter) -> Vec<Posting> {
    items
        .into_iter()
        // First element is API metadata.
        .skip(1)
        .filter_map(|item| {
            let title = item.position?;
            let company = item.company?;
            let url = match (item.url, item.slug) {
                (Some(url), _) if !url.is_empty() => url,
                (_, Some(slug)) => format!("https://remoteok.com/remote-jobs/{slug}"),
                _ => return None,
            };
            let salary_range = match (item.salary_min, item.salary_max) {
                (Some(min), Some(max)) => Some(format!("${min} - ${max}")),
                _ => None,
            };

            let posting = Posting {
                title,
                company,
                url,
                description: item.description,
                location: Some(item.location.unwrap_or_else(|| "Remote".to_string())),
                remote: true,
                salary_range,
                source: Source::Remoteok,
            };
            filter
                .accepts(&posting, &item.tags, SourcePolicy::TITLE_AND_TAGS)
                .then_some(posting)
        })
        .collect()
}
