//! Source adapters. Each adapter knows how to pull candidates from one
//! job board, applies the relevance filter before returning anything,
//! and skips malformed items instead of failing the whole fetch.

use crate::ingest::fetch::{FetchError, HttpClient};
use crate::ingest::filter::RelevanceFilter;
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use thiserror::Error;

pub mod entertainment_careers;
pub mod indeed;
pub mod linkedin;
pub mod remoteok;
pub mod remotive;
pub mod weworkremotely;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("feed parse error: {0}")]
    Feed(#[from] rss::Error),

    #[error("{0}")]
    Message(String),
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> Source;

    /// Fetches and screens candidates. Only postings that pass the
    /// relevance filter are returned.
    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError>;
}

/// The default adapter roster, in the order they are scraped.
pub fn default_adapters() -> Vec<Box<dyn SourceAdapter>> {
    vec![
        Box::new(linkedin::LinkedInAdapter::default()),
        Box::new(indeed::IndeedAdapter::default()),
        Box::new(remotive::RemotiveAdapter),
        Box::new(remoteok::RemoteOkAdapter),
        Box::new(weworkremotely::WeWorkRemotelyAdapter),
        Box::new(entertainment_careers::EntertainmentCareersAdapter),
    ]
}

/// "Remote" detection shared by adapters that do not already know.
pub(crate) fn is_remote(location: &str, description: &str) -> bool {
    let location = location.to_lowercase();
    let description = description.to_lowercase();
    location.contains("remote")
        || description.contains("remote")
        || description.contains("work from home")
}

/// Truncates on a char boundary; descriptions from feeds can be huge.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}
