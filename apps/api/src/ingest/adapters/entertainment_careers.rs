//! EntertainmentCareers.net adapter. The feed spans every discipline in
//! the industry, so results rely on the hard filters plus scoring rather
//! than title screening. Locations are fished out of free text since the
//! feed has no location field.

use super::{is_remote, truncate, AdapterError, SourceAdapter};
use super::weworkremotely::strip_html;
use crate::ingest::fetch::HttpClient;
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use rss::Channel;
use tracing::info;

const FEED_URL: &str = "https://www.entertainmentcareers.net/rss/all/";
const DESCRIPTION_LIMIT: usize = 2000;

/// Hub cities for themed entertainment work.
const KNOWN_LOCATIONS: &[&str] = &[
    "Orlando",
    "Kissimmee",
    "Tampa",
    "Miami",
    "Los Angeles",
    "Anaheim",
    "Glendale",
    "Florida",
    "California",
];

pub struct EntertainmentCareersAdapter;

#[async_trait]
impl SourceAdapter for EntertainmentCareersAdapter {
    fn source(&self) -> Source {
        Source::EntertainmentCareers
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let bytes = http.get_bytes(FEED_URL).await?;
        let channel = Channel::read_from(&bytes[..])?;
        let postings = screen_feed(&channel, filter);
        info!(count = postings.len(), "entertainmentcareers scrape finished");
        Ok(postings)
    }
}

fn screen_feed(channel: &Channel, filter: &RelevanceFilter) -> Vec<Posting> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let title = item.title()?.trim().to_string();
            let link = item.link()?.to_string();
            let body = item
                .content()
                .or_else(|| item.description())
                .map(strip_html)
                .unwrap_or_default();
            let company = item
                .dublin_core_ext()
                .and_then(|ext| ext.creators().first())
                .map(|creator| creator.trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let location = extract_location(&title, &body);
            let remote = is_remote(&title, &body);

            let posting = Posting {
                title,
                company,
                url: link,
                description: Some(truncate(body.trim(), DESCRIPTION_LIMIT)),
                location: Some(location),
                remote,
                salary_range: None,
                source: Source::EntertainmentCareers,
            };
            filter
                .accepts(&posting, &[], SourcePolicy::HARD_FILTERS_ONLY)
                .then_some(posting)
        })
        .collect()
}

/// Looks for a known hub city in the title first, then the body.
fn extract_location(title: &str, body: &str) -> String {
    for text in [title, body] {
        let lowered = text.to_lowercase();
        for city in KNOWN_LOCATIONS {
            if lowered.contains(&city.to_lowercase()) {
                return city.to_string();
            }
        }
    }
    "Remote".to_string()
}
