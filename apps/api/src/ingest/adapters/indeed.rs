//! Indeed adapter, via the RSS search endpoint. Queries are already
//! role-scoped, so only the hard filters run on the results. Feed titles
//! pack "Title - Company - Location" into one string.

use super::{is_remote, AdapterError, SourceAdapter};
use crate::ingest::fetch::{polite_delay, HttpClient};
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use rss::Channel;
use tracing::{info, warn};
use url::Url;

const FEED_URL: &str = "https://www.indeed.com/rss";

pub struct IndeedAdapter {
    searches: Vec<(String, String)>,
    search_delay_ms: u64,
}

impl Default for IndeedAdapter {
    fn default() -> Self {
        let searches = [
            ("UX designer", "Remote"),
            ("Experience designer", "Orlando, FL"),
            ("Product designer", "Remote"),
            ("Themed entertainment", ""),
        ]
        .iter()
        .map(|(q, l)| (q.to_string(), l.to_string()))
        .collect();
        Self {
            searches,
            search_delay_ms: 1000,
        }
    }
}

#[async_trait]
impl SourceAdapter for IndeedAdapter {
    fn source(&self) -> Source {
        Source::Indeed
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let mut postings = Vec::new();

        for (query, location) in &self.searches {
            let url = feed_url(query, location)?;
            match http.get_bytes(url.as_str()).await {
                Ok(bytes) => match Channel::read_from(&bytes[..]) {
                    Ok(channel) => postings.extend(screen_feed(&channel, location, filter)),
                    Err(err) => warn!(query, %err, "indeed feed parse failed, skipping search"),
                },
                Err(err) => warn!(query, %err, "indeed feed fetch failed, skipping search"),
            }
            polite_delay(self.search_delay_ms).await;
        }

        info!(count = postings.len(), "indeed scrape finished");
        Ok(postings)
    }
}

fn feed_url(query: &str, location: &str) -> Result<Url, AdapterError> {
    Url::parse_with_params(FEED_URL, &[("q", query), ("l", location)])
        .map_err(|err| AdapterError::Message(format!("bad indeed feed url: {err}")))
}

fn screen_feed(channel: &Channel, fallback_location: &str, filter: &RelevanceFilter) -> Vec<Posting> {
    channel
        .items()
        .iter()
        .filter_map(|item| {
            let raw_title = item.title()?;
            let link = item.link()?.to_string();
            let (title, company, location) = split_title(raw_title, fallback_location);
            let description = item.description().map(|d| d.trim().to_string());
            let remote = is_remote(&location, &title);

            let posting = Posting {
                title,
                company,
                url: link,
                description,
                location: Some(location),
                remote,
                salary_range: None,
                source: Source::Indeed,
            };
            filter
                .accepts(&posting, &[], SourcePolicy::HARD_FILTERS_ONLY)
                .then_some(posting)
        })
        .collect()
}

fn split_title(raw: &str, fallback_location: &str) -> (String, String, String) {
    let mut parts = raw.splitn(3, " - ");
    let title = parts.next().unwrap_or(raw).trim().to_string();
    let company = parts
        .next()
        .map(|p| p.trim().to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let location = parts
        .next()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| {
            if fallback_location.is_empty() {
                "Not specified".to_string()
            } else {
                fallback_location.to_string()
            }
        });
    (title, company, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::filter::FilterRules;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0">
          <channel>
            <title>ux designer jobs</title>
            <link>https://www.indeed.com</link>
            <description>search feed</description>
            <item>
              <title>UX Designer - Acme Studios - Orlando, FL</title>
              <link>https://www.indeed.com/viewjob?jk=1</link>
              <description>Design work</description>
            </item>
            <item>
              <title>UX Designer - Tesla - Austin, TX</title>
              <link>https://www.indeed.com/viewjob?jk=2</link>
            </item>
          </channel>
        </rss>"#;

    #[test]
    fn splits_packed_titles() {
        let (title, company, location) = split_title("UX Designer - Acme Studios - Orlando, FL", "Remote");
        assert_eq!(title, "UX Designer");
        assert_eq!(company, "Acme Studios");
        assert_eq!(location, "Orlando, FL");

        let (title, company, location) = split_title("UX Designer", "Remote");
        assert_eq!(title, "UX Designer");
        assert_eq!(company, "Unknown");
        assert_eq!(location, "Remote");
    }

    #[test]
    fn hard_filters_still_apply() {
        let channel = Channel::read_from(FEED.as_bytes()).unwrap();
        let filter = RelevanceFilter::new(FilterRules::default());
        let postings = screen_feed(&channel, "Remote", &filter);

        // The blacklisted company is dropped even without title screening.
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].company, "Acme Studios");
    }
}
