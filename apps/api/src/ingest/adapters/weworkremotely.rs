//! We Work Remotely adapter, from the remote-design-jobs RSS feed. The
//! company name rides in the Dublin Core creator field.

use super::{truncate, AdapterError, SourceAdapter};
use crate::ingest::fetch::HttpClient;
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use rss::Channel;
use scraper::Html;
use tracing::info;

const FEED_URL: &str = "https://weworkremotely.com/categories/remote-design-jobs.rss";
const DESCRIPTION_LIMIT: usize = 2000;

pub struct WeWorkRemotelyAdapter;

#[async_trait]
impl SourceAdapter for WeWorkRemotelyAdapter {
    fn source(&self) -> Source {
        Source::Weworkremotely
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let bytes = http.get_bytes(FEED_URL).await?;
        let channel = Channel::read_from(&bytes[..])?;
        let postings = screen_feed(&channel, filter);
        info!(count = postings.len(), "weworkremotely scrape finished");
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
            let company = item
                .dublin_core_ext()
                .and_then(|ext| ext.creators().first())
                .map(|creator| creator.trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let description = item
                .description()
                .map(|html| truncate(strip_html(html).trim(), DESCRIPTION_LIMIT));

            let posting = Posting {
                title,
                company,
                url: link,
                description,
                location: Some("Remote".to_string()),
                remote: true,
                salary_range: None,
                source: Source::Weworkremotely,
            };
            filter
                .accepts(&posting, &[], SourcePolicy::TITLE_ONLY)
                .then_some(posting)
        })
        .collect()
}

/// Feed descriptions arrive as HTML.
pub(crate) fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment.root_element().text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::filter::FilterRules;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
          <channel>
            <title>Remote Design Jobs</title>
            <link>https://weworkremotely.com</link>
            <description>design feed</description>
            <item>
              <title>Acme Studios: Senior Product Designer</title>
              <link>https://weworkremotely.com/remote-jobs/1</link>
              <dc:creator>Acme Studios</dc:creator>
              <description>&lt;p&gt;Design core product flows.&lt;/p&gt;</description>
            </item>
            <item>
              <title>Widget Co: Frontend Developer</title>
              <link>https://weworkremotely.com/remote-jobs/2</link>
              <dc:creator>Widget Co</dc:creator>
              <description>react work</description>
            </item>
          </channel>
        </rss>"#;

    #[test]
    fn screens_feed_items() {
        let channel = Channel::read_from(FEED.as_bytes()).unwrap();
        let filter = RelevanceFilter::new(FilterRules::default());
        let postings = screen_feed(&channel, &filter);

        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].company, "Acme Studios");
        assert_eq!(postings[0].description.as_deref(), Some("Design core product flows."));
        assert!(postings[0].remote);
    }

    #[test]
    fn strips_markup_from_descriptions() {
        assert_eq!(strip_html("<p>Hello <b>there</b></p>"), "Hello there");
    }
}
