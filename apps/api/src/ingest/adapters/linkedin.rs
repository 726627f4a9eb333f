//! LinkedIn adapter, built on the public guest search endpoint. Runs a
//! set of role queries across two result pages each and screens titles.

use super::{is_remote, truncate, AdapterError, SourceAdapter};
use crate::ingest::fetch::{polite_delay, HttpClient};
use crate::ingest::filter::{RelevanceFilter, SourcePolicy};
use crate::models::job::{Posting, Source};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

const SEARCH_URL: &str =
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const PAGE_SIZE: usize = 25;
const MAX_PAGES: usize = 2;
const DESCRIPTION_LIMIT: usize = 500;

pub struct LinkedInAdapter {
    queries: Vec<String>,
    page_delay_ms: u64,
}

impl Default for LinkedInAdapter {
    fn default() -> Self {
        let queries = [
            "UX Designer Orlando",
            "Product Designer",
            "UX Researcher",
            "Experience Designer",
            "Interaction Designer",
            "Concept Designer theme park",
            "Themed Entertainment Designer",
        ]
        .iter()
        .map(|q| q.to_string())
        .collect();
        Self {
            queries,
            page_delay_ms: 2000,
        }
    }
}

#[async_trait]
impl SourceAdapter for LinkedInAdapter {
    fn source(&self) -> Source {
        Source::Linkedin
    }

    async fn fetch_candidates(
        &self,
        http: &HttpClient,
        filter: &RelevanceFilter,
    ) -> Result<Vec<Posting>, AdapterError> {
        let mut postings = Vec::new();

        for query in &self.queries {
            for page in 0..MAX_PAGES {
                let url = search_url(query, page * PAGE_SIZE)?;
                let html = match http.get_text(url.as_str()).await {
                    Ok(html) => html,
                    Err(err) => {
                        warn!(query, page, %err, "linkedin page fetch failed, skipping query");
                        break;
                    }
                };

                let page_postings = parse_search_page(&html, filter);
                let found = page_postings.len();
                postings.extend(page_postings);

                // An empty page means the query is exhausted.
                if found == 0 {
                    break;
                }
                polite_delay(self.page_delay_ms).await;
            }
            polite_delay(self.page_delay_ms).await;
        }

        info!(count = postings.len(), "linkedin scrape finished");
        Ok(postings)
    }
}

fn search_url(query: &str, start: usize) -> Result<Url, AdapterError> {
    Url::parse_with_params(
        SEARCH_URL,
        &[
            ("keywords", query),
            ("location", "United States"),
            ("f_TPR", "r86400"),
            ("start", start.to_string().as_str()),
        ],
    )
    .map_err(|err| AdapterError::Message(format!("bad linkedin search url: {err}")))
}

fn selector(css: &str) -> Result<Selector, AdapterError> {
    Selector::parse(css).map_err(|err| AdapterError::Message(err.to_string()))
}

/// Parses one guest-search result page. Cards missing a title, company,
/// or link are skipped.
fn parse_search_page(html: &str, filter: &RelevanceFilter) -> Vec<Posting> {
    let (Ok(card), Ok(title), Ok(company), Ok(location), Ok(link)) = (
        selector(".job-search-card"),
        selector(".base-search-card__title"),
        selector(".base-search-card__subtitle"),
        selector(".job-search-card__location"),
        selector(".base-card__full-link"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut postings = Vec::new();

    for element in document.select(&card) {
        let title_text = match element.select(&title).next() {
            Some(node) => node.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        let company_text = match element.select(&company).next() {
            Some(node) => node.text().collect::<String>().trim().to_string(),
            None => continue,
        };
        let Some(href) = element
            .select(&link)
            .next()
            .and_then(|node| node.value().attr("href"))
        else {
            continue;
        };
        let location_text = element
            .select(&location)
            .next()
            .map(|node| node.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| "Not specified".to_string());

        let card_text = element.text().collect::<String>();
        let remote = is_remote(&location_text, &title_text);

        let posting = Posting {
            title: title_text,
            company: company_text,
            url: href.to_string(),
            description: Some(truncate(card_text.trim(), DESCRIPTION_LIMIT)),
            location: Some(location_text),
            remote,
            salary_range: None,
            source: Source::Linkedin,
        };

        if filter.accepts(&posting, &[], SourcePolicy::TITLE_ONLY) {
            postings.push(posting);
        }
    }

    postings
}
