//! Keyword screening applied to candidates before they are persisted.
//!
//! This is the cheap pre-scoring gate: it trades recall for precision so
//! the scoring backend is not spent on obviously irrelevant postings. The
//! substring lists live in `FilterRules`, which can be loaded from a JSON
//! file so they are tunable without a rebuild.

use crate::models::job::Posting;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterRulesError {
    #[error("failed to read filter rules from {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse filter rules from {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Curated substring lists driving the relevance filter. All matching is
/// case-insensitive substring containment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Titles must contain one of these to pass a screened source.
    pub role_keywords: Vec<String>,
    /// Titles containing any of these are rejected even after a positive
    /// match. Exclusion always wins.
    pub excluded_terms: Vec<String>,
    /// Description substrings that also count as a positive match, for
    /// sources whose policy enables description matching.
    pub description_keywords: Vec<String>,
    /// A tag matching one of these counts as a positive match...
    pub accept_tags: Vec<String>,
    /// ...unless one of these tags co-occurs with it.
    pub disqualifying_tags: Vec<String>,
    /// Company-name substrings that are never persisted.
    pub blacklisted_companies: Vec<String>,
    /// Title substrings marking unpaid roles.
    pub unpaid_title_terms: Vec<String>,
    /// Description phrases marking unpaid roles.
    pub unpaid_description_phrases: Vec<String>,
}

impl Default for FilterRules {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            role_keywords: list(&[
                "ux designer",
                "ux researcher",
                "user experience",
                "product designer",
                "interaction designer",
                "experience designer",
                "ui/ux",
                "ui ux",
                "themed entertainment",
                "theme park",
                "concept designer",
                "immersive",
                "experiential design",
            ]),
            excluded_terms: list(&[
                "engineer",
                "developer",
                "software",
                "backend",
                "frontend",
                "full stack",
                "devops",
                "data ",
                "analyst",
                "marketing",
                "sales",
                "social media",
                "graphic designer",
                "web designer",
                "visual designer",
                "motion designer",
                "content designer",
                "brand designer",
            ]),
            description_keywords: list(&["theme park", "themed entertainment"]),
            accept_tags: list(&["ux"]),
            disqualifying_tags: list(&["backend", "devops"]),
            blacklisted_companies: list(&["tesla", "dataannotation", "data annotation"]),
            unpaid_title_terms: list(&["unpaid", "volunteer"]),
            unpaid_description_phrases: list(&["unpaid internship", "volunteer position"]),
        }
    }
}

impl FilterRules {
    pub fn from_file(path: &Path) -> Result<Self, FilterRulesError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| FilterRulesError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FilterRulesError::Parse {
            path: display,
            source,
        })
    }
}

/// How a given source participates in screening. Feeds that are already
/// query-scoped (Indeed, EntertainmentCareers) skip title screening and
/// rely on the hard filters alone.
#[derive(Debug, Clone, Copy)]
pub struct SourcePolicy {
    pub screen_titles: bool,
    pub match_description: bool,
    pub use_tags: bool,
}

impl SourcePolicy {
    pub const TITLE_ONLY: Self = Self {
        screen_titles: true,
        match_description: false,
        use_tags: false,
    };

    pub const TITLE_AND_DESCRIPTION: Self = Self {
        screen_titles: true,
        match_description: true,
        use_tags: false,
    };

    pub const TITLE_AND_TAGS: Self = Self {
        screen_titles: true,
        match_description: false,
        use_tags: true,
    };

    pub const HARD_FILTERS_ONLY: Self = Self {
        screen_titles: false,
        match_description: false,
        use_tags: false,
    };
}

#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    rules: FilterRules,
}

impl RelevanceFilter {
    pub fn new(rules: FilterRules) -> Self {
        Self { rules }
    }

    /// Full accept/reject decision for a candidate. `tags` is empty for
    /// sources without structured tags.
    pub fn accepts(&self, posting: &Posting, tags: &[String], policy: SourcePolicy) -> bool {
        if policy.screen_titles && !self.matches_role(posting, tags, policy) {
            return false;
        }
        self.passes_hard_filters(posting)
    }

    /// Positive match then exclusion; exclusion wins.
    fn matches_role(&self, posting: &Posting, tags: &[String], policy: SourcePolicy) -> bool {
        let title = posting.title.to_lowercase();

        let mut relevant = contains_any(&title, &self.rules.role_keywords);

        if !relevant && policy.match_description {
            if let Some(description) = &posting.description {
                relevant = contains_any(&description.to_lowercase(), &self.rules.description_keywords);
            }
        }

        if !relevant && policy.use_tags {
            relevant = self.matches_tags(tags);
        }

        relevant && !contains_any(&title, &self.rules.excluded_terms)
    }

    fn matches_tags(&self, tags: &[String]) -> bool {
        let joined = tags.join(" ").to_lowercase();
        contains_any(&joined, &self.rules.accept_tags)
            && !contains_any(&joined, &self.rules.disqualifying_tags)
    }

    /// Source-independent rejections: incomplete data, blacklisted
    /// companies, unpaid roles.
    fn passes_hard_filters(&self, posting: &Posting) -> bool {
        if posting.title.trim().is_empty()
            || posting.company.trim().is_empty()
            || posting.url.trim().is_empty()
        {
            return false;
        }

        let company = posting.company.to_lowercase();
        if contains_any(&company, &self.rules.blacklisted_companies) {
            return false;
        }

        let title = posting.title.to_lowercase();
        if contains_any(&title, &self.rules.unpaid_title_terms) {
            return false;
        }

        if let Some(description) = &posting.description {
            if contains_any(
                &description.to_lowercase(),
                &self.rules.unpaid_description_phrases,
            ) {
                return false;
            }
        }

        true
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::Source;

    fn posting(title: &str, company: &str) -> Posting {
        Posting {
            title: title.to_string(),
            company: company.to_string(),
            url: "https://example.com/job/1".to_string(),
            description: None,
            location: None,
            remote: false,
            salary_range: None,
            source: Source::Linkedin,
        }
    }

    fn filter() -> RelevanceFilter {
        RelevanceFilter::new(FilterRules::default())
    }

    #[test]
    fn accepts_matching_role() {
        let p = posting("Senior Product Designer", "Acme Studios");
        assert!(filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn exclusion_overrides_inclusion() {
        // "ux" matches, "engineer" excludes; exclusion wins.
        let p = posting("Senior UX Engineer", "Acme Studios");
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn rejects_unrelated_titles() {
        let p = posting("Staff Accountant", "Acme Studios");
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn rejects_blacklisted_company() {
        let p = posting("Product Designer", "Tesla Inc");
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
        // Blacklist applies even when titles are not screened.
        assert!(!filter().accepts(&p, &[], SourcePolicy::HARD_FILTERS_ONLY));
    }

    #[test]
    fn rejects_unpaid_roles() {
        let p = posting("Volunteer UX Designer", "Acme Studios");
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));

        let mut p = posting("UX Designer", "Acme Studios");
        p.description = Some("This is an unpaid internship for students".to_string());
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn rejects_missing_fields() {
        let p = posting("", "Acme Studios");
        assert!(!filter().accepts(&p, &[], SourcePolicy::HARD_FILTERS_ONLY));
        let p = posting("Product Designer", "  ");
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn tag_match_with_carve_out() {
        let p = posting("Design Lead", "Acme Studios");
        let clean = vec!["ux".to_string(), "design".to_string()];
        assert!(filter().accepts(&p, &clean, SourcePolicy::TITLE_AND_TAGS));

        let disqualified = vec!["ux".to_string(), "backend".to_string()];
        assert!(!filter().accepts(&p, &disqualified, SourcePolicy::TITLE_AND_TAGS));
    }

    #[test]
    fn description_match_when_policy_allows() {
        let mut p = posting("Show Set Lead", "Acme Studios");
        p.description = Some("Design attractions for a major theme park operator".to_string());
        assert!(p.description.is_some());
        assert!(filter().accepts(&p, &[], SourcePolicy::TITLE_AND_DESCRIPTION));
        assert!(!filter().accepts(&p, &[], SourcePolicy::TITLE_ONLY));
    }

    #[test]
    fn custom_rules_round_trip_through_json() {
        let rules = FilterRules {
            role_keywords: vec!["archivist".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&rules).unwrap();
        let back: FilterRules = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role_keywords, vec!["archivist".to_string()]);
    }
}
