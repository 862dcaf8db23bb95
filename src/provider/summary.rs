use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{ProviderError, ProviderResult};
use crate::config::SummaryConfig;

/// A short encyclopedic summary together with its canonical page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub title: String,
    pub url: String,
}

#[mockall::automock]
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Fetches the leading `sentences` sentences of the page matching
    /// `topic`. Fails with [`ProviderError::Ambiguous`] when the topic
    /// resolves to a disambiguation page and [`ProviderError::NotFound`]
    /// when no page exists.
    async fn summarize(&self, topic: &str, sentences: usize) -> ProviderResult<Summary>;

    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    extract: Option<String>,
    #[serde(rename = "fullurl")]
    full_url: Option<String>,
    missing: Option<serde_json::Value>,
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<String>,
}

/// Summary provider backed by the MediaWiki action API.
#[derive(Debug, Clone)]
pub struct WikipediaSummary {
    config: SummaryConfig,
    client: Client,
}

impl WikipediaSummary {
    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            config: config.clone(),
            client: Client::new(),
        }
    }

    /// Candidate titles for an ambiguous topic, via one opensearch call.
    /// A failure here degrades to an empty candidate list rather than
    /// masking the ambiguity verdict.
    async fn fetch_candidates(&self, topic: &str) -> Vec<String> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("action", "opensearch"),
                ("search", topic),
                ("limit", "5"),
                ("format", "json"),
            ])
            .send()
            .await;

        let titles: Result<(String, Vec<String>, Vec<String>, Vec<String>), _> = match response {
            Ok(response) => response.json().await,
            Err(err) => {
                warn!(%err, "candidate lookup failed");
                return Vec::new();
            }
        };
        match titles {
            Ok((_, titles, _, _)) => titles,
            Err(err) => {
                warn!(%err, "candidate lookup returned malformed body");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SummaryProvider for WikipediaSummary {
    #[tracing::instrument(skip(self))]
    async fn summarize(&self, topic: &str, sentences: usize) -> ProviderResult<Summary> {
        let sentences = sentences.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts|info|pageprops"),
                ("exsentences", sentences.as_str()),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("inprop", "url"),
                ("ppprop", "disambiguation"),
                ("titles", topic),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "summary endpoint returned {}",
                response.status()
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        match classify(body) {
            Verdict::Found(summary) => {
                debug!(title = %summary.title, "summary resolved");
                Ok(summary)
            }
            Verdict::Missing => Err(ProviderError::NotFound),
            Verdict::Disambiguation => Err(ProviderError::Ambiguous {
                candidates: self.fetch_candidates(topic).await,
            }),
            Verdict::Malformed(detail) => Err(ProviderError::InvalidResponse(detail)),
        }
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

enum Verdict {
    Found(Summary),
    Missing,
    Disambiguation,
    Malformed(String),
}

/// Maps a query response onto the provider's failure taxonomy: a missing
/// page is `NotFound`, a disambiguation page is `Ambiguous`, and a page
/// that lacks the requested fields is a contract violation.
fn classify(body: QueryResponse) -> Verdict {
    let pages = match body.query {
        Some(query) if !query.pages.is_empty() => query.pages,
        _ => return Verdict::Missing,
    };
    // titles= carries a single topic, so a single page comes back
    let Some(page) = pages.into_values().next() else {
        return Verdict::Missing;
    };
    if page.missing.is_some() {
        return Verdict::Missing;
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.disambiguation.is_some())
    {
        return Verdict::Disambiguation;
    }
    let text = match page.extract {
        Some(extract) if !extract.trim().is_empty() => extract,
        _ => return Verdict::Malformed("page has no extract".to_string()),
    };
    let Some(url) = page.full_url else {
        return Verdict::Malformed("page has no canonical url".to_string());
    };
    Verdict::Found(Summary {
        text,
        title: page.title,
        url,
    })
}
