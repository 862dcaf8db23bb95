use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use super::types::{ProviderError, ProviderResult};
use crate::config::{SearchConfig, SearchSecret};

/// One general web search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[mockall::automock]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Runs a bounded-timeout web search returning up to `max_results`
    /// hits. An empty result list is a valid outcome, not an error.
    async fn search(&self, query: &str, max_results: usize) -> ProviderResult<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Web search provider backed by the Google Custom Search JSON API.
#[derive(Debug, Clone)]
pub struct GoogleCustomSearch {
    config: SearchConfig,
    api_key: SecretString,
    engine_id: SecretString,
    client: Client,
}

impl GoogleCustomSearch {
    /// Fails when either credential is absent; the caller then runs with
    /// the fallback stage disabled instead of holding a dead provider.
    pub fn try_new(config: &SearchConfig, secret: &SearchSecret) -> ProviderResult<Self> {
        if secret.api_key.expose_secret().is_empty() {
            return Err(ProviderError::Authentication(
                "search api key not configured".to_string(),
            ));
        }
        if secret.engine_id.expose_secret().is_empty() {
            return Err(ProviderError::Authentication(
                "search engine id not configured".to_string(),
            ));
        }
        Ok(Self {
            config: config.clone(),
            api_key: secret.api_key.clone(),
            engine_id: secret.engine_id.clone(),
            client: Client::new(),
        })
    }
}

#[async_trait]
impl SearchProvider for GoogleCustomSearch {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str, max_results: usize) -> ProviderResult<Vec<SearchHit>> {
        let num = max_results.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("key", self.api_key.expose_secret()),
                ("cx", self.engine_id.expose_secret()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "search endpoint returned {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(e.to_string()))?;

        debug!(hits = body.items.len(), "web search completed");
        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchSecretConfig;

    #[test]
    fn test_try_new_requires_both_credentials() {
        let config = SearchConfig::default();

        let missing_key = SearchSecret::from(SearchSecretConfig {
            api_key: String::new(),
            engine_id: "cx".to_string(),
        });
        assert!(matches!(
            GoogleCustomSearch::try_new(&config, &missing_key),
            Err(ProviderError::Authentication(_))
        ));

        let missing_engine = SearchSecret::from(SearchSecretConfig {
            api_key: "key".to_string(),
            engine_id: String::new(),
        });
        assert!(matches!(
            GoogleCustomSearch::try_new(&config, &missing_engine),
            Err(ProviderError::Authentication(_))
        ));

        let complete = SearchSecret::from(SearchSecretConfig {
            api_key: "key".to_string(),
            engine_id: "cx".to_string(),
        });
        let provider = GoogleCustomSearch::try_new(&config, &complete).unwrap();
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn test_response_deserialization() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"items": [
                {"title": "First", "link": "https://a.example", "snippet": "first snippet"},
                {"title": "Second", "link": "https://b.example"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.items[0].snippet, "first snippet");
        // fields the API omits default to empty rather than failing
        assert_eq!(body.items[1].snippet, "");
    }

    #[test]
    fn test_absent_items_deserializes_empty() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.items.is_empty());
    }
}
