use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(s)?)
}

/// Top-level resolver configuration. Every section and field has a
/// default, so an empty JSON object is a valid full configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResolverConfig {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,
    #[serde(default = "default_rate_window", with = "duration_secs")]
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window: default_rate_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Window after which a cached answer is treated as stale. Stale
    /// entries are overwritten on the next store, never deleted.
    #[serde(default = "default_freshness", with = "duration_secs")]
    pub freshness: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness: default_freshness(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryConfig {
    #[serde(default = "default_summary_endpoint")]
    pub endpoint: String,
    /// Number of leading sentences requested per summary.
    #[serde(default = "default_sentences")]
    pub sentences: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_summary_endpoint(),
            sentences: default_sentences(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_search_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            max_results: default_max_results(),
            timeout: default_search_timeout(),
        }
    }
}

/// Web search credentials as they appear on disk. Converted into
/// [`SearchSecret`] before use so the raw strings never travel further.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchSecretConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub engine_id: String,
}

#[derive(Clone, Default)]
pub struct SearchSecret {
    pub api_key: SecretString,
    pub engine_id: SecretString,
}

impl SearchSecret {
    /// Both credentials must be present for the web search fallback to
    /// be constructed at all.
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.engine_id.expose_secret().is_empty()
    }
}

impl From<SearchSecretConfig> for SearchSecret {
    fn from(config: SearchSecretConfig) -> Self {
        Self {
            api_key: SecretString::from(config.api_key),
            engine_id: SecretString::from(config.engine_id),
        }
    }
}

/// Static conversational intent table, loaded once at process start.
/// Maps canonical phrases to candidate replies; the matching algorithm
/// lives in [`crate::patterns`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResponseTable {
    #[serde(default)]
    pub greetings: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub identity: HashMap<String, Vec<String>>,
}

impl ResponseTable {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        from_file(path)
    }
}

pub mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

fn default_max_requests() -> usize {
    10
}
fn default_rate_window() -> Duration {
    Duration::from_secs(60)
}
fn default_freshness() -> Duration {
    Duration::from_secs(600)
}
fn default_summary_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}
fn default_sentences() -> usize {
    5
}
fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}
fn default_max_results() -> usize {
    3
}
fn default_search_timeout() -> Duration {
    Duration::from_secs(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config: ResolverConfig = from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.cache.freshness, Duration::from_secs(600));
        assert_eq!(config.summary.sentences, 5);
        assert_eq!(config.search.max_results, 3);
        assert_eq!(config.search.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_partial_override() {
        let config: ResolverConfig = from_str(
            r#"{
                "rate_limit": {"max_requests": 3, "window": 10},
                "cache": {"freshness": 30}
            }"#,
        )
        .unwrap();
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window, Duration::from_secs(10));
        assert_eq!(config.cache.freshness, Duration::from_secs(30));
        assert_eq!(config.summary, SummaryConfig::default());
    }

    #[test]
    fn test_response_table_from_str() {
        let table: ResponseTable = from_str(
            r#"{
                "greetings": {"hello": ["Hi there!", "Hello!"]},
                "identity": {"who are you": ["I answer questions."]}
            }"#,
        )
        .unwrap();
        assert_eq!(table.greetings["hello"].len(), 2);
        assert_eq!(table.identity["who are you"].len(), 1);
    }

    #[test]
    fn test_search_secret_configured() {
        let secret = SearchSecret::from(SearchSecretConfig {
            api_key: "key".to_string(),
            engine_id: "cx".to_string(),
        });
        assert!(secret.is_configured());

        let missing = SearchSecret::from(SearchSecretConfig {
            api_key: "key".to_string(),
            engine_id: String::new(),
        });
        assert!(!missing.is_configured());
        assert!(!SearchSecret::default().is_configured());
    }

    #[test]
    fn test_duration_secs_round_trip() {
        let config = CacheConfig {
            freshness: Duration::from_secs(42),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"freshness":42}"#);
        let back: CacheConfig = from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
