use serde::{Deserialize, Serialize};

/// Coarse reliability label attached to an [`Answer`].
///
/// `High` marks authoritative or deterministic results (pattern replies,
/// arithmetic, encyclopedic summaries), `Medium` best-effort web results,
/// `Low` failure and no-match fallbacks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

/// A supporting source attached to an answer. `url` is absent for answers
/// with no linkable origin, such as arithmetic results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Source {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
        }
    }

    /// A source with no linkable origin.
    pub fn unlinked(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
        }
    }
}

/// The structured result of one pipeline resolution. Serializes to the
/// wire shape consumed by the transport layer, with the text under the
/// `answer` key and a lowercase confidence label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "answer")]
    pub text: String,
    pub sources: Vec<Source>,
    pub confidence: Confidence,
}

impl Answer {
    pub fn high(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources,
            confidence: Confidence::High,
        }
    }

    pub fn medium(text: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            text: text.into(),
            sources,
            confidence: Confidence::Medium,
        }
    }

    /// A failure or no-match answer. Carries no sources.
    pub fn low(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            confidence: Confidence::Low,
        }
    }
}
