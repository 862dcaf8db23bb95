use thiserror::Error;

/// Failures reported by the external providers. `Ambiguous` and
/// `NotFound` are definitive verdicts from the summary provider; the
/// remaining variants cover transport and contract failures from either
/// provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Topic is ambiguous ({} candidate pages)", candidates.len())]
    Ambiguous { candidates: Vec<String> },

    #[error("No page found for topic")]
    NotFound,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
