use thiserror::Error;

use crate::config::ConfigError;
use crate::provider::types::ProviderError;

/// Crate-level error. The only variant the pipeline lets escape to its
/// caller is `RateLimited`; every provider failure is converted into a
/// low-confidence answer before it can reach the boundary.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
