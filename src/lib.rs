//! # quaero: tiered conversational query answering
//!
//! quaero classifies free-text input and resolves it through a fixed
//! precedence of answer sources, returning a structured [`Answer`] with
//! supporting sources and a coarse confidence label.
//!
//! ## Resolution order
//!
//! ```text
//! rate check → cache → pattern replies → arithmetic → encyclopedic
//! summary → web search fallback → generic answer → cache store
//! ```
//!
//! - Canned conversational replies ([`patterns`]) and safe arithmetic
//!   ([`expr`]) answer deterministically with high confidence.
//! - Encyclopedic lookups and the web search fallback ([`provider`])
//!   are async trait seams; their failure modes degrade to fixed
//!   low-confidence texts instead of propagating.
//! - Answers from the networked stages are cached for a freshness
//!   window ([`cache`]), and every invocation passes a per-client
//!   sliding-window rate limiter ([`rate_limit`]).
//!
//! The transport layer in front of this crate calls
//! [`Resolver::resolve`] with the raw message and a client identity,
//! maps [`Error::RateLimited`] to its rejection status, and serializes
//! the returned [`Answer`].

pub mod answer;
pub mod cache;
pub mod config;
pub mod error;
pub mod expr;
pub mod patterns;
pub mod pipeline;
pub mod provider;
pub mod rate_limit;

// Re-exports
pub use answer::{Answer, Confidence, Source};
pub use config::{ResolverConfig, ResponseTable};
pub use error::{Error, Result};
pub use pipeline::Resolver;
