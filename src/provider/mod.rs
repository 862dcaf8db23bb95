//! External providers the pipeline consults: an encyclopedic summary
//! provider and a general web search provider, each behind an async
//! trait so the pipeline can be exercised against mocks.

pub mod search;
pub mod summary;
pub mod types;
