use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::answer::{Answer, Confidence, Source};
use crate::cache::{normalize, ResponseCache};
use crate::config::ResolverConfig;
use crate::error::Error;
use crate::expr;
use crate::patterns::PatternResponder;
use crate::provider::search::SearchProvider;
use crate::provider::summary::SummaryProvider;
use crate::provider::types::ProviderError;
use crate::rate_limit::RateLimiter;

pub const EMPTY_QUERY_TEXT: &str = "Please provide a question.";
pub const AMBIGUOUS_TEXT: &str = "Your query is ambiguous. Please be more specific.";
pub const NOT_FOUND_TEXT: &str = "Sorry, I couldn't find any results for your query.";
pub const PROVIDER_FAILURE_TEXT: &str = "Something went wrong.";
pub const GENERIC_TEXT: &str = "Sorry, I couldn't find reliable information for that topic.";

const MATH_SOURCE_TITLE: &str = "Math Calculation";

/// The resolution pipeline. Owns its rate limiter, cache and pattern
/// responder; the external providers are injected so callers and tests
/// control what the network-facing stages talk to.
///
/// Stages run in a fixed order per request: rate check, empty-query
/// short-circuit, cache check, pattern check, math check, knowledge
/// lookup, web fallback, generic answer. Only the answers produced by
/// the last three stages are written back to the cache; pattern and
/// math answers are cheap to recompute and bypass it.
pub struct Resolver {
    limiter: RateLimiter,
    cache: ResponseCache,
    patterns: PatternResponder,
    summary: Arc<dyn SummaryProvider>,
    search: Option<Arc<dyn SearchProvider>>,
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(
        config: ResolverConfig,
        patterns: PatternResponder,
        summary: Arc<dyn SummaryProvider>,
        search: Option<Arc<dyn SearchProvider>>,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(config.rate_limit.max_requests, config.rate_limit.window),
            cache: ResponseCache::new(config.cache.freshness),
            patterns,
            summary,
            search,
            config,
        }
    }

    /// Resolves one raw message for `client_id`. The only error a caller
    /// sees is [`Error::RateLimited`]; every other failure mode degrades
    /// to a low-confidence [`Answer`].
    #[tracing::instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn resolve(&self, raw_message: &str, client_id: &str) -> Result<Answer, Error> {
        if !self.limiter.admit(client_id) {
            warn!(client_id, "rate limit exceeded");
            return Err(Error::RateLimited);
        }

        let query = raw_message.trim();
        if query.is_empty() {
            return Ok(Answer::low(EMPTY_QUERY_TEXT));
        }

        if let Some(answer) = self.cache.lookup(query) {
            return Ok(answer);
        }

        if let Some(reply) = self.patterns.find_reply(&normalize(query)) {
            debug!("pattern reply");
            return Ok(Answer::high(reply, Vec::new()));
        }

        if expr::is_expression(query) {
            return Ok(self.math_answer(query));
        }

        let knowledge = self.knowledge_answer(query).await;
        let answer = match knowledge.confidence {
            // a low-confidence lookup counts as "no result": the web
            // fallback runs before its text is surfaced, and the generic
            // apology terminates the chain when no stage produced text
            Confidence::Low => match self.web_fallback(query).await {
                Some(web) => web,
                None if knowledge.text.is_empty() => Answer::low(GENERIC_TEXT),
                None => knowledge,
            },
            _ => knowledge,
        };

        self.cache.store(query, &answer);
        Ok(answer)
    }

    /// Arithmetic answers echo the query with its original casing and
    /// carry an unlinked source on success.
    fn math_answer(&self, query: &str) -> Answer {
        let result = expr::evaluate(query);
        if result.starts_with("Error") || result.starts_with("Invalid") {
            return Answer::low(result);
        }
        Answer::high(
            format!("The result of {} is *{}*.", query, result),
            vec![Source::unlinked(MATH_SOURCE_TITLE)],
        )
    }

    /// The knowledge lookup always yields an answer; failure modes map
    /// onto fixed low-confidence texts rather than propagating.
    async fn knowledge_answer(&self, query: &str) -> Answer {
        match self
            .summary
            .summarize(query, self.config.summary.sentences)
            .await
        {
            Ok(summary) => {
                debug!(title = %summary.title, "knowledge lookup succeeded");
                Answer::high(summary.text, vec![Source::new(summary.title, summary.url)])
            }
            Err(ProviderError::Ambiguous { candidates }) => {
                debug!(?candidates, "ambiguous topic");
                Answer::low(AMBIGUOUS_TEXT)
            }
            Err(ProviderError::NotFound) => {
                debug!("topic not found");
                Answer::low(NOT_FOUND_TEXT)
            }
            Err(err) => {
                warn!(%err, "knowledge lookup failed");
                Answer::low(PROVIDER_FAILURE_TEXT)
            }
        }
    }

    /// Best-effort web search. Disabled without credentials; failures
    /// and empty result sets are swallowed so the pipeline falls through.
    async fn web_fallback(&self, query: &str) -> Option<Answer> {
        let provider = self.search.as_ref()?;
        match provider
            .search(query, self.config.search.max_results)
            .await
        {
            Ok(hits) if !hits.is_empty() => {
                let text = hits[0].snippet.clone();
                let sources = hits
                    .iter()
                    .take(self.config.search.max_results)
                    .map(|hit| Source::new(&hit.title, &hit.link))
                    .collect();
                Some(Answer::medium(text, sources))
            }
            Ok(_) => {
                debug!("web search returned no items");
                None
            }
            Err(err) => {
                warn!(%err, "web search failed");
                None
            }
        }
    }
}
