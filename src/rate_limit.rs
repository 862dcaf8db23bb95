use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

/// Sliding-window rate limiter keyed by client identity.
///
/// Each client owns an ordered sequence of admitted-request timestamps.
/// `admit` prunes timestamps older than the window, rejects without
/// recording when the remaining count is at the limit, and records the
/// current instant otherwise. The per-key DashMap entry guard holds
/// same-client checks mutually exclusive, so the admitted count cannot
/// race past the limit; different clients proceed independently.
pub struct RateLimiter {
    windows: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn admit(&self, client_id: &str) -> bool {
        self.admit_at(client_id, Instant::now())
    }

    fn admit_at(&self, client_id: &str, now: Instant) -> bool {
        let mut timestamps = self.windows.entry(client_id.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);
        if timestamps.len() >= self.max_requests {
            debug!(client_id, in_window = timestamps.len(), "request rejected");
            return false;
        }
        timestamps.push(now);
        true
    }
}
