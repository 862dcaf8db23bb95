use rand::Rng;
use tracing::debug;

use crate::config::ResponseTable;

/// Picks the index of the reply to use from a non-empty candidate list.
/// Injected so tests can pin the selection.
pub type ReplyChooser = dyn Fn(&[String]) -> usize + Send + Sync;

fn random_chooser(replies: &[String]) -> usize {
    rand::thread_rng().gen_range(0..replies.len())
}

/// Matches normalized queries against the static conversational intent
/// table and returns a canned reply.
///
/// Matching runs in two passes, first match wins: an exact pass where the
/// query equals a canonical phrase, then a substring pass where the query
/// merely contains one. Greetings are consulted before identity phrases
/// in both passes.
pub struct PatternResponder {
    table: ResponseTable,
    chooser: Box<ReplyChooser>,
}

impl PatternResponder {
    pub fn new(table: ResponseTable) -> Self {
        Self::with_chooser(table, Box::new(random_chooser))
    }

    pub fn with_chooser(table: ResponseTable, chooser: Box<ReplyChooser>) -> Self {
        Self { table, chooser }
    }

    /// Returns a reply for `normalized_query`, or `None` when no phrase
    /// in any category matches.
    pub fn find_reply(&self, normalized_query: &str) -> Option<String> {
        let categories = [&self.table.greetings, &self.table.identity];

        for category in categories {
            if let Some(replies) = category.get(normalized_query) {
                return self.pick(replies);
            }
        }
        for category in categories {
            for (phrase, replies) in category {
                if normalized_query.contains(phrase.as_str()) {
                    debug!(phrase, "substring pattern match");
                    return self.pick(replies);
                }
            }
        }
        None
    }

    fn pick(&self, replies: &[String]) -> Option<String> {
        if replies.is_empty() {
            return None;
        }
        let index = (self.chooser)(replies);
        replies.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn table() -> ResponseTable {
        let mut greetings = HashMap::new();
        greetings.insert(
            "hello".to_string(),
            vec!["Hi there!".to_string(), "Hello!".to_string()],
        );
        let mut identity = HashMap::new();
        identity.insert(
            "who are you".to_string(),
            vec!["I route questions to answers.".to_string()],
        );
        ResponseTable {
            greetings,
            identity,
        }
    }

    fn first_reply_responder() -> PatternResponder {
        PatternResponder::with_chooser(table(), Box::new(|_| 0))
    }

    #[test]
    fn test_exact_greeting_match() {
        let responder = first_reply_responder();
        assert_eq!(responder.find_reply("hello"), Some("Hi there!".to_string()));
    }

    #[test]
    fn test_exact_identity_match() {
        let responder = first_reply_responder();
        assert_eq!(
            responder.find_reply("who are you"),
            Some("I route questions to answers.".to_string())
        );
    }

    #[test]
    fn test_substring_match() {
        let responder = first_reply_responder();
        assert_eq!(
            responder.find_reply("well hello to you"),
            Some("Hi there!".to_string())
        );
    }

    #[test]
    fn test_greetings_win_over_identity_substring() {
        // a query containing phrases of both categories resolves to the
        // greeting, because greetings are consulted first in each pass
        let responder = first_reply_responder();
        assert_eq!(
            responder.find_reply("hello, who are you"),
            Some("Hi there!".to_string())
        );
    }

    #[test]
    fn test_no_match_returns_none() {
        let responder = first_reply_responder();
        assert_eq!(responder.find_reply("what is rust"), None);
    }

    #[test]
    fn test_chooser_is_honored() {
        let responder = PatternResponder::with_chooser(table(), Box::new(|replies| replies.len() - 1));
        assert_eq!(responder.find_reply("hello"), Some("Hello!".to_string()));
    }

    #[test]
    fn test_random_chooser_stays_in_candidates() {
        let responder = PatternResponder::new(table());
        for _ in 0..50 {
            let reply = responder.find_reply("hello").unwrap();
            assert!(["Hi there!", "Hello!"].contains(&reply.as_str()));
        }
    }
}
