use crate::token::Token;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub(crate) struct Subscription<H> {
    token: Token,
    handler: H,
}

/// Topic name to subscribers, each list kept in subscribe order.
pub(crate) struct Registry<H> {
    topics: HashMap<String, Vec<Subscription<H>>>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            topics: HashMap::new(),
        }
    }
}

impl<H: Clone> Registry<H> {
    pub(crate) fn insert(&mut self, topic: &str, handler: H) -> Token {
        let token = Token::next();
        self.topics
            .entry(topic.to_string())
            .or_default()
            .push(Subscription { token, handler });
        token
    }

    /// Removes the subscription owning `token` and returns its topic.
    /// Emptied topics stay registered.
    pub(crate) fn remove(&mut self, token: Token) -> Option<String> {
        for (topic, subscribers) in self.topics.iter_mut() {
            if let Some(pos) = subscribers.iter().position(|s| s.token == token) {
                subscribers.remove(pos);
                return Some(topic.clone());
            }
        }
        None
    }

    pub(crate) fn snapshot(&self, topic: &str) -> Vec<(Token, H)> {
        self.topics
            .get(topic)
            .map(|subscribers| {
                subscribers
                    .iter()
                    .map(|s| (s.token, s.handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    pub(crate) fn topics(&self) -> Vec<String> {
        let mut names: Vec<String> = self.topics.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Cloneable handle onto one registry. The lock is only held for
/// bookkeeping, never while a subscriber runs.
pub(crate) struct SharedRegistry<H> {
    inner: Arc<Mutex<Registry<H>>>,
}

impl<H> Clone for SharedRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Default for SharedRegistry<H> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Registry::default())),
        }
    }
}

impl<H> SharedRegistry<H> {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Registry<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
