use crate::config::BusConfig;
use crate::dispatch::{check_topic, Delivery, HandlerResult};
use crate::error::BusResult;
use crate::registry::SharedRegistry;
use crate::token::Token;
use std::sync::Arc;

type Handler<P> = Arc<dyn Fn(&str, &P) -> HandlerResult + Send + Sync>;

/// Synchronous topic bus. Publish calls every current subscriber of the
/// topic on the caller's thread, in the order they subscribed.
///
/// Clones share one registry.
pub struct EventBus<P> {
    registry: SharedRegistry<Handler<P>>,
    config: BusConfig,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P: 'static> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> EventBus<P> {
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            registry: SharedRegistry::default(),
            config,
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn subscribe<F>(&self, topic: &str, callback: F) -> BusResult<Token>
    where
        F: Fn(&str, &P) -> HandlerResult + Send + Sync + 'static,
    {
        check_topic(self.config.empty_topic, topic)?;
        let handler: Handler<P> = Arc::new(callback);
        let token = self.registry.lock().insert(topic, handler);
        tracing::debug!(topic, token = %token, "subscribed");
        Ok(token)
    }

    /// Returns `Ok(false)` when nobody listens on `topic`. Subscribers added
    /// or removed by a running callback only affect later publishes.
    pub fn publish(&self, topic: &str, payload: &P) -> BusResult<bool> {
        let subscribers = self.registry.lock().snapshot(topic);
        if subscribers.is_empty() {
            tracing::debug!(topic, "publish without subscribers");
            return Ok(false);
        }

        tracing::debug!(topic, subscribers = subscribers.len(), "publishing");
        let mut delivery = Delivery::new(topic, self.config.failure_policy);
        for (token, handler) in subscribers {
            delivery.record(token, handler(topic, payload))?;
        }
        delivery.finish()
    }

    /// Unknown tokens are ignored; the token is handed back either way.
    pub fn unsubscribe(&self, token: Token) -> Token {
        match self.registry.lock().remove(token) {
            Some(topic) => tracing::debug!(topic = %topic, token = %token, "unsubscribed"),
            None => tracing::debug!(token = %token, "unsubscribe of unknown token"),
        }
        token
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry.lock().count(topic)
    }

    pub fn has_subscribers(&self, topic: &str) -> bool {
        self.subscriber_count(topic) > 0
    }

    /// Every topic ever subscribed to, sorted, including emptied ones.
    pub fn topics(&self) -> Vec<String> {
        self.registry.lock().topics()
    }
}
