use crate::config::BusConfig;
use crate::dispatch::{check_topic, Delivery, HandlerResult};
use crate::error::BusResult;
use crate::registry::SharedRegistry;
use crate::token::Token;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type AsyncHandler<P> = Arc<dyn Fn(String, Arc<P>) -> BoxFuture<HandlerResult> + Send + Sync>;

/// Topic bus with async subscribers.
///
/// Publish awaits the subscribers one after another in subscribe order and
/// resolves once the last one has finished. Nothing is spawned. Tokens come
/// from the same counter as [`crate::EventBus`].
pub struct AsyncEventBus<P> {
    registry: SharedRegistry<AsyncHandler<P>>,
    config: BusConfig,
}

impl<P> Clone for AsyncEventBus<P> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
        }
    }
}

impl<P: Send + Sync + 'static> Default for AsyncEventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Send + Sync + 'static> AsyncEventBus<P> {
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

    pub fn subscribe<F, Fut>(&self, topic: &str, callback: F) -> BusResult<Token>
    where
        F: Fn(String, Arc<P>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        check_topic(self.config.empty_topic, topic)?;
        let handler: AsyncHandler<P> =
            Arc::new(move |topic: String, payload: Arc<P>| -> BoxFuture<HandlerResult> {
                Box::pin(callback(topic, payload))
            });
        let token = self.registry.lock().insert(topic, handler);
        tracing::debug!(topic, token = %token, "subscribed async");
        Ok(token)
    }

    pub async fn publish(&self, topic: &str, payload: P) -> BusResult<bool> {
        let subscribers = self.registry.lock().snapshot(topic);
        if subscribers.is_empty() {
            tracing::debug!(topic, "publish without subscribers");
            return Ok(false);
        }

        tracing::debug!(topic, subscribers = subscribers.len(), "publishing async");
        let payload = Arc::new(payload);
        let mut delivery = Delivery::new(topic, self.config.failure_policy);
        for (token, handler) in subscribers {
            let result = handler(topic.to_string(), Arc::clone(&payload)).await;
            delivery.record(token, result)?;
        }
        delivery.finish()
    }

    pub fn unsubscribe(&self, token: Token) -> Token {
        match self.registry.lock().remove(token) {
            Some(topic) => tracing::debug!(topic = %topic, token = %token, "unsubscribed async"),
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

    pub fn topics(&self) -> Vec<String> {
        self.registry.lock().topics()
    }
}
