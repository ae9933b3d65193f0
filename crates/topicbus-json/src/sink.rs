use crate::event::BusEvent;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use topicbus_core::{BusResult, EventBus, HandlerResult, Token};

pub type JsonBus = EventBus<Value>;

pub type JsonHandler = Box<dyn Fn(&str, &Value) -> HandlerResult + Send + Sync>;

pub trait EventSink: Send + Sync {
    /// Publishes `event`; `Ok(false)` when its topic has no subscribers.
    fn emit(&self, event: &BusEvent) -> BusResult<bool>;
    fn subscribe(&self, topic: &str, callback: JsonHandler) -> BusResult<Token>;
    fn unsubscribe(&self, token: Token) -> Token;
}

impl EventSink for JsonBus {
    fn emit(&self, event: &BusEvent) -> BusResult<bool> {
        self.publish(&event.topic, &event.payload)
    }

    fn subscribe(&self, topic: &str, callback: JsonHandler) -> BusResult<Token> {
        EventBus::subscribe(self, topic, callback)
    }

    fn unsubscribe(&self, token: Token) -> Token {
        EventBus::unsubscribe(self, token)
    }
}

/// Subscribes a callback that receives the payload decoded as `T`.
/// A payload that does not decode counts as a failure of this subscriber.
pub fn subscribe_typed<T, F, S>(sink: &S, topic: &str, callback: F) -> BusResult<Token>
where
    T: DeserializeOwned + 'static,
    F: Fn(&str, T) -> HandlerResult + Send + Sync + 'static,
    S: EventSink + ?Sized,
{
    sink.subscribe(
        topic,
        Box::new(move |topic: &str, payload: &Value| {
            let decoded = T::deserialize(payload).with_context(|| {
                format!(
                    "payload on {topic} is not a {}",
                    std::any::type_name::<T>()
                )
            })?;
            callback(topic, decoded)
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use topicbus_core::BusError;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Login {
        username: String,
    }

    #[test]
    fn emit_publishes_payload_to_topic() {
        let bus = JsonBus::new();
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let store = Arc::clone(&seen);
        EventSink::subscribe(
            &bus,
            "/login",
            Box::new(move |_, payload| {
                store.lock().unwrap().push(payload.clone());
                Ok(())
            }),
        )
        .unwrap();

        let event = BusEvent::new("/login", json!({ "username": "test" }));
        assert!(bus.emit(&event).unwrap());
        assert!(!bus.emit(&BusEvent::new("/other", Value::Null)).unwrap());
        assert_eq!(*seen.lock().unwrap(), vec![json!({ "username": "test" })]);
    }

    #[test]
    fn works_through_trait_object() {
        let bus = JsonBus::new();
        let sink: &dyn EventSink = &bus;
        let token = sink.subscribe("/t", Box::new(|_, _| Ok(()))).unwrap();

        assert!(sink.emit(&BusEvent::new("/t", Value::Null)).unwrap());
        assert_eq!(sink.unsubscribe(token), token);
        assert!(!sink.emit(&BusEvent::new("/t", Value::Null)).unwrap());
    }

    #[test]
    fn typed_subscriber_receives_decoded_payload() {
        let bus = JsonBus::new();
        let seen: Arc<Mutex<Vec<Login>>> = Arc::default();
        let store = Arc::clone(&seen);
        subscribe_typed(&bus, "/login", move |_, login: Login| {
            store.lock().unwrap().push(login);
            Ok(())
        })
        .unwrap();

        bus.publish("/login", &json!({ "username": "test" })).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Login { username: "test".to_string() }]
        );
    }

    #[test]
    fn undecodable_payload_fails_the_subscriber() {
        let bus = JsonBus::new();
        let token = subscribe_typed(&bus, "/login", |_, _: Login| Ok(())).unwrap();

        let err = bus.publish("/login", &json!({ "user": 1 })).unwrap_err();
        match err {
            BusError::SubscriberFailed { token: failed, source, .. } => {
                assert_eq!(failed, token);
                assert!(source.to_string().contains("/login"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
