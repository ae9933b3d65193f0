use crate::config::{EmptyTopicPolicy, FailurePolicy};
use crate::error::{format_error_chain, BusError, BusResult, SubscriberFailure};
use crate::token::Token;

/// Result a subscriber callback reports back to publish.
pub type HandlerResult = anyhow::Result<()>;

pub(crate) fn check_topic(policy: EmptyTopicPolicy, topic: &str) -> BusResult<()> {
    if topic.is_empty() && policy == EmptyTopicPolicy::Reject {
        tracing::debug!("rejected subscription to empty topic");
        return Err(BusError::InvalidTopic(topic.to_string()));
    }
    Ok(())
}

/// Tracks one publish call's subscriber outcomes under a failure policy.
pub(crate) struct Delivery<'a> {
    topic: &'a str,
    policy: FailurePolicy,
    failures: Vec<SubscriberFailure>,
}

impl<'a> Delivery<'a> {
    pub(crate) fn new(topic: &'a str, policy: FailurePolicy) -> Self {
        Self {
            topic,
            policy,
            failures: Vec::new(),
        }
    }

    /// `Err` means publish must stop and return it.
    pub(crate) fn record(&mut self, token: Token, result: HandlerResult) -> BusResult<()> {
        let Err(error) = result else {
            return Ok(());
        };

        tracing::warn!(
            topic = self.topic,
            token = %token,
            error = %format_error_chain(&error),
            "subscriber failed"
        );

        match self.policy {
            FailurePolicy::FailFast => Err(BusError::SubscriberFailed {
                topic: self.topic.to_string(),
                token,
                source: error,
            }),
            FailurePolicy::Isolate => {
                self.failures.push(SubscriberFailure { token, error });
                Ok(())
            }
        }
    }

    pub(crate) fn finish(self) -> BusResult<bool> {
        if self.failures.is_empty() {
            return Ok(true);
        }
        Err(BusError::SubscribersFailed {
            topic: self.topic.to_string(),
            failures: self.failures,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn empty_topic_rejected_only_under_reject() {
        assert!(matches!(
            check_topic(EmptyTopicPolicy::Reject, ""),
            Err(BusError::InvalidTopic(_))
        ));
        assert!(check_topic(EmptyTopicPolicy::Allow, "").is_ok());
        assert!(check_topic(EmptyTopicPolicy::Reject, "/login").is_ok());
    }

    #[test]
    fn fail_fast_stops_on_first_error() {
        let mut delivery = Delivery::new("/t", FailurePolicy::FailFast);
        assert!(delivery.record(Token::from_raw(1), Ok(())).is_ok());

        let err = delivery
            .record(Token::from_raw(2), Err(anyhow!("nope")))
            .unwrap_err();
        match err {
            BusError::SubscriberFailed { topic, token, .. } => {
                assert_eq!(topic, "/t");
                assert_eq!(token, Token::from_raw(2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn isolate_collects_and_reports_at_finish() {
        let mut delivery = Delivery::new("/t", FailurePolicy::Isolate);
        delivery.record(Token::from_raw(1), Err(anyhow!("a"))).unwrap();
        delivery.record(Token::from_raw(2), Ok(())).unwrap();
        delivery.record(Token::from_raw(3), Err(anyhow!("c"))).unwrap();

        match delivery.finish().unwrap_err() {
            BusError::SubscribersFailed { failures, .. } => {
                let tokens: Vec<_> = failures.iter().map(|f| f.token).collect();
                assert_eq!(tokens, vec![Token::from_raw(1), Token::from_raw(3)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clean_delivery_finishes_true() {
        let mut delivery = Delivery::new("/t", FailurePolicy::Isolate);
        delivery.record(Token::from_raw(1), Ok(())).unwrap();
        assert!(delivery.finish().unwrap());
    }
}
