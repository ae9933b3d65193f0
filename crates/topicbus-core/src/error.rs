use crate::token::Token;
use thiserror::Error;

pub type BusResult<T> = Result<T, BusError>;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid topic: {0:?}")]
    InvalidTopic(String),
    #[error("subscriber {token} on {topic} failed")]
    SubscriberFailed {
        topic: String,
        token: Token,
        #[source]
        source: anyhow::Error,
    },
    #[error(
        "{} subscriber(s) on {topic} failed (tokens {})",
        .failures.len(),
        failed_tokens(.failures)
    )]
    SubscribersFailed {
        topic: String,
        failures: Vec<SubscriberFailure>,
    },
}

/// One subscriber error collected while publishing under the isolate policy.
#[derive(Debug)]
pub struct SubscriberFailure {
    pub token: Token,
    pub error: anyhow::Error,
}

fn failed_tokens(failures: &[SubscriberFailure]) -> String {
    failures
        .iter()
        .map(|f| f.token.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders an error followed by every `caused by` entry of its source chain.
pub fn format_error_chain(error: &anyhow::Error) -> String {
    let mut chain = vec![error.to_string()];
    for cause in error.chain().skip(1) {
        chain.push(format!("  caused by: {}", cause));
    }
    chain.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn invalid_topic_displays_quoted_name() {
        let error = BusError::InvalidTopic(String::new());
        assert_eq!(error.to_string(), "invalid topic: \"\"");
    }

    #[test]
    fn subscriber_failed_names_topic_and_token() {
        let error = BusError::SubscriberFailed {
            topic: "/login".to_string(),
            token: Token::from_raw(7),
            source: anyhow!("boom"),
        };
        assert_eq!(error.to_string(), "subscriber 7 on /login failed");
    }

    #[test]
    fn subscriber_failed_chain_prints_cause_once() {
        let error: anyhow::Error = BusError::SubscriberFailed {
            topic: "/t".to_string(),
            token: Token::from_raw(1),
            source: anyhow!("root cause"),
        }
        .into();
        assert_eq!(
            format_error_chain(&error),
            "subscriber 1 on /t failed\n  caused by: root cause"
        );
    }

    #[test]
    fn subscriber_failed_exposes_source() {
        use std::error::Error as _;

        let error = BusError::SubscriberFailed {
            topic: "/login".to_string(),
            token: Token::from_raw(1),
            source: anyhow!("inner"),
        };
        let source = error.source().expect("source");
        assert_eq!(source.to_string(), "inner");
    }

    #[test]
    fn subscribers_failed_counts_failures() {
        let error = BusError::SubscribersFailed {
            topic: "/t".to_string(),
            failures: vec![
                SubscriberFailure { token: Token::from_raw(1), error: anyhow!("a") },
                SubscriberFailure { token: Token::from_raw(2), error: anyhow!("b") },
            ],
        };
        assert_eq!(error.to_string(), "2 subscriber(s) on /t failed (tokens 1, 2)");
    }

    #[test]
    fn error_chain_lists_every_cause() {
        let error = anyhow!("root").context("middle").context("top");
        let chain = format_error_chain(&error);
        assert_eq!(chain, "top\n  caused by: middle\n  caused by: root");
    }

    #[test]
    fn serde_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: BusError = parse.into();
        assert!(matches!(error, BusError::Serde(_)));
    }
}
