pub mod async_bus;
pub mod bus;
pub mod config;
pub mod error;
pub mod logging;
pub mod token;
mod dispatch;
mod registry;

pub use async_bus::{AsyncEventBus, BoxFuture};
pub use bus::EventBus;
pub use config::{BusConfig, EmptyTopicPolicy, FailurePolicy};
pub use dispatch::HandlerResult;
pub use error::{format_error_chain, BusError, BusResult, SubscriberFailure};
pub use token::Token;
