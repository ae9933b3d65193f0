pub mod event;
pub mod script;
pub mod sink;

pub use event::BusEvent;
pub use script::{EventScript, PlayReport};
pub use sink::{subscribe_typed, EventSink, JsonBus, JsonHandler};
