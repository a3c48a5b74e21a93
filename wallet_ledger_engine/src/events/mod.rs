//! Events emitted by the ledger after a unit of work commits.
//!
//! Handlers only ever see committed state. Publishing an event never affects the outcome of the operation that
//! produced it.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
