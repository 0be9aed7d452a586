//! Event sink system for streaming workflow progress.
//!
//! Every run emits its events through an [`EventSink`]. Unlike a plain
//! observability hook, the sink is part of the run's failure model: a sink
//! that reports [`TransportError`](crate::errors::TransportError) tells the
//! orchestrator the client is gone and the run must stop.

mod channel;
mod sink;

pub use channel::ChannelEventSink;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
