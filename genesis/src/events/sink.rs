//! Event sink trait and local implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

use crate::core::WorkflowEvent;
use crate::errors::TransportError;

/// Trait for sinks that deliver workflow events to a client.
///
/// Implementations must preserve emission order for events of one run. An
/// `Err` return means the client can no longer be reached; the orchestrator
/// treats it as a severed connection and stops the run.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Delivers one event, completing once the event has been accepted for
    /// ordered delivery.
    async fn emit(&self, event: WorkflowEvent) -> Result<(), TransportError>;
}

/// A no-op event sink that discards all events.
///
/// Used when running the pipeline without a connected client.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: WorkflowEvent) -> Result<(), TransportError> {
        Ok(())
    }
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub const fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: WorkflowEvent) -> Result<(), TransportError> {
        if self.level == Level::DEBUG {
            debug!(kind = event.kind(), event = ?event, "workflow event");
        } else {
            info!(kind = event.kind(), event = ?event, "workflow event");
        }
        Ok(())
    }
}

/// An event sink that collects events in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<WorkflowEvent>>,
}

impl CollectingEventSink {
    /// Creates a new empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all collected events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns whether no events were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: WorkflowEvent) -> Result<(), TransportError> {
        self.events.write().push(event);
        Ok(())
    }
}
