//! Channel-backed event sink binding a run to one client connection.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use super::EventSink;
use crate::core::WorkflowEvent;
use crate::errors::TransportError;

/// An event sink that forwards events over a bounded mpsc channel.
///
/// The receiving half belongs to the connection writer (e.g. a websocket
/// task). The channel preserves emission order; `emit` awaits capacity, so a
/// slow client applies backpressure to the run instead of reordering or
/// dropping events. A closed channel means the client is gone and surfaces
/// as [`TransportError::Closed`].
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::Sender<WorkflowEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver for the connection writer.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Wraps an existing sender.
    #[must_use]
    pub const fn from_sender(tx: mpsc::Sender<WorkflowEvent>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: WorkflowEvent) -> Result<(), TransportError> {
        self.tx.send(event).await.map_err(|err| {
            debug!(kind = err.0.kind(), "event channel closed, dropping event");
            TransportError::Closed
        })
    }
}
