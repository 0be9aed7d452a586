//! In-memory record store for tests and embedding.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::PersistenceGateway;
use crate::core::{AgentMessage, Artifact};
use crate::errors::PersistenceError;

/// An in-memory append-only store.
///
/// Records are kept in insertion order. Individual writes are serialized by
/// the interior lock, matching the record-level transactionality the
/// orchestrator assumes of a real store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    messages: RwLock<Vec<AgentMessage>>,
    artifacts: RwLock<Vec<Artifact>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all messages for a project, in insertion order.
    #[must_use]
    pub fn messages_for(&self, project_id: Uuid) -> Vec<AgentMessage> {
        self.messages
            .read()
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Returns all artifacts for a project, in insertion order.
    #[must_use]
    pub fn artifacts_for(&self, project_id: Uuid) -> Vec<Artifact> {
        self.artifacts
            .read()
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect()
    }

    /// Returns the total number of stored messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.read().len()
    }

    /// Returns the total number of stored artifacts.
    #[must_use]
    pub fn artifact_count(&self) -> usize {
        self.artifacts.read().len()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.messages.write().clear();
        self.artifacts.write().clear();
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryStore {
    async fn save_message(&self, message: &AgentMessage) -> Result<(), PersistenceError> {
        self.messages.write().push(message.clone());
        Ok(())
    }

    async fn save_artifact(&self, artifact: &Artifact) -> Result<(), PersistenceError> {
        self.artifacts.write().push(artifact.clone());
        Ok(())
    }
}
