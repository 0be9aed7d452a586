//! Append-only persistence boundary for run records.
//!
//! The engine only ever appends: one message per stage, one artifact per
//! producing stage. Queries (list projects, list artifacts, list messages)
//! belong to the surrounding CRUD layer and are not part of this boundary.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::core::{AgentMessage, Artifact};
use crate::errors::PersistenceError;

/// Trait for the record store behind the orchestrator.
///
/// Writes must be durably accepted before they return `Ok`; the orchestrator
/// emits the corresponding event only after the write completes, so a client
/// that reconnects and re-fetches state sees at least what it was notified
/// of.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Appends one agent message record.
    async fn save_message(&self, message: &AgentMessage) -> Result<(), PersistenceError>;

    /// Appends one artifact record.
    async fn save_artifact(&self, artifact: &Artifact) -> Result<(), PersistenceError>;
}
