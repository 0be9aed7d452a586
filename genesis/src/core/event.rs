//! Typed workflow events and their wire shape.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ArtifactType, StageRole, StageStatus};

/// An event emitted by the orchestrator during a run.
///
/// Events serialize to the JSON protocol consumed by clients: a `type` tag
/// plus the kind-specific fields. Delivery order is emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// A stage started or finished.
    AgentStatus {
        /// The stage the status refers to.
        agent_role: StageRole,
        /// Whether the stage is in progress or completed.
        status: StageStatus,
    },
    /// A stage's generated text output.
    AgentMessage {
        /// The stage that produced the message.
        agent_role: StageRole,
        /// Display name of the producing agent.
        agent_name: String,
        /// The message body.
        message: String,
    },
    /// One stage handed off to the next.
    Handoff {
        /// The stage that completed.
        from_agent: StageRole,
        /// The stage that starts next.
        to_agent: StageRole,
    },
    /// An artifact was persisted and is ready for the client.
    ArtifactReady {
        /// The project the artifact belongs to.
        project_id: Uuid,
        /// What kind of document was produced.
        artifact_type: ArtifactType,
        /// The full (sanitized, where applicable) document text.
        content: String,
    },
    /// All four stages completed.
    WorkflowComplete {
        /// The project whose run completed.
        project_id: Uuid,
    },
    /// The run aborted, or a control command was rejected.
    Error {
        /// The failure message.
        message: String,
    },
}

impl WorkflowEvent {
    /// Creates an `agent_status` event.
    #[must_use]
    pub const fn status(agent_role: StageRole, status: StageStatus) -> Self {
        Self::AgentStatus { agent_role, status }
    }

    /// Creates an `agent_message` event.
    #[must_use]
    pub fn message(
        agent_role: StageRole,
        agent_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::AgentMessage {
            agent_role,
            agent_name: agent_name.into(),
            message: message.into(),
        }
    }

    /// Creates a `handoff` event.
    #[must_use]
    pub const fn handoff(from_agent: StageRole, to_agent: StageRole) -> Self {
        Self::Handoff {
            from_agent,
            to_agent,
        }
    }

    /// Creates an `artifact_ready` event.
    #[must_use]
    pub fn artifact(project_id: Uuid, artifact_type: ArtifactType, content: impl Into<String>) -> Self {
        Self::ArtifactReady {
            project_id,
            artifact_type,
            content: content.into(),
        }
    }

    /// Creates a `workflow_complete` event.
    #[must_use]
    pub const fn complete(project_id: Uuid) -> Self {
        Self::WorkflowComplete { project_id }
    }

    /// Creates an `error` event.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serializes the event to its wire JSON form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Returns the wire-level kind tag, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AgentStatus { .. } => "agent_status",
            Self::AgentMessage { .. } => "agent_message",
            Self::Handoff { .. } => "handoff",
            Self::ArtifactReady { .. } => "artifact_ready",
            Self::WorkflowComplete { .. } => "workflow_complete",
            Self::Error { .. } => "error",
        }
    }
}
