//! Agent message records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::StageRole;

/// The kind of an agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A stage's generated text output.
    #[default]
    Text,
    /// A status notice.
    Status,
    /// A handoff notice.
    Handoff,
}

/// A persisted message from one agent role.
///
/// One `text`-kind message is created per stage on successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The project this message belongs to.
    pub project_id: Uuid,
    /// The role that produced the message.
    pub agent_role: StageRole,
    /// Display name of the producing agent.
    pub agent_name: String,
    /// The message body.
    pub message: String,
    /// What kind of message this is.
    #[serde(default)]
    pub message_type: MessageKind,
    /// When the record was created.
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    /// Creates a new `text`-kind message record with a fresh id and timestamp.
    #[must_use]
    pub fn text(
        project_id: Uuid,
        agent_role: StageRole,
        agent_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            agent_role,
            agent_name: agent_name.into(),
            message: message.into(),
            message_type: MessageKind::Text,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_creation() {
        let project_id = Uuid::new_v4();
        let msg = AgentMessage::text(project_id, StageRole::Pm, "Alex (Project Manager)", "Plan");

        assert_eq!(msg.project_id, project_id);
        assert_eq!(msg.agent_role, StageRole::Pm);
        assert_eq!(msg.message_type, MessageKind::Text);
    }

    #[test]
    fn test_message_kind_default() {
        assert_eq!(MessageKind::default(), MessageKind::Text);
    }

    #[test]
    fn test_message_kind_wire_form() {
        assert_eq!(serde_json::json!(MessageKind::Text), serde_json::json!("text"));
        assert_eq!(serde_json::json!(MessageKind::Handoff), serde_json::json!("handoff"));
    }

    #[test]
    fn test_message_serialization_round_trip() {
        let msg = AgentMessage::text(Uuid::new_v4(), StageRole::Ba, "Brenda (Business Analyst)", "# Vision");
        let json = serde_json::to_string(&msg).unwrap();
        let back: AgentMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }
}
