//! Project records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a project's team session is conducted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    /// Streamed text workflow over the event channel.
    #[default]
    Text,
    /// Voice conversation; artifacts come through the single-shot path.
    Voice,
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// The project is open for runs.
    #[default]
    Active,
    /// The project has been closed out.
    Completed,
}

/// A project record, created once at intake.
///
/// The engine never deletes projects; the only mutation is the status
/// transition, owned by the intake layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier of the project.
    pub id: Uuid,
    /// Short project name.
    pub name: String,
    /// The project description or brief.
    pub description: String,
    /// How the team session is conducted.
    pub mode: ProjectMode,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new active project with a fresh id and timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, mode: ProjectMode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            mode,
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the project completed and bumps `updated_at`.
    pub fn complete(&mut self) {
        self.status = ProjectStatus::Completed;
        self.updated_at = Utc::now();
    }
}
