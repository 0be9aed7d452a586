//! Artifact records produced by the ba, ux, and ui stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::StageRole;

/// The type of a stage-produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    /// The vision document, produced by the ba stage.
    Vision,
    /// User stories and use cases, produced by the ux stage.
    Usecases,
    /// The HTML prototype, produced by the ui stage.
    Prototype,
}

impl ArtifactType {
    /// Returns the stage role that produces this artifact type.
    #[must_use]
    pub const fn producer(self) -> StageRole {
        match self {
            Self::Vision => StageRole::Ba,
            Self::Usecases => StageRole::Ux,
            Self::Prototype => StageRole::Ui,
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vision => write!(f, "vision"),
            Self::Usecases => write!(f, "usecases"),
            Self::Prototype => write!(f, "prototype"),
        }
    }
}

/// Error returned when parsing an unknown artifact type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownArtifactType(pub String);

impl fmt::Display for UnknownArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown artifact type: {}", self.0)
    }
}

impl std::error::Error for UnknownArtifactType {}

impl FromStr for ArtifactType {
    type Err = UnknownArtifactType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vision" => Ok(Self::Vision),
            "usecases" => Ok(Self::Usecases),
            "prototype" => Ok(Self::Prototype),
            other => Err(UnknownArtifactType(other.to_string())),
        }
    }
}

/// A persisted, stage-produced document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The project this artifact belongs to.
    pub project_id: Uuid,
    /// What kind of document this is.
    pub artifact_type: ArtifactType,
    /// The full document text. Prototype content is sanitized before
    /// construction.
    pub content: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    /// Creates a new artifact record with a fresh id and timestamp.
    #[must_use]
    pub fn new(project_id: Uuid, artifact_type: ArtifactType, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            artifact_type,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
