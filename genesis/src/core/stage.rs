//! The closed stage registry: roles, per-stage configuration, and status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ArtifactType;

/// The role executing one fixed step of the pipeline.
///
/// The order is total: pm → ba → ux → ui. Each role appears exactly once
/// per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageRole {
    /// Project manager: turns the brief into a structured plan.
    Pm,
    /// Business analyst: produces the vision document.
    Ba,
    /// UX designer: produces user stories and use cases.
    Ux,
    /// UI engineer: produces the HTML prototype.
    Ui,
}

impl StageRole {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [Self::Pm, Self::Ba, Self::Ux, Self::Ui];

    /// Returns the 1-based position of the stage in the pipeline.
    #[must_use]
    pub const fn position(self) -> u8 {
        match self {
            Self::Pm => 1,
            Self::Ba => 2,
            Self::Ux => 3,
            Self::Ui => 4,
        }
    }

    /// Returns the stage that receives the handoff, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pm => Some(Self::Ba),
            Self::Ba => Some(Self::Ux),
            Self::Ux => Some(Self::Ui),
            Self::Ui => None,
        }
    }

    /// Returns the static configuration for this stage.
    #[must_use]
    pub const fn spec(self) -> &'static StageSpec {
        match self {
            Self::Pm => &PM_SPEC,
            Self::Ba => &BA_SPEC,
            Self::Ux => &UX_SPEC,
            Self::Ui => &UI_SPEC,
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pm => write!(f, "pm"),
            Self::Ba => write!(f, "ba"),
            Self::Ux => write!(f, "ux"),
            Self::Ui => write!(f, "ui"),
        }
    }
}

/// The execution status of a stage, as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// The stage has started and its generation call is in flight.
    InProgress,
    /// The stage finished and its records are persisted.
    Completed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Static configuration for one pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    /// The role this spec configures.
    pub role: StageRole,
    /// 1-based position in the pipeline.
    pub position: u8,
    /// Display name shown alongside the stage's messages.
    pub display_name: &'static str,
    /// System prompt handed to the generation backend for this role.
    pub system_prompt: &'static str,
    /// The artifact this stage yields, if any.
    pub artifact: Option<ArtifactType>,
}

const PM_SPEC: StageSpec = StageSpec {
    role: StageRole::Pm,
    position: 1,
    display_name: "Alex (Project Manager)",
    system_prompt: "You are Alex, an experienced Project Manager specializing in \
software design. Analyze the project brief and create a clear, structured plan \
for the team: acknowledge the idea, identify key requirements and objectives, \
lay out phases, and set expectations for what the team will deliver. Be direct \
and actionable, and close by confirming the handoff to the Business Analyst.",
    artifact: None,
};

const BA_SPEC: StageSpec = StageSpec {
    role: StageRole::Ba,
    position: 2,
    display_name: "Brenda (Business Analyst)",
    system_prompt: "You are Brenda, a skilled Business Analyst. From the project \
plan, write a Vision Document with an executive summary, problem statement, \
target audience, goals and objectives, key features, success metrics, and \
constraints and assumptions. Be thorough but concise, and close by confirming \
the handoff to the UX Designer.",
    artifact: Some(ArtifactType::Vision),
};

const UX_SPEC: StageSpec = StageSpec {
    role: StageRole::Ux,
    position: 3,
    display_name: "Carlos (UX Designer)",
    system_prompt: "You are Carlos, a creative UX Designer. From the Vision \
Document, write user personas, user stories, detailed use cases with main and \
alternative flows, and a user journey map. Be detailed and user-focused, and \
close by confirming the handoff to the UI Engineer.",
    artifact: Some(ArtifactType::Usecases),
};

const UI_SPEC: StageSpec = StageSpec {
    role: StageRole::Ui,
    position: 4,
    display_name: "Diana (UI Engineer)",
    system_prompt: "You are Diana, a talented UI Engineer. From the Vision \
Document and Use Cases, produce a complete, self-contained, single-file HTML \
prototype with embedded CSS and vanilla JavaScript implementing the key \
features. Respond with the HTML only, starting at the doctype, with no \
explanations and no markdown.",
    artifact: Some(ArtifactType::Prototype),
};
