//! Capability boundary to the text-generation backend.
//!
//! The engine only depends on `generate(role, session, context) -> text`.
//! Which model or provider sits behind the trait is an integration concern;
//! tests use the deterministic doubles in [`crate::testing`].

mod retry;

pub use retry::{BackoffStrategy, JitterStrategy, RetryConfig, RetryingGateway};

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::core::StageRole;
use crate::errors::GenerationError;

/// Identifies one stage's generation session.
///
/// The key spans project, role, and run, so a backend that keeps
/// conversational state per session can never leak memory across stages or
/// across two runs of the same stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// The project the run belongs to.
    pub project_id: Uuid,
    /// The stage the session is scoped to.
    pub role: StageRole,
    /// The run the session is scoped to.
    pub run_id: Uuid,
}

impl SessionKey {
    /// Creates a session key for one stage of one run.
    #[must_use]
    pub const fn new(project_id: Uuid, role: StageRole, run_id: Uuid) -> Self {
        Self {
            project_id,
            role,
            run_id,
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.project_id, self.role, self.run_id)
    }
}

/// Trait for text-generation backends.
///
/// Every call carries its full context; implementations must not rely on
/// hidden conversational memory between calls. All failures collapse into
/// [`GenerationError`].
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Generates text for one stage.
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError>;
}
