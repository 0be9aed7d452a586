//! Workflow orchestration: the fixed four-stage pipeline.
//!
//! This module drives one run of the virtual product team: pm → ba → ux →
//! ui, each stage generating against its full textual context, persisting
//! its records, and streaming progress events. A run either completes all
//! four stages or aborts on the first failure; there is no partial-success
//! state and no resume.

mod context;
mod locks;
mod single_shot;


pub use context::{build_context, StageOutputs};
pub use locks::ProjectLocks;
pub use single_shot::generate_artifact;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cancellation::CancellationToken;
use crate::core::{
    AgentMessage, Artifact, ArtifactType, StageRole, StageStatus, WorkflowEvent,
};
use crate::errors::{TransportError, WorkflowError};
use crate::events::EventSink;
use crate::generation::{GenerationGateway, SessionKey};
use crate::persistence::PersistenceGateway;
use crate::sanitize::sanitize;

/// The terminal report for one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The project the run belonged to.
    pub project_id: Uuid,
    /// The run's identifier.
    pub run_id: Uuid,
    /// Whether all four stages completed and `workflow_complete` was sent.
    pub completed: bool,
    /// Whether the run was cancelled (disconnect or explicit cancel).
    pub cancelled: bool,
    /// Cancellation reason, if cancelled.
    pub cancel_reason: Option<String>,
    /// Failure message, if the run aborted on an error.
    pub error: Option<String>,
    /// Total execution time in milliseconds.
    pub duration_ms: f64,
}

/// Why a stage did not complete.
enum StageFailure {
    /// Generation or persistence failed; surface one `error` event and stop.
    Abort(String),
    /// The event channel is gone; stop without emitting anything further.
    Transport,
    /// The run's cancellation token fired.
    Cancelled,
}

impl From<TransportError> for StageFailure {
    fn from(_: TransportError) -> Self {
        Self::Transport
    }
}

/// Drives the fixed stage pipeline for one project at a time.
///
/// The orchestrator composes the generation gateway, the sanitizer, the
/// persistence gateway, and an event sink. It holds no state of its own
/// beyond the per-project lock table; run state lives in the execution
/// frame.
pub struct WorkflowOrchestrator {
    gateway: Arc<dyn GenerationGateway>,
    store: Arc<dyn PersistenceGateway>,
    locks: ProjectLocks,
}

impl WorkflowOrchestrator {
    /// Creates an orchestrator over the given gateways.
    #[must_use]
    pub fn new(gateway: Arc<dyn GenerationGateway>, store: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            store,
            locks: ProjectLocks::new(),
        }
    }

    /// Executes the stage pipeline once for a project.
    ///
    /// Streams progress through `sink` and returns only after completion or
    /// abort. Holds the project's run lock for the whole run, so concurrent
    /// starts for one project serialize. Event order for a successful run is
    /// fixed: per stage `agent_status(in_progress)`, `agent_message`,
    /// `artifact_ready` (ba/ux/ui), `agent_status(completed)`, `handoff`
    /// (all but ui), then `workflow_complete`.
    pub async fn run(
        &self,
        project_id: Uuid,
        brief: &str,
        sink: &dyn EventSink,
        token: &CancellationToken,
    ) -> RunOutcome {
        let run_id = Uuid::new_v4();
        let _guard = self.locks.acquire(project_id).await;
        let start = Instant::now();
        info!(%project_id, %run_id, "workflow run started");

        let mut outputs = StageOutputs::default();

        for role in StageRole::ALL {
            if token.is_cancelled() {
                return Self::cancelled_outcome(project_id, run_id, token, start);
            }

            match self
                .execute_stage(project_id, run_id, role, brief, &outputs, sink, token)
                .await
            {
                Ok(text) => outputs.record(role, text),
                Err(StageFailure::Abort(message)) => {
                    warn!(%project_id, %run_id, stage = %role, error = %message, "workflow run aborted");
                    // Best-effort: if the channel is also gone there is
                    // nobody left to tell.
                    let _ = sink.emit(WorkflowEvent::error(message.clone())).await;
                    return RunOutcome {
                        project_id,
                        run_id,
                        completed: false,
                        cancelled: false,
                        cancel_reason: None,
                        error: Some(message),
                        duration_ms: Self::elapsed_ms(start),
                    };
                }
                Err(StageFailure::Transport) => {
                    token.cancel("event channel closed");
                    debug!(%project_id, %run_id, stage = %role, "event channel closed, run stopped");
                    return Self::cancelled_outcome(project_id, run_id, token, start);
                }
                Err(StageFailure::Cancelled) => {
                    debug!(%project_id, %run_id, stage = %role, "run cancelled mid-stage");
                    return Self::cancelled_outcome(project_id, run_id, token, start);
                }
            }
        }

        if sink
            .emit(WorkflowEvent::complete(project_id))
            .await
            .is_err()
        {
            token.cancel("event channel closed");
            return Self::cancelled_outcome(project_id, run_id, token, start);
        }

        info!(%project_id, %run_id, "workflow run completed");
        RunOutcome {
            project_id,
            run_id,
            completed: true,
            cancelled: false,
            cancel_reason: None,
            error: None,
            duration_ms: Self::elapsed_ms(start),
        }
    }

    /// Generates and persists a single artifact outside the pipeline.
    ///
    /// See [`generate_artifact`]; this reuses the orchestrator's gateways.
    pub async fn generate_artifact(
        &self,
        project_id: Uuid,
        artifact_type: ArtifactType,
        context: &str,
    ) -> Result<Artifact, WorkflowError> {
        single_shot::generate_artifact(
            self.gateway.as_ref(),
            self.store.as_ref(),
            project_id,
            artifact_type,
            context,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_stage(
        &self,
        project_id: Uuid,
        run_id: Uuid,
        role: StageRole,
        brief: &str,
        outputs: &StageOutputs,
        sink: &dyn EventSink,
        token: &CancellationToken,
    ) -> Result<String, StageFailure> {
        let spec = role.spec();
        sink.emit(WorkflowEvent::status(role, StageStatus::InProgress))
            .await?;

        let input = context::build_context(role, brief, outputs);
        let session = SessionKey::new(project_id, role, run_id);
        debug!(stage = %role, session = %session, "calling generation backend");

        let text = tokio::select! {
            () = token.cancelled() => return Err(StageFailure::Cancelled),
            result = self.gateway.generate(role, &session, &input) => {
                result.map_err(|err| StageFailure::Abort(err.to_string()))?
            }
        };

        // Persist before notify: the client must never learn of a record
        // the store has not accepted.
        let message = AgentMessage::text(project_id, role, spec.display_name, text.clone());
        self.store
            .save_message(&message)
            .await
            .map_err(|err| StageFailure::Abort(err.to_string()))?;
        sink.emit(WorkflowEvent::message(role, spec.display_name, text.clone()))
            .await?;

        if let Some(artifact_type) = spec.artifact {
            let content = match artifact_type {
                ArtifactType::Prototype => sanitize(&text),
                ArtifactType::Vision | ArtifactType::Usecases => text.clone(),
            };
            let artifact = Artifact::new(project_id, artifact_type, content.clone());
            self.store
                .save_artifact(&artifact)
                .await
                .map_err(|err| StageFailure::Abort(err.to_string()))?;
            sink.emit(WorkflowEvent::artifact(project_id, artifact_type, content))
                .await?;
        }

        sink.emit(WorkflowEvent::status(role, StageStatus::Completed))
            .await?;

        if let Some(next) = role.next() {
            sink.emit(WorkflowEvent::handoff(role, next)).await?;
        }

        info!(stage = %role, position = spec.position, "stage completed");
        Ok(text)
    }

    fn cancelled_outcome(
        project_id: Uuid,
        run_id: Uuid,
        token: &CancellationToken,
        start: Instant,
    ) -> RunOutcome {
        RunOutcome {
            project_id,
            run_id,
            completed: false,
            cancelled: true,
            cancel_reason: token.reason(),
            error: None,
            duration_ms: Self::elapsed_ms(start),
        }
    }

    fn elapsed_ms(start: Instant) -> f64 {
        start.elapsed().as_secs_f64() * 1000.0
    }
}
