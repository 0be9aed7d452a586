//! Connection-scoped command loop.
//!
//! One [`WorkflowSession`] serves one client connection for one project. The
//! surrounding server owns the socket; it feeds decoded commands in through
//! a channel and writes the events that come out the other side. The session
//! ties the connection's lifetime to the run: when the event channel closes,
//! the in-flight run is cancelled and stops issuing generation calls.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cancellation::CancellationToken;
use crate::core::WorkflowEvent;
use crate::events::ChannelEventSink;
use crate::workflow::{RunOutcome, WorkflowOrchestrator};

/// A control command received from the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Start the workflow with the given brief.
    StartWorkflow {
        /// The one-line project brief. Missing or blank briefs are rejected
        /// without closing the connection.
        #[serde(default)]
        brief: Option<String>,
    },
}

/// Serves one project-scoped connection.
pub struct WorkflowSession {
    project_id: Uuid,
    orchestrator: Arc<WorkflowOrchestrator>,
    events: mpsc::Sender<WorkflowEvent>,
}

impl WorkflowSession {
    /// Creates a session for one connection.
    #[must_use]
    pub fn new(
        project_id: Uuid,
        orchestrator: Arc<WorkflowOrchestrator>,
        events: mpsc::Sender<WorkflowEvent>,
    ) -> Self {
        Self {
            project_id,
            orchestrator,
            events,
        }
    }

    /// Processes commands until the client goes away.
    ///
    /// A start command with a usable brief runs the workflow to completion
    /// or abort before the next command is read. A blank brief produces an
    /// `error` event and the loop keeps serving, so the client can retry on
    /// the same connection.
    pub async fn serve(&self, mut commands: mpsc::Receiver<Command>) {
        info!(project_id = %self.project_id, "session connected");

        while let Some(command) = commands.recv().await {
            match command {
                Command::StartWorkflow { brief } => {
                    let Some(brief) = brief.filter(|b| !b.trim().is_empty()) else {
                        debug!(project_id = %self.project_id, "rejecting start with missing brief");
                        if self
                            .events
                            .send(WorkflowEvent::error("Brief is required"))
                            .await
                            .is_err()
                        {
                            break;
                        }
                        continue;
                    };
                    self.run_workflow(&brief).await;
                }
            }
        }

        info!(project_id = %self.project_id, "session disconnected");
    }

    /// Runs the workflow once, cancelling it if the client disconnects.
    async fn run_workflow(&self, brief: &str) -> RunOutcome {
        let token = Arc::new(CancellationToken::new());
        let sink = ChannelEventSink::from_sender(self.events.clone());

        // The receiver half belongs to the connection writer; when it is
        // dropped the client is gone and the run must stop.
        let watcher = {
            let events = self.events.clone();
            let token = Arc::clone(&token);
            tokio::spawn(async move {
                events.closed().await;
                token.cancel("client disconnected");
            })
        };

        let outcome = self
            .orchestrator
            .run(self.project_id, brief, &sink, &token)
            .await;
        watcher.abort();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{StageRole, StageStatus};
    use crate::persistence::InMemoryStore;
    use crate::testing::mocks::{SlowGateway, StubGateway};
    use std::time::Duration;

    fn spawn_session(
        gateway: Arc<dyn crate::generation::GenerationGateway>,
        store: Arc<InMemoryStore>,
    ) -> (
        mpsc::Sender<Command>,
        mpsc::Receiver<WorkflowEvent>,
        tokio::task::JoinHandle<()>,
    ) {
        let orchestrator = Arc::new(WorkflowOrchestrator::new(gateway, store));
        let (event_tx, event_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let session = WorkflowSession::new(Uuid::new_v4(), orchestrator, event_tx);
        let serving = tokio::spawn(async move { session.serve(cmd_rx).await });
        (cmd_tx, event_rx, serving)
    }

    #[test]
    fn test_command_wire_shape() {
        let command: Command =
            serde_json::from_str(r#"{"action":"start_workflow","brief":"A todo app"}"#).unwrap();
        assert_eq!(
            command,
            Command::StartWorkflow {
                brief: Some("A todo app".to_string())
            }
        );
    }

    #[test]
    fn test_command_missing_brief_parses() {
        let command: Command = serde_json::from_str(r#"{"action":"start_workflow"}"#).unwrap();
        assert_eq!(command, Command::StartWorkflow { brief: None });
    }

    #[tokio::test]
    async fn test_missing_brief_rejected_connection_stays_open() {
        let store = Arc::new(InMemoryStore::new());
        let (cmd_tx, mut event_rx, serving) =
            spawn_session(Arc::new(StubGateway::new()), Arc::clone(&store));

        // First command is rejected but the session keeps serving.
        cmd_tx
            .send(Command::StartWorkflow { brief: None })
            .await
            .unwrap();
        assert_eq!(
            event_rx.recv().await.unwrap(),
            WorkflowEvent::error("Brief is required")
        );
        assert_eq!(store.message_count(), 0);

        // A retry on the same connection runs normally.
        cmd_tx
            .send(Command::StartWorkflow {
                brief: Some("A todo app".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(
            event_rx.recv().await.unwrap(),
            WorkflowEvent::status(StageRole::Pm, StageStatus::InProgress)
        );

        // Drain until the run completes.
        let mut completed = false;
        while let Some(event) = event_rx.recv().await {
            if matches!(event, WorkflowEvent::WorkflowComplete { .. }) {
                completed = true;
                break;
            }
        }
        assert!(completed);

        drop(cmd_tx);
        serving.await.unwrap();
    }

    #[tokio::test]
    async fn test_blank_brief_rejected() {
        let (cmd_tx, mut event_rx, _serving) =
            spawn_session(Arc::new(StubGateway::new()), Arc::new(InMemoryStore::new()));

        cmd_tx
            .send(Command::StartWorkflow {
                brief: Some("   ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(
            event_rx.recv().await.unwrap(),
            WorkflowEvent::error("Brief is required")
        );
    }

    #[tokio::test]
    async fn test_disconnect_cancels_in_flight_run() {
        let gateway = Arc::new(SlowGateway::new(Duration::from_secs(30)));
        let store = Arc::new(InMemoryStore::new());
        let (cmd_tx, event_rx, serving) =
            spawn_session(Arc::clone(&gateway) as _, Arc::clone(&store));

        cmd_tx
            .send(Command::StartWorkflow {
                brief: Some("A todo app".to_string()),
            })
            .await
            .unwrap();

        // Wait for the first generation call to start, then sever the
        // connection.
        tokio::time::timeout(Duration::from_secs(1), async {
            while gateway.call_count() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        drop(event_rx);
        drop(cmd_tx);

        // The run winds down without finishing the pipeline or persisting
        // anything for the interrupted stage.
        tokio::time::timeout(Duration::from_secs(1), serving)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(store.message_count(), 0);
        assert_eq!(store.artifact_count(), 0);
    }
}
