//! Mock gateways and stores that record calls and return configurable
//! outputs.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::{AgentMessage, Artifact, StageRole};
use crate::errors::{GenerationError, PersistenceError};
use crate::generation::{GenerationGateway, SessionKey};
use crate::persistence::PersistenceGateway;

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The role the call was made for.
    pub role: StageRole,
    /// The session key the call carried.
    pub session: SessionKey,
    /// The full input context.
    pub context: String,
}

/// A gateway that returns canned text per role and records every call.
#[derive(Debug, Default)]
pub struct StubGateway {
    responses: RwLock<HashMap<StageRole, String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubGateway {
    /// Creates a stub with a plausible default response per role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response for one role.
    #[must_use]
    pub fn with_response(self, role: StageRole, text: impl Into<String>) -> Self {
        self.responses.write().insert(role, text.into());
        self
    }

    /// Returns all recorded calls in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of generation calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, role: StageRole, session: &SessionKey, context: &str) {
        self.calls.lock().push(RecordedCall {
            role,
            session: *session,
            context: context.to_string(),
        });
    }

    fn response(&self, role: StageRole) -> String {
        self.responses
            .read()
            .get(&role)
            .cloned()
            .unwrap_or_else(|| default_response(role).to_string())
    }
}

/// The built-in canned output per role.
const fn default_response(role: StageRole) -> &'static str {
    match role {
        StageRole::Pm => {
            "Acknowledged. Requirements identified, phases laid out. \
Ready to hand off to the Business Analyst."
        }
        StageRole::Ba => "# Vision Document\n\nA product that solves the stated problem.",
        StageRole::Ux => "# User Stories and Use Cases\n\nAs a user, I want to get started quickly.",
        StageRole::Ui => {
            "```html\n<!DOCTYPE html>\n<html><body><h1>Prototype</h1></body></html>\n```"
        }
    }
}

#[async_trait]
impl GenerationGateway for StubGateway {
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        self.record(role, session, context);
        Ok(self.response(role))
    }
}

/// A gateway that fails at one role and behaves like [`StubGateway`]
/// elsewhere.
#[derive(Debug)]
pub struct FailingGateway {
    fail_at: StageRole,
    message: String,
    stub: StubGateway,
}

impl FailingGateway {
    /// Fails every call for the given role.
    #[must_use]
    pub fn at(fail_at: StageRole) -> Self {
        Self {
            fail_at,
            message: "backend unavailable".to_string(),
            stub: StubGateway::new(),
        }
    }

    /// Overrides the failure message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Returns all recorded calls in order, including the failing one.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.stub.calls()
    }

    /// Returns the number of generation calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.stub.call_count()
    }
}

#[async_trait]
impl GenerationGateway for FailingGateway {
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        self.stub.record(role, session, context);
        if role == self.fail_at {
            return Err(GenerationError::new(self.message.clone()));
        }
        Ok(self.stub.response(role))
    }
}

/// A gateway that fails a fixed number of times, then succeeds.
#[derive(Debug)]
pub struct FlakyGateway {
    failures_remaining: Mutex<u32>,
    stub: StubGateway,
}

impl FlakyGateway {
    /// Fails the first `failures` calls with a transient error.
    #[must_use]
    pub fn failing_times(failures: u32) -> Self {
        Self {
            failures_remaining: Mutex::new(failures),
            stub: StubGateway::new(),
        }
    }

    /// Returns the number of generation calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.stub.call_count()
    }
}

#[async_trait]
impl GenerationGateway for FlakyGateway {
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        self.stub.record(role, session, context);
        {
            let mut remaining = self.failures_remaining.lock();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(GenerationError::new("transient backend error"));
            }
        }
        Ok(self.stub.response(role))
    }
}

/// A gateway that sleeps before answering, for timeout and cancellation
/// tests.
#[derive(Debug)]
pub struct SlowGateway {
    delay: Duration,
    stub: StubGateway,
}

impl SlowGateway {
    /// Sleeps for `delay` on every call before answering like a stub.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            stub: StubGateway::new(),
        }
    }

    /// Returns the number of generation calls started.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.stub.call_count()
    }
}

#[async_trait]
impl GenerationGateway for SlowGateway {
    async fn generate(
        &self,
        role: StageRole,
        session: &SessionKey,
        context: &str,
    ) -> Result<String, GenerationError> {
        self.stub.record(role, session, context);
        tokio::time::sleep(self.delay).await;
        Ok(self.stub.response(role))
    }
}

/// A store whose writes always fail.
#[derive(Debug)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    /// Fails every write with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl PersistenceGateway for FailingStore {
    async fn save_message(&self, _message: &AgentMessage) -> Result<(), PersistenceError> {
        Err(PersistenceError::new(self.message.clone()))
    }

    async fn save_artifact(&self, _artifact: &Artifact) -> Result<(), PersistenceError> {
        Err(PersistenceError::new(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn key(role: StageRole) -> SessionKey {
        SessionKey::new(Uuid::new_v4(), role, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_stub_records_calls() {
        let stub = StubGateway::new();
        stub.generate(StageRole::Pm, &key(StageRole::Pm), "Project Brief: x")
            .await
            .unwrap();

        assert_eq!(stub.call_count(), 1);
        assert_eq!(stub.calls()[0].context, "Project Brief: x");
    }

    #[tokio::test]
    async fn test_stub_response_override() {
        let stub = StubGateway::new().with_response(StageRole::Ba, "custom vision");
        let text = stub
            .generate(StageRole::Ba, &key(StageRole::Ba), "ctx")
            .await
            .unwrap();
        assert_eq!(text, "custom vision");
    }

    #[tokio::test]
    async fn test_failing_gateway_fails_only_at_role() {
        let gateway = FailingGateway::at(StageRole::Ba);

        assert!(gateway
            .generate(StageRole::Pm, &key(StageRole::Pm), "ctx")
            .await
            .is_ok());
        assert!(gateway
            .generate(StageRole::Ba, &key(StageRole::Ba), "ctx")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_flaky_gateway_recovers() {
        let gateway = FlakyGateway::failing_times(1);

        assert!(gateway
            .generate(StageRole::Pm, &key(StageRole::Pm), "ctx")
            .await
            .is_err());
        assert!(gateway
            .generate(StageRole::Pm, &key(StageRole::Pm), "ctx")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_failing_store_rejects_writes() {
        let store = FailingStore::new("disk full");
        let artifact = Artifact::new(
            Uuid::new_v4(),
            crate::core::ArtifactType::Vision,
            "v",
        );

        let err = store.save_artifact(&artifact).await.unwrap_err();
        assert_eq!(err.message, "disk full");
    }
}
