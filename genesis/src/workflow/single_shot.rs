//! Single-shot artifact generation outside the stage pipeline.
//!
//! Voice-mode sessions build their own conversational context on the client
//! and ask for one artifact directly. The path bypasses stage sequencing but
//! reuses the generation gateway, the sanitizer, and the persistence
//! gateway unchanged, so sanitization and persistence semantics are
//! identical to the pipeline's.

use tracing::info;
use uuid::Uuid;

use crate::core::{Artifact, ArtifactType};
use crate::errors::WorkflowError;
use crate::generation::{GenerationGateway, SessionKey};
use crate::persistence::PersistenceGateway;
use crate::sanitize::sanitize;

/// Generates one artifact from caller-supplied context and persists it.
///
/// The producing role is derived from the artifact type (vision → ba,
/// usecases → ux, prototype → ui). Prototype content is sanitized before
/// persistence. The session key carries a fresh run id, so the call shares
/// no backend state with any pipeline run.
pub async fn generate_artifact(
    gateway: &dyn GenerationGateway,
    store: &dyn PersistenceGateway,
    project_id: Uuid,
    artifact_type: ArtifactType,
    context: &str,
) -> Result<Artifact, WorkflowError> {
    if context.trim().is_empty() {
        return Err(WorkflowError::Validation("context is required".to_string()));
    }

    let role = artifact_type.producer();
    let session = SessionKey::new(project_id, role, Uuid::new_v4());
    info!(%project_id, %artifact_type, stage = %role, "single-shot artifact generation");

    let text = gateway.generate(role, &session, context).await?;
    let content = match artifact_type {
        ArtifactType::Prototype => sanitize(&text),
        ArtifactType::Vision | ArtifactType::Usecases => text,
    };

    let artifact = Artifact::new(project_id, artifact_type, content);
    store.save_artifact(&artifact).await?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageRole;
    use crate::persistence::InMemoryStore;
    use crate::testing::mocks::{FailingGateway, StubGateway};

    #[tokio::test]
    async fn test_generates_and_persists_vision() {
        let gateway = StubGateway::new();
        let store = InMemoryStore::new();
        let project_id = Uuid::new_v4();

        let artifact = generate_artifact(
            &gateway,
            &store,
            project_id,
            ArtifactType::Vision,
            "the conversation so far",
        )
        .await
        .unwrap();

        assert_eq!(artifact.artifact_type, ArtifactType::Vision);
        assert_eq!(store.artifacts_for(project_id), vec![artifact]);
    }

    #[tokio::test]
    async fn test_prototype_is_sanitized() {
        let gateway = StubGateway::new()
            .with_response(StageRole::Ui, "```html\n<!DOCTYPE html>\n<html></html>\n```");
        let store = InMemoryStore::new();

        let artifact = generate_artifact(
            &gateway,
            &store,
            Uuid::new_v4(),
            ArtifactType::Prototype,
            "the conversation so far",
        )
        .await
        .unwrap();

        assert_eq!(artifact.content, "<!DOCTYPE html>\n<html></html>");
    }

    #[tokio::test]
    async fn test_empty_context_is_validation_error() {
        let gateway = StubGateway::new();
        let store = InMemoryStore::new();

        let err = generate_artifact(&gateway, &store, Uuid::new_v4(), ArtifactType::Vision, "  ")
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
        assert_eq!(store.artifact_count(), 0);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_persists_nothing() {
        let gateway = FailingGateway::at(StageRole::Ui);
        let store = InMemoryStore::new();

        let err = generate_artifact(
            &gateway,
            &store,
            Uuid::new_v4(),
            ArtifactType::Prototype,
            "ctx",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WorkflowError::Generation(_)));
        assert_eq!(store.artifact_count(), 0);
    }

    #[tokio::test]
    async fn test_uses_producer_role_session() {
        let gateway = StubGateway::new();
        let store = InMemoryStore::new();

        generate_artifact(&gateway, &store, Uuid::new_v4(), ArtifactType::Usecases, "ctx")
            .await
            .unwrap();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].role, StageRole::Ux);
        assert_eq!(calls[0].session.role, StageRole::Ux);
    }
}
