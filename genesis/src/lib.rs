//! # Genesis Engine
//!
//! A workflow engine for an automated virtual product team. Given a one-line
//! project brief, it drives four role-specific text-generation stages in a
//! fixed order (project manager, business analyst, UX designer, UI engineer),
//! streams progress events to a connected client, and persists each stage's
//! output.
//!
//! The engine provides:
//!
//! - **Stage orchestration**: the fixed pm → ba → ux → ui pipeline with
//!   explicit textual context propagation between stages
//! - **Event streaming**: ordered, typed workflow events over a
//!   connection-scoped channel
//! - **Capability boundaries**: pluggable generation and persistence
//!   gateways behind async traits
//! - **Cancellation handling**: transport-tied run cancellation with
//!   cooperative teardown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use genesis_engine::prelude::*;
//!
//! let orchestrator = WorkflowOrchestrator::new(gateway, store);
//! let sink = CollectingEventSink::default();
//! let token = CancellationToken::new();
//!
//! let outcome = orchestrator
//!     .run(project_id, "A todo app for teams", &sink, &token)
//!     .await;
//! assert!(outcome.completed);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod generation;
pub mod observability;
pub mod persistence;
pub mod sanitize;
pub mod testing;
pub mod transport;
pub mod workflow;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::EngineConfig;
    pub use crate::core::{
        AgentMessage, Artifact, ArtifactType, MessageKind, Project, ProjectMode,
        ProjectStatus, StageRole, StageSpec, StageStatus, WorkflowEvent,
    };
    pub use crate::errors::{
        GenerationError, PersistenceError, TransportError, WorkflowError,
    };
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink,
        NoOpEventSink,
    };
    pub use crate::generation::{
        BackoffStrategy, GenerationGateway, JitterStrategy, RetryConfig,
        RetryingGateway, SessionKey,
    };
    pub use crate::persistence::{InMemoryStore, PersistenceGateway};
    pub use crate::sanitize::sanitize;
    pub use crate::transport::{Command, WorkflowSession};
    pub use crate::workflow::{
        generate_artifact, RunOutcome, WorkflowOrchestrator,
    };
}
