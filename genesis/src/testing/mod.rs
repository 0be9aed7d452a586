//! Deterministic test doubles for the engine's capability boundaries.
//!
//! Public so embedders can test their own integrations against the engine
//! without a live generation backend or database.

pub mod mocks;

pub use mocks::{FailingGateway, FailingStore, FlakyGateway, RecordedCall, SlowGateway, StubGateway};
