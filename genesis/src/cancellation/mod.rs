//! Cooperative cancellation for workflow runs.
//!
//! A run's token is shared between the transport (which cancels it when the
//! client connection goes away) and the orchestrator (which races every
//! generation call against it and checks it between stages).

mod token;

pub use token::{CancelCallback, CancellationToken};
