//! Per-project run serialization.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Serializes runs per project.
///
/// Two runs started concurrently for the same project id execute one at a
/// time, so their stage execution and record ordering can never interleave.
/// Runs for different projects proceed independently.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl ProjectLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the run lock for a project, waiting behind any run already
    /// holding it.
    pub async fn acquire(&self, project_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(project_id)
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_project_is_exclusive() {
        let locks = Arc::new(ProjectLocks::new());
        let project_id = Uuid::new_v4();
        let concurrent = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let locks = locks.clone();
            let concurrent = concurrent.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(project_id).await;
                let holders = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(holders, 1);
                tokio::time::sleep(Duration::from_millis(5)).await;
                concurrent.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_different_projects_are_independent() {
        let locks = ProjectLocks::new();

        let _first = locks.acquire(Uuid::new_v4()).await;
        // A second project's lock must not block behind the first.
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(Uuid::new_v4()),
        )
        .await;
        assert!(second.is_ok());
    }
}
