use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tether_core::persistence::{Persistence, Result, Snapshot};
use tether_core::PersistenceError;

/// Keeps the last saved snapshot in memory.
///
/// Used for tests and for running without a data file. It can be switched
/// into a failing mode to exercise the engine's rollback path.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    snapshot: Mutex<Snapshot>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `snapshot` already "on disk".
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    /// When `true`, every subsequent `save` fails with an I/O error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The last successfully saved snapshot.
    pub fn saved(&self) -> Snapshot {
        self.snapshot.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Persistence for InMemoryPersistence {
    async fn load(&self) -> Result<Snapshot> {
        Ok(self.snapshot.lock().clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::Io("simulated write failure".to_string()));
        }
        *self.snapshot.lock() = snapshot.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
