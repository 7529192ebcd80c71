use crate::error::PersistenceError;
use crate::mapping::{ClickEvent, Mapping};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// The full durable state of the engine: every mapping (active or not) and
/// the complete click history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub mappings: Vec<Mapping>,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

/// Durable storage for [`Snapshot`]s.
///
/// The engine saves a complete snapshot after every mutation and only
/// applies the mutation in memory once `save` has returned `Ok`.
#[async_trait]
pub trait Persistence: Send + Sync + 'static {
    /// Loads the last saved snapshot. A store that has never been written
    /// loads as an empty snapshot.
    async fn load(&self) -> Result<Snapshot>;

    /// Durably replaces the stored state with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

#[async_trait]
impl<T: Persistence + ?Sized> Persistence for Arc<T> {
    async fn load(&self) -> Result<Snapshot> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot).await
    }
}

#[async_trait]
impl<T: Persistence + ?Sized> Persistence for Box<T> {
    async fn load(&self) -> Result<Snapshot> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot).await
    }
}
