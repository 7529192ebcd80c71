//! The mapping-and-analytics engine.
//!
//! [`ResolutionService`] answers create, resolve and report requests. It owns
//! the [`MappingStore`](tether_storage::MappingStore) and
//! [`ClickAnalytics`](tether_analytics::ClickAnalytics) behind one lock and
//! persists a full snapshot after every mutation.

pub mod error;
pub mod service;
pub mod sweeper;

pub use error::{EngineError, Result};
pub use service::{EngineSettings, ResolutionService};
pub use sweeper::spawn_sweeper;
