//! Mapping table and persistence providers.
//!
//! [`MappingStore`] is the in-memory authority over the short-code namespace.
//! It performs no locking or I/O itself; the engine wraps it in a lock and
//! pairs every mutation with a [`Persistence`](tether_core::Persistence)
//! save.

pub mod error;
pub mod json;
pub mod memory;
pub mod store;

pub use error::StoreError;
pub use json::JsonFilePersistence;
pub use memory::InMemoryPersistence;
pub use store::MappingStore;
