//! Core types and traits for the Tether URL shortener.
//!
//! This crate holds the data model shared by every other crate in the
//! workspace: mappings, click events, the short-code key space, alias
//! validation, the clock abstraction and the persistence contract.

pub mod alias;
pub mod clock;
pub mod error;
pub mod keyspace;
pub mod mapping;
pub mod persistence;
pub mod shortcode;

pub use alias::AliasValidator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PersistenceError, ValidationError};
pub use keyspace::KeySpace;
pub use mapping::{AnalyticsReport, ClickEvent, Mapping, ALIAS_TTL};
pub use persistence::{Persistence, Snapshot};
pub use shortcode::ShortCode;
