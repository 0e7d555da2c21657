//! industry-classifications: Read/write store for industry classification concepts.
//!
//! Keeps a concept's node, labels, properties and identifier nodes in the
//! taxonomy graph consistent across repeated writes and deletes.

pub mod config;
pub mod cypher;
pub mod error;
pub mod store;

#[cfg(test)]
mod mock;

pub use config::{AppConfig, IdentifierSeeding, StoreConfig};
pub use error::{Operation, StoreError};
pub use store::ClassificationStore;
