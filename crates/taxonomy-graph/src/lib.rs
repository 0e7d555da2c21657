//! Taxonomy Graph: Neo4j access for the taxonomy concept services.
//!
//! Concept stores never talk to neo4rs directly. They submit batches of
//! parameterized statements through a [`GraphSession`] and manage uniqueness
//! constraints through a [`SchemaGuard`]; [`GraphClient`] implements both.

pub mod client;
pub mod schema;
pub mod session;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use schema::SchemaGuard;
pub use session::{GraphSession, MutationStats, ParamValue, Record, Statement, StatementResult};
