//! Error types for the industry classification store.

use std::fmt;

use taxonomy_core::DecodeError;
use taxonomy_graph::GraphError;
use thiserror::Error;

/// The mutating operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => f.write_str("write"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to apply uniqueness constraints: {0}")]
    Schema(#[source] GraphError),

    #[error("Graph backend unavailable: {0}")]
    Connectivity(#[source] GraphError),

    /// A write or delete batch failed. The batch was rolled back.
    #[error("Failed to {operation} industry classification {uuid}: {source}")]
    Persistence {
        operation: Operation,
        uuid: String,
        #[source]
        source: GraphError,
    },

    #[error("Failed to read industry classification {uuid}: {source}")]
    Lookup {
        uuid: String,
        #[source]
        source: GraphError,
    },

    #[error("Failed to count industry classifications: {0}")]
    Count(#[source] GraphError),

    #[error("Malformed industry classification: {0}")]
    MalformedInput(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
