//! Neo4j connection management and shared graph client.

use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid schema identifier: {0}")]
    InvalidSchema(String),
}

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub fetch_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            max_connections: 16,
            fetch_size: 256,
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// Clone is cheap (inner Arc), so one client can back both the session and
/// the schema guard of a store.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a single auto-committed query.
    ///
    /// Schema DDL goes through here: Neo4j will not run constraint changes in
    /// the same transaction as data writes, so it cannot join a session batch.
    pub async fn run(&self, query: Query) -> Result<(), GraphError> {
        self.graph.run(query).await?;
        Ok(())
    }

    /// Execute a read query and return the first row, if any.
    pub async fn query_one(&self, query: Query) -> Result<Option<neo4rs::Row>, GraphError> {
        let mut stream = self.graph.execute(query).await?;
        Ok(stream.next().await?)
    }

    /// Begin a transaction.
    pub async fn start_txn(&self) -> Result<neo4rs::Txn, GraphError> {
        Ok(self.graph.start_txn().await?)
    }
}
