//! Scripted in-memory graph collaborator for store tests.
//!
//! Records every batch and constraint map it receives and answers from a
//! queue of scripted outcomes. With nothing queued, each statement yields an
//! empty result.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use taxonomy_graph::{GraphError, GraphSession, Record, SchemaGuard, Statement, StatementResult};
use tokio::sync::Mutex;

type Outcome = Result<Vec<StatementResult>, GraphError>;

#[derive(Clone, Default)]
pub struct MockGraph {
    batches: Arc<Mutex<Vec<Vec<Statement>>>>,
    constraints: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
    outcomes: Arc<Mutex<VecDeque<Outcome>>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the results for the next call.
    pub async fn respond(&self, results: Vec<StatementResult>) {
        self.outcomes.lock().await.push_back(Ok(results));
    }

    /// Make the next call fail.
    pub async fn fail_next(&self, message: &str) {
        self.outcomes
            .lock()
            .await
            .push_back(Err(GraphError::Connection(message.to_string())));
    }

    pub async fn batches(&self) -> Vec<Vec<Statement>> {
        self.batches.lock().await.clone()
    }

    pub async fn constraints(&self) -> Vec<BTreeMap<String, String>> {
        self.constraints.lock().await.clone()
    }
}

#[async_trait]
impl GraphSession for MockGraph {
    async fn execute_batch(
        &self,
        statements: &[Statement],
    ) -> Result<Vec<StatementResult>, GraphError> {
        self.batches.lock().await.push(statements.to_vec());
        match self.outcomes.lock().await.pop_front() {
            Some(outcome) => outcome,
            None => Ok(vec![StatementResult::default(); statements.len()]),
        }
    }
}

#[async_trait]
impl SchemaGuard for MockGraph {
    async fn ensure_constraints(
        &self,
        constraints: &BTreeMap<String, String>,
    ) -> Result<(), GraphError> {
        self.constraints.lock().await.push(constraints.clone());
        match self.outcomes.lock().await.pop_front() {
            Some(Err(e)) => Err(e),
            _ => Ok(()),
        }
    }
}

/// Build a row from a JSON object literal.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => Record::from(map),
        other => panic!("record must be a JSON object, got {other}"),
    }
}
