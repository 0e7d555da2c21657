//! Batched statement execution against the graph.
//!
//! A [`GraphSession`] takes an ordered list of [`Statement`]s and runs them as
//! one unit: all commit or none do. Each statement yields a
//! [`StatementResult`] with its rows and, when requested, the mutation
//! counters it reported. Interpreting those counters is left to the caller.

use std::collections::BTreeMap;

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltString, BoltType, Query};
use serde_json::Value;

use crate::client::{GraphClient, GraphError};

/// A parameter value bound into a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
    Integer(i64),
    Boolean(bool),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<BTreeMap<String, String>> for ParamValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        Self::Map(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl ParamValue {
    fn to_bolt(&self) -> BoltType {
        match self {
            Self::String(s) => BoltType::from(s.clone()),
            Self::List(items) => {
                let mut list = BoltList::new();
                for item in items {
                    list.push(BoltType::from(item.clone()));
                }
                BoltType::List(list)
            }
            Self::Map(entries) => {
                let mut map = BoltMap::new();
                for (k, v) in entries {
                    map.put(BoltString::from(k.as_str()), BoltType::from(v.clone()));
                }
                BoltType::Map(map)
            }
            Self::Integer(i) => BoltType::from(*i),
            Self::Boolean(b) => BoltType::from(*b),
        }
    }
}

/// A parameterized Cypher statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    cypher: String,
    params: BTreeMap<String, ParamValue>,
    columns: Vec<String>,
    include_stats: bool,
}

impl Statement {
    pub fn new(cypher: impl Into<String>) -> Self {
        Self {
            cypher: cypher.into(),
            params: BTreeMap::new(),
            columns: Vec::new(),
            include_stats: false,
        }
    }

    /// Bind a named parameter.
    pub fn param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Declare the columns collected from each returned row.
    pub fn returning(mut self, columns: &[&str]) -> Self {
        for column in columns {
            if !self.columns.iter().any(|c| c == column) {
                self.columns.push((*column).to_string());
            }
        }
        self
    }

    /// Ask for mutation counters.
    ///
    /// The statement must RETURN a single row with a column for each counter
    /// named here, spelled as the [`MutationStats`] field. Those columns are
    /// required like any other; counters not named read as zero.
    pub fn with_stats(mut self, counters: &[&str]) -> Self {
        debug_assert!(
            counters.iter().all(|c| MutationStats::COLUMNS.contains(c)),
            "unknown mutation counter in {counters:?}"
        );
        self.include_stats = true;
        self.returning(counters)
    }

    pub fn cypher(&self) -> &str {
        &self.cypher
    }

    pub fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    pub fn get_param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn include_stats(&self) -> bool {
        self.include_stats
    }

    fn to_query(&self) -> Query {
        self.params
            .iter()
            .fold(neo4rs::query(&self.cypher), |q, (k, v)| q.param(k, v.to_bolt()))
    }
}

/// One returned row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(serde_json::Map<String, Value>);

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    /// A list column of strings. Non-string entries are skipped.
    pub fn get_strings(&self, column: &str) -> Vec<String> {
        match self.get(column) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Map<String, Value>> for Record {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Counters reported by a mutating statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationStats {
    pub labels_added: u64,
    pub labels_removed: u64,
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
}

impl MutationStats {
    pub const COLUMNS: &'static [&'static str] = &[
        "labels_added",
        "labels_removed",
        "nodes_created",
        "nodes_deleted",
        "relationships_created",
        "relationships_deleted",
        "properties_set",
    ];

    /// Read counters from a row. Absent or negative counters are zero.
    pub fn from_record(record: &Record) -> Self {
        let count = |column: &str| record.get_i64(column).unwrap_or(0).max(0) as u64;
        Self {
            labels_added: count("labels_added"),
            labels_removed: count("labels_removed"),
            nodes_created: count("nodes_created"),
            nodes_deleted: count("nodes_deleted"),
            relationships_created: count("relationships_created"),
            relationships_deleted: count("relationships_deleted"),
            properties_set: count("properties_set"),
        }
    }

    pub fn contains_updates(&self) -> bool {
        self.labels_added
            + self.labels_removed
            + self.nodes_created
            + self.nodes_deleted
            + self.relationships_created
            + self.relationships_deleted
            + self.properties_set
            > 0
    }
}

/// Outcome of a single statement within a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    pub records: Vec<Record>,
    pub stats: MutationStats,
}

impl StatementResult {
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }
}

/// Executes statement batches atomically.
#[async_trait]
pub trait GraphSession: Send + Sync {
    /// Run all statements in order as one unit of work.
    ///
    /// Returns one result per statement on success. On failure nothing from
    /// the batch is visible in the graph.
    async fn execute_batch(
        &self,
        statements: &[Statement],
    ) -> Result<Vec<StatementResult>, GraphError>;
}

#[async_trait]
impl GraphSession for GraphClient {
    async fn execute_batch(
        &self,
        statements: &[Statement],
    ) -> Result<Vec<StatementResult>, GraphError> {
        let mut txn = self.start_txn().await?;
        let mut results = Vec::with_capacity(statements.len());

        for statement in statements {
            match run_in_txn(&mut txn, statement).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    if let Err(rollback) = txn.rollback().await {
                        tracing::warn!(error = %rollback, "Rollback failed after statement error");
                    }
                    return Err(e);
                }
            }
        }

        txn.commit().await?;
        tracing::debug!(statements = statements.len(), "Committed statement batch");
        Ok(results)
    }
}

async fn run_in_txn(
    txn: &mut neo4rs::Txn,
    statement: &Statement,
) -> Result<StatementResult, GraphError> {
    let mut stream = txn.execute(statement.to_query()).await?;
    let mut records = Vec::new();

    while let Some(row) = stream.next(txn.handle()).await? {
        records.push(record_from_row(&row, statement.columns())?);
    }

    let stats = match (statement.include_stats(), records.first()) {
        (true, Some(record)) => MutationStats::from_record(record),
        _ => MutationStats::default(),
    };

    Ok(StatementResult { records, stats })
}

/// Collect the declared columns of a row. Every declared column must be present.
fn record_from_row(row: &neo4rs::Row, columns: &[String]) -> Result<Record, GraphError> {
    columns
        .iter()
        .map(|column| {
            row.get::<Value>(column)
                .map(|value| (column.clone(), value))
                .map_err(|e| GraphError::Serialization(format!("column {column}: {e}")))
        })
        .collect()
}
