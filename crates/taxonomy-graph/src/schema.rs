//! Uniqueness constraint management.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::client::{GraphClient, GraphError};

/// Ensures uniqueness constraints exist on label/property pairs.
#[async_trait]
pub trait SchemaGuard: Send + Sync {
    /// Create a uniqueness constraint for each `label -> property` entry.
    ///
    /// Safe to call repeatedly; existing constraints are left alone.
    async fn ensure_constraints(
        &self,
        constraints: &BTreeMap<String, String>,
    ) -> Result<(), GraphError>;
}

#[async_trait]
impl SchemaGuard for GraphClient {
    async fn ensure_constraints(
        &self,
        constraints: &BTreeMap<String, String>,
    ) -> Result<(), GraphError> {
        for (label, property) in constraints {
            let cypher = constraint_statement(label, property)?;
            self.run(neo4rs::query(&cypher)).await?;
        }

        tracing::info!(constraints = constraints.len(), "Uniqueness constraints ensured");
        Ok(())
    }
}

/// Build the `CREATE CONSTRAINT` statement for a label/property pair.
///
/// Labels and properties cannot be parameters in Cypher, so both are checked
/// to be plain identifiers before interpolation.
pub fn constraint_statement(label: &str, property: &str) -> Result<String, GraphError> {
    validate_identifier(label)?;
    validate_identifier(property)?;

    let name = format!("{}_{}_unique", label.to_lowercase(), property.to_lowercase());
    Ok(format!(
        "CREATE CONSTRAINT {name} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{property} IS UNIQUE"
    ))
}

fn validate_identifier(ident: &str) -> Result<(), GraphError> {
    let mut chars = ident.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(GraphError::InvalidSchema(ident.to_string()))
    }
}
