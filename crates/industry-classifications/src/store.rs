//! The industry classification store.
//!
//! Maps [`IndustryClassification`] records onto the graph and back. Writes
//! fully replace the concept's properties and identifiers; deletes strip the
//! concept and drop the node only when nothing else still points at it.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use taxonomy_core::{AlternativeIdentifiers, DecodeError, IndustryClassification};
use taxonomy_graph::{GraphSession, SchemaGuard};

use crate::config::{IdentifierSeeding, StoreConfig};
use crate::cypher;
use crate::error::{Operation, Result, StoreError};

/// Reads and writes industry classifications through a graph session.
///
/// Holds no caches or locks; every call is one batch against the session.
pub struct ClassificationStore<S, G> {
    session: S,
    schema: G,
    config: StoreConfig,
}

impl<S: GraphSession, G: SchemaGuard> ClassificationStore<S, G> {
    pub fn new(session: S, schema: G, config: StoreConfig) -> Self {
        Self {
            session,
            schema,
            config,
        }
    }

    /// Ensure the uniqueness constraints for every label this store manages.
    pub async fn initialise(&self) -> Result<()> {
        self.schema
            .ensure_constraints(&cypher::constraints())
            .await
            .map_err(StoreError::Schema)
    }

    /// Verify the graph is reachable.
    pub async fn check(&self) -> Result<()> {
        let results = self
            .session
            .execute_batch(&[cypher::ping()])
            .await
            .map_err(StoreError::Connectivity)?;

        let populated = results
            .first()
            .and_then(|r| r.first())
            .and_then(|r| r.get("populated"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !populated {
            tracing::warn!("Graph is reachable but contains no nodes");
        }
        Ok(())
    }

    /// Look up a classification by uuid. `None` when no concept matches.
    pub async fn read(&self, uuid: &str, tid: &str) -> Result<Option<IndustryClassification>> {
        let results = self
            .session
            .execute_batch(&[cypher::read_concept(uuid)])
            .await
            .map_err(|source| StoreError::Lookup {
                uuid: uuid.to_string(),
                source,
            })?;

        let Some(row) = results.first().and_then(|r| r.first()) else {
            tracing::debug!(uuid, transaction_id = tid, "Industry classification not found");
            return Ok(None);
        };

        let mut uuids = row.get_strings("uuids");
        uuids.sort();
        uuids.dedup();

        let record = IndustryClassification {
            uuid: row.get_str("uuid").unwrap_or(uuid).to_string(),
            pref_label: row
                .get_str("prefLabel")
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            alternative_identifiers: AlternativeIdentifiers {
                factset_identifier: row.get_strings("factsetIdentifiers").into_iter().min(),
                uuids,
            },
        };

        tracing::debug!(uuid, transaction_id = tid, "Read industry classification");
        Ok(Some(record))
    }

    /// Upsert a classification, replacing its properties and identifiers.
    ///
    /// The three statements go out as one batch: detach old identifiers,
    /// merge the node with its full property set and labels, create the new
    /// identifiers. On error none of them took effect.
    pub async fn write(&self, record: &IndustryClassification, tid: &str) -> Result<()> {
        let uuid = record.uuid.as_str();
        if uuid.trim().is_empty() {
            return Err(StoreError::MalformedInput(DecodeError::MissingUuid));
        }

        let (upp, factset) = self.identifiers(record);
        let batch = [
            cypher::detach_identifiers(uuid),
            cypher::upsert_concept(uuid, node_properties(record)),
            cypher::create_identifiers(uuid, upp.clone(), factset.clone()),
        ];

        let results = self
            .session
            .execute_batch(&batch)
            .await
            .map_err(|source| StoreError::Persistence {
                operation: Operation::Write,
                uuid: uuid.to_string(),
                source,
            })?;

        let detached = results.first().map(|r| r.stats).unwrap_or_default();
        tracing::info!(
            uuid,
            transaction_id = tid,
            identifiers_removed = detached.nodes_deleted,
            upp_identifiers = upp.len(),
            factset_identifiers = factset.len(),
            "Wrote industry classification"
        );
        Ok(())
    }

    /// Delete a classification.
    ///
    /// Returns `true` only if a concept was actually stripped from the node.
    /// The node itself is removed when it is left as an unreferenced
    /// placeholder; otherwise it stays so other entities' edges remain valid.
    pub async fn delete(&self, uuid: &str, tid: &str) -> Result<bool> {
        let batch = [
            cypher::clear_concept(uuid),
            cypher::remove_node_if_unused(uuid),
        ];

        let results = self
            .session
            .execute_batch(&batch)
            .await
            .map_err(|source| StoreError::Persistence {
                operation: Operation::Delete,
                uuid: uuid.to_string(),
                source,
            })?;

        let cleared = results.first().map(|r| r.stats).unwrap_or_default();
        let removed = results.get(1).map(|r| r.stats).unwrap_or_default();
        let deleted = cleared.contains_updates() && cleared.labels_removed > 0;

        tracing::info!(
            uuid,
            transaction_id = tid,
            deleted,
            identifiers_removed = cleared.nodes_deleted,
            node_removed = removed.nodes_deleted > 0,
            "Deleted industry classification"
        );
        Ok(deleted)
    }

    /// Number of nodes carrying the industry classification label.
    pub async fn count(&self) -> Result<u64> {
        let results = self
            .session
            .execute_batch(&[cypher::count_concepts()])
            .await
            .map_err(StoreError::Count)?;

        let count = results
            .first()
            .and_then(|r| r.first())
            .and_then(|r| r.get_i64("c"))
            .unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    /// Decode a JSON payload into a record, returning its uuid alongside.
    pub fn decode_json<R: Read>(&self, reader: R) -> Result<(IndustryClassification, String)> {
        Ok(IndustryClassification::decode_json(reader)?)
    }

    /// Identifier values to materialise, per source, de-duplicated.
    fn identifiers(&self, record: &IndustryClassification) -> (Vec<String>, Vec<String>) {
        let mut upp: BTreeSet<String> = record
            .alternative_identifiers
            .uuids
            .iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect();
        if self.config.identifier_seeding == IdentifierSeeding::IncludeOwnUuid {
            upp.insert(record.uuid.clone());
        }

        let factset = record
            .alternative_identifiers
            .factset_identifier
            .iter()
            .filter(|v| !v.is_empty())
            .cloned()
            .collect();

        (upp.into_iter().collect(), factset)
    }
}

/// The node's full property set: every non-empty field of the record.
fn node_properties(record: &IndustryClassification) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    props.insert("uuid".to_string(), record.uuid.clone());
    if let Some(label) = record.pref_label() {
        props.insert("prefLabel".to_string(), label.to_string());
    }
    props
}
