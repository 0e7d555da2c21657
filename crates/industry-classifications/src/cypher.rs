//! Statements that read and reconcile the industry classification graph shape.
//!
//! Shape: a `Thing:Concept:Classification:IndustryClassification` node keyed
//! by `uuid`, with properties `{uuid, prefLabel}`, and one
//! `Identifier:<Source>Identifier {value}` node per alternative identifier,
//! linked by `(identifier)-[:IDENTIFIES]->(concept)`.

use std::collections::BTreeMap;

use taxonomy_graph::Statement;

pub const THING_LABEL: &str = "Thing";
pub const CONCEPT_LABEL: &str = "Concept";
pub const CLASSIFICATION_LABEL: &str = "Classification";
pub const INDUSTRY_CLASSIFICATION_LABEL: &str = "IndustryClassification";
pub const UPP_IDENTIFIER_LABEL: &str = "UPPIdentifier";
pub const FACTSET_IDENTIFIER_LABEL: &str = "FactsetIdentifier";

/// Labels stripped on delete. The classification family label stays behind.
pub const CONCEPT_SPECIFIC_LABELS: &[&str] = &[CONCEPT_LABEL, INDUSTRY_CLASSIFICATION_LABEL];

/// Labels a node may carry and still count as a bare placeholder.
pub const PLACEHOLDER_LABELS: &[&str] = &[THING_LABEL, CLASSIFICATION_LABEL];

/// The uniqueness constraints this store relies on, as `label -> property`.
pub fn constraints() -> BTreeMap<String, String> {
    [
        (THING_LABEL, "uuid"),
        (CONCEPT_LABEL, "uuid"),
        (CLASSIFICATION_LABEL, "uuid"),
        (INDUSTRY_CLASSIFICATION_LABEL, "uuid"),
        (UPP_IDENTIFIER_LABEL, "value"),
        (FACTSET_IDENTIFIER_LABEL, "value"),
    ]
    .into_iter()
    .map(|(label, prop)| (label.to_string(), prop.to_string()))
    .collect()
}

fn labels(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

/// Remove every identifier node, and its edge, pointing at the Thing node.
pub fn detach_identifiers(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         OPTIONAL MATCH (i:Identifier)-[r:IDENTIFIES]->(t)
         WITH collect(r) AS rels, collect(i) AS identifiers
         FOREACH (rel IN rels | DELETE rel)
         FOREACH (identifier IN identifiers | DELETE identifier)
         RETURN size(rels) AS relationships_deleted, size(identifiers) AS nodes_deleted",
    )
    .param("uuid", uuid)
    .with_stats(&["relationships_deleted", "nodes_deleted"])
}

/// Merge the Thing node, replace its properties and add the concept labels.
pub fn upsert_concept(uuid: &str, props: BTreeMap<String, String>) -> Statement {
    Statement::new(
        "MERGE (n:Thing {uuid: $uuid})
         SET n = $allprops
         SET n :Concept:Classification:IndustryClassification",
    )
    .param("uuid", uuid)
    .param("allprops", props)
}

/// Create one fresh identifier node per value and link it to the Thing node.
pub fn create_identifiers(uuid: &str, upp: Vec<String>, factset: Vec<String>) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         FOREACH (value IN $uppIdentifiers |
           CREATE (:Identifier:UPPIdentifier {value: value})-[:IDENTIFIES]->(t))
         FOREACH (value IN $factsetIdentifiers |
           CREATE (:Identifier:FactsetIdentifier {value: value})-[:IDENTIFIES]->(t))",
    )
    .param("uuid", uuid)
    .param("uppIdentifiers", upp)
    .param("factsetIdentifiers", factset)
}

/// Strip the concept-specific labels and identifiers, reset properties to
/// `{uuid}`. Reports how many concept labels were present before removal.
pub fn clear_concept(uuid: &str) -> Statement {
    let props: BTreeMap<String, String> = [("uuid".to_string(), uuid.to_string())].into();
    Statement::new(
        "MATCH (t:Thing:IndustryClassification {uuid: $uuid})
         OPTIONAL MATCH (i:Identifier)-[r:IDENTIFIES]->(t)
         WITH t, collect(r) AS rels, collect(i) AS identifiers,
              size([l IN labels(t) WHERE l IN $conceptLabels]) AS labels_removed
         REMOVE t:Concept:IndustryClassification
         SET t = $props
         FOREACH (rel IN rels | DELETE rel)
         FOREACH (identifier IN identifiers | DELETE identifier)
         RETURN labels_removed,
                size(rels) AS relationships_deleted,
                size(identifiers) AS nodes_deleted",
    )
    .param("uuid", uuid)
    .param("conceptLabels", labels(CONCEPT_SPECIFIC_LABELS))
    .param("props", props)
    .with_stats(&["labels_removed", "relationships_deleted", "nodes_deleted"])
}

/// Delete the Thing node if nothing references it and it is a bare placeholder.
pub fn remove_node_if_unused(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (t:Thing {uuid: $uuid})
         WHERE NOT (t)--()
           AND all(l IN labels(t) WHERE l IN $placeholderLabels)
         DELETE t
         RETURN count(t) AS nodes_deleted",
    )
    .param("uuid", uuid)
    .param("placeholderLabels", labels(PLACEHOLDER_LABELS))
    .with_stats(&["nodes_deleted"])
}

/// Project the concept and its identifier values.
pub fn read_concept(uuid: &str) -> Statement {
    Statement::new(
        "MATCH (n:IndustryClassification {uuid: $uuid})
         OPTIONAL MATCH (upp:UPPIdentifier)-[:IDENTIFIES]->(n)
         OPTIONAL MATCH (factset:FactsetIdentifier)-[:IDENTIFIES]->(n)
         RETURN n.uuid AS uuid, n.prefLabel AS prefLabel,
                collect(DISTINCT upp.value) AS uuids,
                collect(DISTINCT factset.value) AS factsetIdentifiers",
    )
    .param("uuid", uuid)
    .returning(&["uuid", "prefLabel", "uuids", "factsetIdentifiers"])
}

pub fn count_concepts() -> Statement {
    Statement::new("MATCH (n:IndustryClassification) RETURN count(n) AS c").returning(&["c"])
}

/// Cheap round trip used by health checks. `populated` is false on an empty graph.
pub fn ping() -> Statement {
    Statement::new("OPTIONAL MATCH (n) WITH n LIMIT 1 RETURN n IS NOT NULL AS populated")
        .returning(&["populated"])
}
