//! Concept record types for industry classifications.
//!
//! Field names follow the external JSON representation (`uuid`, `prefLabel`,
//! `alternativeIdentifiers`), which is also the property naming used on the
//! graph nodes.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// An industry classification concept.
///
/// `uuid` is the sole join key and never changes once a concept is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryClassification {
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,

    #[serde(default)]
    pub alternative_identifiers: AlternativeIdentifiers,
}

/// Secondary identifiers, grouped by the system that issued them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeIdentifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factset_identifier: Option<String>,

    #[serde(default)]
    pub uuids: Vec<String>,
}

impl IndustryClassification {
    /// Create a record with just a uuid.
    pub fn new(uuid: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            ..Default::default()
        }
    }

    /// Set the preferred label.
    pub fn with_pref_label(mut self, label: impl Into<String>) -> Self {
        self.pref_label = Some(label.into());
        self
    }

    /// Add a UPP alternative identifier.
    pub fn with_alternative_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.alternative_identifiers.uuids.push(uuid.into());
        self
    }

    /// Set the FactSet identifier.
    pub fn with_factset_identifier(mut self, id: impl Into<String>) -> Self {
        self.alternative_identifiers.factset_identifier = Some(id.into());
        self
    }

    /// The preferred label, if present and non-empty.
    pub fn pref_label(&self) -> Option<&str> {
        self.pref_label.as_deref().filter(|l| !l.is_empty())
    }

    /// Decode a record from its JSON representation.
    ///
    /// Returns the record together with its uuid so callers can correlate it
    /// with an identifier supplied out of band (e.g. a URL path segment).
    pub fn decode_json<R: Read>(reader: R) -> Result<(Self, String), DecodeError> {
        let record: Self = serde_json::from_reader(reader)?;
        if record.uuid.trim().is_empty() {
            return Err(DecodeError::MissingUuid);
        }
        let uuid = record.uuid.clone();
        Ok((record, uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let json = r#"{
            "uuid": "f21a5cc0-d326-4e62-b84a-d840c2209fee",
            "prefLabel": "Oil & Gas",
            "alternativeIdentifiers": {
                "factsetIdentifier": "FS-1200",
                "uuids": ["f21a5cc0-d326-4e62-b84a-d840c2209fee", "0b3a4e5c-0000-4e62-b84a-d840c2209fee"]
            }
        }"#;

        let (record, uuid) = IndustryClassification::decode_json(json.as_bytes()).unwrap();
        assert_eq!(uuid, "f21a5cc0-d326-4e62-b84a-d840c2209fee");
        assert_eq!(record.pref_label(), Some("Oil & Gas"));
        assert_eq!(
            record.alternative_identifiers.factset_identifier.as_deref(),
            Some("FS-1200")
        );
        assert_eq!(record.alternative_identifiers.uuids.len(), 2);
    }

    #[test]
    fn test_decode_minimal_payload() {
        let (record, uuid) = IndustryClassification::decode_json(r#"{"uuid":"abc"}"#.as_bytes()).unwrap();
        assert_eq!(uuid, "abc");
        assert_eq!(record, IndustryClassification::new("abc"));
        assert!(record.alternative_identifiers.uuids.is_empty());
    }

    #[test]
    fn test_decode_rejects_missing_uuid() {
        let err = IndustryClassification::decode_json(r#"{"prefLabel":"x"}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));

        let err = IndustryClassification::decode_json(r#"{"uuid":"  "}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingUuid));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let err = IndustryClassification::decode_json("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_empty_pref_label_is_treated_as_absent() {
        let record = IndustryClassification::new("abc").with_pref_label("");
        assert_eq!(record.pref_label(), None);
    }

    #[test]
    fn test_special_characters_survive_decoding() {
        let json = r#"{"uuid":"abc","prefLabel":"Telecom `Services` – Café"}"#;
        let (record, _) = IndustryClassification::decode_json(json.as_bytes()).unwrap();
        assert_eq!(record.pref_label(), Some("Telecom `Services` – Café"));
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let json = serde_json::to_value(IndustryClassification::new("abc")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"uuid": "abc", "alternativeIdentifiers": {"uuids": []}})
        );
    }
}
