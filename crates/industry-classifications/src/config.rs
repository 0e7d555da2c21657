//! Configuration for the industry classification service.

use serde::Deserialize;
use taxonomy_graph::GraphConfig;

/// Whether a write always materialises an identifier for the concept's own uuid.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierSeeding {
    /// Only identifiers present in the payload are created.
    #[default]
    ExplicitOnly,
    /// The concept's own uuid is always added to its UPP identifiers.
    IncludeOwnUuid,
}

/// Store behaviour settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub identifier_seeding: IdentifierSeeding,
}

/// Top-level application configuration.
///
/// Loaded from `<prefix>.toml` (`[neo4j]` and `[store]` sections) and
/// `CLASSIFICATIONS__` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub neo4j: GraphConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration. The file is optional; missing keys take defaults.
    pub fn load(file_prefix: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("CLASSIFICATIONS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
