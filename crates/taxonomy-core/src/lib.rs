//! taxonomy-core: Concept record types shared by the taxonomy graph services.
//!
//! This crate provides:
//! - The industry classification concept record and its alternative identifiers
//! - Decoding of the external JSON representation into a record
//! - The decode error type

pub mod error;
pub mod types;

pub use error::DecodeError;
pub use types::{AlternativeIdentifiers, IndustryClassification};
