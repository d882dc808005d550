#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Nominal type hierarchies.
//!
//! Two layers:
//! - **Deserialization layer**: 1:1 mapping to a hierarchy manifest (JSON)
//! - **Value layer**: type instances and parameter declarations shared by the
//!   parser, the hierarchy and its callers

mod instance;
mod variance;

pub use instance::{ExplicitInstance, GenericInstance, TypeInstance};
pub use variance::{ParamDef, Variance};

#[cfg(test)]
mod lib_tests;

// ============================================================================
// Deserialization Layer
// ============================================================================

/// Raw type declaration from a hierarchy manifest.
///
/// Parents are kept as type-expression text; they can only be resolved once
/// every declaration of the manifest is known.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RawTypeDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// Parse manifest content into raw declarations.
pub fn parse_manifest(json: &str) -> Result<Vec<RawTypeDecl>, serde_json::Error> {
    serde_json::from_str(json)
}
