//! Test utilities: manifest fixtures and query shorthands.

use indoc::indoc;
use nominal_core::{TypeInstance, parse_manifest};

use crate::{TypeHierarchy, parse_type};

/// Numbers plus covariant, contravariant and invariant containers.
pub const COLLECTIONS: &str = indoc! {r#"
    [
      { "name": "number" },
      { "name": "int", "parents": ["number"] },
      { "name": "float", "parents": ["number"] },
      { "name": "collection", "params": [{ "name": "t", "variance": "covariant" }] },
      { "name": "list", "params": [{ "name": "t", "variance": "covariant" }], "parents": ["collection[t]"] },
      { "name": "set", "params": [{ "name": "t", "variance": "covariant" }], "parents": ["collection[t]"] },
      { "name": "listset", "params": [{ "name": "t", "variance": "covariant" }], "parents": ["list[t]", "set[t]"] },
      { "name": "consumer", "params": [{ "name": "t", "variance": "contravariant" }] },
      { "name": "cell", "params": [{ "name": "t" }] },
      { "name": "pair", "params": [{ "name": "k", "variance": "covariant" }, { "name": "v", "variance": "covariant" }] },
      { "name": "flipped", "params": [{ "name": "a", "variance": "covariant" }, { "name": "b", "variance": "covariant" }], "parents": ["pair[b, a]"] }
    ]
"#};

pub fn ty(source: &str) -> TypeInstance {
    parse_type(source).unwrap_or_else(|e| panic!("`{source}` should parse: {e}"))
}

pub fn join(results: &[TypeInstance]) -> String {
    results
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TypeHierarchy {
    /// Build and finalize a hierarchy from manifest JSON.
    pub fn expect_manifest(json: &str) -> Self {
        let decls = parse_manifest(json).expect("manifest should be valid JSON");
        Self::from_manifest(&decls).expect("manifest should build")
    }

    pub fn expect_collections() -> Self {
        Self::expect_manifest(COLLECTIONS)
    }

    /// Open hierarchy with plain types and `(child, parent)` edges.
    pub fn expect_plain(names: &[&str], edges: &[(&str, &str)]) -> Self {
        let mut hierarchy = Self::new();
        for name in names {
            hierarchy.add_type_def(*name, vec![]).expect("unique name");
        }
        for (child, parent) in edges {
            hierarchy
                .add_parent(child, TypeInstance::named(*parent))
                .expect("valid edge");
        }
        hierarchy
    }

    pub fn expect_nca(&self, operands: &[&str]) -> String {
        let operands: Vec<_> = operands.iter().map(|s| ty(s)).collect();
        join(&self.nearest_common_ancestors(&operands).expect("query should succeed"))
    }

    pub fn expect_ncd(&self, operands: &[&str]) -> String {
        let operands: Vec<_> = operands.iter().map(|s| ty(s)).collect();
        join(&self.nearest_common_descendants(&operands).expect("query should succeed"))
    }

    pub fn expect_fulfills(&self, provided: &str, expected: &str) -> bool {
        self.type_fulfills_type(&ty(provided), &ty(expected))
    }
}
