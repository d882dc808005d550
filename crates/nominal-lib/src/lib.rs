//! Nominal: a type hierarchy engine with variance-aware unification.
//!
//! Declare named types, connect them with (possibly parameterized) parent edges,
//! finalize, then ask subtyping questions and compute nearest common ancestors
//! and descendants of arbitrary operand sets.
//!
//! # Example
//!
//! ```
//! use nominal_lib::{TypeHierarchy, parse_type};
//! use nominal_core::ParamDef;
//!
//! let mut hierarchy = TypeHierarchy::new();
//! hierarchy.add_type_def("number", vec![]).unwrap();
//! hierarchy.add_type_def("int", vec![]).unwrap();
//! hierarchy.add_type_def("float", vec![]).unwrap();
//! hierarchy.add_type_def("list", vec![ParamDef::covariant("t")]).unwrap();
//! hierarchy.add_parent("int", parse_type("number").unwrap()).unwrap();
//! hierarchy.add_parent("float", parse_type("number").unwrap()).unwrap();
//! hierarchy.finalize();
//!
//! let operands = [parse_type("list[int]").unwrap(), parse_type("list[float]").unwrap()];
//! let nca = hierarchy.nearest_common_ancestors(&operands).unwrap();
//! assert_eq!(nca[0].to_string(), "list[number]");
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod hierarchy;
pub mod parser;

#[cfg(test)]
mod test_utils;

pub use hierarchy::{DefId, TypeDef, TypeHierarchy};
pub use parser::{ParseError, SyntaxError, parse_type, render_errors};

/// Errors raised while building or querying a type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operand, bound or parent does not fit the registered types.
    #[error("incompatible type: {0}")]
    IncompatibleType(String),

    /// Nearest common ancestor/descendant query before `finalize()`.
    #[error("type hierarchy is not finalized")]
    NotFinalized,

    /// Mutation after `finalize()`.
    #[error("type hierarchy is already finalized")]
    AlreadyFinalized,

    #[error("type `{0}` is already defined")]
    DuplicateTypeDef(String),

    #[error("type `{type_name}` declares parameter `{param}` more than once")]
    DuplicateParamNames { type_name: String, param: String },

    #[error("type `{0}` is not defined")]
    UndefinedType(String),

    /// The new edge would make a type its own ancestor.
    #[error("`{parent}` cannot be a parent of `{child}`: `{child}` is already one of its ancestors")]
    CyclicParent { child: String, parent: String },

    /// A type would inherit the same ancestor under two instantiations.
    #[error("type `{type_name}` already inherits `{existing}` and cannot also inherit `{incoming}`")]
    ConflictingAncestor {
        type_name: String,
        existing: String,
        incoming: String,
    },

    #[error(transparent)]
    ParseError(#[from] ParseError),
}

/// Result type for hierarchy operations.
pub type Result<T> = std::result::Result<T, Error>;
