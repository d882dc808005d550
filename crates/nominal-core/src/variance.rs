//! Declared type parameters and their variance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How subtyping of a parameter relates to subtyping of the enclosing type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    /// `F[a] <: F[b]` when `a <: b`.
    Covariant,
    /// `F[a] <: F[b]` when `b <: a`.
    Contravariant,
    /// `F[a] <: F[b]` only when `a` and `b` are the same type.
    #[default]
    Invariant,
}

impl Variance {
    /// Swap co- and contravariance. Invariance is its own flip.
    pub fn flip(self) -> Self {
        match self {
            Variance::Covariant => Variance::Contravariant,
            Variance::Contravariant => Variance::Covariant,
            Variance::Invariant => Variance::Invariant,
        }
    }

    /// Variance of a position nested `inner` inside a position of variance `self`.
    pub fn compose(self, inner: Variance) -> Variance {
        match (self, inner) {
            (Variance::Invariant, _) | (_, Variance::Invariant) => Variance::Invariant,
            (outer, inner) if outer == inner => Variance::Covariant,
            _ => Variance::Contravariant,
        }
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variance::Covariant => "covariant",
            Variance::Contravariant => "contravariant",
            Variance::Invariant => "invariant",
        })
    }
}

/// One entry of a type's declared parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    #[serde(default)]
    pub variance: Variance,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, variance: Variance) -> Self {
        Self {
            name: name.into(),
            variance,
        }
    }

    pub fn covariant(name: impl Into<String>) -> Self {
        Self::new(name, Variance::Covariant)
    }

    pub fn contravariant(name: impl Into<String>) -> Self {
        Self::new(name, Variance::Contravariant)
    }

    pub fn invariant(name: impl Into<String>) -> Self {
        Self::new(name, Variance::Invariant)
    }
}
