//! Type instances: the values every hierarchy query consumes and produces.
//!
//! Two variants:
//! - **Explicit**: a named type, optionally applied to parameter instances (`list[int]`)
//! - **Generic**: a type variable, optionally bounded from below and/or above
//!   (`int <: t <: number`). An empty name marks an anonymous (inferred) variable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A type value: either a concrete named type or a type variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeInstance {
    Explicit(ExplicitInstance),
    Generic(GenericInstance),
}

/// A named type applied to positional parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplicitInstance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeInstance>,
}

/// A type variable with ordered lower and upper bounds.
///
/// Bounds are explicit instances only. Use [`GenericInstance::bounded`] to build one
/// from arbitrary instances; generic entries are dropped there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericInstance {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lower_bounds: Vec<ExplicitInstance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub upper_bounds: Vec<ExplicitInstance>,
}

impl TypeInstance {
    /// Explicit instance without parameters.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Explicit(ExplicitInstance::new(name, Vec::new()))
    }

    pub fn explicit(name: impl Into<String>, params: Vec<TypeInstance>) -> Self {
        Self::Explicit(ExplicitInstance::new(name, params))
    }

    /// Unconstrained type variable.
    pub fn generic(name: impl Into<String>) -> Self {
        Self::Generic(GenericInstance::unconstrained(name))
    }

    /// Unconstrained type variable without a name.
    pub fn anonymous() -> Self {
        Self::Generic(GenericInstance::default())
    }

    pub fn name(&self) -> &str {
        match self {
            TypeInstance::Explicit(explicit) => &explicit.name,
            TypeInstance::Generic(generic) => &generic.name,
        }
    }

    pub fn as_explicit(&self) -> Option<&ExplicitInstance> {
        match self {
            TypeInstance::Explicit(explicit) => Some(explicit),
            TypeInstance::Generic(_) => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericInstance> {
        match self {
            TypeInstance::Explicit(_) => None,
            TypeInstance::Generic(generic) => Some(generic),
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, TypeInstance::Explicit(_))
    }

    /// True for a generic without any bound. Such a variable never narrows a result.
    pub fn is_unconstrained_generic(&self) -> bool {
        matches!(self, TypeInstance::Generic(generic) if !generic.is_constrained())
    }

    /// Looser equality used to deduplicate inferred generics.
    ///
    /// Generics compare by bounds only (order-insensitive, name ignored).
    /// Explicit instances compare structurally.
    pub fn is_equivalent_to(&self, other: &TypeInstance) -> bool {
        match (self, other) {
            (TypeInstance::Explicit(a), TypeInstance::Explicit(b)) => a == b,
            (TypeInstance::Generic(a), TypeInstance::Generic(b)) => a.is_equivalent_to(b),
            _ => false,
        }
    }

    /// Rebuild the instance, replacing every generic with `f(generic)`.
    ///
    /// Bounds of replaced generics are not visited.
    pub fn map_generics<F>(&self, f: &mut F) -> TypeInstance
    where
        F: FnMut(&GenericInstance) -> TypeInstance,
    {
        match self {
            TypeInstance::Explicit(explicit) => TypeInstance::Explicit(explicit.map_generics(f)),
            TypeInstance::Generic(generic) => f(generic),
        }
    }
}

impl ExplicitInstance {
    pub fn new(name: impl Into<String>, params: Vec<TypeInstance>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn map_generics<F>(&self, f: &mut F) -> ExplicitInstance
    where
        F: FnMut(&GenericInstance) -> TypeInstance,
    {
        ExplicitInstance {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.map_generics(f)).collect(),
        }
    }
}

impl GenericInstance {
    pub fn unconstrained(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a bounded generic, silently dropping non-explicit bounds.
    pub fn bounded(
        name: impl Into<String>,
        lower_bounds: impl IntoIterator<Item = TypeInstance>,
        upper_bounds: impl IntoIterator<Item = TypeInstance>,
    ) -> Self {
        Self {
            name: name.into(),
            lower_bounds: explicit_only(lower_bounds),
            upper_bounds: explicit_only(upper_bounds),
        }
    }

    pub fn is_constrained(&self) -> bool {
        !self.lower_bounds.is_empty() || !self.upper_bounds.is_empty()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_equivalent_to(&self, other: &GenericInstance) -> bool {
        same_bounds(&self.lower_bounds, &other.lower_bounds)
            && same_bounds(&self.upper_bounds, &other.upper_bounds)
    }
}

fn explicit_only(bounds: impl IntoIterator<Item = TypeInstance>) -> Vec<ExplicitInstance> {
    bounds
        .into_iter()
        .filter_map(|bound| match bound {
            TypeInstance::Explicit(explicit) => Some(explicit),
            TypeInstance::Generic(_) => None,
        })
        .collect()
}

fn same_bounds(a: &[ExplicitInstance], b: &[ExplicitInstance]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(x)) && b.iter().all(|y| a.contains(y))
}

impl From<ExplicitInstance> for TypeInstance {
    fn from(explicit: ExplicitInstance) -> Self {
        TypeInstance::Explicit(explicit)
    }
}

impl From<GenericInstance> for TypeInstance {
    fn from(generic: GenericInstance) -> Self {
        TypeInstance::Generic(generic)
    }
}

// ============================================================================
// Display (renders the type-expression grammar)
// ============================================================================

impl fmt::Display for TypeInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInstance::Explicit(explicit) => explicit.fmt(f),
            TypeInstance::Generic(generic) => generic.fmt(f),
        }
    }
}

impl fmt::Display for ExplicitInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.params.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for GenericInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.is_anonymous() { "_" } else { &self.name };
        match (self.lower_bounds.is_empty(), self.upper_bounds.is_empty()) {
            (true, true) => f.write_str(name),
            (true, false) => {
                write!(f, "{name} <: ")?;
                write_bounds(f, &self.upper_bounds)
            }
            (false, true) => {
                write!(f, "{name} >: ")?;
                write_bounds(f, &self.lower_bounds)
            }
            (false, false) => {
                write_bounds(f, &self.lower_bounds)?;
                write!(f, " <: {name} <: ")?;
                write_bounds(f, &self.upper_bounds)
            }
        }
    }
}

fn write_bounds(f: &mut fmt::Formatter<'_>, bounds: &[ExplicitInstance]) -> fmt::Result {
    for (i, bound) in bounds.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{bound}")?;
    }
    Ok(())
}
