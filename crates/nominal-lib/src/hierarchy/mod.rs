//! The type hierarchy: a registry of type definitions plus subtyping and
//! nearest-common queries over it.
//!
//! Lifecycle:
//! 1. **Open**: declare types with [`TypeHierarchy::add_type_def`] and connect
//!    them with [`TypeHierarchy::add_parent`].
//! 2. **Finalized**: [`TypeHierarchy::finalize`] precomputes the pairwise
//!    [`NearestTables`]; nearest common ancestor/descendant queries need them.
//!
//! Subtyping (`type_fulfills_type`) and compatibility checks work in both states.

mod def;
mod table;
mod unify;

#[cfg(test)]
mod mod_tests;

pub use def::{DefId, TypeDef};
pub use table::{Direction, NearestTable, NearestTables};

use indexmap::{IndexMap, IndexSet};
use nominal_core::{ExplicitInstance, GenericInstance, ParamDef, RawTypeDecl, TypeInstance, Variance};

use crate::parser::parse_type;
use crate::{Error, Result};
use unify::Unifier;

#[derive(Debug, Clone)]
enum State {
    Open,
    Finalized(NearestTables),
}

/// Registry of type definitions, indexed by declaration order.
#[derive(Debug, Clone)]
pub struct TypeHierarchy {
    defs: IndexMap<String, TypeDef>,
    state: State,
}

impl Default for TypeHierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeHierarchy {
    pub fn new() -> Self {
        Self {
            defs: IndexMap::new(),
            state: State::Open,
        }
    }

    /// Declare every type, connect every parent, then finalize.
    pub fn from_manifest(decls: &[RawTypeDecl]) -> Result<Self> {
        let mut hierarchy = Self::new();
        for decl in decls {
            hierarchy.add_type_def(decl.name.as_str(), decl.params.clone())?;
        }
        for decl in decls {
            for parent in &decl.parents {
                hierarchy.add_parent(&decl.name, parse_type(parent)?)?;
            }
        }
        hierarchy.finalize();
        Ok(hierarchy)
    }

    // ========== Construction ==========

    pub fn add_type_def(&mut self, name: impl Into<String>, params: Vec<ParamDef>) -> Result<DefId> {
        self.ensure_open()?;

        let name = name.into();
        if self.defs.contains_key(&name) {
            return Err(Error::DuplicateTypeDef(name));
        }

        let mut seen = IndexSet::new();
        for param in &params {
            if !seen.insert(param.name.as_str()) {
                return Err(Error::DuplicateParamNames {
                    type_name: name,
                    param: param.name.clone(),
                });
            }
        }

        let id = DefId::from_raw(self.defs.len() as u32);
        tracing::trace!(%name, arity = params.len(), "declared type");
        self.defs.insert(name.clone(), TypeDef::new(id, name, params));
        Ok(id)
    }

    /// Make `parent` a direct parent of `child`.
    ///
    /// `parent` is written in `child`'s parameters (`collection[t]` for `list[t]`).
    /// Adding the same instantiation twice is a no-op. An instantiation that only
    /// differs from an inherited one by `_` positions is merged with it, keeping
    /// the more specific side. Every descendant of `child` inherits every ancestor
    /// of `parent`; nothing is recorded when that would give a type two
    /// instantiations of one ancestor.
    pub fn add_parent(&mut self, child: &str, parent: TypeInstance) -> Result<()> {
        self.ensure_open()?;

        let child_id = self
            .def_id(child)
            .ok_or_else(|| Error::UndefinedType(child.to_owned()))?;

        let TypeInstance::Explicit(parent) = parent else {
            return Err(Error::IncompatibleType(format!(
                "parent of `{child}` must be an explicit type, found `{parent}`"
            )));
        };
        let mut parent = self.normalize_explicit(&parent)?;
        if let Some(message) = parent_generic_error(self.def(child_id), &parent.params) {
            return Err(Error::IncompatibleType(message));
        }
        let parent_id = self.id_of(&parent.name)?;

        let child_def = self.def(child_id);
        if child_def.has_descendant(parent_id) {
            return Err(Error::CyclicParent {
                child: child.to_owned(),
                parent: parent.name,
            });
        }

        if let Some(existing) = child_def.ancestor_instance(parent_id) {
            match refine(existing, &parent) {
                Some(refined) => parent = refined,
                None => {
                    return Err(Error::ConflictingAncestor {
                        type_name: child.to_owned(),
                        existing: existing.to_string(),
                        incoming: parent.to_string(),
                    });
                }
            }
        }
        if child_def.parent_instance(parent_id) == Some(&parent) {
            return Ok(());
        }

        let plan = self.plan_inheritance(child_id, parent_id, &parent)?;
        tracing::trace!(child, %parent, inherited = plan.len(), "added parent");

        self.def_mut(child_id).insert_parent(parent_id, parent);
        self.def_mut(parent_id).insert_child(child_id);
        for (descendant, ancestor, instance) in plan {
            self.def_mut(descendant).insert_ancestor(ancestor, instance);
            self.def_mut(ancestor).insert_descendant(descendant);
        }
        Ok(())
    }

    /// Every (descendant of child, ancestor of parent) pair the new edge creates,
    /// with the ancestor re-expressed in the descendant's parameters.
    fn plan_inheritance(
        &self,
        child_id: DefId,
        parent_id: DefId,
        parent: &ExplicitInstance,
    ) -> Result<Vec<(DefId, DefId, ExplicitInstance)>> {
        let child_def = self.def(child_id);
        let parent_def = self.def(parent_id);
        let mut plan = Vec::new();

        for descendant_id in child_def.descendants() {
            let descendant = self.def(descendant_id);
            let Some(child_in_descendant) = descendant.ancestor_instance(child_id) else {
                continue;
            };

            for (ancestor_id, ancestor_in_parent) in parent_def.ancestors() {
                let in_child = parent_def.substitute(ancestor_in_parent, &parent.params);
                let incoming = child_def.substitute(&in_child, &child_in_descendant.params);

                let Some(existing) = descendant.ancestor_instance(ancestor_id) else {
                    plan.push((descendant_id, ancestor_id, incoming));
                    continue;
                };
                match refine(existing, &incoming) {
                    Some(refined) if &refined == existing => {}
                    Some(refined) => plan.push((descendant_id, ancestor_id, refined)),
                    None => {
                        return Err(Error::ConflictingAncestor {
                            type_name: descendant.name().to_owned(),
                            existing: existing.to_string(),
                            incoming: incoming.to_string(),
                        });
                    }
                }
            }
        }
        Ok(plan)
    }

    /// Precompute the nearest-common tables. A second call does nothing.
    pub fn finalize(&mut self) {
        if self.is_finalized() {
            return;
        }
        let defs: Vec<&TypeDef> = self.defs.values().collect();
        let tables = NearestTables::build(&defs);
        tracing::debug!(types = defs.len(), "finalized type hierarchy");
        self.state = State::Finalized(tables);
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, State::Finalized(_))
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            State::Open => Ok(()),
            State::Finalized(_) => Err(Error::AlreadyFinalized),
        }
    }

    fn tables(&self) -> Result<&NearestTables> {
        match &self.state {
            State::Open => Err(Error::NotFinalized),
            State::Finalized(tables) => Ok(tables),
        }
    }

    // ========== Lookup ==========

    pub fn def_id(&self, name: &str) -> Option<DefId> {
        self.defs
            .get_index_of(name)
            .map(|index| DefId::from_raw(index as u32))
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.defs.get(name)
    }

    /// All definitions in declaration order.
    pub fn type_defs(&self) -> impl Iterator<Item = &TypeDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub(crate) fn def(&self, id: DefId) -> &TypeDef {
        &self.defs[id.index()]
    }

    fn def_mut(&mut self, id: DefId) -> &mut TypeDef {
        &mut self.defs[id.index()]
    }

    fn id_of(&self, name: &str) -> Result<DefId> {
        self.def_id(name)
            .ok_or_else(|| Error::IncompatibleType(format!("`{name}` is not a registered type")))
    }

    // ========== Compatibility ==========

    /// Whether every name in `instance` is registered with a matching arity and
    /// every generic's lower bounds fulfill its upper bounds.
    pub fn type_is_compatible(&self, instance: &TypeInstance) -> bool {
        self.validate(instance).is_ok()
    }

    /// `normalize`, then reject generics whose lower bounds do not fulfill their upper bounds.
    pub(crate) fn validate(&self, instance: &TypeInstance) -> Result<TypeInstance> {
        let normalized = self.normalize(instance)?;
        self.check_bound_ranges(&normalized)?;
        Ok(normalized)
    }

    /// Check names and arities, and fill raw references with anonymous generics.
    pub(crate) fn normalize(&self, instance: &TypeInstance) -> Result<TypeInstance> {
        match instance {
            TypeInstance::Explicit(explicit) => Ok(self.normalize_explicit(explicit)?.into()),
            TypeInstance::Generic(generic) => Ok(self.normalize_generic(generic)?.into()),
        }
    }

    fn normalize_explicit(&self, explicit: &ExplicitInstance) -> Result<ExplicitInstance> {
        let def = self.def(self.id_of(&explicit.name)?);

        if explicit.params.is_empty() {
            let params = vec![TypeInstance::anonymous(); def.arity()];
            return Ok(ExplicitInstance::new(explicit.name.as_str(), params));
        }
        if explicit.params.len() != def.arity() {
            return Err(Error::IncompatibleType(format!(
                "`{explicit}` has {} parameters but `{}` declares {}",
                explicit.params.len(),
                def.name(),
                def.arity()
            )));
        }

        let params = explicit
            .params
            .iter()
            .map(|param| self.normalize(param))
            .collect::<Result<Vec<_>>>()?;
        Ok(ExplicitInstance::new(explicit.name.as_str(), params))
    }

    fn normalize_generic(&self, generic: &GenericInstance) -> Result<GenericInstance> {
        let normalize_all = |bounds: &[ExplicitInstance]| {
            bounds
                .iter()
                .map(|bound| self.normalize_explicit(bound))
                .collect::<Result<Vec<_>>>()
        };
        Ok(GenericInstance {
            name: generic.name.clone(),
            lower_bounds: normalize_all(&generic.lower_bounds)?,
            upper_bounds: normalize_all(&generic.upper_bounds)?,
        })
    }

    /// Every generic in `instance`, nested ones included, has a consistent range.
    fn check_bound_ranges(&self, instance: &TypeInstance) -> Result<()> {
        match instance {
            TypeInstance::Explicit(explicit) => explicit
                .params
                .iter()
                .try_for_each(|param| self.check_bound_ranges(param)),
            TypeInstance::Generic(generic) => {
                for lower in &generic.lower_bounds {
                    for upper in &generic.upper_bounds {
                        if !self.explicit_fulfills(lower, upper) {
                            return Err(Error::IncompatibleType(format!(
                                "lower bound `{lower}` of `{generic}` does not fulfill upper bound `{upper}`"
                            )));
                        }
                    }
                }
                generic
                    .lower_bounds
                    .iter()
                    .chain(&generic.upper_bounds)
                    .flat_map(|bound| &bound.params)
                    .try_for_each(|param| self.check_bound_ranges(param))
            }
        }
    }

    // ========== Subtyping ==========

    /// Whether `provided` can be used where `expected` is expected.
    ///
    /// Unregistered names or wrong arities make the answer `false`.
    pub fn type_fulfills_type(&self, provided: &TypeInstance, expected: &TypeInstance) -> bool {
        match (self.validate(provided), self.validate(expected)) {
            (Ok(provided), Ok(expected)) => self.fulfills(&provided, &expected),
            _ => false,
        }
    }

    /// Subtyping over normalized instances.
    pub(crate) fn fulfills(&self, provided: &TypeInstance, expected: &TypeInstance) -> bool {
        match (provided, expected) {
            // An expected generic is a type variable: lower <: provided <: upper.
            (_, TypeInstance::Generic(variable)) => {
                variable
                    .lower_bounds
                    .iter()
                    .all(|lower| self.fulfills(&lower.clone().into(), provided))
                    && variable
                        .upper_bounds
                        .iter()
                        .all(|upper| self.fulfills(provided, &upper.clone().into()))
            }
            (TypeInstance::Generic(generic), TypeInstance::Explicit(expected)) => {
                if !generic.is_constrained() {
                    return true;
                }
                generic
                    .lower_bounds
                    .iter()
                    .all(|lower| self.explicit_fulfills(lower, expected))
                    && (generic.upper_bounds.is_empty()
                        || self.share_descendant(generic.upper_bounds.iter().chain([expected])))
            }
            (TypeInstance::Explicit(provided), TypeInstance::Explicit(expected)) => {
                self.explicit_fulfills(provided, expected)
            }
        }
    }

    pub(crate) fn explicit_fulfills(&self, provided: &ExplicitInstance, expected: &ExplicitInstance) -> bool {
        let Some(expected_def) = self.type_def(&expected.name) else {
            return false;
        };
        let Some(projected) = self.project_up(provided, expected_def.id()) else {
            return false;
        };

        projected
            .params
            .iter()
            .zip(&expected.params)
            .enumerate()
            .all(|(i, (have, want))| match expected_def.variance(i) {
                Variance::Covariant => self.fulfills(have, want),
                Variance::Contravariant => self.fulfills(want, have),
                Variance::Invariant => merge_invariant(have, want).is_some(),
            })
    }

    /// Re-express `instance` as an instance of its ancestor `target`.
    pub(crate) fn project_up(&self, instance: &ExplicitInstance, target: DefId) -> Option<ExplicitInstance> {
        let def = self.type_def(&instance.name)?;
        let pattern = def.ancestor_instance(target)?;
        Some(def.substitute(pattern, &instance.params))
    }

    /// Some registered type descends from every one of `instances`' types.
    fn share_descendant<'a>(&self, instances: impl IntoIterator<Item = &'a ExplicitInstance>) -> bool {
        let mut common: Option<Vec<DefId>> = None;
        for instance in instances {
            let Some(def) = self.type_def(&instance.name) else {
                return false;
            };
            common = Some(match common {
                None => def.descendants().collect(),
                Some(ids) => ids.into_iter().filter(|&id| def.has_descendant(id)).collect(),
            });
        }
        common.is_some_and(|ids| !ids.is_empty())
    }

    // ========== Nearest common ancestors / descendants ==========

    /// Minimal common supertypes of `operands`.
    pub fn nearest_common_ancestors(&self, operands: &[TypeInstance]) -> Result<Vec<TypeInstance>> {
        self.nearest_common(operands, Direction::Ancestors)
    }

    /// Maximal common subtypes of `operands`.
    pub fn nearest_common_descendants(&self, operands: &[TypeInstance]) -> Result<Vec<TypeInstance>> {
        self.nearest_common(operands, Direction::Descendants)
    }

    /// No operands give no results. A single operand comes back normalized, so
    /// a raw `list` is returned as `list[_]`.
    ///
    /// Every operand must reference registered types with matching arities.
    /// Descendant queries also reject generics with an empty bound range;
    /// ancestor queries only look at lower bounds, so the range is not checked.
    pub fn nearest_common(&self, operands: &[TypeInstance], direction: Direction) -> Result<Vec<TypeInstance>> {
        let tables = self.tables()?;
        let operands = operands
            .iter()
            .map(|operand| match direction {
                Direction::Ancestors => self.normalize(operand),
                Direction::Descendants => self.validate(operand),
            })
            .collect::<Result<Vec<_>>>()?;

        let results = Unifier::new(self, tables).fold(operands, direction);
        tracing::debug!(?direction, results = results.len(), "nearest common query");
        Ok(results)
    }
}

/// Equal up to unconstrained generics; returns the more specific side.
pub(crate) fn merge_invariant(a: &TypeInstance, b: &TypeInstance) -> Option<TypeInstance> {
    match (a, b) {
        _ if a.is_unconstrained_generic() => Some(b.clone()),
        _ if b.is_unconstrained_generic() => Some(a.clone()),
        (TypeInstance::Explicit(x), TypeInstance::Explicit(y))
            if x.name == y.name && x.params.len() == y.params.len() =>
        {
            let params = x
                .params
                .iter()
                .zip(&y.params)
                .map(|(p, q)| merge_invariant(p, q))
                .collect::<Option<Vec<_>>>()?;
            Some(ExplicitInstance::new(x.name.as_str(), params).into())
        }
        (TypeInstance::Generic(x), TypeInstance::Generic(y)) if x.is_equivalent_to(y) => Some(a.clone()),
        _ => None,
    }
}

/// Two instantiations of one ancestor that differ only where one side is `_`.
///
/// Returns the more specific of the two, or `None` when they disagree.
/// Named generics are the child's parameters and only match themselves.
fn refine(a: &ExplicitInstance, b: &ExplicitInstance) -> Option<ExplicitInstance> {
    if a.name != b.name || a.params.len() != b.params.len() {
        return None;
    }
    let params = a
        .params
        .iter()
        .zip(&b.params)
        .map(|(x, y)| match (x, y) {
            _ if is_wildcard(x) => Some(y.clone()),
            _ if is_wildcard(y) => Some(x.clone()),
            (TypeInstance::Explicit(x), TypeInstance::Explicit(y)) => refine(x, y).map(TypeInstance::from),
            _ => (x == y).then(|| x.clone()),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(ExplicitInstance::new(a.name.as_str(), params))
}

fn is_wildcard(instance: &TypeInstance) -> bool {
    matches!(instance, TypeInstance::Generic(generic) if generic.is_anonymous() && !generic.is_constrained())
}

/// Generics in a parent must be unconstrained and name a parameter of the child.
fn parent_generic_error(child: &TypeDef, params: &[TypeInstance]) -> Option<String> {
    params.iter().find_map(|param| match param {
        TypeInstance::Explicit(explicit) => parent_generic_error(child, &explicit.params),
        TypeInstance::Generic(generic) if generic.is_constrained() => Some(format!(
            "parent of `{}` cannot contain the bounded generic `{generic}`",
            child.name()
        )),
        TypeInstance::Generic(generic) if generic.is_anonymous() || child.param_index(&generic.name).is_some() => None,
        TypeInstance::Generic(generic) => Some(format!(
            "`{}` is not a parameter of `{}`",
            generic.name,
            child.name()
        )),
    })
}
