//! Variance-aware unification behind nearest-common queries.
//!
//! A query folds its operands left to right. Each step unifies every running
//! result with the next operand and keeps the minimal, deduplicated union.
//! Unifying two explicit instances picks outer candidates from the precomputed
//! table, projects both operands onto each candidate, then unifies positions
//! by the candidate's declared variance. Positions that come out empty drop the
//! candidate; the rest combine as a Cartesian product.

use indexmap::IndexMap;
use nominal_core::{ExplicitInstance, GenericInstance, TypeInstance, Variance};

use super::def::DefId;
use super::table::{Direction, NearestTables};
use super::{TypeHierarchy, merge_invariant};

/// Parameter name -> every value it was bound to, with the required relation.
type Bindings = IndexMap<String, Vec<(TypeInstance, Variance)>>;

pub struct Unifier<'a> {
    hierarchy: &'a TypeHierarchy,
    tables: &'a NearestTables,
}

impl<'a> Unifier<'a> {
    pub fn new(hierarchy: &'a TypeHierarchy, tables: &'a NearestTables) -> Self {
        Self { hierarchy, tables }
    }

    /// Nearest common results of all operands. Operands must be normalized;
    /// a single operand is returned unchanged.
    pub fn fold(&self, operands: Vec<TypeInstance>, direction: Direction) -> Vec<TypeInstance> {
        let mut operands = operands.into_iter();
        let Some(first) = operands.next() else {
            return Vec::new();
        };

        let mut results = vec![first];
        for operand in operands {
            let mut next = Vec::new();
            for current in &results {
                for unified in self.unify(current, &operand, direction) {
                    push_unique(&mut next, unified);
                }
            }
            results = self.minimize(next, direction);
            if results.is_empty() {
                break;
            }
        }
        results
    }

    fn unify(&self, a: &TypeInstance, b: &TypeInstance, direction: Direction) -> Vec<TypeInstance> {
        match (a, b) {
            (TypeInstance::Explicit(x), TypeInstance::Explicit(y)) => self
                .unify_explicit(x, y, direction)
                .into_iter()
                .map(TypeInstance::from)
                .collect(),
            (TypeInstance::Generic(generic), TypeInstance::Explicit(explicit))
            | (TypeInstance::Explicit(explicit), TypeInstance::Generic(generic)) => {
                self.absorb(generic, explicit, direction)
            }
            (TypeInstance::Generic(x), TypeInstance::Generic(y)) => self
                .unify_generics(x, y, direction)
                .into_iter()
                .map(TypeInstance::from)
                .collect(),
        }
    }

    fn unify_explicit(&self, a: &ExplicitInstance, b: &ExplicitInstance, direction: Direction) -> Vec<ExplicitInstance> {
        let (Some(a_id), Some(b_id)) = (self.hierarchy.def_id(&a.name), self.hierarchy.def_id(&b.name)) else {
            return Vec::new();
        };

        let mut results = Vec::new();
        for &candidate in self.tables.get(direction, a_id, b_id) {
            let a_projections = self.project(a, candidate, direction);
            let b_projections = self.project(b, candidate, direction);
            for pa in &a_projections {
                for pb in &b_projections {
                    results.extend(self.unify_params(candidate, pa, pb, direction));
                }
            }
        }
        results
    }

    /// Unify two instances of the same type position by position.
    fn unify_params(
        &self,
        candidate: DefId,
        a: &ExplicitInstance,
        b: &ExplicitInstance,
        direction: Direction,
    ) -> Vec<ExplicitInstance> {
        let def = self.hierarchy.def(candidate);
        let mut positions = Vec::with_capacity(def.arity());

        for (i, (x, y)) in a.params.iter().zip(&b.params).enumerate() {
            let options = match def.variance(i) {
                Variance::Covariant => self.fold(vec![x.clone(), y.clone()], direction),
                Variance::Contravariant => self.fold(vec![x.clone(), y.clone()], direction.flip()),
                Variance::Invariant => merge_invariant(x, y).into_iter().collect(),
            };
            if options.is_empty() {
                return Vec::new();
            }
            positions.push(options);
        }

        cartesian(&positions)
            .into_iter()
            .map(|params| ExplicitInstance::new(def.name(), params))
            .collect()
    }

    /// A generic meets an explicit operand.
    ///
    /// Only the bounds facing the query take part: upper bounds narrow a
    /// descendant query, lower bounds widen an ancestor query.
    fn absorb(&self, generic: &GenericInstance, explicit: &ExplicitInstance, direction: Direction) -> Vec<TypeInstance> {
        let bounds = match direction {
            Direction::Descendants => &generic.upper_bounds,
            Direction::Ancestors => &generic.lower_bounds,
        };
        if bounds.is_empty() {
            return vec![explicit.clone().into()];
        }

        let operands = std::iter::once(explicit)
            .chain(bounds)
            .cloned()
            .map(TypeInstance::from)
            .collect();
        self.fold(operands, direction)
    }

    /// Two generics give one anonymous generic with merged bounds, or nothing.
    fn unify_generics(&self, a: &GenericInstance, b: &GenericInstance, direction: Direction) -> Option<GenericInstance> {
        let lower_bounds = self.merge_bounds(&a.lower_bounds, &b.lower_bounds, direction.flip())?;
        let upper_bounds = self.merge_bounds(&a.upper_bounds, &b.upper_bounds, direction)?;

        let consistent = lower_bounds.iter().all(|lower| {
            upper_bounds
                .iter()
                .all(|upper| self.hierarchy.explicit_fulfills(lower, upper))
        });
        consistent.then(|| GenericInstance {
            name: String::new(),
            lower_bounds,
            upper_bounds,
        })
    }

    fn merge_bounds(
        &self,
        a: &[ExplicitInstance],
        b: &[ExplicitInstance],
        direction: Direction,
    ) -> Option<Vec<ExplicitInstance>> {
        if a.is_empty() {
            return Some(b.to_vec());
        }
        if b.is_empty() {
            return Some(a.to_vec());
        }

        let operands = a.iter().chain(b).cloned().map(TypeInstance::from).collect();
        let merged: Vec<ExplicitInstance> = self
            .fold(operands, direction)
            .into_iter()
            .filter_map(|bound| bound.as_explicit().cloned())
            .collect();
        (!merged.is_empty()).then_some(merged)
    }

    /// Drop explicit results that are strictly beyond another result.
    fn minimize(&self, results: Vec<TypeInstance>, direction: Direction) -> Vec<TypeInstance> {
        let beyond = |x: &ExplicitInstance, y: &ExplicitInstance| match direction {
            // x is a strict supertype of y
            Direction::Ancestors => self.strictly_fulfills(y, x),
            Direction::Descendants => self.strictly_fulfills(x, y),
        };

        results
            .iter()
            .filter(|result| {
                let Some(x) = result.as_explicit() else {
                    return true;
                };
                !results
                    .iter()
                    .filter_map(TypeInstance::as_explicit)
                    .any(|y| y != x && beyond(x, y))
            })
            .cloned()
            .collect()
    }

    fn strictly_fulfills(&self, a: &ExplicitInstance, b: &ExplicitInstance) -> bool {
        self.hierarchy.explicit_fulfills(a, b) && !self.hierarchy.explicit_fulfills(b, a)
    }

    // ========== Projection ==========

    /// Re-express `instance` as instances of `candidate`.
    fn project(&self, instance: &ExplicitInstance, candidate: DefId, direction: Direction) -> Vec<ExplicitInstance> {
        match direction {
            Direction::Ancestors => self
                .hierarchy
                .project_up(instance, candidate)
                .into_iter()
                .collect(),
            Direction::Descendants => self.project_down(instance, candidate),
        }
    }

    /// The most general instances of descendant `candidate` that fulfill `instance`.
    fn project_down(&self, instance: &ExplicitInstance, candidate: DefId) -> Vec<ExplicitInstance> {
        let Some(source) = self.hierarchy.type_def(&instance.name) else {
            return Vec::new();
        };
        let target = self.hierarchy.def(candidate);
        let Some(pattern) = target.ancestor_instance(source.id()) else {
            return Vec::new();
        };

        let mut bindings = Bindings::new();
        for (i, (pattern_param, value)) in pattern.params.iter().zip(&instance.params).enumerate() {
            if !self.bind(pattern_param, value, source.variance(i), &mut bindings) {
                return Vec::new();
            }
        }

        let mut positions = Vec::with_capacity(target.arity());
        for param in target.params() {
            let options = match bindings.get(&param.name) {
                Some(entries) => self.resolve(entries),
                None => vec![TypeInstance::anonymous()],
            };
            if options.is_empty() {
                return Vec::new();
            }
            positions.push(options);
        }

        cartesian(&positions)
            .into_iter()
            .map(|params| ExplicitInstance::new(target.name(), params))
            .collect()
    }

    /// Match `pattern` (in the candidate's parameters) against a concrete value.
    ///
    /// `relation` is what the pattern must be to the value: covariant means the
    /// pattern must fulfill the value.
    fn bind(&self, pattern: &TypeInstance, value: &TypeInstance, relation: Variance, bindings: &mut Bindings) -> bool {
        let pattern = match pattern {
            TypeInstance::Generic(generic) => {
                if !generic.is_anonymous() {
                    bindings
                        .entry(generic.name.clone())
                        .or_default()
                        .push((value.clone(), relation));
                }
                return true;
            }
            TypeInstance::Explicit(pattern) => pattern,
        };
        let TypeInstance::Explicit(value) = value else {
            return true;
        };

        match relation {
            Variance::Covariant => {
                let Some(value_def) = self.hierarchy.type_def(&value.name) else {
                    return false;
                };
                match self.hierarchy.project_up(pattern, value_def.id()) {
                    Some(projected) => self.bind_params(&projected, value, relation, bindings),
                    None => false,
                }
            }
            Variance::Contravariant => {
                let Some(pattern_def) = self.hierarchy.type_def(&pattern.name) else {
                    return false;
                };
                match self.hierarchy.project_up(value, pattern_def.id()) {
                    Some(projected) => self.bind_params(pattern, &projected, relation, bindings),
                    None => false,
                }
            }
            Variance::Invariant => pattern.name == value.name && self.bind_params(pattern, value, relation, bindings),
        }
    }

    /// Bind positions of two instances of the same type.
    fn bind_params(
        &self,
        pattern: &ExplicitInstance,
        value: &ExplicitInstance,
        relation: Variance,
        bindings: &mut Bindings,
    ) -> bool {
        let Some(def) = self.hierarchy.type_def(&pattern.name) else {
            return false;
        };
        pattern
            .params
            .iter()
            .zip(&value.params)
            .enumerate()
            .all(|(i, (p, v))| self.bind(p, v, relation.compose(def.variance(i)), bindings))
    }

    /// Pick the most general values satisfying every binding of one parameter.
    fn resolve(&self, entries: &[(TypeInstance, Variance)]) -> Vec<TypeInstance> {
        let entries: Vec<_> = entries
            .iter()
            .filter(|(value, _)| !value.is_unconstrained_generic())
            .collect();
        if entries.is_empty() {
            return vec![TypeInstance::anonymous()];
        }

        let below = values_with(&entries, Variance::Covariant);
        let above = values_with(&entries, Variance::Contravariant);
        let exact = values_with(&entries, Variance::Invariant);

        if let Some((first, rest)) = exact.split_first() {
            let merged = rest
                .iter()
                .try_fold(first.clone(), |acc, value| merge_invariant(&acc, value));
            return merged
                .filter(|value| self.fits(value, &below, &above))
                .into_iter()
                .collect();
        }

        if below.is_empty() {
            return self.fold(above, Direction::Ancestors);
        }
        self.fold(below, Direction::Descendants)
            .into_iter()
            .filter(|value| above.iter().all(|lower| self.hierarchy.fulfills(lower, value)))
            .collect()
    }

    /// `value` fulfills every `below` entry and every `above` entry fulfills it.
    fn fits(&self, value: &TypeInstance, below: &[TypeInstance], above: &[TypeInstance]) -> bool {
        below.iter().all(|upper| self.hierarchy.fulfills(value, upper))
            && above.iter().all(|lower| self.hierarchy.fulfills(lower, value))
    }
}

fn values_with(entries: &[&(TypeInstance, Variance)], wanted: Variance) -> Vec<TypeInstance> {
    entries
        .iter()
        .filter(|(_, relation)| *relation == wanted)
        .map(|(value, _)| value.clone())
        .collect()
}

/// Append unless an equivalent result is already present.
fn push_unique(results: &mut Vec<TypeInstance>, candidate: TypeInstance) {
    if !results.iter().any(|r| r.is_equivalent_to(&candidate)) {
        results.push(candidate);
    }
}

/// Every combination picking one option per position.
fn cartesian(positions: &[Vec<TypeInstance>]) -> Vec<Vec<TypeInstance>> {
    positions.iter().fold(vec![Vec::new()], |combos, options| {
        combos
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| {
                    let mut combo = prefix.clone();
                    combo.push(option.clone());
                    combo
                })
            })
            .collect()
    })
}
