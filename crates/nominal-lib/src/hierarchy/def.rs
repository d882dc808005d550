//! Type definition nodes.
//!
//! Each node owns its closure sets keyed by [`DefId`]. Instance-carrying sets
//! (parents, ancestors) store how the related type is instantiated in terms of
//! this node's own parameters: `listset[t]` records its ancestor `collection` as
//! `collection[t]`.

use indexmap::{IndexMap, IndexSet};
use nominal_core::{ExplicitInstance, ParamDef, TypeInstance, Variance};

/// A lightweight handle to a declared type.
///
/// Assigned in declaration order by [`TypeHierarchy::add_type_def`](super::TypeHierarchy::add_type_def).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DefId(u32);

impl DefId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared type and its position in the hierarchy.
///
/// Append-only: edges are added through
/// [`TypeHierarchy::add_parent`](super::TypeHierarchy::add_parent) and never removed.
#[derive(Debug, Clone)]
pub struct TypeDef {
    id: DefId,
    name: String,
    params: Vec<ParamDef>,
    parents: IndexMap<DefId, ExplicitInstance>,
    children: IndexSet<DefId>,
    /// Self-inclusive.
    ancestors: IndexMap<DefId, ExplicitInstance>,
    /// Self-inclusive.
    descendants: IndexSet<DefId>,
}

impl TypeDef {
    pub(crate) fn new(id: DefId, name: String, params: Vec<ParamDef>) -> Self {
        let mut def = Self {
            id,
            name,
            params,
            parents: IndexMap::new(),
            children: IndexSet::new(),
            ancestors: IndexMap::new(),
            descendants: IndexSet::new(),
        };
        def.ancestors.insert(id, def.instance());
        def.descendants.insert(id);
        def
    }

    pub fn id(&self) -> DefId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Declared variance of parameter `index`; invariant when out of range.
    pub fn variance(&self, index: usize) -> Variance {
        self.params
            .get(index)
            .map_or(Variance::Invariant, |p| p.variance)
    }

    /// The type applied to its own parameters: `list[t]`.
    pub fn instance(&self) -> ExplicitInstance {
        let params = self
            .params
            .iter()
            .map(|p| TypeInstance::generic(p.name.as_str()))
            .collect();
        ExplicitInstance::new(self.name.as_str(), params)
    }

    /// Direct parents with their instantiation.
    pub fn parents(&self) -> impl Iterator<Item = (DefId, &ExplicitInstance)> {
        self.parents.iter().map(|(&id, inst)| (id, inst))
    }

    pub fn children(&self) -> impl Iterator<Item = DefId> + '_ {
        self.children.iter().copied()
    }

    /// Transitive ancestors, self first, with their instantiation.
    pub fn ancestors(&self) -> impl Iterator<Item = (DefId, &ExplicitInstance)> {
        self.ancestors.iter().map(|(&id, inst)| (id, inst))
    }

    /// Transitive descendants, self first.
    pub fn descendants(&self) -> impl Iterator<Item = DefId> + '_ {
        self.descendants.iter().copied()
    }

    pub fn has_parent(&self, id: DefId) -> bool {
        self.parents.contains_key(&id)
    }

    pub fn has_child(&self, id: DefId) -> bool {
        self.children.contains(&id)
    }

    pub fn has_ancestor(&self, id: DefId) -> bool {
        self.ancestors.contains_key(&id)
    }

    pub fn has_descendant(&self, id: DefId) -> bool {
        self.descendants.contains(&id)
    }

    pub fn parent_instance(&self, id: DefId) -> Option<&ExplicitInstance> {
        self.parents.get(&id)
    }

    /// How ancestor `id` is instantiated in terms of this type's parameters.
    pub fn ancestor_instance(&self, id: DefId) -> Option<&ExplicitInstance> {
        self.ancestors.get(&id)
    }

    /// Replace this type's parameters inside `pattern` with `args`.
    ///
    /// Missing arguments and generics that are not parameters of this type
    /// become anonymous generics.
    pub(crate) fn substitute(&self, pattern: &ExplicitInstance, args: &[TypeInstance]) -> ExplicitInstance {
        pattern.map_generics(&mut |generic| {
            self.param_index(&generic.name)
                .and_then(|i| args.get(i))
                .cloned()
                .unwrap_or_else(TypeInstance::anonymous)
        })
    }

    pub(crate) fn insert_parent(&mut self, id: DefId, instance: ExplicitInstance) -> bool {
        self.parents.insert(id, instance).is_none()
    }

    pub(crate) fn insert_child(&mut self, id: DefId) -> bool {
        self.children.insert(id)
    }

    pub(crate) fn insert_ancestor(&mut self, id: DefId, instance: ExplicitInstance) -> bool {
        self.ancestors.insert(id, instance).is_none()
    }

    pub(crate) fn insert_descendant(&mut self, id: DefId) -> bool {
        self.descendants.insert(id)
    }
}
