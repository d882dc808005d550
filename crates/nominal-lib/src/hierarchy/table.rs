//! Pairwise nearest-common-ancestor and nearest-common-descendant tables.
//!
//! Built once by [`TypeHierarchy::finalize`](super::TypeHierarchy::finalize).
//! Both tables come from the same routine run in opposite directions: nodes are
//! visited in Kahn order (parents first for ancestors, children first for
//! descendants), so every cell only depends on rows that are already complete.

use std::collections::VecDeque;

use super::def::{DefId, TypeDef};

/// Which way a nearest-common query walks the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards parents: nearest common ancestors.
    Ancestors,
    /// Towards children: nearest common descendants.
    Descendants,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Ancestors => Direction::Descendants,
            Direction::Descendants => Direction::Ancestors,
        }
    }

    /// One step away from the query result: parents for ancestors.
    fn steps(self, def: &TypeDef) -> Vec<DefId> {
        match self {
            Direction::Ancestors => def.parents().map(|(id, _)| id).collect(),
            Direction::Descendants => def.children().collect(),
        }
    }

    /// Opposite of `steps`: the nodes waiting on `def` in the Kahn order.
    fn back_steps(self, def: &TypeDef) -> Vec<DefId> {
        self.flip().steps(def)
    }

    /// `other` lies beyond `def` in this direction (self-inclusive).
    fn reaches(self, def: &TypeDef, other: DefId) -> bool {
        match self {
            Direction::Ancestors => def.has_descendant(other),
            Direction::Descendants => def.has_ancestor(other),
        }
    }
}

/// `width × width` matrix of minimal result lists.
#[derive(Debug, Clone)]
pub struct NearestTable {
    width: usize,
    cells: Vec<Vec<DefId>>,
}

impl NearestTable {
    /// `defs` must be indexed by `DefId`.
    pub fn build(defs: &[&TypeDef], direction: Direction) -> Self {
        let width = defs.len();
        let mut cells = vec![Vec::new(); width * width];

        for t1 in kahn_order(defs, direction) {
            let def = defs[t1.index()];
            let steps = direction.steps(def);

            for t2 in 0..width {
                let cell = if direction.reaches(def, DefId::from_raw(t2 as u32)) {
                    vec![t1]
                } else {
                    let mut candidates = Vec::new();
                    for step in &steps {
                        for &id in &cells[step.index() * width + t2] {
                            if !candidates.contains(&id) {
                                candidates.push(id);
                            }
                        }
                    }
                    minimize(defs, candidates, direction)
                };
                cells[t1.index() * width + t2] = cell;
            }
        }

        tracing::debug!(?direction, types = width, "built nearest table");
        Self { width, cells }
    }

    /// Results for the pair, sorted by `DefId`.
    pub fn get(&self, a: DefId, b: DefId) -> &[DefId] {
        if a.index() >= self.width || b.index() >= self.width {
            return &[];
        }
        &self.cells[a.index() * self.width + b.index()]
    }
}

/// Both tables of a finalized hierarchy.
#[derive(Debug, Clone)]
pub struct NearestTables {
    ancestors: NearestTable,
    descendants: NearestTable,
}

impl NearestTables {
    pub fn build(defs: &[&TypeDef]) -> Self {
        Self {
            ancestors: NearestTable::build(defs, Direction::Ancestors),
            descendants: NearestTable::build(defs, Direction::Descendants),
        }
    }

    pub fn get(&self, direction: Direction, a: DefId, b: DefId) -> &[DefId] {
        match direction {
            Direction::Ancestors => self.ancestors.get(a, b),
            Direction::Descendants => self.descendants.get(a, b),
        }
    }
}

/// A node becomes eligible once all of its steps are processed.
fn kahn_order(defs: &[&TypeDef], direction: Direction) -> Vec<DefId> {
    let mut pending: Vec<usize> = defs
        .iter()
        .map(|def| direction.steps(def).len())
        .collect();
    let mut queue: VecDeque<DefId> = defs
        .iter()
        .filter(|def| pending[def.id().index()] == 0)
        .map(|def| def.id())
        .collect();

    let mut order = Vec::with_capacity(defs.len());
    while let Some(id) = queue.pop_front() {
        order.push(id);
        for next in direction.back_steps(defs[id.index()]) {
            pending[next.index()] -= 1;
            if pending[next.index()] == 0 {
                queue.push_back(next);
            }
        }
    }
    order
}

/// Drop every candidate that reaches another candidate.
fn minimize(defs: &[&TypeDef], candidates: Vec<DefId>, direction: Direction) -> Vec<DefId> {
    let mut kept: Vec<DefId> = candidates
        .iter()
        .copied()
        .filter(|&x| {
            !candidates
                .iter()
                .any(|&y| y != x && direction.reaches(defs[x.index()], y))
        })
        .collect();
    kept.sort();
    kept
}
