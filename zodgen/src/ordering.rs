//! Intra-entity declaration ordering.
//!
//! Models inside one module are declared so that every model comes after
//! the sibling models its validator refers to. Kahn's algorithm does the
//! work; when only cycles remain, the lexicographically smallest model whose
//! remaining dependencies all lead back to it is emitted to break the cycle.
//! Cycle edges are rendered as placeholders by the emitter, so a broken
//! cycle never produces a forward reference at runtime.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::generator::GeneratedModel;

/// Declaration order of one entity's models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Schema names in declaration order
    pub order: Vec<String>,

    /// Models emitted to break a cycle, in the order they were chosen
    pub tie_breaks: Vec<String>,
}

impl DependencyOrder {
    /// Compute the order of `(name, references)` pairs.
    ///
    /// References to names outside the member set are ignored, as are
    /// self-references. Members without intra-entity dependencies come
    /// first, sorted by name; dependents follow in topological order with
    /// ties broken by name.
    pub fn compute<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let members: Vec<(&str, &[String])> = members.into_iter().collect();
        let names: BTreeSet<&str> = members.iter().map(|(name, _)| *name).collect();

        // pending[X] = unresolved dependencies of X
        let mut pending: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        // dependents[Y] = members that depend on Y
        let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (name, references) in &members {
            let deps: BTreeSet<&str> = references
                .iter()
                .map(String::as_str)
                .filter(|r| r != name && names.contains(r))
                .collect();
            for dep in &deps {
                dependents.entry(*dep).or_default().insert(*name);
            }
            pending.entry(*name).or_default().extend(deps);
        }

        let mut order: Vec<String> = Vec::with_capacity(pending.len());
        let mut tie_breaks = Vec::new();

        let independent: Vec<&str> = pending
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| *name)
            .collect();

        let mut ready: BTreeSet<&str> = BTreeSet::new();
        for name in independent {
            pending.remove(name);
            order.push(name.to_string());
            release(name, &dependents, &mut pending, &mut ready);
        }

        while !pending.is_empty() {
            let next = match ready.pop_first() {
                Some(name) => name,
                None => {
                    // Only cycles and their dependents remain
                    let Some(name) = pending
                        .keys()
                        .copied()
                        .find(|name| closes_cycles_only(name, &pending))
                        .or_else(|| pending.keys().next().copied())
                    else {
                        break;
                    };
                    debug!(schema = %name, "breaking dependency cycle");
                    tie_breaks.push(name.to_string());
                    name
                }
            };
            if pending.remove(next).is_none() {
                continue;
            }
            order.push(next.to_string());
            release(next, &dependents, &mut pending, &mut ready);
        }

        Self { order, tie_breaks }
    }

    /// Compute the order of generated models.
    pub fn for_models(models: &[GeneratedModel]) -> Self {
        Self::compute(
            models
                .iter()
                .map(|m| (m.name.as_str(), m.referenced_schemas.as_slice())),
        )
    }

    /// Position of a schema in the order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Check whether a cycle had to be broken.
    pub fn has_cycles(&self) -> bool {
        !self.tie_breaks.is_empty()
    }

    /// Rearrange models into this order.
    ///
    /// Models whose name is not part of the order keep their relative
    /// order at the end.
    pub fn apply(&self, models: Vec<GeneratedModel>) -> Vec<GeneratedModel> {
        let mut by_name: BTreeMap<String, GeneratedModel> = BTreeMap::new();
        let mut rest = Vec::new();
        for model in models {
            if self.order.contains(&model.name) && !by_name.contains_key(&model.name) {
                by_name.insert(model.name.clone(), model);
            } else {
                rest.push(model);
            }
        }
        let mut ordered: Vec<GeneratedModel> = self
            .order
            .iter()
            .filter_map(|name| by_name.remove(name))
            .collect();
        ordered.extend(rest);
        ordered
    }
}

/// Mark `name` as emitted and move dependents with nothing left pending to
/// the ready set.
fn release<'a>(
    name: &'a str,
    dependents: &BTreeMap<&'a str, BTreeSet<&'a str>>,
    pending: &mut BTreeMap<&'a str, BTreeSet<&'a str>>,
    ready: &mut BTreeSet<&'a str>,
) {
    let Some(users) = dependents.get(name) else {
        return;
    };
    for user in users {
        if let Some(deps) = pending.get_mut(user) {
            deps.remove(name);
            if deps.is_empty() {
                ready.insert(*user);
            }
        }
    }
}

/// Check whether every pending dependency of `name` lies on a cycle
/// through `name`, so emitting it only leaves cycle edges unresolved.
fn closes_cycles_only(name: &str, pending: &BTreeMap<&str, BTreeSet<&str>>) -> bool {
    pending
        .get(name)
        .is_some_and(|deps| deps.iter().all(|dep| reaches(dep, name, pending)))
}

/// Check whether `to` is reachable from `from` through pending dependencies.
fn reaches(from: &str, to: &str, pending: &BTreeMap<&str, BTreeSet<&str>>) -> bool {
    let mut stack = vec![from];
    let mut seen = BTreeSet::new();
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            if let Some(deps) = pending.get(node) {
                stack.extend(deps.iter().copied());
            }
        }
    }
    false
}

/// Order generated models for declaration.
pub fn order_models(models: Vec<GeneratedModel>) -> (Vec<GeneratedModel>, DependencyOrder) {
    let order = DependencyOrder::for_models(&models);
    (order.apply(models), order)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// In an acyclic entity every dependency precedes its dependent.
        #[test]
        fn prop_dependencies_precede_dependents(
            edges in prop::collection::vec((0usize..10, 0usize..10), 0..30)
        ) {
            // Only edges from higher to lower index keep the graph acyclic
            let mut references: Vec<Vec<String>> = vec![Vec::new(); 10];
            for (from, to) in edges {
                if from > to {
                    references[from].push(format!("M{}", to));
                }
            }
            let names: Vec<String> = (0..10).map(|i| format!("M{}", i)).collect();
            let order = DependencyOrder::compute(
                names.iter().zip(&references).map(|(n, r)| (n.as_str(), r.as_slice())),
            );

            prop_assert_eq!(order.order.len(), 10);
            prop_assert!(order.tie_breaks.is_empty());
            for (i, refs) in references.iter().enumerate() {
                let me = order.position(&names[i]).unwrap();
                for dep in refs {
                    prop_assert!(order.position(dep).unwrap() < me);
                }
            }
        }

        /// Any graph, cyclic or not, is ordered totally and deterministically.
        #[test]
        fn prop_total_and_deterministic(
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..24)
        ) {
            let mut references: Vec<Vec<String>> = vec![Vec::new(); 8];
            for (from, to) in edges {
                references[from].push(format!("M{}", to));
            }
            let names: Vec<String> = (0..8).map(|i| format!("M{}", i)).collect();
            let forward = DependencyOrder::compute(
                names.iter().zip(&references).map(|(n, r)| (n.as_str(), r.as_slice())),
            );
            let backward = DependencyOrder::compute(
                names.iter().zip(&references).rev().map(|(n, r)| (n.as_str(), r.as_slice())),
            );

            prop_assert_eq!(&forward, &backward);
            let mut sorted = forward.order.clone();
            sorted.sort();
            prop_assert_eq!(sorted, names);
        }
    }
}
