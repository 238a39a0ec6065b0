//! Dependency Graph Module
//!
//! Maps a dependency key to the keys derived from it, so invalidating the
//! dependency can cascade to everything built on top of it. A reverse index
//! lets a dropped dependent shed its incoming edges without a full scan.

use std::collections::{HashMap, HashSet, VecDeque};

// == Dependency Graph ==
/// Edges from a dependency key to its dependent keys.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: HashMap<String, HashSet<String>>,
    /// Reverse of `edges`: dependent -> its dependencies
    requires: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Records that `dependent` must be invalidated whenever `dependency` is.
    pub fn add(&mut self, dependency: &str, dependent: &str) {
        self.edges
            .entry(dependency.to_string())
            .or_default()
            .insert(dependent.to_string());
        self.requires
            .entry(dependent.to_string())
            .or_default()
            .insert(dependency.to_string());
    }

    // == Drop Dependent ==
    /// Removes every edge pointing at `dependent`. Edges out of it stay, so
    /// invalidating it later still reaches whatever was built on it.
    pub fn remove_dependent(&mut self, dependent: &str) {
        let Some(dependencies) = self.requires.remove(dependent) else {
            return;
        };
        for dependency in dependencies {
            unlink(&mut self.edges, &dependency, dependent);
        }
    }

    // == Cascade ==
    /// Collects `root` and every key reachable from it, consuming the walked
    /// edges.
    ///
    /// Each key appears once in the result, so self-references and cycles
    /// terminate. Order is breadth-first from `root`.
    pub fn cascade_from(&mut self, root: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root.to_string()]);

        while let Some(key) = queue.pop_front() {
            if !visited.insert(key.clone()) {
                continue;
            }
            if let Some(dependents) = self.edges.remove(&key) {
                for dependent in &dependents {
                    unlink(&mut self.requires, dependent, &key);
                }
                queue.extend(dependents.into_iter().filter(|d| !visited.contains(d)));
            }
            order.push(key);
        }

        order
    }

    /// Dependents registered directly on `dependency`.
    pub fn dependents_of(&self, dependency: &str) -> Vec<String> {
        self.edges
            .get(dependency)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.requires.clear();
    }

    /// Number of dependency keys with at least one registered dependent.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Total number of registered edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Removes `member` from the set under `key`, dropping the set once empty.
fn unlink(index: &mut HashMap<String, HashSet<String>>, key: &str, member: &str) {
    if let Some(set) = index.get_mut(key) {
        set.remove(member);
        if set.is_empty() {
            index.remove(key);
        }
    }
}
