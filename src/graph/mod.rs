//! Dependency graph engine.
//!
//! Builds a name-keyed adjacency map from a document's packages and derives
//! roots, per-package depth and cycles from it. Packages sharing a name
//! collapse into one node.
//!
//! Both traversals use an explicit stack, so arbitrarily long dependency
//! chains cannot overflow the call stack.

use crate::model::{DependencyTree, Document};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Name-keyed dependency adjacency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    adjacency: IndexMap<String, Vec<String>>,
}

/// Traversal state of a node during depth computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done(usize),
}

#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    node: &'a str,
    next: usize,
    height: usize,
}

impl DependencyGraph {
    /// Build the adjacency map from every package's dependency list.
    ///
    /// Every package name gets an entry, even with no dependencies. Target
    /// names that are not package names appear only as neighbors.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let mut adjacency: IndexMap<String, Vec<String>> = IndexMap::new();
        for package in &document.packages {
            let entry = adjacency.entry(package.name.clone()).or_default();
            entry.extend(package.dependencies.iter().map(|d| d.target_name.clone()));
        }
        Self { adjacency }
    }

    /// Package name to dependency names
    #[must_use]
    pub fn adjacency(&self) -> &IndexMap<String, Vec<String>> {
        &self.adjacency
    }

    fn neighbors(&self, node: &str) -> &[String] {
        self.adjacency.get(node).map_or(&[], Vec::as_slice)
    }

    /// Names with no outgoing dependencies
    #[must_use]
    pub fn roots(&self) -> Vec<String> {
        self.adjacency
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Sum of all adjacency list lengths
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Longest path length (in edges) starting at each node.
    ///
    /// Leaves have depth 0. An edge back to a node still on the traversal
    /// stack counts once and is not followed, so cyclic graphs terminate with
    /// a finite depth. Results are memoized across start nodes.
    #[must_use]
    pub fn depths(&self) -> IndexMap<String, usize> {
        let mut state: HashMap<&str, Visit> = HashMap::with_capacity(self.adjacency.len());

        for start in self.adjacency.keys() {
            if state.contains_key(start.as_str()) {
                continue;
            }
            state.insert(start, Visit::OnStack);
            let mut stack = vec![Frame {
                node: start,
                next: 0,
                height: 0,
            }];

            while let Some(&frame) = stack.last() {
                let neighbors = self.neighbors(frame.node);
                let Some(child) = neighbors.get(frame.next) else {
                    stack.pop();
                    state.insert(frame.node, Visit::Done(frame.height));
                    if let Some(parent) = stack.last_mut() {
                        parent.height = parent.height.max(frame.height + 1);
                    }
                    continue;
                };

                let mut push = None;
                let mut height = frame.height;
                match state.get(child.as_str()) {
                    Some(Visit::Done(depth)) => height = height.max(depth + 1),
                    Some(Visit::OnStack) => height = height.max(1),
                    None if self.adjacency.contains_key(child) => push = Some(child.as_str()),
                    // dangling target: a leaf
                    None => height = height.max(1),
                }
                if let Some(top) = stack.last_mut() {
                    top.next += 1;
                    top.height = height;
                }
                if let Some(node) = push {
                    state.insert(node, Visit::OnStack);
                    stack.push(Frame {
                        node,
                        next: 0,
                        height: 0,
                    });
                }
            }
        }

        self.adjacency
            .keys()
            .map(|name| {
                let depth = match state.get(name.as_str()) {
                    Some(Visit::Done(depth)) => *depth,
                    _ => 0,
                };
                (name.clone(), depth)
            })
            .collect()
    }

    /// Find cycles with a depth-first search over adjacency keys in order.
    ///
    /// Every edge to a node on the current path yields one cycle: the path
    /// slice from that node, closed by repeating it. Fully explored nodes are
    /// never entered again.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.adjacency.len());
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        let mut path: Vec<&str> = Vec::new();

        for start in self.adjacency.keys() {
            if !visited.insert(start.as_str()) {
                continue;
            }
            on_path.insert(start, 0);
            path.push(start);
            let mut stack: Vec<(&str, usize)> = vec![(start, 0)];

            while let Some(&(node, next)) = stack.last() {
                let Some(child) = self.neighbors(node).get(next) else {
                    stack.pop();
                    path.pop();
                    on_path.remove(node);
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                let child = child.as_str();
                if let Some(&position) = on_path.get(child) {
                    let mut cycle: Vec<String> =
                        path[position..].iter().map(|s| (*s).to_string()).collect();
                    cycle.push(child.to_string());
                    cycles.push(cycle);
                } else if visited.insert(child) {
                    on_path.insert(child, path.len());
                    path.push(child);
                    stack.push((child, 0));
                }
            }
        }

        cycles
    }

    /// Derive the full dependency tree
    #[must_use]
    pub fn to_tree(&self) -> DependencyTree {
        let depth_map = self.depths();
        let max_depth = depth_map.values().copied().max().unwrap_or(0);
        DependencyTree {
            root_packages: self.roots(),
            dependency_graph: self.adjacency.clone(),
            depth_map,
            cycles: self.cycles(),
            total_dependencies: self.edge_count(),
            max_depth,
        }
    }
}

/// Build the dependency tree of a document
#[must_use]
pub fn build_tree(document: &Document) -> DependencyTree {
    let tree = DependencyGraph::from_document(document).to_tree();
    tracing::debug!(
        "Dependency graph: {} nodes, {} edges, max depth {}, {} cycles",
        tree.dependency_graph.len(),
        tree.total_dependencies,
        tree.max_depth,
        tree.cycles.len()
    );
    tree
}
