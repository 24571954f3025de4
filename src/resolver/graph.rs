// Copyright 2025 Cowboy AI, LLC.

//! Typed dependency graph and topological ordering
//!
//! Every constituent function of a composition expands into the chain
//! `inputs -> function -> outputs`, encoding "inputs ready" gates "runs"
//! gates "outputs available". Wiring edges add dependencies between those
//! nodes. Flattening runs Kahn's algorithm with a stable tie-break
//! (insertion order), so the order is deterministic for a given input, and
//! detects cycles instead of looping.

use crate::store::Iri;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use std::fmt;

/// What a graph node represents for its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// All inputs of the function are available
    FunctionInputs,
    /// The function itself runs
    Function,
    /// All outputs of the function are available
    FunctionOutputs,
}

/// A node of the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// The function this node belongs to
    pub function: Iri,
    /// What the node represents
    pub kind: NodeKind,
}

impl Node {
    /// The inputs-ready gate of a function
    pub fn inputs(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            kind: NodeKind::FunctionInputs,
        }
    }

    /// The function-runs node
    pub fn function(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            kind: NodeKind::Function,
        }
    }

    /// The outputs-available gate of a function
    pub fn outputs(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            kind: NodeKind::FunctionOutputs,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::FunctionInputs => write!(f, "{} (inputs)", self.function),
            NodeKind::Function => write!(f, "{}", self.function),
            NodeKind::FunctionOutputs => write!(f, "{} (outputs)", self.function),
        }
    }
}

/// Reverse ordering wrapper so the heap pops the lowest insertion index
#[derive(Debug, PartialEq, Eq)]
struct MinHeapEntry(usize);

impl Ord for MinHeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.0.cmp(&self.0)
    }
}

impl PartialOrd for MinHeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A dependency graph over typed nodes
///
/// Each node maps to the nodes it depends on. Insertion order is preserved
/// and used as the deterministic tie-break when flattening.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    deps: IndexMap<Node, Vec<Node>>,
}

impl DependencyGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the `inputs -> function -> outputs` chain for a function
    ///
    /// Idempotent: a function already present keeps its existing edges.
    pub fn ensure_function(&mut self, function: &str) {
        let function_node = Node::function(function);
        if self.deps.contains_key(&function_node) {
            return;
        }
        self.deps.insert(Node::inputs(function), Vec::new());
        self.deps
            .insert(function_node, vec![Node::inputs(function)]);
        self.deps
            .insert(Node::outputs(function), vec![Node::function(function)]);
    }

    /// Record that `to` depends on `from`
    pub fn add_dependency(&mut self, to: Node, from: Node) {
        self.deps.entry(from.clone()).or_default();
        self.deps.entry(to).or_default().push(from);
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Flatten into a dependency-respecting total order
    ///
    /// Kahn's algorithm; ready nodes are taken lowest-insertion-index
    /// first, so independent nodes keep a stable relative order. On a cycle
    /// the nodes left unordered are returned as the error.
    pub fn flatten(&self) -> Result<Vec<Node>, Vec<Node>> {
        let n = self.deps.len();
        let mut in_degree: Vec<usize> = vec![0; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (idx, deps) in self.deps.values().enumerate() {
            for dep in deps {
                let dep_idx = self
                    .deps
                    .get_index_of(dep)
                    .expect("dependency nodes are inserted on add");
                dependents[dep_idx].push(idx);
                in_degree[idx] += 1;
            }
        }

        let mut heap: BinaryHeap<MinHeapEntry> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(idx, _)| MinHeapEntry(idx))
            .collect();

        let mut order: Vec<usize> = Vec::with_capacity(n);
        while let Some(MinHeapEntry(idx)) = heap.pop() {
            order.push(idx);
            for &next in &dependents[idx] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    heap.push(MinHeapEntry(next));
                }
            }
        }

        if order.len() != n {
            let stuck: Vec<Node> = in_degree
                .iter()
                .enumerate()
                .filter(|(_, d)| **d > 0)
                .map(|(idx, _)| self.deps.get_index(idx).unwrap().0.clone())
                .collect();
            return Err(stuck);
        }

        Ok(order
            .into_iter()
            .map(|idx| self.deps.get_index(idx).unwrap().0.clone())
            .collect())
    }
}
