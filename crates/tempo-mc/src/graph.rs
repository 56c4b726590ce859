//! Reachability graph.

use ahash::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use tempo_ta::SharedIdentity;

/// Handle to a node of a [`ReachGraph`]. Handles stay valid for the
/// lifetime of the graph and are never reused for a different state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

struct NodeData<S> {
    state: S,
    initial: bool,
    r#final: bool,
}

struct EdgeData<T> {
    src: NodeId,
    tgt: NodeId,
    transition: T,
}

/// Index key wrapping a state with its shared-identity hash and equality,
/// so the dedup table compares handles instead of contents.
struct SharedKey<S>(S);

impl<S: SharedIdentity> PartialEq for SharedKey<S> {
    fn eq(&self, other: &Self) -> bool {
        self.0.shared_eq(&other.0)
    }
}

impl<S: SharedIdentity> Eq for SharedKey<S> {}

impl<S: SharedIdentity> Hash for SharedKey<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.shared_hash());
    }
}

/// Deduplicated node store plus edge list over the states of a transition
/// system. Lookup uses shared equality: states produced by an interning
/// system resolve with pointer comparisons.
pub struct ReachGraph<S, T> {
    nodes: Vec<NodeData<S>>,
    edges: Vec<EdgeData<T>>,
    index: HashMap<SharedKey<S>, NodeId, RandomState>,
}

impl<S, T> ReachGraph<S, T>
where
    S: SharedIdentity + Clone,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            index: HashMap::default(),
        }
    }

    /// Interns a state. Returns whether the node is new, and its handle.
    pub fn add_node(&mut self, state: S) -> (bool, NodeId) {
        if let Some(&id) = self.index.get(&SharedKey(state.clone())) {
            return (false, id);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            state: state.clone(),
            initial: false,
            r#final: false,
        });
        self.index.insert(SharedKey(state), id);
        (true, id)
    }

    /// Appends an edge. Edges are not deduplicated.
    pub fn add_edge(&mut self, src: NodeId, tgt: NodeId, transition: T) {
        self.edges.push(EdgeData {
            src,
            tgt,
            transition,
        });
    }

    pub fn state(&self, id: NodeId) -> &S {
        &self.nodes[id.index()].state
    }

    pub fn is_initial(&self, id: NodeId) -> bool {
        self.nodes[id.index()].initial
    }

    pub fn is_final(&self, id: NodeId) -> bool {
        self.nodes[id.index()].r#final
    }

    pub fn set_initial(&mut self, id: NodeId, initial: bool) {
        self.nodes[id.index()].initial = initial;
    }

    pub fn set_final(&mut self, id: NodeId, r#final: bool) {
        self.nodes[id.index()].r#final = r#final;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Edges as `(src, tgt, transition)`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &T)> + '_ {
        self.edges.iter().map(|e| (e.src, e.tgt, &e.transition))
    }
}

impl<S, T> Default for ReachGraph<S, T>
where
    S: SharedIdentity + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
