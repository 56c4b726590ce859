//! Reachability algorithm.

use crate::graph::{NodeId, ReachGraph};
use crate::stats::Stats;
use crate::waiting::{self, Policy, Waiting};
use tempo_ta::{LabelSet, ModelError, SharedIdentity, TransitionSystem};
use tracing::{debug, info};

/// Builds the reachability graph of `ts` from its initial states, driven by
/// a waiting container of the given policy, until a state satisfying
/// `labels` is reached (if any).
///
/// A node is created for each encountered state and an edge for each
/// computed transition; with empty `labels` the graph is the full
/// reachability graph of `ts`. Returns the run statistics; model-level
/// errors abort the run.
pub fn run<TS>(
    ts: &mut TS,
    graph: &mut ReachGraph<TS::State, TS::Transition>,
    labels: LabelSet,
    policy: Policy<NodeId>,
) -> Result<Stats, ModelError>
where
    TS: TransitionSystem,
    TS::State: SharedIdentity,
{
    let mut waiting = waiting::waiting(policy);
    let mut stats = Stats::new();
    stats.set_start_time();

    let mut sst = Vec::new();
    ts.initial(&mut sst)?;
    debug!(count = sst.len(), "initial states");
    for (_, state, _) in sst.drain(..) {
        let (is_new, node) = graph.add_node(state);
        graph.set_initial(node, true);
        if is_new {
            waiting.insert(node);
        }
    }

    explore(ts, graph, labels, waiting.as_mut(), &mut stats)?;

    stats.set_end_time();
    info!(
        visited_states = stats.visited_states,
        visited_transitions = stats.visited_transitions,
        reachable = stats.reachable,
        "reachability run finished"
    );
    Ok(stats)
}

/// Same as [`run`], but starts from the nodes already in `waiting` instead
/// of the initial states of `ts`.
pub fn run_from_waiting<TS>(
    ts: &mut TS,
    graph: &mut ReachGraph<TS::State, TS::Transition>,
    labels: LabelSet,
    waiting: &mut dyn Waiting<NodeId>,
) -> Result<Stats, ModelError>
where
    TS: TransitionSystem,
    TS::State: SharedIdentity,
{
    let mut stats = Stats::new();
    stats.set_start_time();
    explore(ts, graph, labels, waiting, &mut stats)?;
    stats.set_end_time();
    Ok(stats)
}

fn explore<TS>(
    ts: &mut TS,
    graph: &mut ReachGraph<TS::State, TS::Transition>,
    labels: LabelSet,
    waiting: &mut dyn Waiting<NodeId>,
    stats: &mut Stats,
) -> Result<(), ModelError>
where
    TS: TransitionSystem,
    TS::State: SharedIdentity,
{
    let mut sst = Vec::new();
    while let Some(node) = waiting.remove_first() {
        stats.visited_states += 1;

        if accepting(ts, graph.state(node), labels) {
            graph.set_final(node, true);
            stats.reachable = true;
            break;
        }

        let state = graph.state(node).clone();
        ts.next(&state, &mut sst)?;
        for (_, successor, transition) in sst.drain(..) {
            let (is_new, next_node) = graph.add_node(successor);
            if is_new {
                waiting.insert(next_node);
            }
            graph.add_edge(node, next_node, transition);
            stats.visited_transitions += 1;
        }
    }
    waiting.clear();
    Ok(())
}

/// Whether a state ends the search: the queried labels are non-empty,
/// covered by the state's labels, and the state is a valid final state.
fn accepting<TS>(ts: &TS, state: &TS::State, labels: LabelSet) -> bool
where
    TS: TransitionSystem,
{
    !labels.is_empty() && labels.is_subset_of(ts.labels(state)) && ts.is_valid_final(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempo_ta::StateStatus;

    /// A finite explicit transition system for exercising the algorithm
    /// without a zone layer: states are interned u32 ids.
    struct Explicit {
        edges: Vec<(u32, u32)>,
        labelled: Vec<(u32, LabelSet)>,
        interned: Vec<Arc<u32>>,
    }

    #[derive(Clone, PartialEq, Eq)]
    struct Node(Arc<u32>);

    impl SharedIdentity for Node {
        fn shared_hash(&self) -> u64 {
            Arc::as_ptr(&self.0) as u64
        }

        fn shared_eq(&self, other: &Self) -> bool {
            Arc::ptr_eq(&self.0, &other.0)
        }
    }

    impl Explicit {
        fn new(edges: Vec<(u32, u32)>) -> Self {
            Self {
                edges,
                labelled: Vec::new(),
                interned: Vec::new(),
            }
        }

        fn with_label(mut self, value: u32, label: usize) -> Self {
            self.labelled.push((value, LabelSet::singleton(label)));
            self
        }

        fn intern(&mut self, value: u32) -> Node {
            if let Some(a) = self.interned.iter().find(|a| ***a == value) {
                return Node(a.clone());
            }
            let a = Arc::new(value);
            self.interned.push(a.clone());
            Node(a)
        }
    }

    impl TransitionSystem for Explicit {
        type State = Node;
        type Transition = (u32, u32);

        fn initial(
            &mut self,
            out: &mut Vec<(StateStatus, Node, (u32, u32))>,
        ) -> Result<(), ModelError> {
            let node = self.intern(0);
            out.push((StateStatus::Ok, node, (0, 0)));
            Ok(())
        }

        fn next(
            &mut self,
            state: &Node,
            out: &mut Vec<(StateStatus, Node, (u32, u32))>,
        ) -> Result<(), ModelError> {
            let src = *state.0;
            let succs: Vec<u32> = self
                .edges
                .iter()
                .filter(|(s, _)| *s == src)
                .map(|&(_, t)| t)
                .collect();
            for tgt in succs {
                let node = self.intern(tgt);
                out.push((StateStatus::Ok, node, (src, tgt)));
            }
            Ok(())
        }

        fn labels(&self, state: &Node) -> LabelSet {
            self.labelled
                .iter()
                .filter(|(v, _)| v == &*state.0)
                .fold(LabelSet::empty(), |acc, (_, l)| acc.union(*l))
        }

        fn is_valid_final(&self, _state: &Node) -> bool {
            true
        }
    }

    #[test]
    fn empty_labels_explore_everything() {
        // diamond: 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
        let mut ts = Explicit::new(vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
        let mut graph = ReachGraph::new();
        let stats = run(&mut ts, &mut graph, LabelSet::empty(), Policy::Fifo).unwrap();
        assert!(!stats.reachable);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(stats.visited_states, 4);
        assert_eq!(stats.visited_transitions, 4);
        assert!(graph.nodes().all(|n| !graph.is_final(n)));
    }

    #[test]
    fn acceptance_stops_the_search() {
        let mut ts = Explicit::new(vec![(0, 1), (1, 2), (2, 3)]).with_label(1, 0);
        let mut graph = ReachGraph::new();
        let stats = run(&mut ts, &mut graph, LabelSet::singleton(0), Policy::Fifo).unwrap();
        assert!(stats.reachable);
        // 3 is never reached: the search stops on dequeuing 1
        assert_eq!(graph.node_count(), 2);
        let finals: Vec<_> = graph.nodes().filter(|&n| graph.is_final(n)).collect();
        assert_eq!(finals.len(), 1);
        assert_eq!(*graph.state(finals[0]).0, 1);
    }

    #[test]
    fn unsatisfiable_labels_run_to_exhaustion() {
        let mut ts = Explicit::new(vec![(0, 1)]).with_label(1, 3);
        let mut graph = ReachGraph::new();
        let stats = run(&mut ts, &mut graph, LabelSet::singleton(5), Policy::Fifo).unwrap();
        assert!(!stats.reachable);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn initial_nodes_are_flagged_and_considered() {
        let mut ts = Explicit::new(vec![]).with_label(0, 2);
        let mut graph = ReachGraph::new();
        let stats = run(&mut ts, &mut graph, LabelSet::singleton(2), Policy::Fifo).unwrap();
        assert!(stats.reachable);
        assert_eq!(stats.visited_states, 1);
        let n = graph.nodes().next().unwrap();
        assert!(graph.is_initial(n));
        assert!(graph.is_final(n));
    }

    #[test]
    fn dfs_and_bfs_reach_the_same_nodes() {
        let edges = vec![(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)];
        let mut bfs_graph = ReachGraph::new();
        let mut ts = Explicit::new(edges.clone());
        run(&mut ts, &mut bfs_graph, LabelSet::empty(), Policy::Fifo).unwrap();

        let mut dfs_graph = ReachGraph::new();
        let mut ts = Explicit::new(edges);
        run(&mut ts, &mut dfs_graph, LabelSet::empty(), Policy::Lifo).unwrap();

        let values = |g: &ReachGraph<Node, (u32, u32)>| {
            let mut v: Vec<u32> = g.nodes().map(|n| *g.state(n).0).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(values(&bfs_graph), values(&dfs_graph));
        assert_eq!(bfs_graph.edge_count(), dfs_graph.edge_count());
    }

    #[test]
    fn run_from_waiting_continues_a_frontier() {
        let mut ts = Explicit::new(vec![(0, 1), (1, 2)]);
        let mut graph = ReachGraph::new();
        let mut sst = Vec::new();
        ts.initial(&mut sst).unwrap();
        let (_, state, _) = sst.pop().unwrap();
        let (_, node) = graph.add_node(state);

        let mut waiting = waiting::waiting(Policy::Fifo);
        waiting.insert(node);
        let stats =
            run_from_waiting(&mut ts, &mut graph, LabelSet::empty(), waiting.as_mut()).unwrap();
        assert_eq!(stats.visited_states, 3);
        assert_eq!(graph.node_count(), 3);
    }
}
