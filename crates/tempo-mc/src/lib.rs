//! Reachability analysis over symbolic transition systems.
//!
//! [`reach::run`] drives any [`tempo_ta::TransitionSystem`] from its initial
//! states through a [`waiting`] container, interning every state into a
//! [`graph::ReachGraph`] and stopping at the first state whose labels cover
//! the queried set.

pub mod graph;
pub mod reach;
pub mod stats;
pub mod waiting;

pub use graph::{NodeId, ReachGraph};
pub use reach::{run, run_from_waiting};
pub use stats::Stats;
pub use waiting::{waiting, Policy, Waiting};
