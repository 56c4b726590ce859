//! Symbolic transitions.

use std::fmt;
use std::sync::Arc;
use tempo_dbm::{ClockConstraint, ClockReset};
use tempo_ta::Vedge;

/// The transition taken between two symbolic states: the tuple of edges and
/// the constraints the step applied, kept for tools that audit or replay
/// runs. Initial states carry a transition with an idle vedge and only the
/// target invariant filled.
#[derive(Debug, Clone)]
pub struct Transition {
    vedge: Arc<Vedge>,
    src_invariant: Vec<ClockConstraint>,
    guard: Vec<ClockConstraint>,
    reset: Vec<ClockReset>,
    tgt_invariant: Vec<ClockConstraint>,
}

impl Transition {
    pub fn new(
        vedge: Arc<Vedge>,
        src_invariant: Vec<ClockConstraint>,
        guard: Vec<ClockConstraint>,
        reset: Vec<ClockReset>,
        tgt_invariant: Vec<ClockConstraint>,
    ) -> Transition {
        Transition {
            vedge,
            src_invariant,
            guard,
            reset,
            tgt_invariant,
        }
    }

    pub fn vedge(&self) -> &Vedge {
        &self.vedge
    }

    pub fn vedge_ptr(&self) -> &Arc<Vedge> {
        &self.vedge
    }

    pub fn src_invariant(&self) -> &[ClockConstraint] {
        &self.src_invariant
    }

    pub fn guard(&self) -> &[ClockConstraint] {
        &self.guard
    }

    pub fn reset(&self) -> &[ClockReset] {
        &self.reset
    }

    pub fn tgt_invariant(&self) -> &[ClockConstraint] {
        &self.tgt_invariant
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vedge)
    }
}
