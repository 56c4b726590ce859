//! The zone graph transition system.

use crate::extrapolation::{Extrapolation, Extrapolator};
use crate::semantics::Semantics;
use crate::state::State;
use crate::transition::Transition;
use ahash::RandomState;
use smallvec::SmallVec;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;
use tempo_clockbounds::ClockBounds;
use tempo_dbm::{ClockConstraint, ClockReset, Zone};
use tempo_ta::{
    analysis, step, EdgeId, Intval, LabelSet, LocationId, ModelError, StateStatus, StatusMask,
    System, TransitionSystem, Vedge, Vloc,
};
use tracing::debug;

/// Value-keyed sharing table: interning a value returns the handle of an
/// equal value seen before, so equal components are one allocation and the
/// graph can deduplicate states by pointer comparison.
struct Interner<T> {
    set: HashSet<Arc<T>, RandomState>,
}

impl<T: Eq + Hash> Interner<T> {
    fn new() -> Interner<T> {
        Interner {
            set: HashSet::default(),
        }
    }

    fn intern(&mut self, value: T) -> Arc<T> {
        if let Some(existing) = self.set.get(&value) {
            return existing.clone();
        }
        let handle = Arc::new(value);
        self.set.insert(handle.clone());
        handle
    }

    fn len(&self) -> usize {
        self.set.len()
    }
}

/// Scratch constraint containers reused between step computations.
#[derive(Default)]
struct Scratch {
    src_invariant: Vec<ClockConstraint>,
    guard: Vec<ClockConstraint>,
    reset: Vec<ClockReset>,
    tgt_invariant: Vec<ClockConstraint>,
}

impl Scratch {
    fn clear(&mut self) {
        self.src_invariant.clear();
        self.guard.clear();
        self.reset.clear();
        self.tgt_invariant.clear();
    }
}

/// Symbolic semantics of a system of timed processes: a transition system
/// whose states carry a zone, driven by the untimed step, a zone
/// [`Semantics`] and an [`Extrapolator`].
///
/// The system is borrowed; states and transitions are owned here and
/// published as shared handles.
pub struct ZoneGraph<'a> {
    system: &'a System,
    semantics: Semantics,
    extrapolator: Extrapolator,
    mask: StatusMask,
    vlocs: Interner<Vloc>,
    intvals: Interner<Intval>,
    zones: Interner<Zone>,
    vedges: Interner<Vedge>,
    scratch: Scratch,
}

impl<'a> ZoneGraph<'a> {
    /// Builds a zone graph, running the clock bound analysis of the system
    /// when the extrapolation needs bounds.
    pub fn new(
        system: &'a System,
        semantics: Semantics,
        extrapolation: Extrapolation,
    ) -> Result<ZoneGraph<'a>, ModelError> {
        let extrapolator = match extrapolation {
            Extrapolation::None => Extrapolator::none(),
            _ => {
                let bounds = analysis::clock_bounds(system)?;
                debug!(
                    clocks = system.clock_count(),
                    locations = system.location_count(),
                    "clock bounds computed"
                );
                Extrapolator::new(extrapolation, bounds)
            }
        };
        Ok(Self::with_extrapolator(system, semantics, extrapolator))
    }

    /// Builds a zone graph over caller-supplied clock bounds.
    pub fn with_bounds(
        system: &'a System,
        semantics: Semantics,
        extrapolation: Extrapolation,
        bounds: ClockBounds,
    ) -> ZoneGraph<'a> {
        Self::with_extrapolator(system, semantics, Extrapolator::new(extrapolation, bounds))
    }

    fn with_extrapolator(
        system: &'a System,
        semantics: Semantics,
        extrapolator: Extrapolator,
    ) -> ZoneGraph<'a> {
        ZoneGraph {
            system,
            semantics,
            extrapolator,
            mask: StatusMask::OK,
            vlocs: Interner::new(),
            intvals: Interner::new(),
            zones: Interner::new(),
            vedges: Interner::new(),
            scratch: Scratch::default(),
        }
    }

    pub fn system(&self) -> &'a System {
        self.system
    }

    pub fn semantics(&self) -> Semantics {
        self.semantics
    }

    /// Statuses to yield from [`TransitionSystem::initial`] and
    /// [`TransitionSystem::next`]. Defaults to `Ok` only; widen it to audit
    /// violating steps.
    pub fn set_status_mask(&mut self, mask: StatusMask) {
        self.mask = mask;
    }

    /// Number of distinct zones interned so far.
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Every combination of per-process initial locations, in increasing
    /// process id order.
    fn initial_tuples(&self) -> Vec<Vec<LocationId>> {
        let choices: Vec<Vec<LocationId>> = (0..self.system.process_count())
            .map(|pid| self.system.process(pid).initial.clone())
            .collect();
        let mut tuples = Vec::new();
        for_each_combination(&choices, |tuple| tuples.push(tuple.to_vec()));
        tuples
    }

    /// Outgoing edge tuples from a location tuple: asynchronous edges first
    /// (by process then edge id), then the instances of each synchronization
    /// vector in lexicographic order.
    fn outgoing_vedges(&self, vloc: &Vloc) -> Vec<SmallVec<[EdgeId; 4]>> {
        let mut result: Vec<SmallVec<[EdgeId; 4]>> = Vec::new();
        for pid in 0..self.system.process_count() {
            for &e in self.system.outgoing_edges(vloc.get(pid)) {
                if !self.system.is_synchronized(pid, self.system.edge(e).event) {
                    result.push(SmallVec::from_slice(&[e]));
                }
            }
        }
        for sync in self.system.syncs() {
            let mut choices: Vec<Vec<EdgeId>> = Vec::with_capacity(sync.constraints.len());
            let mut feasible = true;
            for &(pid, event) in &sync.constraints {
                let edges: Vec<EdgeId> = self
                    .system
                    .outgoing_edges(vloc.get(pid))
                    .iter()
                    .copied()
                    .filter(|&e| self.system.edge(e).event == event)
                    .collect();
                if edges.is_empty() {
                    feasible = false;
                    break;
                }
                choices.push(edges);
            }
            if !feasible {
                continue;
            }
            for_each_combination(&choices, |tuple| result.push(SmallVec::from_slice(tuple)));
        }
        result
    }

    fn publish(
        &mut self,
        status: StateStatus,
        vloc: Vloc,
        intval: Intval,
        vedge: Vedge,
        zone: Zone,
        out: &mut Vec<(StateStatus, State, Transition)>,
    ) {
        let state = State::new(
            self.vlocs.intern(vloc),
            self.intvals.intern(intval),
            self.zones.intern(zone),
        );
        let transition = Transition::new(
            self.vedges.intern(vedge),
            self.scratch.src_invariant.clone(),
            self.scratch.guard.clone(),
            self.scratch.reset.clone(),
            self.scratch.tgt_invariant.clone(),
        );
        out.push((status, state, transition));
    }
}

impl TransitionSystem for ZoneGraph<'_> {
    type State = State;
    type Transition = Transition;

    fn initial(
        &mut self,
        out: &mut Vec<(StateStatus, State, Transition)>,
    ) -> Result<(), ModelError> {
        let n = self.system.process_count();
        let clocks = self.system.clock_count();
        for tuple in self.initial_tuples() {
            self.scratch.clear();
            let mut vloc = Vloc::from_slice(&tuple);
            let mut intval = self.system.initial_intval();
            let mut vedge = Vedge::empty(n);
            let mut zone = Zone::zero(clocks);
            let mut status = step::initialize(
                self.system,
                &mut vloc,
                &mut intval,
                &mut vedge,
                &mut self.scratch.tgt_invariant,
                &tuple,
            )?;
            if status.is_ok() {
                let delay = step::delay_allowed(self.system, &vloc);
                status = self
                    .semantics
                    .initial(&mut zone, delay, &self.scratch.tgt_invariant);
            }
            if status.is_ok() {
                self.extrapolator.extrapolate(&mut zone, &vloc);
            }
            if self.mask.contains(status) {
                self.publish(status, vloc, intval, vedge, zone, out);
            }
        }
        Ok(())
    }

    fn next(
        &mut self,
        state: &State,
        out: &mut Vec<(StateStatus, State, Transition)>,
    ) -> Result<(), ModelError> {
        let n = self.system.process_count();
        let src_delay = step::delay_allowed(self.system, state.vloc());
        for tuple in self.outgoing_vedges(state.vloc()) {
            self.scratch.clear();
            let mut vloc = state.vloc().clone();
            let mut intval = state.intval().clone();
            let mut vedge = Vedge::empty(n);
            let mut zone = state.zone().clone();
            let mut status = step::next(
                self.system,
                &mut vloc,
                &mut intval,
                &mut vedge,
                &mut self.scratch.src_invariant,
                &mut self.scratch.guard,
                &mut self.scratch.reset,
                &mut self.scratch.tgt_invariant,
                &tuple,
            )?;
            if status.is_ok() {
                let tgt_delay = step::delay_allowed(self.system, &vloc);
                status = self.semantics.next(
                    &mut zone,
                    src_delay,
                    &self.scratch.src_invariant,
                    &self.scratch.guard,
                    &self.scratch.reset,
                    tgt_delay,
                    &self.scratch.tgt_invariant,
                );
            }
            if status.is_ok() {
                self.extrapolator.extrapolate(&mut zone, &vloc);
            }
            if self.mask.contains(status) {
                self.publish(status, vloc, intval, vedge, zone, out);
            }
        }
        Ok(())
    }

    /// Union of the labels of the current locations.
    fn labels(&self, state: &State) -> LabelSet {
        state
            .vloc()
            .iter()
            .fold(LabelSet::empty(), |acc, loc| {
                acc.union(self.system.location(loc).labels)
            })
    }

    /// A state can end a run when its zone is non-empty. Stored zones
    /// already satisfy the invariants of their locations, so no further
    /// check is needed.
    fn is_valid_final(&self, state: &State) -> bool {
        !state.zone().is_empty()
    }
}

/// Calls `f` on every tuple picking one element per choice list, in
/// lexicographic order.
fn for_each_combination<T: Copy>(choices: &[Vec<T>], mut f: impl FnMut(&[T])) {
    if choices.is_empty() || choices.iter().any(|c| c.is_empty()) {
        return;
    }
    let mut idx = vec![0usize; choices.len()];
    let mut tuple: Vec<T> = Vec::with_capacity(choices.len());
    loop {
        tuple.clear();
        tuple.extend(choices.iter().zip(idx.iter()).map(|(c, &i)| c[i]));
        f(&tuple);
        let mut k = choices.len() - 1;
        loop {
            idx[k] += 1;
            if idx[k] < choices[k].len() {
                break;
            }
            idx[k] = 0;
            if k == 0 {
                return;
            }
            k -= 1;
        }
    }
}
