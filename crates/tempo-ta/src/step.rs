//! Untimed step semantics.
//!
//! These functions update discrete state components in place and collect
//! the clock constraints and resets a zone layer applies afterwards. The
//! constraint containers are caller-owned scratch space, reused between
//! iterations; they are appended to, never cleared here.

use crate::error::ModelError;
use crate::state::{Intval, Vedge, Vloc};
use crate::system::{EdgeId, LocationId, System};
use crate::ts::StateStatus;
use tempo_dbm::{ClockConstraint, ClockReset};

/// Initializes a state from a tuple of initial locations, one per process
/// in increasing process id order.
///
/// Writes the location tuple, the declared initial integer valuation and an
/// empty edge tuple; pushes the clock part of the initial invariants into
/// `invariant`. Returns `SrcInvariantViolated` when the initial valuation
/// does not satisfy the integer part of an invariant.
pub fn initialize(
    system: &System,
    vloc: &mut Vloc,
    intval: &mut Intval,
    vedge: &mut Vedge,
    invariant: &mut Vec<ClockConstraint>,
    init_locs: &[LocationId],
) -> Result<StateStatus, ModelError> {
    let n = system.process_count();
    if init_locs.len() != n {
        return Err(ModelError::VlocSizeMismatch {
            got: init_locs.len(),
            expected: n,
        });
    }
    for (pid, &loc) in init_locs.iter().enumerate() {
        if loc >= system.location_count() {
            return Err(ModelError::UnknownLocation(loc));
        }
        if system.location(loc).pid != pid {
            return Err(ModelError::ForeignLocation { loc, pid });
        }
    }

    *vloc = Vloc::from_slice(init_locs);
    *intval = system.initial_intval();
    *vedge = Vedge::empty(n);

    for loc in vloc.iter() {
        invariant.extend_from_slice(&system.location(loc).invariant.clock);
    }
    for loc in vloc.iter() {
        if !system.location(loc).invariant.eval_int(intval.as_slice()) {
            return Ok(StateStatus::SrcInvariantViolated);
        }
    }
    Ok(StateStatus::Ok)
}

/// Computes the discrete successor of `(vloc, intval)` through a tuple of
/// edges, at most one per process.
///
/// On success the tuple components are updated in place, `vedge` holds the
/// taken edges, and the constraint containers have received the source
/// invariants, guards, resets and target invariants, in that order.
/// Statements apply sequentially, in tuple order then declaration order,
/// each seeing the writes of the previous ones.
///
/// Status codes follow the first failing stage; later stages are skipped,
/// so the components may be partially updated on a non-`Ok` return.
pub fn next(
    system: &System,
    vloc: &mut Vloc,
    intval: &mut Intval,
    vedge: &mut Vedge,
    src_invariant: &mut Vec<ClockConstraint>,
    guard: &mut Vec<ClockConstraint>,
    reset: &mut Vec<ClockReset>,
    tgt_invariant: &mut Vec<ClockConstraint>,
    edges: &[EdgeId],
) -> Result<StateStatus, ModelError> {
    let n = vloc.len();
    let mut seen: smallvec::SmallVec<[bool; 8]> = smallvec::smallvec![false; n];
    for &e in edges {
        if e >= system.edge_count() {
            return Err(ModelError::UnknownEdge(e));
        }
        let pid = system.edge(e).pid;
        if pid >= n {
            return Err(ModelError::EdgePidOutOfRange { pid, count: n });
        }
        if seen[pid] {
            return Err(ModelError::DuplicateEdgeProcess { pid });
        }
        seen[pid] = true;
    }

    for &e in edges {
        let edge = system.edge(e);
        if edge.src != vloc.get(edge.pid) {
            return Ok(StateStatus::IncompatibleEdge);
        }
    }

    for loc in vloc.iter() {
        src_invariant.extend_from_slice(&system.location(loc).invariant.clock);
    }
    for loc in vloc.iter() {
        if !system.location(loc).invariant.eval_int(intval.as_slice()) {
            return Ok(StateStatus::SrcInvariantViolated);
        }
    }

    for &e in edges {
        guard.extend_from_slice(&system.edge(e).guard.clock);
    }
    for &e in edges {
        if !system.edge(e).guard.eval_int(intval.as_slice()) {
            return Ok(StateStatus::GuardViolated);
        }
    }

    for &e in edges {
        let edge = system.edge(e);
        for a in &edge.statements {
            let value = a.expr.eval(intval.as_slice());
            if !system.intvar(a.var).contains(value) {
                return Ok(StateStatus::StatementFailed);
            }
            intval.set(a.var, value as i32);
        }
        reset.extend_from_slice(&edge.resets);
    }

    *vedge = Vedge::empty(n);
    for &e in edges {
        let edge = system.edge(e);
        vloc.set(edge.pid, edge.tgt);
        vedge.set(edge.pid, Some(e));
    }

    for loc in vloc.iter() {
        tgt_invariant.extend_from_slice(&system.location(loc).invariant.clock);
    }
    for loc in vloc.iter() {
        if !system.location(loc).invariant.eval_int(intval.as_slice()) {
            return Ok(StateStatus::TgtInvariantViolated);
        }
    }
    Ok(StateStatus::Ok)
}

/// Whether time may elapse in `vloc`: every process must currently permit
/// delay.
pub fn delay_allowed(system: &System, vloc: &Vloc) -> bool {
    vloc.iter().all(|loc| !system.location(loc).urgent)
}

/// Per-process delay permission, written into `allowed`.
pub fn delay_allowed_per_process(system: &System, vloc: &Vloc, allowed: &mut Vec<bool>) {
    allowed.clear();
    allowed.extend(vloc.iter().map(|loc| !system.location(loc).urgent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SystemBuilder;
    use crate::expr::{Cmp, IntAssign, IntExpr, IntGuard};
    use tempo_dbm::{ClockConstraint, Ineq};

    /// One process, locations l0/l1, one clock, one counter 0..=3 starting
    /// at 3, edge l0 -> l1 guarded by x >= 2 incrementing the counter.
    fn counter_system() -> (System, LocationId, LocationId, EdgeId) {
        let mut b = SystemBuilder::new("counter");
        let p = b.add_process("P");
        let x = b.add_clock("x");
        let a = b.add_event("a");
        b.add_intvar("i", 0, 3, 3).unwrap();
        let l0 = b.add_location(p, "l0").unwrap();
        let l1 = b.add_location(p, "l1").unwrap();
        b.set_initial(l0).unwrap();
        let e = b.add_edge(p, l0, l1, a).unwrap();
        b.add_guard(e, ClockConstraint::lower(x, Ineq::Le, 2)).unwrap();
        b.add_statement(e, IntAssign::new(0, IntExpr::add(IntExpr::var(0), IntExpr::constant(1))))
            .unwrap();
        (b.build().unwrap(), l0, l1, e)
    }

    fn fresh_state(system: &System) -> (Vloc, Intval, Vedge) {
        let mut vloc = Vloc::from_slice(&[0]);
        let mut intval = Intval::from_slice(&[0]);
        let mut vedge = Vedge::empty(1);
        let mut inv = Vec::new();
        let status = initialize(
            system,
            &mut vloc,
            &mut intval,
            &mut vedge,
            &mut inv,
            &[0],
        )
        .unwrap();
        assert!(status.is_ok());
        (vloc, intval, vedge)
    }

    #[test]
    fn initialize_writes_declared_values() {
        let (system, l0, _, _) = counter_system();
        let (vloc, intval, vedge) = fresh_state(&system);
        assert_eq!(vloc.get(0), l0);
        assert_eq!(intval.get(0), 3);
        assert_eq!(vedge.get(0), None);
    }

    #[test]
    fn next_fails_statement_out_of_range() {
        // counter starts at its maximum, so the increment faults
        let (system, _, _, e) = counter_system();
        let (mut vloc, mut intval, mut vedge) = fresh_state(&system);
        let (mut si, mut g, mut r, mut ti) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let status = next(
            &system, &mut vloc, &mut intval, &mut vedge, &mut si, &mut g, &mut r, &mut ti, &[e],
        )
        .unwrap();
        assert_eq!(status, StateStatus::StatementFailed);
        // the guard was still collected before the failure
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn next_moves_and_collects_constraints() {
        let mut b = SystemBuilder::new("move");
        let p = b.add_process("P");
        let x = b.add_clock("x");
        let a = b.add_event("a");
        let l0 = b.add_location(p, "l0").unwrap();
        let l1 = b.add_location(p, "l1").unwrap();
        b.set_initial(l0).unwrap();
        b.add_invariant(l1, ClockConstraint::upper(x, Ineq::Le, 5)).unwrap();
        let e = b.add_edge(p, l0, l1, a).unwrap();
        b.add_reset(e, tempo_dbm::ClockReset::to_zero(x)).unwrap();
        let system = b.build().unwrap();

        let (mut vloc, mut intval, mut vedge) = fresh_state(&system);
        let (mut si, mut g, mut r, mut ti) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let status = next(
            &system, &mut vloc, &mut intval, &mut vedge, &mut si, &mut g, &mut r, &mut ti, &[e],
        )
        .unwrap();
        assert!(status.is_ok());
        assert_eq!(vloc.get(0), l1);
        assert_eq!(vedge.get(0), Some(e));
        assert!(si.is_empty()); // l0 has no invariant
        assert_eq!(r.len(), 1);
        assert_eq!(ti.len(), 1); // invariant of l1
    }

    #[test]
    fn next_rejects_incompatible_edge() {
        let (system, _, _, e) = counter_system();
        let (mut vloc, mut intval, mut vedge) = fresh_state(&system);
        vloc.set(0, 1); // already at l1
        let (mut si, mut g, mut r, mut ti) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let status = next(
            &system, &mut vloc, &mut intval, &mut vedge, &mut si, &mut g, &mut r, &mut ti, &[e],
        )
        .unwrap();
        assert_eq!(status, StateStatus::IncompatibleEdge);
    }

    #[test]
    fn next_rejects_duplicate_process_edges() {
        let (system, _, _, e) = counter_system();
        let (mut vloc, mut intval, mut vedge) = fresh_state(&system);
        let (mut si, mut g, mut r, mut ti) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let err = next(
            &system, &mut vloc, &mut intval, &mut vedge, &mut si, &mut g, &mut r, &mut ti, &[e, e],
        )
        .unwrap_err();
        assert_eq!(err, ModelError::DuplicateEdgeProcess { pid: 0 });
    }

    #[test]
    fn int_invariants_guard_the_target() {
        let mut b = SystemBuilder::new("intinv");
        let p = b.add_process("P");
        let a = b.add_event("a");
        b.add_intvar("i", 0, 10, 0).unwrap();
        let l0 = b.add_location(p, "l0").unwrap();
        let l1 = b.add_location(p, "l1").unwrap();
        b.set_initial(l0).unwrap();
        b.add_int_invariant(
            l1,
            IntGuard::new(IntExpr::var(0), Cmp::Ge, IntExpr::constant(5)),
        )
        .unwrap();
        let e = b.add_edge(p, l0, l1, a).unwrap();
        let system = b.build().unwrap();

        let (mut vloc, mut intval, mut vedge) = fresh_state(&system);
        let (mut si, mut g, mut r, mut ti) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
        let status = next(
            &system, &mut vloc, &mut intval, &mut vedge, &mut si, &mut g, &mut r, &mut ti, &[e],
        )
        .unwrap();
        assert_eq!(status, StateStatus::TgtInvariantViolated);
    }

    #[test]
    fn delay_respects_urgency() {
        let mut b = SystemBuilder::new("urgent");
        let p0 = b.add_process("P0");
        let p1 = b.add_process("P1");
        let l0 = b.add_location(p0, "l0").unwrap();
        let m0 = b.add_location(p1, "m0").unwrap();
        b.set_initial(l0).unwrap();
        b.set_initial(m0).unwrap();
        b.set_urgent(m0).unwrap();
        let system = b.build().unwrap();

        let vloc = Vloc::from_slice(&[l0, m0]);
        assert!(!delay_allowed(&system, &vloc));
        let mut bits = Vec::new();
        delay_allowed_per_process(&system, &vloc, &mut bits);
        assert_eq!(bits, vec![true, false]);
    }
}
