//! Clock bound analysis.
//!
//! Fills a [`ClockBounds`] bundle from the constants appearing in guards
//! and invariants. Constants contribute at the constraining location;
//! bounds then propagate backwards over edges for clocks that are not
//! reset, and through `x := y + c` resets with the offset subtracted, until
//! a fixpoint. The `M` maps are the per-clock join of `L` and `U`, and the
//! global maps the join over all locations.

use crate::error::ModelError;
use crate::system::System;
use tempo_dbm::ClockConstraint;
use tempo_clockbounds::{BoundMap, ClockBounds, NO_BOUND};

/// A constraint `x - y ⋈ c` contributes `c` to `U(x)` and `-c` to `L(y)`.
fn seed(l: &mut BoundMap, u: &mut BoundMap, c: &ClockConstraint) {
    if let Some(x) = c.left {
        u.update(x, c.value);
    }
    if let Some(y) = c.right {
        l.update(y, -c.value);
    }
}

/// Computes the clock bounds of a system.
///
/// Fails with [`ModelError::DivergentClockBounds`] when the propagation does
/// not stabilize, which happens only when resets with offsets form a cycle
/// that grows some bound forever.
pub fn clock_bounds(system: &System) -> Result<ClockBounds, ModelError> {
    let locs = system.location_count();
    let clocks = system.clock_count();

    let mut l: Vec<BoundMap> = (0..locs).map(|_| BoundMap::new(clocks)).collect();
    let mut u: Vec<BoundMap> = (0..locs).map(|_| BoundMap::new(clocks)).collect();

    for loc in 0..locs {
        for c in &system.location(loc).invariant.clock {
            seed(&mut l[loc], &mut u[loc], c);
        }
    }
    for id in 0..system.edge_count() {
        let edge = system.edge(id);
        for c in &edge.guard.clock {
            seed(&mut l[edge.src], &mut u[edge.src], c);
        }
    }

    // reset targets per edge, later resets shadowing earlier ones
    let reset_of: Vec<Vec<Option<(Option<usize>, i32)>>> = (0..system.edge_count())
        .map(|id| {
            let mut map = vec![None; clocks];
            for r in &system.edge(id).resets {
                map[r.left] = Some((r.right, r.value));
            }
            map
        })
        .collect();

    let max_rounds = 16 * (locs + 1) * (clocks + 1);
    let mut rounds = 0;
    loop {
        let mut changed = false;
        for id in 0..system.edge_count() {
            let edge = system.edge(id);
            let (src, tgt) = (edge.src, edge.tgt);
            for x in 0..clocks {
                let (lt, ut) = (l[tgt][x], u[tgt][x]);
                match reset_of[id][x] {
                    // x survives the edge: bounds flow backwards unchanged
                    None => {
                        if lt != NO_BOUND {
                            changed |= l[src].update(x, lt);
                        }
                        if ut != NO_BOUND {
                            changed |= u[src].update(x, ut);
                        }
                    }
                    // x := c: the target bound is discharged by the reset
                    Some((None, _)) => {}
                    // x := y + c: the bound constrains y before the edge
                    Some((Some(y), c)) => {
                        if lt != NO_BOUND {
                            changed |= l[src].update(y, lt - c);
                        }
                        if ut != NO_BOUND {
                            changed |= u[src].update(y, ut - c);
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
        rounds += 1;
        if rounds > max_rounds {
            return Err(ModelError::DivergentClockBounds);
        }
    }

    let mut bounds = ClockBounds::new(locs, clocks);
    for loc in 0..locs {
        bounds.local_lu_mut().l_mut(loc).update_from(&l[loc]);
        bounds.local_lu_mut().u_mut(loc).update_from(&u[loc]);
        bounds.local_m_mut().m_mut(loc).update_from(&l[loc]);
        bounds.local_m_mut().m_mut(loc).update_from(&u[loc]);
        bounds.global_lu_mut().l_mut().update_from(&l[loc]);
        bounds.global_lu_mut().u_mut().update_from(&u[loc]);
        bounds.global_m_mut().m_mut().update_from(&l[loc]);
        bounds.global_m_mut().m_mut().update_from(&u[loc]);
    }
    Ok(bounds)
}
