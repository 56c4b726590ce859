//! Zone semantics.
//!
//! How a step manipulates the zone of a symbolic state. Two variants:
//!
//! - [`Semantics::Standard`] keeps zones without pending delay and lets
//!   time elapse at the source of each transition.
//! - [`Semantics::Elapsed`] stores zones closed under delay: time elapses
//!   at the target, after resets, so that a stored zone already contains
//!   every valuation reachable by waiting. This is the usual choice for
//!   reachability, where it merges states that differ only by waiting.

use tempo_dbm::{ClockConstraint, ClockReset, Zone};
use tempo_ta::StateStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Semantics {
    Standard,
    #[default]
    Elapsed,
}

impl Semantics {
    /// Computes the zone of an initial state from the zero zone. Every
    /// intersection that empties the zone yields the corresponding status.
    pub fn initial(
        self,
        zone: &mut Zone,
        delay_allowed: bool,
        invariant: &[ClockConstraint],
    ) -> StateStatus {
        debug_assert!(!zone.is_empty());
        if !zone.constrain_all(invariant) {
            return StateStatus::SrcInvariantViolated;
        }
        if self == Semantics::Elapsed && delay_allowed {
            zone.up();
            if !zone.constrain_all(invariant) {
                return StateStatus::SrcInvariantViolated;
            }
        }
        StateStatus::Ok
    }

    /// Computes the zone of a successor state in place.
    pub fn next(
        self,
        zone: &mut Zone,
        src_delay_allowed: bool,
        src_invariant: &[ClockConstraint],
        guard: &[ClockConstraint],
        reset: &[ClockReset],
        tgt_delay_allowed: bool,
        tgt_invariant: &[ClockConstraint],
    ) -> StateStatus {
        if zone.is_empty() {
            return StateStatus::EmptyZone;
        }
        if !zone.constrain_all(src_invariant) {
            return StateStatus::SrcInvariantViolated;
        }
        if self == Semantics::Standard && src_delay_allowed {
            zone.up();
            if !zone.constrain_all(src_invariant) {
                return StateStatus::SrcInvariantViolated;
            }
        }
        if !zone.constrain_all(guard) {
            return StateStatus::GuardViolated;
        }
        zone.reset_all(reset);
        if !zone.constrain_all(tgt_invariant) {
            return StateStatus::TgtInvariantViolated;
        }
        if self == Semantics::Elapsed && tgt_delay_allowed {
            zone.up();
            if !zone.constrain_all(tgt_invariant) {
                return StateStatus::TgtInvariantViolated;
            }
        }
        StateStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_dbm::Ineq;

    fn upper(x: usize, v: i32) -> ClockConstraint {
        ClockConstraint::upper(x, Ineq::Le, v)
    }

    fn lower(x: usize, v: i32) -> ClockConstraint {
        ClockConstraint::lower(x, Ineq::Le, v)
    }

    #[test]
    fn elapsed_initial_is_closed_under_delay() {
        let mut zone = Zone::zero(1);
        let status = Semantics::Elapsed.initial(&mut zone, true, &[upper(0, 5)]);
        assert!(status.is_ok());
        assert!(zone.contains(&[5.0]));
        assert!(!zone.contains(&[5.5]));

        let mut zone = Zone::zero(1);
        let status = Semantics::Elapsed.initial(&mut zone, true, &[]);
        assert!(status.is_ok());
        assert!(zone.contains(&[100.0]));
    }

    #[test]
    fn standard_initial_stays_at_zero() {
        let mut zone = Zone::zero(1);
        let status = Semantics::Standard.initial(&mut zone, true, &[]);
        assert!(status.is_ok());
        assert!(zone.contains(&[0.0]));
        assert!(!zone.contains(&[0.5]));
    }

    #[test]
    fn urgent_initial_does_not_elapse() {
        let mut zone = Zone::zero(1);
        let status = Semantics::Elapsed.initial(&mut zone, false, &[]);
        assert!(status.is_ok());
        assert!(!zone.contains(&[1.0]));
    }

    #[test]
    fn standard_next_elapses_at_the_source() {
        // from x = 0, guard x >= 2 is reachable only by delaying first
        let mut zone = Zone::zero(1);
        let status = Semantics::Standard.next(&mut zone, true, &[], &[lower(0, 2)], &[], true, &[]);
        assert!(status.is_ok());
        assert!(zone.contains(&[2.0]));

        // without delay the guard is violated
        let mut zone = Zone::zero(1);
        let status = Semantics::Standard.next(&mut zone, false, &[], &[lower(0, 2)], &[], true, &[]);
        assert_eq!(status, StateStatus::GuardViolated);
    }

    #[test]
    fn elapsed_next_elapses_at_the_target() {
        // stored zone x >= 0; guard x >= 2; reset x := 0; invariant x <= 5
        let mut zone = Zone::universal_positive(1);
        let status = Semantics::Elapsed.next(
            &mut zone,
            true,
            &[],
            &[lower(0, 2)],
            &[ClockReset::to_zero(0)],
            true,
            &[upper(0, 5)],
        );
        assert!(status.is_ok());
        // after the reset, delay runs again up to the invariant
        assert!(zone.contains(&[0.0]));
        assert!(zone.contains(&[5.0]));
        assert!(!zone.contains(&[5.5]));
    }

    #[test]
    fn violated_source_invariant_is_reported() {
        let mut zone = Zone::universal_positive(1);
        zone.constrain(&lower(0, 10));
        let status =
            Semantics::Elapsed.next(&mut zone, true, &[upper(0, 5)], &[], &[], true, &[]);
        assert_eq!(status, StateStatus::SrcInvariantViolated);
    }

    #[test]
    fn empty_input_zone_is_reported() {
        let mut zone = Zone::universal_positive(1);
        zone.constrain(&upper(0, 1));
        zone.constrain(&lower(0, 2));
        assert!(zone.is_empty());
        let status = Semantics::Elapsed.next(&mut zone, true, &[], &[], &[], true, &[]);
        assert_eq!(status, StateStatus::EmptyZone);
    }
}
