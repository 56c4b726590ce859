//! Zone extrapolation.
//!
//! Extrapolation widens zones against the clock bounds of the system so
//! that only finitely many distinct zones occur per discrete state, which
//! bounds the graph and terminates exploration. The local variants join the
//! bound maps of the current location tuple before clipping.

use tempo_clockbounds::{BoundMap, ClockBounds};
use tempo_dbm::Zone;
use tempo_ta::Vloc;

/// Which extrapolation operator to run after each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// No widening. Exploration may diverge on models where some clock
    /// grows without bound.
    None,
    ExtraMGlobal,
    ExtraMLocal,
    #[default]
    ExtraLuGlobal,
    ExtraLuLocal,
}

/// An [`Extrapolation`] bound to the clock bounds of a system, with scratch
/// maps reused across calls.
#[derive(Debug)]
pub struct Extrapolator {
    kind: Extrapolation,
    bounds: ClockBounds,
    l: BoundMap,
    u: BoundMap,
    m: BoundMap,
}

impl Extrapolator {
    pub fn new(kind: Extrapolation, bounds: ClockBounds) -> Extrapolator {
        let clocks = bounds.clock_count();
        Extrapolator {
            kind,
            bounds,
            l: BoundMap::new(clocks),
            u: BoundMap::new(clocks),
            m: BoundMap::new(clocks),
        }
    }

    /// An extrapolator that leaves zones untouched.
    pub fn none() -> Extrapolator {
        Extrapolator::new(Extrapolation::None, ClockBounds::new(0, 0))
    }

    pub fn kind(&self) -> Extrapolation {
        self.kind
    }

    pub fn bounds(&self) -> &ClockBounds {
        &self.bounds
    }

    /// Widens `zone` for the location tuple `vloc`.
    pub fn extrapolate(&mut self, zone: &mut Zone, vloc: &Vloc) {
        match self.kind {
            Extrapolation::None => {}
            Extrapolation::ExtraMGlobal => {
                self.bounds.global_m().bounds(&mut self.m);
                zone.extra_m(&self.m);
            }
            Extrapolation::ExtraMLocal => {
                self.bounds
                    .local_m()
                    .bounds_of_vloc(vloc.as_slice(), &mut self.m);
                zone.extra_m(&self.m);
            }
            Extrapolation::ExtraLuGlobal => {
                self.bounds.global_lu().bounds(&mut self.l, &mut self.u);
                zone.extra_lu(&self.l, &self.u);
            }
            Extrapolation::ExtraLuLocal => {
                self.bounds
                    .local_lu()
                    .bounds_of_vloc(vloc.as_slice(), &mut self.l, &mut self.u);
                zone.extra_lu(&self.l, &self.u);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_dbm::{ClockConstraint, Ineq};

    fn bounds_with_global_m(clocks: usize, values: &[i32]) -> ClockBounds {
        let mut bounds = ClockBounds::new(1, clocks);
        for (c, &v) in values.iter().enumerate() {
            bounds.global_m_mut().m_mut().update(c, v);
            bounds.global_lu_mut().l_mut().update(c, v);
            bounds.global_lu_mut().u_mut().update(c, v);
        }
        bounds
    }

    #[test]
    fn none_is_identity() {
        let mut ex = Extrapolator::none();
        let mut zone = Zone::universal_positive(1);
        zone.constrain(&ClockConstraint::upper(0, Ineq::Le, 100));
        let before = zone.clone();
        ex.extrapolate(&mut zone, &Vloc::from_slice(&[0]));
        assert_eq!(zone, before);
    }

    #[test]
    fn global_m_widens_above_the_bound() {
        let mut ex = Extrapolator::new(Extrapolation::ExtraMGlobal, bounds_with_global_m(1, &[2]));
        let mut zone = Zone::universal_positive(1);
        zone.constrain(&ClockConstraint::upper(0, Ineq::Le, 100));
        ex.extrapolate(&mut zone, &Vloc::from_slice(&[0]));
        assert!(zone.contains(&[1000.0]));
    }

    #[test]
    fn local_variant_uses_the_vloc_join() {
        let mut bounds = ClockBounds::new(2, 1);
        bounds.local_m_mut().m_mut(0).update(0, 1);
        bounds.local_m_mut().m_mut(1).update(0, 50);
        let mut ex = Extrapolator::new(Extrapolation::ExtraMLocal, bounds);

        let mut zone = Zone::universal_positive(1);
        zone.constrain(&ClockConstraint::upper(0, Ineq::Le, 10));

        // at location 1 the bound is 50, so x <= 10 survives
        let mut at1 = zone.clone();
        ex.extrapolate(&mut at1, &Vloc::from_slice(&[1]));
        assert!(!at1.contains(&[11.0]));

        // at location 0 the bound is 1, so the constraint widens away
        ex.extrapolate(&mut zone, &Vloc::from_slice(&[0]));
        assert!(zone.contains(&[11.0]));
    }
}
