//! Clock bound maps for zone abstractions.
//!
//! Zone abstraction operators are parameterised by per-clock integer bounds:
//! `L`/`U` bounds for the LU abstractions and `M` bounds (the join of both)
//! for the M abstractions. Bounds can be kept globally for a whole system or
//! locally per location; the local flavours join the maps of every location
//! in a tuple when queried.

pub mod map;

pub use map::{Bound, BoundMap, NO_BOUND};

use std::fmt;

/// Global `L`/`U` bound maps, shared by every location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalLuMap {
    l: BoundMap,
    u: BoundMap,
}

impl GlobalLuMap {
    /// Creates maps over `clock_count` clocks, all bounds at `NO_BOUND`.
    pub fn new(clock_count: usize) -> Self {
        Self {
            l: BoundMap::new(clock_count),
            u: BoundMap::new(clock_count),
        }
    }

    pub fn clock_count(&self) -> usize {
        self.l.clock_count()
    }

    pub fn l(&self) -> &BoundMap {
        &self.l
    }

    pub fn u(&self) -> &BoundMap {
        &self.u
    }

    pub fn l_mut(&mut self) -> &mut BoundMap {
        &mut self.l
    }

    pub fn u_mut(&mut self) -> &mut BoundMap {
        &mut self.u
    }

    /// Joins the bounds into `l` and `u` after clearing them.
    pub fn bounds(&self, l: &mut BoundMap, u: &mut BoundMap) {
        l.clear();
        u.clear();
        l.update_from(&self.l);
        u.update_from(&self.u);
    }

    /// Same as [`GlobalLuMap::bounds`]; the location is irrelevant for
    /// global maps.
    pub fn bounds_of_loc(&self, _loc: usize, l: &mut BoundMap, u: &mut BoundMap) {
        self.bounds(l, u);
    }

    /// Same as [`GlobalLuMap::bounds`]; the location tuple is irrelevant for
    /// global maps.
    pub fn bounds_of_vloc(&self, _vloc: &[usize], l: &mut BoundMap, u: &mut BoundMap) {
        self.bounds(l, u);
    }

    pub fn clear(&mut self) {
        self.l.clear();
        self.u.clear();
    }

    pub fn resize(&mut self, clock_count: usize) {
        self.l = BoundMap::new(clock_count);
        self.u = BoundMap::new(clock_count);
    }
}

impl fmt::Display for GlobalLuMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L={} U={}", self.l, self.u)
    }
}

/// Per-location `L`/`U` bound maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalLuMap {
    clock_count: usize,
    l: Vec<BoundMap>,
    u: Vec<BoundMap>,
}

impl LocalLuMap {
    /// Creates maps over `loc_count` locations and `clock_count` clocks,
    /// all bounds at `NO_BOUND`.
    pub fn new(loc_count: usize, clock_count: usize) -> Self {
        Self {
            clock_count,
            l: (0..loc_count).map(|_| BoundMap::new(clock_count)).collect(),
            u: (0..loc_count).map(|_| BoundMap::new(clock_count)).collect(),
        }
    }

    pub fn loc_count(&self) -> usize {
        self.l.len()
    }

    pub fn clock_count(&self) -> usize {
        self.clock_count
    }

    pub fn l(&self, loc: usize) -> &BoundMap {
        &self.l[loc]
    }

    pub fn u(&self, loc: usize) -> &BoundMap {
        &self.u[loc]
    }

    pub fn l_mut(&mut self, loc: usize) -> &mut BoundMap {
        &mut self.l[loc]
    }

    pub fn u_mut(&mut self, loc: usize) -> &mut BoundMap {
        &mut self.u[loc]
    }

    /// Joins the bounds of location `loc` into `l` and `u` after clearing
    /// them.
    pub fn bounds_of_loc(&self, loc: usize, l: &mut BoundMap, u: &mut BoundMap) {
        l.clear();
        u.clear();
        l.update_from(&self.l[loc]);
        u.update_from(&self.u[loc]);
    }

    /// Joins the bounds of every location in `vloc` into `l` and `u` after
    /// clearing them.
    pub fn bounds_of_vloc(&self, vloc: &[usize], l: &mut BoundMap, u: &mut BoundMap) {
        l.clear();
        u.clear();
        for &loc in vloc {
            l.update_from(&self.l[loc]);
            u.update_from(&self.u[loc]);
        }
    }

    pub fn clear(&mut self) {
        for m in self.l.iter_mut().chain(self.u.iter_mut()) {
            m.clear();
        }
    }

    pub fn resize(&mut self, loc_count: usize, clock_count: usize) {
        *self = Self::new(loc_count, clock_count);
    }
}

impl fmt::Display for LocalLuMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for loc in 0..self.loc_count() {
            writeln!(f, "{}: L={} U={}", loc, self.l[loc], self.u[loc])?;
        }
        Ok(())
    }
}

/// Global `M` bound map, shared by every location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalMMap {
    m: BoundMap,
}

impl GlobalMMap {
    pub fn new(clock_count: usize) -> Self {
        Self {
            m: BoundMap::new(clock_count),
        }
    }

    pub fn clock_count(&self) -> usize {
        self.m.clock_count()
    }

    pub fn m(&self) -> &BoundMap {
        &self.m
    }

    pub fn m_mut(&mut self) -> &mut BoundMap {
        &mut self.m
    }

    /// Joins the bounds into `m` after clearing it.
    pub fn bounds(&self, m: &mut BoundMap) {
        m.clear();
        m.update_from(&self.m);
    }

    pub fn bounds_of_loc(&self, _loc: usize, m: &mut BoundMap) {
        self.bounds(m);
    }

    pub fn bounds_of_vloc(&self, _vloc: &[usize], m: &mut BoundMap) {
        self.bounds(m);
    }

    pub fn clear(&mut self) {
        self.m.clear();
    }

    pub fn resize(&mut self, clock_count: usize) {
        self.m = BoundMap::new(clock_count);
    }
}

impl fmt::Display for GlobalMMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M={}", self.m)
    }
}

/// Per-location `M` bound maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMMap {
    clock_count: usize,
    m: Vec<BoundMap>,
}

impl LocalMMap {
    pub fn new(loc_count: usize, clock_count: usize) -> Self {
        Self {
            clock_count,
            m: (0..loc_count).map(|_| BoundMap::new(clock_count)).collect(),
        }
    }

    pub fn loc_count(&self) -> usize {
        self.m.len()
    }

    pub fn clock_count(&self) -> usize {
        self.clock_count
    }

    pub fn m(&self, loc: usize) -> &BoundMap {
        &self.m[loc]
    }

    pub fn m_mut(&mut self, loc: usize) -> &mut BoundMap {
        &mut self.m[loc]
    }

    /// Joins the bounds of location `loc` into `m` after clearing it.
    pub fn bounds_of_loc(&self, loc: usize, m: &mut BoundMap) {
        m.clear();
        m.update_from(&self.m[loc]);
    }

    /// Joins the bounds of every location in `vloc` into `m` after clearing
    /// it.
    pub fn bounds_of_vloc(&self, vloc: &[usize], m: &mut BoundMap) {
        m.clear();
        for &loc in vloc {
            m.update_from(&self.m[loc]);
        }
    }

    pub fn clear(&mut self) {
        for m in self.m.iter_mut() {
            m.clear();
        }
    }

    pub fn resize(&mut self, loc_count: usize, clock_count: usize) {
        *self = Self::new(loc_count, clock_count);
    }
}

impl fmt::Display for LocalMMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for loc in 0..self.loc_count() {
            writeln!(f, "{}: M={}", loc, self.m[loc])?;
        }
        Ok(())
    }
}

/// The four bound-map flavours of a system, bundled behind one
/// `clear`/`resize` surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockBounds {
    global_lu: GlobalLuMap,
    local_lu: LocalLuMap,
    global_m: GlobalMMap,
    local_m: LocalMMap,
}

impl ClockBounds {
    pub fn new(loc_count: usize, clock_count: usize) -> Self {
        Self {
            global_lu: GlobalLuMap::new(clock_count),
            local_lu: LocalLuMap::new(loc_count, clock_count),
            global_m: GlobalMMap::new(clock_count),
            local_m: LocalMMap::new(loc_count, clock_count),
        }
    }

    pub fn clock_count(&self) -> usize {
        self.global_lu.clock_count()
    }

    pub fn loc_count(&self) -> usize {
        self.local_lu.loc_count()
    }

    pub fn global_lu(&self) -> &GlobalLuMap {
        &self.global_lu
    }

    pub fn local_lu(&self) -> &LocalLuMap {
        &self.local_lu
    }

    pub fn global_m(&self) -> &GlobalMMap {
        &self.global_m
    }

    pub fn local_m(&self) -> &LocalMMap {
        &self.local_m
    }

    pub fn global_lu_mut(&mut self) -> &mut GlobalLuMap {
        &mut self.global_lu
    }

    pub fn local_lu_mut(&mut self) -> &mut LocalLuMap {
        &mut self.local_lu
    }

    pub fn global_m_mut(&mut self) -> &mut GlobalMMap {
        &mut self.global_m
    }

    pub fn local_m_mut(&mut self) -> &mut LocalMMap {
        &mut self.local_m
    }

    pub fn clear(&mut self) {
        self.global_lu.clear();
        self.local_lu.clear();
        self.global_m.clear();
        self.local_m.clear();
    }

    pub fn resize(&mut self, loc_count: usize, clock_count: usize) {
        self.global_lu.resize(clock_count);
        self.local_lu.resize(loc_count, clock_count);
        self.global_m.resize(clock_count);
        self.local_m.resize(loc_count, clock_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_lu_ignores_location() {
        let mut map = GlobalLuMap::new(2);
        map.l_mut().update(0, 5);
        map.u_mut().update(1, 3);

        let mut l = BoundMap::new(2);
        let mut u = BoundMap::new(2);
        map.bounds_of_loc(17, &mut l, &mut u);
        assert_eq!(l[0], 5);
        assert_eq!(l[1], NO_BOUND);
        assert_eq!(u[1], 3);

        map.bounds_of_vloc(&[0, 1, 2], &mut l, &mut u);
        assert_eq!(l[0], 5);
        assert_eq!(u[1], 3);
    }

    #[test]
    fn local_lu_joins_vloc() {
        let mut map = LocalLuMap::new(3, 1);
        map.l_mut(0).update(0, 2);
        map.l_mut(1).update(0, 7);
        map.u_mut(2).update(0, 4);

        let mut l = BoundMap::new(1);
        let mut u = BoundMap::new(1);

        map.bounds_of_loc(0, &mut l, &mut u);
        assert_eq!(l[0], 2);
        assert_eq!(u[0], NO_BOUND);

        map.bounds_of_vloc(&[0, 1, 2], &mut l, &mut u);
        assert_eq!(l[0], 7);
        assert_eq!(u[0], 4);
    }

    #[test]
    fn local_m_joins_vloc() {
        let mut map = LocalMMap::new(2, 2);
        map.m_mut(0).update(0, 1);
        map.m_mut(1).update(0, 9);

        let mut m = BoundMap::new(2);
        map.bounds_of_vloc(&[0, 1], &mut m);
        assert_eq!(m[0], 9);
        assert_eq!(m[1], NO_BOUND);
    }

    #[test]
    fn bundle_clear_and_resize() {
        let mut bounds = ClockBounds::new(2, 1);
        bounds.global_m_mut().m_mut().update(0, 3);
        bounds.local_lu_mut().l_mut(1).update(0, 2);

        bounds.clear();
        assert_eq!(bounds.global_m().m()[0], NO_BOUND);
        assert_eq!(bounds.local_lu().l(1)[0], NO_BOUND);

        bounds.resize(4, 3);
        assert_eq!(bounds.loc_count(), 4);
        assert_eq!(bounds.clock_count(), 3);
    }
}
