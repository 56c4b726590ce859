//! Per-clock bound maps.

use std::fmt;
use std::ops::Index;

/// A clock bound: an integer, or [`NO_BOUND`] when the clock is unbounded.
pub type Bound = i32;

/// Absence of a bound. Ordered below every integer bound, so the monotone
/// [`BoundMap::update`] treats it as the bottom of the lattice.
pub const NO_BOUND: Bound = i32::MIN;

/// Array of bounds indexed by clock id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundMap {
    bounds: Vec<Bound>,
}

impl BoundMap {
    /// Creates a map over `clock_count` clocks, all at `NO_BOUND`.
    pub fn new(clock_count: usize) -> Self {
        Self {
            bounds: vec![NO_BOUND; clock_count],
        }
    }

    pub fn clock_count(&self) -> usize {
        self.bounds.len()
    }

    /// Resets every bound to `NO_BOUND`.
    pub fn clear(&mut self) {
        for b in self.bounds.iter_mut() {
            *b = NO_BOUND;
        }
    }

    pub fn get(&self, clock: usize) -> Bound {
        self.bounds[clock]
    }

    /// Raises the bound of `clock` to `bound` if it is larger. Returns
    /// whether the map changed.
    pub fn update(&mut self, clock: usize, bound: Bound) -> bool {
        if bound <= self.bounds[clock] {
            return false;
        }
        self.bounds[clock] = bound;
        true
    }

    /// Element-wise [`BoundMap::update`] from `other`. Returns whether any
    /// cell changed.
    pub fn update_from(&mut self, other: &BoundMap) -> bool {
        debug_assert_eq!(self.clock_count(), other.clock_count());
        let mut modified = false;
        for clock in 0..self.bounds.len() {
            if self.update(clock, other.bounds[clock]) {
                modified = true;
            }
        }
        modified
    }
}

impl Index<usize> for BoundMap {
    type Output = Bound;

    fn index(&self, clock: usize) -> &Bound {
        &self.bounds[clock]
    }
}

impl fmt::Display for BoundMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bounds.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            if *b == NO_BOUND {
                write!(f, ".")?;
            } else {
                write!(f, "{}", b)?;
            }
        }
        Ok(())
    }
}
