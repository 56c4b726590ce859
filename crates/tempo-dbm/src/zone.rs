//! Canonical zones.

use crate::constraint::{ClockConstraint, ClockReset};
use crate::db::Db;
use std::cmp::Ordering;
use std::fmt;
use tempo_clockbounds::{BoundMap, NO_BOUND};

/// A zone over `dim - 1` clocks, stored as a square matrix of difference
/// bounds of side `dim` with the reference clock at index 0.
///
/// Non-empty zones are kept canonical (closed under shortest paths) by every
/// operation. Empty zones are marked by a `(<, 0)` cell on the diagonal at
/// `(0, 0)`; operations on an empty zone keep it empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    dim: usize,
    data: Vec<Db>,
}

impl Zone {
    /// The zone `x >= 0` for every clock, over `clock_count` clocks.
    pub fn universal_positive(clock_count: usize) -> Zone {
        let dim = clock_count + 1;
        let mut data = vec![Db::INFINITY; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = Db::LE_ZERO;
            data[i] = Db::LE_ZERO; // row 0: 0 - x_j <= 0
        }
        Zone { dim, data }
    }

    /// The zone `x = 0` for every clock, over `clock_count` clocks.
    pub fn zero(clock_count: usize) -> Zone {
        let dim = clock_count + 1;
        Zone {
            dim,
            data: vec![Db::LE_ZERO; dim * dim],
        }
    }

    /// Matrix side: number of clocks plus one.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of clocks, excluding the reference clock.
    pub fn clock_count(&self) -> usize {
        self.dim - 1
    }

    #[inline]
    pub fn at(&self, i: usize, j: usize) -> Db {
        self.data[i * self.dim + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, db: Db) {
        self.data[i * self.dim + j] = db;
    }

    pub fn is_empty(&self) -> bool {
        self.data[0] < Db::LE_ZERO
    }

    fn make_empty(&mut self) {
        self.data[0] = Db::LT_ZERO;
    }

    /// DBM index of a constraint side: clocks shift up by one, `None` is the
    /// reference clock.
    #[inline]
    fn index(clock: Option<usize>) -> usize {
        match clock {
            None => 0,
            Some(x) => x + 1,
        }
    }

    /// Tightens cell `(a, b)` to `db` and restores canonicity along paths
    /// through the updated edge. Returns `false` iff the zone became empty.
    ///
    /// Since the input is canonical, a path improved by the new edge uses it
    /// exactly once, so one pass `d(i,j) = min(d(i,j), d(i,a) + db + d(b,j))`
    /// re-closes the matrix.
    fn tighten(&mut self, a: usize, b: usize, db: Db) -> bool {
        if self.is_empty() {
            return false;
        }
        if db >= self.at(a, b) {
            return true;
        }
        if Db::sum(self.at(b, a), db) < Db::LE_ZERO {
            self.make_empty();
            return false;
        }
        self.set(a, b, db);
        for i in 0..self.dim {
            let d_ia = self.at(i, a);
            if d_ia.is_infinite() {
                continue;
            }
            let base = Db::sum(d_ia, db);
            for j in 0..self.dim {
                let cand = Db::sum(base, self.at(b, j));
                if cand < self.at(i, j) {
                    self.set(i, j, cand);
                }
            }
        }
        true
    }

    /// Intersects with an atomic clock constraint. Returns `false` iff the
    /// result is empty.
    pub fn constrain(&mut self, c: &ClockConstraint) -> bool {
        let a = Self::index(c.left);
        let b = Self::index(c.right);
        debug_assert!(a < self.dim && b < self.dim);
        self.tighten(a, b, Db::new(c.ineq, c.value))
    }

    /// Intersects with every constraint in `cs`. Returns `false` iff the
    /// result is empty.
    pub fn constrain_all<'a, I>(&mut self, cs: I) -> bool
    where
        I: IntoIterator<Item = &'a ClockConstraint>,
    {
        for c in cs {
            if !self.constrain(c) {
                return false;
            }
        }
        !self.is_empty()
    }

    /// Existential time elapse: removes every upper bound `x - 0 <= k`.
    /// Preserves canonicity.
    pub fn up(&mut self) {
        if self.is_empty() {
            return;
        }
        for i in 1..self.dim {
            self.set(i, 0, Db::INFINITY);
        }
    }

    /// Applies `left := right + value`. Preserves canonicity and never
    /// empties a non-empty zone.
    ///
    /// `right` must name a different clock than `left` (the reference clock
    /// always qualifies).
    pub fn reset(&mut self, r: &ClockReset) {
        if self.is_empty() {
            return;
        }
        let x = r.left + 1;
        let y = Self::index(r.right);
        debug_assert!(x < self.dim && y < self.dim && x != y);
        let plus = Db::le(r.value);
        let minus = Db::le(-r.value);
        for i in 0..self.dim {
            let db = Db::sum(plus, self.at(y, i));
            self.set(x, i, db);
        }
        for i in 0..self.dim {
            let db = Db::sum(self.at(i, y), minus);
            self.set(i, x, db);
        }
        self.set(x, x, Db::LE_ZERO);
    }

    /// Applies every reset in `rs`, in order.
    pub fn reset_all<'a, I>(&mut self, rs: I)
    where
        I: IntoIterator<Item = &'a ClockReset>,
    {
        for r in rs {
            self.reset(r);
        }
    }

    /// Full shortest-path closure (Floyd-Warshall). Detects emptiness via a
    /// negative diagonal. Every operation restores canonicity on its own
    /// (the extrapolations call this; everything else re-closes
    /// incrementally), so this is a no-op on zones produced by this type.
    pub fn close(&mut self) {
        for k in 0..self.dim {
            for i in 0..self.dim {
                let d_ik = self.at(i, k);
                if d_ik.is_infinite() {
                    continue;
                }
                for j in 0..self.dim {
                    let cand = Db::sum(d_ik, self.at(k, j));
                    if cand < self.at(i, j) {
                        self.set(i, j, cand);
                    }
                }
            }
        }
        for i in 0..self.dim {
            if self.at(i, i) < Db::LE_ZERO {
                self.make_empty();
                return;
            }
        }
    }

    /// Point membership: `v[c]` is the value of clock `c`.
    pub fn contains(&self, v: &[f64]) -> bool {
        debug_assert_eq!(v.len(), self.clock_count());
        if self.is_empty() {
            return false;
        }
        let val = |k: usize| if k == 0 { 0.0 } else { v[k - 1] };
        for i in 0..self.dim {
            for j in 0..self.dim {
                if !self.at(i, j).satisfied_by(val(i) - val(j)) {
                    return false;
                }
            }
        }
        true
    }

    /// Cell-wise inclusion of canonical zones.
    pub fn is_le(&self, other: &Zone) -> bool {
        debug_assert_eq!(self.dim, other.dim);
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a <= b)
    }

    /// Total order over canonical zones, for deterministic node ordering.
    pub fn lexical_cmp(&self, other: &Zone) -> Ordering {
        self.dim
            .cmp(&other.dim)
            .then_with(|| self.data.cmp(&other.data))
    }

    /// `self ⊆ aLU*(other)`, following rule (★) of Herbreteau, Srivathsan &
    /// Walukiewicz, "Better abstractions for timed automata" (2016):
    /// inclusion fails iff there are indices `x`, `y` with
    ///
    /// 1. `Z[0,x] >= (<=, -U(x))`,
    /// 2. `Z'[y,x] < Z[y,x]`,
    /// 3. `Z'[y,x] + (<, -L(y)) < Z[0,x]`,
    ///
    /// where `Z = self`, `Z' = other`, and the reference clock has
    /// `L = U = 0`. A clock with `NO_BOUND` is treated as `-infinity`, which
    /// makes conditions 1 and 3 unsatisfiable for it.
    pub fn is_alu_star_le(&self, other: &Zone, l: &BoundMap, u: &BoundMap) -> bool {
        debug_assert_eq!(self.dim, other.dim);
        debug_assert_eq!(l.clock_count(), self.clock_count());
        debug_assert_eq!(u.clock_count(), self.clock_count());
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        for x in 0..self.dim {
            let ux = if x == 0 { 0 } else { u.get(x - 1) };
            if ux == NO_BOUND {
                continue;
            }
            if self.at(0, x) < Db::le(-ux) {
                continue;
            }
            for y in 0..self.dim {
                if y == x {
                    continue;
                }
                if other.at(y, x) >= self.at(y, x) {
                    continue;
                }
                let ly = if y == 0 { 0 } else { l.get(y - 1) };
                if ly == NO_BOUND {
                    continue;
                }
                if Db::sum(other.at(y, x), Db::lt(-ly)) >= self.at(0, x) {
                    continue;
                }
                return false;
            }
        }
        true
    }

    /// `time_elapse(self) ⊆ aLU*(time_elapse(other))`: both zones are
    /// elapsed on copies before the aLU* check.
    pub fn is_time_elapse_alu_star_le(&self, other: &Zone, l: &BoundMap, u: &BoundMap) -> bool {
        let mut a = self.clone();
        a.up();
        let mut b = other.clone();
        b.up();
        a.is_alu_star_le(&b, l, u)
    }

    /// `sync(self) ⊆ aLU*(sync(other))`. Zones over a single reference clock
    /// are synchronized by construction, so the restriction is the identity
    /// and the check reduces to aLU*.
    pub fn is_sync_alu_le(&self, other: &Zone, l: &BoundMap, u: &BoundMap) -> bool {
        self.is_alu_star_le(other, l, u)
    }

    /// `self ⊆ aM(other)`: the M abstraction is aLU* with `L = U = M`.
    pub fn is_am_le(&self, other: &Zone, m: &BoundMap) -> bool {
        self.is_alu_star_le(other, m, m)
    }

    /// ExtraM extrapolation (Behrmann et al. 2006): bounds above `(<=, M(i))`
    /// become infinite, bounds below `(<, -M(j))` are clipped to it, with
    /// `M = NO_BOUND` read as `-infinity` so that every bound on such a
    /// clock is dropped. Re-closes afterwards.
    pub fn extra_m(&mut self, m: &BoundMap) {
        debug_assert_eq!(m.clock_count(), self.clock_count());
        self.extrapolate(m, m);
    }

    /// ExtraLU extrapolation (Behrmann et al. 2006): upper rows clip against
    /// `L`, lower columns against `U`. Re-closes afterwards.
    pub fn extra_lu(&mut self, l: &BoundMap, u: &BoundMap) {
        debug_assert_eq!(l.clock_count(), self.clock_count());
        debug_assert_eq!(u.clock_count(), self.clock_count());
        self.extrapolate(l, u);
    }

    /// Shared clipping pass: `d(i,j) = inf` when `d(i,j) > (<=, row(i))`,
    /// `d(i,j) = (<, -col(j))` when below it. The reference clock has bound
    /// zero on both sides.
    fn extrapolate(&mut self, row: &BoundMap, col: &BoundMap) {
        if self.is_empty() {
            return;
        }
        let mut changed = false;
        for i in 0..self.dim {
            let ri = if i == 0 { 0 } else { row.get(i - 1) };
            for j in 0..self.dim {
                if i == j {
                    continue;
                }
                let d = self.at(i, j);
                if d.is_infinite() {
                    continue;
                }
                if ri == NO_BOUND || d > Db::le(ri) {
                    self.set(i, j, Db::INFINITY);
                    changed = true;
                    continue;
                }
                let cj = if j == 0 { 0 } else { col.get(j - 1) };
                if cj == NO_BOUND {
                    self.set(i, j, Db::INFINITY);
                    changed = true;
                } else if d < Db::lt(-cj) {
                    self.set(i, j, Db::lt(-cj));
                    changed = true;
                }
            }
        }
        if changed {
            self.close();
        }
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "false");
        }
        let name = |k: usize| {
            if k == 0 {
                "0".to_string()
            } else {
                format!("x{}", k - 1)
            }
        };
        let mut first = true;
        for i in 0..self.dim {
            for j in 0..self.dim {
                if i == j || self.at(i, j).is_infinite() {
                    continue;
                }
                // row 0 cells at (<=, 0) just restate positivity
                if i == 0 && self.at(i, j) == Db::LE_ZERO {
                    continue;
                }
                if !first {
                    write!(f, " & ")?;
                }
                first = false;
                write!(f, "{}-{}{}", name(i), name(j), self.at(i, j))?;
            }
        }
        if first {
            write!(f, "true")?;
        }
        Ok(())
    }
}
