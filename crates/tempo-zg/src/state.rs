//! Symbolic states.

use ahash::AHasher;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tempo_clockbounds::BoundMap;
use tempo_dbm::Zone;
use tempo_ta::{Intval, SharedIdentity, Vloc};

/// A symbolic state `(vloc, intval, zone)`. Components are shared handles:
/// states produced by an interning zone graph reuse one allocation per
/// distinct component, which makes the shared equality tier a pointer
/// comparison.
#[derive(Debug, Clone)]
pub struct State {
    vloc: Arc<Vloc>,
    intval: Arc<Intval>,
    zone: Arc<Zone>,
}

impl State {
    pub fn new(vloc: Arc<Vloc>, intval: Arc<Intval>, zone: Arc<Zone>) -> State {
        State {
            vloc,
            intval,
            zone,
        }
    }

    pub fn vloc(&self) -> &Vloc {
        &self.vloc
    }

    pub fn intval(&self) -> &Intval {
        &self.intval
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn vloc_ptr(&self) -> &Arc<Vloc> {
        &self.vloc
    }

    pub fn intval_ptr(&self) -> &Arc<Intval> {
        &self.intval
    }

    pub fn zone_ptr(&self) -> &Arc<Zone> {
        &self.zone
    }
}

/// Value equality: vloc, intval and zone compare by content.
impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        discrete_eq(self, other) && self.zone == other.zone
    }
}

impl Eq for State {}

/// Value hash, consistent with value equality.
impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vloc.hash(state);
        self.intval.hash(state);
        self.zone.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.vloc, self.intval, self.zone)
    }
}

/// Discrete equality: same vloc and intval, zones ignored.
pub fn discrete_eq(s1: &State, s2: &State) -> bool {
    s1.vloc == s2.vloc && s1.intval == s2.intval
}

/// Shared equality: all three component handles are identical.
pub fn shared_equal_to(s1: &State, s2: &State) -> bool {
    Arc::ptr_eq(&s1.vloc, &s2.vloc)
        && Arc::ptr_eq(&s1.intval, &s2.intval)
        && Arc::ptr_eq(&s1.zone, &s2.zone)
}

/// Shared equality on the discrete part only.
fn shared_discrete_eq(s1: &State, s2: &State) -> bool {
    Arc::ptr_eq(&s1.vloc, &s2.vloc) && Arc::ptr_eq(&s1.intval, &s2.intval)
}

/// Subsumption: discretely equal and zone-included.
pub fn is_le(s1: &State, s2: &State) -> bool {
    discrete_eq(s1, s2) && s1.zone.is_le(&s2.zone)
}

/// Subsumption with handle short-circuits on the shared components.
pub fn shared_is_le(s1: &State, s2: &State) -> bool {
    shared_discrete_eq(s1, s2)
        && (Arc::ptr_eq(&s1.zone, &s2.zone) || s1.zone.is_le(&s2.zone))
}

/// Subsumption modulo the aLU* abstraction.
pub fn is_alu_star_le(s1: &State, s2: &State, l: &BoundMap, u: &BoundMap) -> bool {
    discrete_eq(s1, s2) && s1.zone.is_alu_star_le(&s2.zone, l, u)
}

pub fn shared_is_alu_star_le(s1: &State, s2: &State, l: &BoundMap, u: &BoundMap) -> bool {
    shared_discrete_eq(s1, s2)
        && (Arc::ptr_eq(&s1.zone, &s2.zone) || s1.zone.is_alu_star_le(&s2.zone, l, u))
}

/// Subsumption modulo the synchronized aLU abstraction.
pub fn is_sync_alu_le(s1: &State, s2: &State, l: &BoundMap, u: &BoundMap) -> bool {
    discrete_eq(s1, s2) && s1.zone.is_sync_alu_le(&s2.zone, l, u)
}

pub fn shared_is_sync_alu_le(s1: &State, s2: &State, l: &BoundMap, u: &BoundMap) -> bool {
    shared_discrete_eq(s1, s2)
        && (Arc::ptr_eq(&s1.zone, &s2.zone) || s1.zone.is_sync_alu_le(&s2.zone, l, u))
}

/// Subsumption modulo time-elapsed aLU*.
pub fn is_time_elapse_alu_star_le(s1: &State, s2: &State, l: &BoundMap, u: &BoundMap) -> bool {
    discrete_eq(s1, s2) && s1.zone.is_time_elapse_alu_star_le(&s2.zone, l, u)
}

pub fn shared_is_time_elapse_alu_star_le(
    s1: &State,
    s2: &State,
    l: &BoundMap,
    u: &BoundMap,
) -> bool {
    shared_discrete_eq(s1, s2)
        && (Arc::ptr_eq(&s1.zone, &s2.zone) || s1.zone.is_time_elapse_alu_star_le(&s2.zone, l, u))
}

/// Total order chaining vloc, intval and zone comparisons.
pub fn lexical_cmp(s1: &State, s2: &State) -> Ordering {
    s1.vloc
        .cmp(&s2.vloc)
        .then_with(|| s1.intval.cmp(&s2.intval))
        .then_with(|| s1.zone.lexical_cmp(&s2.zone))
}

impl SharedIdentity for State {
    fn shared_hash(&self) -> u64 {
        let mut h = AHasher::default();
        (Arc::as_ptr(&self.vloc) as usize).hash(&mut h);
        (Arc::as_ptr(&self.intval) as usize).hash(&mut h);
        (Arc::as_ptr(&self.zone) as usize).hash(&mut h);
        h.finish()
    }

    fn shared_eq(&self, other: &Self) -> bool {
        shared_equal_to(self, other)
    }
}
