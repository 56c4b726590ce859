//! Discrete state components: location tuples, integer valuations and edge
//! tuples.

use crate::system::{EdgeId, LocationId};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Tuple of locations, one per process, ordered by process id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vloc {
    locs: SmallVec<[LocationId; 4]>,
}

impl Vloc {
    pub fn from_slice(locs: &[LocationId]) -> Vloc {
        Vloc {
            locs: SmallVec::from_slice(locs),
        }
    }

    pub fn len(&self) -> usize {
        self.locs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locs.is_empty()
    }

    pub fn get(&self, pid: usize) -> LocationId {
        self.locs[pid]
    }

    pub fn set(&mut self, pid: usize, loc: LocationId) {
        self.locs[pid] = loc;
    }

    pub fn as_slice(&self) -> &[LocationId] {
        &self.locs
    }

    pub fn iter(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.locs.iter().copied()
    }
}

impl fmt::Display for Vloc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, loc) in self.locs.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", loc)?;
        }
        write!(f, ">")
    }
}

/// Valuation of the bounded integer variables, indexed by variable id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intval {
    values: SmallVec<[i32; 4]>,
}

impl Intval {
    pub fn from_slice(values: &[i32]) -> Intval {
        Intval {
            values: SmallVec::from_slice(values),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, var: usize) -> i32 {
        self.values[var]
    }

    pub fn set(&mut self, var: usize, value: i32) {
        self.values[var] = value;
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }
}

impl fmt::Display for Intval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}

/// Tuple of taken edges, one optional entry per process. Empty entries mean
/// the process does not participate in the step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vedge {
    edges: SmallVec<[Option<EdgeId>; 4]>,
}

impl Vedge {
    /// The tuple where no process moves.
    pub fn empty(process_count: usize) -> Vedge {
        Vedge {
            edges: smallvec![None; process_count],
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn get(&self, pid: usize) -> Option<EdgeId> {
        self.edges[pid]
    }

    pub fn set(&mut self, pid: usize, edge: Option<EdgeId>) {
        self.edges[pid] = edge;
    }

    /// Edges in increasing process id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, EdgeId)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(pid, e)| e.map(|e| (pid, e)))
    }
}

impl fmt::Display for Vedge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            match e {
                None => write!(f, "-")?,
                Some(e) => write!(f, "{}", e)?,
            }
        }
        write!(f, ">")
    }
}
