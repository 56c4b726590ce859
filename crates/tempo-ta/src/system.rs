//! Immutable system of synchronized timed processes.

use crate::error::ModelError;
use crate::expr::{Guard, IntAssign};
use crate::state::Intval;
use crate::ts::LabelSet;
use tempo_dbm::ClockReset;

pub type ProcessId = usize;
pub type LocationId = usize;
pub type EdgeId = usize;
pub type EventId = usize;
pub type ClockId = usize;
pub type IntVarId = usize;
pub type LabelId = usize;

/// A timed process: a set of locations with at least one initial one.
#[derive(Debug, Clone)]
pub struct Process {
    pub name: String,
    pub locations: Vec<LocationId>,
    pub initial: Vec<LocationId>,
}

/// A location of one process. Location ids are flat across the system.
#[derive(Debug, Clone)]
pub struct Location {
    pub pid: ProcessId,
    pub name: String,
    pub initial: bool,
    /// Urgent locations forbid time elapse.
    pub urgent: bool,
    pub invariant: Guard,
    pub labels: LabelSet,
}

/// An edge of one process. Edge ids are flat across the system.
#[derive(Debug, Clone)]
pub struct Edge {
    pub pid: ProcessId,
    pub src: LocationId,
    pub tgt: LocationId,
    pub event: EventId,
    pub guard: Guard,
    pub resets: Vec<ClockReset>,
    pub statements: Vec<IntAssign>,
}

/// A bounded integer variable.
#[derive(Debug, Clone)]
pub struct IntVar {
    pub name: String,
    pub lo: i32,
    pub hi: i32,
    pub initial: i32,
}

impl IntVar {
    pub fn contains(&self, value: i64) -> bool {
        i64::from(self.lo) <= value && value <= i64::from(self.hi)
    }
}

/// A strong synchronization vector: every named process must take an edge
/// labelled with its named event, simultaneously.
#[derive(Debug, Clone)]
pub struct Sync {
    /// `(process, event)` pairs, sorted by process id.
    pub constraints: Vec<(ProcessId, EventId)>,
}

/// A system of synchronized timed processes over clocks and bounded integer
/// variables. Built by [`crate::builder::SystemBuilder`]; immutable
/// afterwards.
#[derive(Debug, Clone)]
pub struct System {
    pub(crate) name: String,
    pub(crate) processes: Vec<Process>,
    pub(crate) locations: Vec<Location>,
    pub(crate) edges: Vec<Edge>,
    /// Outgoing edge ids per location, in declaration order.
    pub(crate) outgoing: Vec<Vec<EdgeId>>,
    pub(crate) events: Vec<String>,
    pub(crate) syncs: Vec<Sync>,
    /// `synchronized[pid][event]`: whether some sync vector names the pair,
    /// making edges with that event non-asynchronous for the process.
    pub(crate) synchronized: Vec<Vec<bool>>,
    pub(crate) clocks: Vec<String>,
    pub(crate) intvars: Vec<IntVar>,
    pub(crate) labels: Vec<String>,
}

impl System {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn clock_count(&self) -> usize {
        self.clocks.len()
    }

    pub fn intvar_count(&self) -> usize {
        self.intvars.len()
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn process(&self, pid: ProcessId) -> &Process {
        &self.processes[pid]
    }

    pub fn location(&self, loc: LocationId) -> &Location {
        &self.locations[loc]
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge]
    }

    pub fn intvar(&self, var: IntVarId) -> &IntVar {
        &self.intvars[var]
    }

    pub fn syncs(&self) -> &[Sync] {
        &self.syncs
    }

    pub fn outgoing_edges(&self, loc: LocationId) -> &[EdgeId] {
        &self.outgoing[loc]
    }

    /// Whether edges of `pid` labelled `event` take part in a
    /// synchronization vector (and therefore never fire alone).
    pub fn is_synchronized(&self, pid: ProcessId, event: EventId) -> bool {
        self.synchronized[pid][event]
    }

    /// The declared initial valuation of the integer variables.
    pub fn initial_intval(&self) -> Intval {
        let values: Vec<i32> = self.intvars.iter().map(|v| v.initial).collect();
        Intval::from_slice(&values)
    }

    pub fn label_name(&self, label: LabelId) -> &str {
        &self.labels[label]
    }

    /// Looks up a label id by name.
    pub fn label_id(&self, name: &str) -> Option<LabelId> {
        self.labels.iter().position(|l| l == name)
    }

    /// Builds a label set from names; unknown names are an error.
    pub fn label_set(&self, names: &[&str]) -> Result<LabelSet, ModelError> {
        let mut set = LabelSet::empty();
        for name in names {
            let id = self
                .label_id(name)
                .ok_or_else(|| ModelError::UnknownLabel((*name).to_string()))?;
            set.insert(id);
        }
        Ok(set)
    }
}
