//! System construction and validation.

use crate::error::ModelError;
use crate::expr::{IntAssign, IntGuard};
use crate::system::*;
use tempo_dbm::{ClockConstraint, ClockReset};

/// Builds a [`System`] declaration by declaration. All cross-reference
/// validation happens in [`SystemBuilder::build`], so declarations can
/// arrive in any order; the few checks tied to a single call (process and
/// location existence, label capacity, integer ranges) fail immediately.
#[derive(Debug, Default)]
pub struct SystemBuilder {
    name: String,
    processes: Vec<Process>,
    locations: Vec<Location>,
    edges: Vec<Edge>,
    events: Vec<String>,
    syncs: Vec<Sync>,
    clocks: Vec<String>,
    intvars: Vec<IntVar>,
    labels: Vec<String>,
}

impl SystemBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn add_process(&mut self, name: &str) -> ProcessId {
        self.processes.push(Process {
            name: name.to_string(),
            locations: Vec::new(),
            initial: Vec::new(),
        });
        self.processes.len() - 1
    }

    pub fn add_clock(&mut self, name: &str) -> ClockId {
        self.clocks.push(name.to_string());
        self.clocks.len() - 1
    }

    pub fn add_event(&mut self, name: &str) -> EventId {
        self.events.push(name.to_string());
        self.events.len() - 1
    }

    pub fn add_intvar(
        &mut self,
        name: &str,
        lo: i32,
        hi: i32,
        initial: i32,
    ) -> Result<IntVarId, ModelError> {
        if lo > hi {
            return Err(ModelError::EmptyRange {
                name: name.to_string(),
                lo,
                hi,
            });
        }
        if initial < lo || initial > hi {
            return Err(ModelError::InitialValueOutOfRange {
                name: name.to_string(),
                lo,
                hi,
                initial,
            });
        }
        self.intvars.push(IntVar {
            name: name.to_string(),
            lo,
            hi,
            initial,
        });
        Ok(self.intvars.len() - 1)
    }

    pub fn add_label(&mut self, name: &str) -> Result<LabelId, ModelError> {
        if self.labels.len() == crate::ts::LabelSet::MAX_LABELS {
            return Err(ModelError::TooManyLabels);
        }
        self.labels.push(name.to_string());
        Ok(self.labels.len() - 1)
    }

    pub fn add_location(&mut self, pid: ProcessId, name: &str) -> Result<LocationId, ModelError> {
        self.check_process(pid)?;
        let id = self.locations.len();
        self.locations.push(Location {
            pid,
            name: name.to_string(),
            initial: false,
            urgent: false,
            invariant: Default::default(),
            labels: Default::default(),
        });
        self.processes[pid].locations.push(id);
        Ok(id)
    }

    pub fn set_initial(&mut self, loc: LocationId) -> Result<(), ModelError> {
        self.check_location(loc)?;
        if !self.locations[loc].initial {
            self.locations[loc].initial = true;
            let pid = self.locations[loc].pid;
            self.processes[pid].initial.push(loc);
        }
        Ok(())
    }

    pub fn set_urgent(&mut self, loc: LocationId) -> Result<(), ModelError> {
        self.check_location(loc)?;
        self.locations[loc].urgent = true;
        Ok(())
    }

    pub fn add_location_label(&mut self, loc: LocationId, label: LabelId) -> Result<(), ModelError> {
        self.check_location(loc)?;
        if label >= self.labels.len() {
            return Err(ModelError::UnknownLabel(format!("#{}", label)));
        }
        self.locations[loc].labels.insert(label);
        Ok(())
    }

    pub fn add_invariant(&mut self, loc: LocationId, c: ClockConstraint) -> Result<(), ModelError> {
        self.check_location(loc)?;
        self.locations[loc].invariant.clock.push(c);
        Ok(())
    }

    pub fn add_int_invariant(&mut self, loc: LocationId, g: IntGuard) -> Result<(), ModelError> {
        self.check_location(loc)?;
        self.locations[loc].invariant.int.push(g);
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        pid: ProcessId,
        src: LocationId,
        tgt: LocationId,
        event: EventId,
    ) -> Result<EdgeId, ModelError> {
        self.check_process(pid)?;
        self.check_location(src)?;
        self.check_location(tgt)?;
        for loc in [src, tgt] {
            if self.locations[loc].pid != pid {
                return Err(ModelError::ForeignLocation { loc, pid });
            }
        }
        if event >= self.events.len() {
            return Err(ModelError::UnknownEvent(event));
        }
        self.edges.push(Edge {
            pid,
            src,
            tgt,
            event,
            guard: Default::default(),
            resets: Vec::new(),
            statements: Vec::new(),
        });
        Ok(self.edges.len() - 1)
    }

    pub fn add_guard(&mut self, edge: EdgeId, c: ClockConstraint) -> Result<(), ModelError> {
        self.check_edge(edge)?;
        self.edges[edge].guard.clock.push(c);
        Ok(())
    }

    pub fn add_int_guard(&mut self, edge: EdgeId, g: IntGuard) -> Result<(), ModelError> {
        self.check_edge(edge)?;
        self.edges[edge].guard.int.push(g);
        Ok(())
    }

    pub fn add_reset(&mut self, edge: EdgeId, r: ClockReset) -> Result<(), ModelError> {
        self.check_edge(edge)?;
        self.edges[edge].resets.push(r);
        Ok(())
    }

    pub fn add_statement(&mut self, edge: EdgeId, a: IntAssign) -> Result<(), ModelError> {
        self.check_edge(edge)?;
        self.edges[edge].statements.push(a);
        Ok(())
    }

    pub fn add_sync(&mut self, constraints: &[(ProcessId, EventId)]) -> Result<(), ModelError> {
        let mut sorted = constraints.to_vec();
        sorted.sort_by_key(|&(pid, _)| pid);
        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(ModelError::DuplicateSyncProcess { pid: pair[0].0 });
            }
        }
        for &(pid, event) in &sorted {
            self.check_process(pid)?;
            if event >= self.events.len() {
                return Err(ModelError::UnknownEvent(event));
            }
        }
        self.syncs.push(Sync {
            constraints: sorted,
        });
        Ok(())
    }

    /// Validates every cross reference and freezes the system.
    pub fn build(self) -> Result<System, ModelError> {
        for (pid, process) in self.processes.iter().enumerate() {
            if process.initial.is_empty() {
                return Err(ModelError::NoInitialLocation { pid });
            }
        }

        for loc in &self.locations {
            self.check_guard(&loc.invariant)?;
        }
        for (id, edge) in self.edges.iter().enumerate() {
            self.check_guard(&edge.guard)?;
            for r in &edge.resets {
                self.check_clock(r.left)?;
                if let Some(y) = r.right {
                    self.check_clock(y)?;
                    if y == r.left {
                        return Err(ModelError::SelfReferentialReset {
                            edge: id,
                            clock: y,
                        });
                    }
                }
            }
            for a in &edge.statements {
                self.check_intvar(a.var)?;
                if let Some(v) = a.expr.max_var() {
                    self.check_intvar(v)?;
                }
            }
        }

        let mut outgoing = vec![Vec::new(); self.locations.len()];
        for (id, edge) in self.edges.iter().enumerate() {
            outgoing[edge.src].push(id);
        }

        let mut synchronized = vec![vec![false; self.events.len()]; self.processes.len()];
        for sync in &self.syncs {
            for &(pid, event) in &sync.constraints {
                synchronized[pid][event] = true;
            }
        }

        Ok(System {
            name: self.name,
            processes: self.processes,
            locations: self.locations,
            edges: self.edges,
            outgoing,
            events: self.events,
            syncs: self.syncs,
            synchronized,
            clocks: self.clocks,
            intvars: self.intvars,
            labels: self.labels,
        })
    }

    fn check_process(&self, pid: ProcessId) -> Result<(), ModelError> {
        if pid >= self.processes.len() {
            return Err(ModelError::UnknownProcess(pid));
        }
        Ok(())
    }

    fn check_location(&self, loc: LocationId) -> Result<(), ModelError> {
        if loc >= self.locations.len() {
            return Err(ModelError::UnknownLocation(loc));
        }
        Ok(())
    }

    fn check_edge(&self, edge: EdgeId) -> Result<(), ModelError> {
        if edge >= self.edges.len() {
            return Err(ModelError::UnknownEdge(edge));
        }
        Ok(())
    }

    fn check_clock(&self, clock: ClockId) -> Result<(), ModelError> {
        if clock >= self.clocks.len() {
            return Err(ModelError::UnknownClock(clock));
        }
        Ok(())
    }

    fn check_intvar(&self, var: IntVarId) -> Result<(), ModelError> {
        if var >= self.intvars.len() {
            return Err(ModelError::UnknownIntVar(var));
        }
        Ok(())
    }

    fn check_guard(&self, guard: &crate::expr::Guard) -> Result<(), ModelError> {
        for c in &guard.clock {
            if let Some(x) = c.left {
                self.check_clock(x)?;
            }
            if let Some(y) = c.right {
                self.check_clock(y)?;
            }
        }
        for g in &guard.int {
            for e in [&g.left, &g.right] {
                if let Some(v) = e.max_var() {
                    self.check_intvar(v)?;
                }
            }
        }
        Ok(())
    }
}
