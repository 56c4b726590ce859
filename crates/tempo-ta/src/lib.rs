//! Networks of timed processes and their discrete step semantics.
//!
//! A [`System`] is a set of processes with locations and edges, synchronized
//! through events, over real-valued clocks and bounded integer variables.
//! The [`step`] module implements the untimed part of the semantics: it
//! computes discrete successors and collects the clock constraints and
//! resets that a zone layer then applies to zones.

pub mod analysis;
pub mod builder;
pub mod error;
pub mod expr;
pub mod state;
pub mod step;
pub mod system;
pub mod ts;

pub use builder::SystemBuilder;
pub use error::ModelError;
pub use expr::{Cmp, Guard, IntAssign, IntExpr, IntGuard};
pub use state::{Intval, Vedge, Vloc};
pub use system::{
    ClockId, Edge, EdgeId, EventId, IntVar, IntVarId, LabelId, Location, LocationId, Process,
    ProcessId, Sync, System,
};
pub use ts::{LabelSet, SharedIdentity, StateStatus, StatusMask, TransitionSystem};
