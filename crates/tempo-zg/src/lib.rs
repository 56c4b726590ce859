//! Symbolic zone graph semantics for networks of timed automata.
//!
//! [`ZoneGraph`] turns a [`tempo_ta::System`] into a transition system over
//! symbolic states: a tuple of locations, an integer valuation and a zone.
//! Successors are computed by the untimed step of `tempo-ta` followed by a
//! zone [`Semantics`] and an [`Extrapolation`], with all state components
//! interned so that graph deduplication is a pointer comparison.

pub mod extrapolation;
pub mod semantics;
pub mod state;
pub mod transition;
pub mod zg;

pub use extrapolation::{Extrapolation, Extrapolator};
pub use semantics::Semantics;
pub use state::State;
pub use transition::Transition;
pub use zg::ZoneGraph;
