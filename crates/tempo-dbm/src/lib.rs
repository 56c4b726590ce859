//! Canonical difference bound matrices (zones) and their abstractions.
//!
//! A zone is a convex set of clock valuations described by difference
//! constraints `x_i - x_j ⋈ k`. The [`Zone`] type keeps its matrix closed
//! under shortest paths at all times, so equality, hashing, inclusion and
//! the aLU comparators can work cell-wise.

pub mod constraint;
pub mod db;
pub mod zone;

pub use constraint::{ClockConstraint, ClockReset};
pub use db::{Db, Ineq};
pub use zone::Zone;
