//! Model-level errors.

use thiserror::Error;

/// A contract violation in the model or in a caller-supplied tuple. These
/// are fatal: results computed from a malformed model would be unsound, so
/// they are surfaced as `Err` and terminate the run, unlike the per-step
/// status codes which are expected outcomes of exploration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown process {0}")]
    UnknownProcess(usize),

    #[error("unknown location {0}")]
    UnknownLocation(usize),

    #[error("unknown edge {0}")]
    UnknownEdge(usize),

    #[error("unknown event {0}")]
    UnknownEvent(usize),

    #[error("unknown clock {0}")]
    UnknownClock(usize),

    #[error("unknown integer variable {0}")]
    UnknownIntVar(usize),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("at most {max} labels are supported", max = crate::ts::LabelSet::MAX_LABELS)]
    TooManyLabels,

    #[error("process {pid} has no initial location")]
    NoInitialLocation { pid: usize },

    #[error("location {loc} does not belong to process {pid}")]
    ForeignLocation { loc: usize, pid: usize },

    #[error("integer variable '{name}': empty range {lo}..={hi}")]
    EmptyRange { name: String, lo: i32, hi: i32 },

    #[error("integer variable '{name}': initial value {initial} outside {lo}..={hi}")]
    InitialValueOutOfRange {
        name: String,
        lo: i32,
        hi: i32,
        initial: i32,
    },

    #[error("edge {edge}: reset assigns clock {clock} from itself")]
    SelfReferentialReset { edge: usize, clock: usize },

    #[error("synchronization refers to process {pid} more than once")]
    DuplicateSyncProcess { pid: usize },

    #[error("edge tuple names process {pid}, but the system has {count} processes")]
    EdgePidOutOfRange { pid: usize, count: usize },

    #[error("edge tuple contains two edges for process {pid}")]
    DuplicateEdgeProcess { pid: usize },

    #[error("location tuple has size {got}, expected {expected}")]
    VlocSizeMismatch { got: usize, expected: usize },

    #[error("clock bound analysis diverges: resets form an increasing cycle")]
    DivergentClockBounds,
}
