//! Error kinds for extraction, configuration, and colour lookup.
//!
//! Policy
//! - `GeometryError` is per region: the renderer records it and moves on.
//! - `ConfigError` is raised before the surface is touched.
//! - `LedgerError` signals misuse of a ledger (no fit, unknown key); callers
//!   propagate it with `?`.

use thiserror::Error;

/// A region has no valid extreme-point sequence.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("expected a 2D polytope, got dimension {0}")]
    Dimension(usize),
    #[error("polytope is empty")]
    Empty,
    #[error("polytope is unbounded")]
    Unbounded,
    #[error("polytope is degenerate: {0}")]
    Degenerate(&'static str),
}

/// Caller-supplied configuration cannot be rendered.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("expected {expected} bounding intervals, got {got}")]
    BoundsCount { expected: usize, got: usize },
    #[error("interval {index} is malformed: [{lo}, {hi}]")]
    Interval { index: usize, lo: f64, hi: f64 },
    #[error("input dimension {0} needs a projection to 2D")]
    NeedsProjection(usize),
    #[error("precondition has dimension {got}, expected {expected}")]
    PreconditionDim { expected: usize, got: usize },
    #[error("node {node} has output dimension {outdim}; an output projection is required")]
    MultiOutput { node: usize, outdim: usize },
    #[error("node {node} has input dimension {indim}; image view evaluates 2D points")]
    InputDim { node: usize, indim: usize },
}

/// Ledger used out of order or with data it was not fitted on.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("ledger used before fit")]
    NotFitted,
    #[error("tree has no terminal nodes")]
    NoLeaves,
    #[error("key {0} was not observed during fit")]
    UnknownKey(i64),
    #[error("absolute mapping cannot index negative key {0}")]
    NegativeKey(i64),
    #[error("palette has {size} colors but slot {slot} is required")]
    PaletteTooSmall { size: usize, slot: usize },
    #[error("bias sum {0} has no integer key")]
    NonFiniteKey(f64),
    #[error("key {key} exceeds the largest absolute palette slot {max}")]
    KeyTooLarge { key: i64, max: i64 },
    #[error("unknown palette or colormap '{0}'")]
    UnknownPalette(String),
}

/// Errors surfaced by the render entry points.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
