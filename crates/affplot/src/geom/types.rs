//! Tolerances and closed intervals shared by the geometry routines.
//!
//! - `GeomCfg`: centralizes epsilons for feasibility, inradius, and determinant checks.
//! - `Interval`: one axis of a bounding box, validated before use.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug)]
pub struct GeomCfg {
    /// Slack for membership tests `a·x <= b + eps`.
    pub eps_feas: f64,
    /// Chebyshev radii at or below this are treated as lower-dimensional regions.
    pub eps_radius: f64,
    /// Minimum sine between adjacent dual hull points seen from the origin;
    /// also the norm below which a constraint row counts as zero.
    pub eps_det: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_feas: 1e-9,
            eps_radius: 1e-9,
            eps_det: 1e-12,
        }
    }
}

/// Closed interval `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Reject non-finite or empty intervals. `index` names the axis in the error.
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.lo.is_finite() && self.hi.is_finite() && self.lo < self.hi {
            Ok(())
        } else {
            Err(ConfigError::Interval {
                index,
                lo: self.lo,
                hi: self.hi,
            })
        }
    }

    /// Smallest interval covering all `values`; `None` for an empty input.
    pub fn hull_of<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut out: Option<Self> = None;
        for v in values {
            out = Some(match out {
                None => Self::new(v, v),
                Some(iv) => Self::new(iv.lo.min(v), iv.hi.max(v)),
            });
        }
        out
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self::new(lo, hi)
    }
}
