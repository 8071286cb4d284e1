//! Render the partitions of piecewise-affine decision trees.
//!
//! Every leaf of an affine tree owns a convex region of input space (the
//! intersection of the predicates on its root path). This crate clips those
//! regions to a plotting box, turns each into a polygon, colours it via a
//! ledger, and collects the result on an in-memory surface:
//! - preimage view: flat polygons in the input plane,
//! - image view: the same polygons lifted to `(x, y, f(x, y))`.
//!
//! Layout
//! - `geom`: H-polytopes, Chebyshev centre LP, 2D vertex extraction.
//! - `tree`: affine maps, predicates, and the `Partition` seam.
//! - `color`: palettes and the discrete/continuous colour ledgers.
//! - `surface`: serializable axes, patch collections, legends.
//! - `render`: the two rendering passes.

pub mod color;
pub mod error;
pub mod geom;
pub mod render;
pub mod surface;
pub mod tree;

#[cfg(test)]
mod testutil;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{ConfigError, GeometryError, LedgerError, RenderError};
pub use nalgebra::{DMatrix, DVector, Vector2 as Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::color::{
        Bucketing, ColorLedger, ContinuousCfg, ContinuousLedger, DiscreteCfg, DiscreteLedger,
        Mapping, Rgb,
    };
    pub use crate::error::{ConfigError, GeometryError, LedgerError, RenderError};
    pub use crate::geom::{extreme_points, GeomCfg, Interval, Polytope};
    pub use crate::render::{
        collect_image, collect_preimage, render_image, render_image_onto, render_preimage,
        render_preimage_onto, ImageOptions, LeafOutcome, PreimageOptions,
    };
    pub use crate::surface::{Axes2, Axes3, LegendPosition, Surface};
    pub use crate::tree::{AffFunc, AffTree, Partition, Predicate};
    pub use nalgebra::{DMatrix, DVector, Vector2 as Vec2};
}
