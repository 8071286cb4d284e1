//! Convex geometry for partition rendering.
//!
//! Purpose
//! - H-representation polytopes of any dimension (`Polytope`), the Chebyshev
//!   centre LP they need, and the 2D vertex extractor (`extreme_points`) that
//!   turns a bounded region into a drawable polygon.
//! - Keep tolerances explicit (`GeomCfg`) and failures typed (`GeometryError`).

pub mod extreme;
pub mod hull;
pub mod lp;
pub mod polytope;
pub mod rand;
mod types;

pub use extreme::{extreme_points, halfspace_intersection, order_by_angle};
pub use hull::{convex_hull, signed_area};
pub use lp::LpError;
pub use polytope::Polytope;
pub use types::{GeomCfg, Interval};
