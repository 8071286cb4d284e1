//! Ordered vertex sequences of bounded 2D polytopes.
//!
//! Pipeline
//! - Chebyshev centre (LP) gives a strictly interior point, or proves the
//!   region empty/unbounded/flat.
//! - Half-space intersection by duality around that point: each half-space
//!   `n·x <= c` becomes the dual point `n / (c - n·center)`; the dual hull's
//!   edges are the primal vertices. The origin must lie strictly inside the
//!   dual hull, otherwise the primal region is unbounded.
//! - Vertices are sorted by angle around their mean so that the sequence traces
//!   a simple polygon.

use nalgebra::Vector2;

use super::hull::convex_hull;
use super::lp::LpError;
use super::polytope::Polytope;
use super::types::GeomCfg;
use crate::error::GeometryError;

/// Counter-clockwise vertex sequence of a bounded, full-dimensional 2D polytope.
///
/// Errors
/// - `Dimension` for non-2D input.
/// - `Empty` / `Unbounded` when the Chebyshev LP is infeasible / unbounded.
/// - `Degenerate` for regions without interior (radius below `cfg.eps_radius`).
///
/// Tolerances in the dual are relative, so the result does not depend on the
/// region's extent or position.
pub fn extreme_points(poly: &Polytope, cfg: &GeomCfg) -> Result<Vec<Vector2<f64>>, GeometryError> {
    if poly.dim() != 2 {
        return Err(GeometryError::Dimension(poly.dim()));
    }
    let (center, radius) = poly.chebyshev_center().map_err(|e| match e {
        LpError::Infeasible => GeometryError::Empty,
        LpError::Unbounded => GeometryError::Unbounded,
    })?;
    if !(radius > cfg.eps_radius) {
        return Err(GeometryError::Degenerate("no interior"));
    }
    let interior = Vector2::new(center[0], center[1]);
    let verts = halfspace_intersection(poly, interior, cfg)?;
    Ok(order_by_angle(verts))
}

/// Vertices of `poly` given a point strictly inside it (dual hull order, CCW).
pub fn halfspace_intersection(
    poly: &Polytope,
    interior: Vector2<f64>,
    cfg: &GeomCfg,
) -> Result<Vec<Vector2<f64>>, GeometryError> {
    let (a, b) = poly.halfspaces();
    let mut dual = Vec::with_capacity(a.nrows());
    for i in 0..a.nrows() {
        let n = Vector2::new(a[(i, 0)], a[(i, 1)]);
        let slack = b[i] - n.dot(&interior);
        if n.norm() <= cfg.eps_det {
            // 0 <= b_i: either vacuous or contradicts the interior point.
            if slack < -cfg.eps_feas {
                return Err(GeometryError::Empty);
            }
            continue;
        }
        if !(slack > 0.0) {
            return Err(GeometryError::Degenerate("seed point is not interior"));
        }
        dual.push(n / slack);
    }
    let hull = convex_hull(&dual).ok_or(GeometryError::Unbounded)?;
    if hull.len() < 3 {
        return Err(GeometryError::Unbounded);
    }
    // Dual points scale like 1/width: compare angles, not raw cross products.
    let m = hull.len();
    let mut verts: Vec<Vector2<f64>> = Vec::with_capacity(m);
    for k in 0..m {
        let p = hull[k];
        let q = hull[(k + 1) % m];
        // positive iff the origin is left of edge p→q
        let det = p.perp(&q);
        let sine = det / (p.norm() * q.norm());
        if !(sine > cfg.eps_det) {
            return Err(GeometryError::Unbounded);
        }
        // [p; q] v = [1; 1]
        verts.push(Vector2::new((q.y - p.y) / det, (p.x - q.x) / det) + interior);
    }
    let extent = verts
        .iter()
        .map(|v| (v - interior).norm())
        .fold(0.0, f64::max);
    let tol = 1e-12 * extent;
    verts.dedup_by(|a, b| (*a - *b).norm() <= tol);
    if verts.len() > 1 && (verts[0] - verts[verts.len() - 1]).norm() <= tol {
        verts.pop();
    }
    if verts.len() < 3 {
        return Err(GeometryError::Degenerate("fewer than three vertices"));
    }
    Ok(verts)
}

/// Sort ascending by `atan2(y - mean_y, x - mean_x)`.
pub fn order_by_angle(mut verts: Vec<Vector2<f64>>) -> Vec<Vector2<f64>> {
    if verts.is_empty() {
        return verts;
    }
    let mean = verts.iter().fold(Vector2::zeros(), |acc, v| acc + v) / verts.len() as f64;
    verts.sort_by(|p, q| {
        let ap = (p.y - mean.y).atan2(p.x - mean.x);
        let aq = (q.y - mean.y).atan2(q.x - mean.x);
        ap.partial_cmp(&aq).unwrap_or(std::cmp::Ordering::Equal)
    });
    verts
}
