//! Planar helpers shared by the extractor and the polygon sampler.

use nalgebra::Vector2;

/// Twice the signed area of the triangle `a, b, c`; positive when the turn
/// `a → b → c` is counter-clockwise.
#[inline]
pub fn turn(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

/// Convex hull in counter-clockwise order, starting at the lexicographically
/// smallest point.
///
/// Points closer than `1e-12` times the spread of the input are merged and
/// boundary points on a straight edge are dropped. `None` when fewer than two
/// distinct points remain.
pub fn convex_hull(points: &[Vector2<f64>]) -> Option<Vec<Vector2<f64>>> {
    let mut pts: Vec<Vector2<f64>> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    let first = *pts.first()?;
    let spread = pts.iter().map(|p| (p - first).amax()).fold(0.0, f64::max);
    let merge = 1e-12 * spread;
    pts.dedup_by(|a, b| (*a - *b).amax() <= merge);
    if pts.len() < 2 {
        return None;
    }
    let mut hull = half_chain(pts.iter());
    hull.extend(half_chain(pts.iter().rev()));
    Some(hull)
}

/// One monotone half of the hull, without its closing point.
fn half_chain<'a>(sweep: impl Iterator<Item = &'a Vector2<f64>>) -> Vec<Vector2<f64>> {
    let mut chain: Vec<Vector2<f64>> = Vec::new();
    for &p in sweep {
        while let [.., a, b] = chain[..] {
            if turn(a, b, p) > 0.0 {
                break;
            }
            chain.pop();
        }
        chain.push(p);
    }
    chain.pop();
    chain
}

/// Shoelace signed area; positive for CCW vertex order.
pub fn signed_area(poly: &[Vector2<f64>]) -> f64 {
    let next = poly.iter().cycle().skip(1);
    0.5 * poly.iter().zip(next).map(|(p, q)| p.perp(q)).sum::<f64>()
}
