//! Seeded random convex polygons for property tests and benches.
//!
//! A draw picks a side count from `PolygonSampler::sides`, splits the full
//! turn into that many jittered angular gaps, places one point per angle at a
//! jittered radius, and returns the H-representation of their hull. Every gap
//! stays below a half turn, so the centre is always strictly inside.
//!
//! `(seed, draw)` fully determines the result: the pair is packed into the
//! 32-byte `StdRng` seed, so neighbouring draws do not share a stream.

use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use nalgebra::{DVector, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::hull::convex_hull;
use super::polytope::Polytope;

/// Largest gap jitter that keeps every gap of a triangle under a half turn.
const MAX_GAP_JITTER: f64 = 0.3;

#[derive(Clone, Debug)]
pub struct PolygonSampler {
    /// Side counts to draw from; values below 3 are raised to 3.
    pub sides: RangeInclusive<usize>,
    pub center: Vector2<f64>,
    pub radius: f64,
    /// Relative spread of the angular gaps, clamped to `[0, 0.3]`.
    pub gap_jitter: f64,
    /// Radii lie in `radius * [1 - j, 1 + j]`, with `j` clamped to `[0, 0.9]`.
    pub radius_jitter: f64,
}

impl Default for PolygonSampler {
    fn default() -> Self {
        Self {
            sides: 8..=8,
            center: Vector2::zeros(),
            radius: 1.0,
            gap_jitter: 0.25,
            radius_jitter: 0.25,
        }
    }
}

impl PolygonSampler {
    /// Sampler for polygons with exactly `n` sides.
    pub fn with_sides(n: usize) -> Self {
        Self {
            sides: n..=n,
            ..Self::default()
        }
    }

    /// Points of draw number `draw` under `seed`, by increasing angle.
    pub fn points(&self, seed: u64, draw: u64) -> Vec<Vector2<f64>> {
        let mut rng = stream(seed, draw);
        let lo = (*self.sides.start()).max(3);
        let hi = (*self.sides.end()).max(lo);
        let n = rng.gen_range(lo..=hi);

        let gj = self.gap_jitter.clamp(0.0, MAX_GAP_JITTER);
        let rj = self.radius_jitter.clamp(0.0, 0.9);
        let gaps: Vec<f64> = (0..n).map(|_| rng.gen_range(1.0 - gj..=1.0 + gj)).collect();
        let scale = TAU / gaps.iter().sum::<f64>();

        let mut angle = rng.gen_range(0.0..TAU);
        gaps.iter()
            .map(|g| {
                let r = self.radius * rng.gen_range(1.0 - rj..=1.0 + rj);
                let p = self.center + Vector2::new(angle.cos(), angle.sin()) * r;
                angle += g * scale;
                p
            })
            .collect()
    }

    /// Polygon for draw number `draw` under `seed`; `None` only for a
    /// non-positive or non-finite radius.
    pub fn draw(&self, seed: u64, draw: u64) -> Option<Polytope> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return None;
        }
        hull_polytope(&self.points(seed, draw))
    }
}

fn stream(seed: u64, draw: u64) -> StdRng {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&draw.to_le_bytes());
    StdRng::from_seed(key)
}

/// One half-space per hull edge, unit outward normals. `None` when the points
/// span no area.
pub fn hull_polytope(points: &[Vector2<f64>]) -> Option<Polytope> {
    let hull = convex_hull(points)?;
    if hull.len() < 3 {
        return None;
    }
    let next = hull.iter().cycle().skip(1);
    let rows: Vec<(DVector<f64>, f64)> = hull
        .iter()
        .zip(next)
        .map(|(p, q)| {
            // CCW edge turned clockwise
            let e = q - p;
            let n = Vector2::new(e.y, -e.x).normalize();
            (DVector::from_column_slice(n.as_slice()), n.dot(p))
        })
        .collect();
    Some(Polytope::from_halfspaces(2, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_draw_give_the_same_polygon() {
        let s = PolygonSampler::default();
        assert_eq!(s.draw(42, 7), s.draw(42, 7));
        assert_ne!(s.draw(42, 7), s.draw(42, 8));
        assert_ne!(s.draw(42, 7), s.draw(43, 7));
    }

    #[test]
    fn centre_is_strictly_inside() {
        let s = PolygonSampler {
            sides: 3..=5,
            center: Vector2::new(3.0, -1.0),
            gap_jitter: 1.0,
            ..PolygonSampler::default()
        };
        let c = DVector::from_column_slice(&[3.0, -1.0]);
        for draw in 0..50 {
            let p = s.draw(1, draw).unwrap();
            let (a, b) = p.halfspaces();
            let slack = b - a * &c;
            assert!(slack.min() > 0.0, "draw {draw}");
            assert!((3..=5).contains(&p.num_halfspaces()));
            assert!(!p.contains_eps(&DVector::zeros(2), 1e-9));
        }
    }

    #[test]
    fn fixed_side_count_is_honoured() {
        for n in [3, 6, 20] {
            // on a circle every point is a hull corner
            let s = PolygonSampler {
                radius_jitter: 0.0,
                ..PolygonSampler::with_sides(n)
            };
            let p = s.draw(5, 0).unwrap();
            assert_eq!(p.num_halfspaces(), n);
        }
        let tiny = PolygonSampler {
            sides: 0..=1,
            ..PolygonSampler::default()
        };
        assert_eq!(tiny.points(0, 0).len(), 3);
        let flat = PolygonSampler {
            radius: 0.0,
            ..PolygonSampler::default()
        };
        assert!(flat.draw(0, 0).is_none());
    }
}
