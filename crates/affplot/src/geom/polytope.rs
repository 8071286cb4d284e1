//! Convex polytopes in H-representation (`A x <= b`), any dimension.
//!
//! Assumptions and conventions
//! - Rows are not normalized; `b` may have any sign. Empty, bounded, and
//!   unbounded sets are all representable; boundedness is only established by
//!   the extractor.
//! - Values are immutable: `intersection` stacks the rows into a new polytope.

use nalgebra::{DMatrix, DVector, Matrix2, Vector2};

use super::lp::{self, LpError};
use super::types::Interval;

#[derive(Clone, Debug, PartialEq)]
pub struct Polytope {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl Polytope {
    /// Construct from `A` (rows = half-spaces) and `b`.
    ///
    /// Panics if the row counts differ.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Self {
        assert_eq!(a.nrows(), b.len(), "A and b must have matching rows");
        Self { a, b }
    }

    /// The whole space `R^dim` (no constraints).
    pub fn universe(dim: usize) -> Self {
        Self::new(DMatrix::zeros(0, dim), DVector::zeros(0))
    }

    /// Build from `(normal, offset)` pairs; all normals must share one length.
    pub fn from_halfspaces(dim: usize, hs: &[(DVector<f64>, f64)]) -> Self {
        let mut a = DMatrix::zeros(hs.len(), dim);
        let mut b = DVector::zeros(hs.len());
        for (i, (n, c)) in hs.iter().enumerate() {
            assert_eq!(n.len(), dim, "normal has wrong dimension");
            a.set_row(i, &n.transpose());
            b[i] = *c;
        }
        Self::new(a, b)
    }

    /// Axis-aligned box, one interval per dimension (two rows per axis).
    pub fn hyperrectangle(intervals: &[Interval]) -> Self {
        let dim = intervals.len();
        let mut a = DMatrix::zeros(2 * dim, dim);
        let mut b = DVector::zeros(2 * dim);
        for (k, iv) in intervals.iter().enumerate() {
            a[(2 * k, k)] = 1.0;
            b[2 * k] = iv.hi;
            a[(2 * k + 1, k)] = -1.0;
            b[2 * k + 1] = -iv.lo;
        }
        Self::new(a, b)
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }

    #[inline]
    pub fn num_halfspaces(&self) -> usize {
        self.a.nrows()
    }

    /// `(A, b)` with `A x <= b`.
    #[inline]
    pub fn halfspaces(&self) -> (&DMatrix<f64>, &DVector<f64>) {
        (&self.a, &self.b)
    }

    /// Intersection (row stacking). Panics on a dimension mismatch.
    pub fn intersection(&self, other: &Polytope) -> Polytope {
        assert_eq!(self.dim(), other.dim(), "dimension mismatch in intersection");
        let (m, k) = (self.num_halfspaces(), other.num_halfspaces());
        let mut a = DMatrix::zeros(m + k, self.dim());
        let mut b = DVector::zeros(m + k);
        a.rows_mut(0, m).copy_from(&self.a);
        a.rows_mut(m, k).copy_from(&other.a);
        b.rows_mut(0, m).copy_from(&self.b);
        b.rows_mut(m, k).copy_from(&other.b);
        Polytope::new(a, b)
    }

    /// Membership with slack: `A x <= b + eps`.
    pub fn contains_eps(&self, x: &DVector<f64>, eps: f64) -> bool {
        let ax = &self.a * x;
        ax.iter().zip(self.b.iter()).all(|(l, r)| *l <= *r + eps)
    }

    /// Centre and radius of the largest inscribed ball.
    pub fn chebyshev_center(&self) -> Result<(DVector<f64>, f64), LpError> {
        lp::chebyshev_center(&self.a, &self.b)
    }

    /// Translate by `t`: `{x + t : A x <= b}`.
    pub fn translated(&self, t: &DVector<f64>) -> Polytope {
        let b = &self.b + &self.a * t;
        Polytope::new(self.a.clone(), b)
    }

    /// Rotate a 2D polytope about the origin by `theta`.
    pub fn rotated2(&self, theta: f64) -> Polytope {
        assert_eq!(self.dim(), 2, "rotated2 needs a 2D polytope");
        let r = Matrix2::new(theta.cos(), -theta.sin(), theta.sin(), theta.cos());
        // {R x : A x <= b} = {y : A R^T y <= b}
        let mut a = self.a.clone();
        for i in 0..a.nrows() {
            let n = Vector2::new(self.a[(i, 0)], self.a[(i, 1)]);
            let rn = r * n;
            a[(i, 0)] = rn.x;
            a[(i, 1)] = rn.y;
        }
        Polytope::new(a, self.b.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    #[test]
    fn hyperrectangle_membership() {
        let p = Polytope::hyperrectangle(&[Interval::new(0.0, 2.0), Interval::new(-1.0, 1.0)]);
        assert_eq!(p.dim(), 2);
        assert_eq!(p.num_halfspaces(), 4);
        assert!(p.contains_eps(&dvector![1.0, 0.5], 0.0));
        assert!(p.contains_eps(&dvector![2.0, -1.0], 0.0));
        assert!(!p.contains_eps(&dvector![2.1, 0.0], 1e-9));
    }

    #[test]
    fn intersection_stacks_rows() {
        let p = Polytope::hyperrectangle(&[Interval::new(0.0, 2.0), Interval::new(0.0, 2.0)]);
        let q = Polytope::hyperrectangle(&[Interval::new(1.0, 3.0), Interval::new(0.0, 1.0)]);
        let r = p.intersection(&q);
        assert_eq!(r.num_halfspaces(), 8);
        assert!(r.contains_eps(&dvector![1.5, 0.5], 0.0));
        assert!(!r.contains_eps(&dvector![0.5, 0.5], 1e-9));
        // inputs are untouched
        assert_eq!(p.num_halfspaces(), 4);
    }

    #[test]
    fn rigid_transforms_move_members() {
        let p = Polytope::hyperrectangle(&[Interval::new(0.0, 1.0), Interval::new(0.0, 1.0)]);
        let t = p.translated(&dvector![2.0, 0.0]);
        assert!(t.contains_eps(&dvector![2.5, 0.5], 0.0));
        assert!(!t.contains_eps(&dvector![0.5, 0.5], 1e-9));
        let r = p.rotated2(std::f64::consts::FRAC_PI_2);
        assert!(r.contains_eps(&dvector![-0.5, 0.5], 1e-9));
        assert!(!r.contains_eps(&dvector![0.5, 0.5], 1e-9));
    }

    #[test]
    fn chebyshev_center_of_box() {
        let p = Polytope::hyperrectangle(&[Interval::new(0.0, 2.0), Interval::new(0.0, 2.0)]);
        let (c, r) = p.chebyshev_center().unwrap();
        assert!((r - 1.0).abs() < 1e-9);
        assert!((c - dvector![1.0, 1.0]).norm() < 1e-9);
    }
}
