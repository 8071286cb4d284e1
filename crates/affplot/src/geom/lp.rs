//! Dense two-phase simplex, sized for the Chebyshev-centre problem.
//!
//! Scope
//! - `maximize c·z  s.t.  M z <= b, z >= 0` with a handful of rows/columns.
//! - Bland's rule for both entering and leaving variables (no cycling).
//! - Rows with `b_i < 0` are negated and receive an artificial variable for
//!   phase 1; artificials never re-enter in phase 2.

use nalgebra::{DMatrix, DVector};

const PIVOT_EPS: f64 = 1e-12;
const PHASE1_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpError {
    Infeasible,
    Unbounded,
}

/// Solution of an LP in inequality form.
#[derive(Clone, Debug)]
pub struct LpSolution {
    pub z: DVector<f64>,
    pub value: f64,
}

struct Tableau {
    t: DMatrix<f64>,
    basis: Vec<usize>,
    rhs: usize,
}

impl Tableau {
    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.t[(row, col)];
        let cols = self.t.ncols();
        for j in 0..cols {
            self.t[(row, j)] /= p;
        }
        for i in 0..self.t.nrows() {
            if i == row {
                continue;
            }
            let f = self.t[(i, col)];
            if f == 0.0 {
                continue;
            }
            for j in 0..cols {
                let v = self.t[(row, j)];
                self.t[(i, j)] -= f * v;
            }
        }
        self.basis[row] = col;
    }

    fn objective(&self, c: &[f64]) -> f64 {
        self.basis
            .iter()
            .enumerate()
            .map(|(i, &b)| c[b] * self.t[(i, self.rhs)])
            .sum()
    }

    /// Maximize `c` over columns `< ncols_allowed`.
    fn run(&mut self, c: &[f64], ncols_allowed: usize) -> Result<(), LpError> {
        loop {
            let mut entering = None;
            for j in 0..ncols_allowed {
                if self.basis.contains(&j) {
                    continue;
                }
                let mut d = c[j];
                for (i, &b) in self.basis.iter().enumerate() {
                    d -= c[b] * self.t[(i, j)];
                }
                if d > PIVOT_EPS {
                    entering = Some(j);
                    break;
                }
            }
            let Some(col) = entering else {
                return Ok(());
            };
            let mut leave: Option<(usize, f64)> = None;
            for i in 0..self.t.nrows() {
                let a = self.t[(i, col)];
                if a <= PIVOT_EPS {
                    continue;
                }
                let ratio = self.t[(i, self.rhs)] / a;
                leave = match leave {
                    None => Some((i, ratio)),
                    Some((r, best)) => {
                        if ratio < best - PIVOT_EPS
                            || (ratio <= best + PIVOT_EPS && self.basis[i] < self.basis[r])
                        {
                            Some((i, ratio))
                        } else {
                            Some((r, best))
                        }
                    }
                };
            }
            let Some((row, _)) = leave else {
                return Err(LpError::Unbounded);
            };
            self.pivot(row, col);
        }
    }
}

/// Solve `maximize c·z  s.t.  m z <= b, z >= 0`.
pub fn maximize(c: &DVector<f64>, m: &DMatrix<f64>, b: &DVector<f64>) -> Result<LpSolution, LpError> {
    let rows = m.nrows();
    let nz = m.ncols();
    debug_assert_eq!(c.len(), nz);
    debug_assert_eq!(b.len(), rows);

    let negative: Vec<usize> = (0..rows).filter(|&i| b[i] < 0.0).collect();
    let n_art = negative.len();
    let art_start = nz + rows;
    let rhs = art_start + n_art;
    let mut t = DMatrix::<f64>::zeros(rows, rhs + 1);
    let mut basis = vec![0usize; rows];
    for i in 0..rows {
        let sign = if b[i] < 0.0 { -1.0 } else { 1.0 };
        for j in 0..nz {
            t[(i, j)] = sign * m[(i, j)];
        }
        t[(i, nz + i)] = sign;
        t[(i, rhs)] = sign * b[i];
        basis[i] = nz + i;
    }
    for (k, &i) in negative.iter().enumerate() {
        t[(i, art_start + k)] = 1.0;
        basis[i] = art_start + k;
    }
    let mut tab = Tableau { t, basis, rhs };

    if n_art > 0 {
        let mut c1 = vec![0.0; rhs];
        for v in c1.iter_mut().skip(art_start) {
            *v = -1.0;
        }
        tab.run(&c1, rhs)?;
        if tab.objective(&c1) < -PHASE1_EPS {
            return Err(LpError::Infeasible);
        }
        // Drive zero-level artificials out of the basis where possible.
        for i in 0..rows {
            if tab.basis[i] < art_start {
                continue;
            }
            if let Some(j) = (0..art_start).find(|&j| tab.t[(i, j)].abs() > PIVOT_EPS) {
                tab.pivot(i, j);
            }
        }
    }

    let mut c2 = vec![0.0; rhs];
    for j in 0..nz {
        c2[j] = c[j];
    }
    tab.run(&c2, art_start)?;

    let mut z = DVector::<f64>::zeros(nz);
    for (i, &bcol) in tab.basis.iter().enumerate() {
        if bcol < nz {
            z[bcol] = tab.t[(i, rhs)];
        }
    }
    let value = c.dot(&z);
    Ok(LpSolution { z, value })
}

/// Chebyshev centre of `{x : a x <= b}`: the centre and radius of the largest inscribed ball.
pub fn chebyshev_center(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<(DVector<f64>, f64), LpError> {
    let rows = a.nrows();
    let n = a.ncols();
    if rows == 0 {
        return Err(LpError::Unbounded);
    }
    // x = u - v with u, v >= 0; last column is the radius.
    let mut m = DMatrix::<f64>::zeros(rows, 2 * n + 1);
    for i in 0..rows {
        for j in 0..n {
            m[(i, j)] = a[(i, j)];
            m[(i, n + j)] = -a[(i, j)];
        }
        m[(i, 2 * n)] = a.row(i).norm();
    }
    let mut c = DVector::<f64>::zeros(2 * n + 1);
    c[2 * n] = 1.0;
    let sol = maximize(&c, &m, b)?;
    let center = DVector::from_fn(n, |j, _| sol.z[j] - sol.z[n + j]);
    Ok((center, sol.z[2 * n]))
}
