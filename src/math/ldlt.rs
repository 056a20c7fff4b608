//! In-place LDLt factorization of a skyline matrix and the matching
//! forward/backward substitution
//!
//! After factorization the profile storage holds `D` on the diagonal and the
//! unit lower factor `L` transposed in the off-diagonal positions, so
//! `K = L * D * L^T`. The factorization is computed once and reused for any
//! number of right-hand sides.

use log::debug;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::skyline::SkylineMatrix;
use crate::error::{FEAError, FEAResult};

/// Rule deciding when a pivot `D_jj` is too small to continue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum PivotTolerance {
    /// Fail when `D_jj <= value`
    Absolute(f64),
    /// Fail when `D_jj <= value * |K_jj|`, using the assembled diagonal
    Relative(f64),
}

impl Default for PivotTolerance {
    /// Smallest positive normal single-precision float
    fn default() -> Self {
        PivotTolerance::Absolute(f32::MIN_POSITIVE as f64)
    }
}

impl PivotTolerance {
    fn threshold(&self, diagonal: f64) -> f64 {
        match *self {
            PivotTolerance::Absolute(value) => value,
            PivotTolerance::Relative(value) => value * diagonal.abs(),
        }
    }
}

/// Factored stiffness matrix, ready for repeated solves
#[derive(Debug, Clone, PartialEq)]
pub struct LdltFactorization {
    factors: SkylineMatrix,
}

impl LdltFactorization {
    /// Factorize `matrix` in place
    ///
    /// Fails with [`FEAError::NotPositiveDefinite`] at the first column whose
    /// pivot is not strictly above the tolerance; no partial factor escapes.
    pub fn factorize(mut matrix: SkylineMatrix, tolerance: PivotTolerance) -> FEAResult<Self> {
        let n = matrix.neq();

        let thresholds: Vec<f64> = (1..=n)
            .map(|j| tolerance.threshold(matrix.data[matrix.index(j, j)]))
            .collect();

        for j in 1..=n {
            let mj = j - matrix.height(j);

            // Reduce the off-diagonal column entries against the already factored columns
            for i in (mj + 1)..j {
                let mi = i - matrix.height(i);
                let mut c = 0.0;
                for r in mi.max(mj)..i {
                    c += matrix.data[matrix.index(r, i)] * matrix.data[matrix.index(r, j)];
                }
                let ij = matrix.index(i, j);
                matrix.data[ij] -= c;
            }

            // Scale to L and update the pivot
            let jj = matrix.index(j, j);
            for r in mj..j {
                let rj = matrix.index(r, j);
                let lrj = matrix.data[rj] / matrix.data[matrix.index(r, r)];
                matrix.data[jj] -= lrj * matrix.data[rj];
                matrix.data[rj] = lrj;
            }

            let pivot = matrix.data[jj];
            if !(pivot > thresholds[j - 1]) {
                return Err(FEAError::NotPositiveDefinite { equation: j, pivot });
            }
        }

        debug!("LDLt factorization complete: NEQ = {}, NWK = {}", n, matrix.nwk());

        Ok(Self { factors: matrix })
    }

    /// Number of equations
    pub fn neq(&self) -> usize {
        self.factors.neq()
    }

    /// Factored profile storage
    pub fn factors(&self) -> &SkylineMatrix {
        &self.factors
    }

    /// Diagonal factor `D`
    pub fn d(&self) -> DVector<f64> {
        let f = &self.factors;
        DVector::from_fn(f.neq(), |j, _| f.data[f.index(j + 1, j + 1)])
    }

    /// Entry `(i, j)` of the unit lower factor `L` (1-based)
    pub fn l(&self, i: usize, j: usize) -> f64 {
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
            std::cmp::Ordering::Greater => self.factors.get(j, i),
        }
    }

    /// Dense `L` and `D` (diagnostics only)
    pub fn to_dense_factors(&self) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.neq();
        let l = DMatrix::from_fn(n, n, |r, c| self.l(r + 1, c + 1));
        (l, self.d())
    }

    /// Overwrite `rhs` with the solution of `K * x = rhs`
    pub fn solve_in_place(&self, rhs: &mut [f64]) -> FEAResult<()> {
        let f = &self.factors;
        let n = f.neq();
        if rhs.len() != n {
            return Err(FEAError::DimensionMismatch {
                expected: n,
                found: rhs.len(),
            });
        }

        // Forward reduction, L * y = b
        for i in 2..=n {
            let mi = i - f.height(i);
            for j in mi..i {
                rhs[i - 1] -= f.data[f.index(j, i)] * rhs[j - 1];
            }
        }

        // D * z = y
        for i in 1..=n {
            rhs[i - 1] /= f.data[f.index(i, i)];
        }

        // Back substitution, L^T * x = z
        for j in (2..=n).rev() {
            let mj = j - f.height(j);
            for i in mj..j {
                rhs[i - 1] -= f.data[f.index(i, j)] * rhs[j - 1];
            }
        }

        Ok(())
    }

    /// Solve `K * x = rhs`, leaving `rhs` untouched
    pub fn solve(&self, rhs: &DVector<f64>) -> FEAResult<DVector<f64>> {
        let mut x = rhs.clone();
        self.solve_in_place(x.as_mut_slice())?;
        Ok(x)
    }
}
