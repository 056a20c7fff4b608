//! Profile (skyline) storage for symmetric stiffness matrices
//!
//! Only the upper triangle is kept. Column `j` is stored from its diagonal up
//! to its topmost non-zero row; all columns are concatenated into one array.
//! Equation numbers, and therefore all `(i, j)` arguments here, are 1-based.
//!
//! Lifecycle:
//! 1. [`ProfileBuilder`] collects column heights from every element's location vector
//! 2. [`ProfileBuilder::finish`] computes diagonal addresses and allocates zeroed storage
//! 3. [`SkylineMatrix::assemble`] scatter-adds packed element stiffnesses
//! 4. [`SkylineMatrix::factorize`] consumes the matrix into an [`LdltFactorization`]

use log::debug;
use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use super::ldlt::{LdltFactorization, PivotTolerance};
use super::{packed_index, packed_size};
use crate::error::{FEAError, FEAResult};

/// Column heights of a profile matrix, accumulated element by element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBuilder {
    column_heights: Vec<usize>,
}

impl ProfileBuilder {
    /// Create an empty profile for `neq` equations
    pub fn new(neq: usize) -> Self {
        Self {
            column_heights: vec![0; neq],
        }
    }

    /// Number of equations
    pub fn neq(&self) -> usize {
        self.column_heights.len()
    }

    /// Column heights accumulated so far (excluding the diagonal)
    pub fn column_heights(&self) -> &[usize] {
        &self.column_heights
    }

    /// Widen the column heights to cover one element's location vector
    ///
    /// Zero entries (constrained DOFs) are ignored. Max-merging makes the
    /// result independent of element order.
    pub fn accumulate_column_heights(&mut self, location: &[usize]) -> FEAResult<()> {
        let neq = self.neq();
        let Some(first_row) = location.iter().copied().filter(|&eq| eq != 0).min() else {
            return Ok(());
        };

        for &column in location {
            if column == 0 {
                continue;
            }
            if column > neq {
                return Err(FEAError::DimensionMismatch {
                    expected: neq,
                    found: column,
                });
            }
            let height = column - first_row;
            let current = &mut self.column_heights[column - 1];
            if *current < height {
                *current = height;
            }
        }

        Ok(())
    }

    /// Fix the profile: compute diagonal addresses and allocate zeroed storage
    pub fn finish(self) -> SkylineMatrix {
        SkylineMatrix::with_heights(self.column_heights)
    }
}

/// Symmetric matrix in profile storage
#[derive(Debug, Clone, PartialEq)]
pub struct SkylineMatrix {
    /// Upper-triangle values, column by column, diagonal first
    pub(crate) data: Vec<f64>,
    /// Entries above the diagonal in each column
    pub(crate) column_heights: Vec<usize>,
    /// 1-based position of each diagonal in `data`, plus one past the end
    pub(crate) diagonal_address: Vec<usize>,
}

impl SkylineMatrix {
    /// Allocate a zeroed matrix for the given column heights
    ///
    /// Column `j` cannot reach above row 1, so `column_heights[j-1] > j - 1`
    /// is rejected.
    pub fn from_column_heights(column_heights: Vec<usize>) -> FEAResult<Self> {
        if let Some((col, &height)) = column_heights
            .iter()
            .enumerate()
            .find(|&(col, &height)| height > col)
        {
            return Err(FEAError::DimensionMismatch {
                expected: col,
                found: height,
            });
        }
        Ok(Self::with_heights(column_heights))
    }

    fn with_heights(column_heights: Vec<usize>) -> Self {
        let diagonal_address = Self::compute_diagonal_addresses(&column_heights);
        let nwk = diagonal_address[column_heights.len()] - diagonal_address[0];

        debug!(
            "Skyline profile: NEQ = {}, NWK = {}",
            column_heights.len(),
            nwk
        );

        Self {
            data: vec![0.0; nwk],
            column_heights,
            diagonal_address,
        }
    }

    /// Build a skyline matrix holding the upper triangle of a dense matrix
    ///
    /// Each column's profile reaches up to its topmost non-zero entry.
    pub fn from_dense(k: &DMatrix<f64>) -> Self {
        let neq = k.nrows().min(k.ncols());
        let heights = (0..neq)
            .map(|j| {
                let top = (0..j).find(|&i| k[(i, j)] != 0.0).unwrap_or(j);
                j - top
            })
            .collect();

        let mut matrix = Self::with_heights(heights);
        for j in 1..=neq {
            let top = j - matrix.column_heights[j - 1];
            for i in top..=j {
                let idx = matrix.index(i, j);
                matrix.data[idx] = k[(i - 1, j - 1)];
            }
        }
        matrix
    }

    /// `M(0) = 1; M(j) = M(j-1) + H(j-1) + 1`
    fn compute_diagonal_addresses(column_heights: &[usize]) -> Vec<usize> {
        let mut address = Vec::with_capacity(column_heights.len() + 1);
        address.push(1);
        for (col, &height) in column_heights.iter().enumerate() {
            address.push(address[col] + height + 1);
        }
        address
    }

    /// Number of equations (NEQ)
    pub fn neq(&self) -> usize {
        self.column_heights.len()
    }

    /// Number of stored entries (NWK)
    pub fn nwk(&self) -> usize {
        self.data.len()
    }

    pub fn column_heights(&self) -> &[usize] {
        &self.column_heights
    }

    /// 1-based diagonal addresses, `NEQ + 1` long
    pub fn diagonal_address(&self) -> &[usize] {
        &self.diagonal_address
    }

    /// Raw profile storage
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Maximum half bandwidth, `max(column height) + 1` (MK)
    pub fn max_half_bandwidth(&self) -> usize {
        self.column_heights.iter().max().map_or(0, |h| h + 1)
    }

    /// Mean half bandwidth, `NWK / NEQ`
    pub fn mean_half_bandwidth(&self) -> f64 {
        if self.neq() == 0 {
            0.0
        } else {
            self.nwk() as f64 / self.neq() as f64
        }
    }

    /// Height of 1-based column `j`
    #[inline]
    pub(crate) fn height(&self, j: usize) -> usize {
        self.column_heights[j - 1]
    }

    /// Index into `data` of entry `(i, j)`, `i <= j`, assumed inside the profile
    #[inline]
    pub(crate) fn index(&self, i: usize, j: usize) -> usize {
        self.diagonal_address[j - 1] + (j - i) - 1
    }

    /// Whether `(i, j)` is a stored position (order of `i` and `j` is irrelevant)
    pub fn in_profile(&self, i: usize, j: usize) -> bool {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        lo >= 1 && hi <= self.neq() && hi - lo <= self.height(hi)
    }

    /// Entry `(i, j)` of the full symmetric matrix; zero outside the profile
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if !self.in_profile(i, j) {
            return 0.0;
        }
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        self.data[self.index(lo, hi)]
    }

    /// Add `value` to entry `(i, j)` (and implicitly to `(j, i)`)
    pub fn add(&mut self, i: usize, j: usize, value: f64) -> FEAResult<()> {
        if !self.in_profile(i, j) {
            return Err(FEAError::OutsideProfile { row: i, column: j });
        }
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        let idx = self.index(lo, hi);
        self.data[idx] += value;
        Ok(())
    }

    /// Scatter-add a packed element stiffness through its location vector
    ///
    /// `packed` is the element's upper triangle in the layout of
    /// [`packed_index`]; `location[k]` is the global equation of local DOF `k`,
    /// 0 for constrained DOFs, which are skipped.
    pub fn assemble(&mut self, packed: &[f64], location: &[usize]) -> FEAResult<()> {
        let nd = location.len();
        if packed.len() != packed_size(nd) {
            return Err(FEAError::DimensionMismatch {
                expected: packed_size(nd),
                found: packed.len(),
            });
        }

        for j in 0..nd {
            let lj = location[j];
            if lj == 0 {
                continue;
            }
            for i in 0..=j {
                let li = location[i];
                if li == 0 {
                    continue;
                }
                self.add(li, lj, packed[packed_index(i, j)])?;
            }
        }

        Ok(())
    }

    /// Factorize in place into `L * D * L^T`, consuming the assembled matrix
    pub fn factorize(self, tolerance: PivotTolerance) -> FEAResult<LdltFactorization> {
        LdltFactorization::factorize(self, tolerance)
    }

    /// Expand into a dense symmetric matrix (diagnostics only)
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.neq();
        DMatrix::from_fn(n, n, |r, c| self.get(r + 1, c + 1))
    }

    /// Export the stored entries, mirrored below the diagonal, as CSR
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let n = self.neq();
        let mut coo = CooMatrix::new(n, n);

        for j in 1..=n {
            for i in (j - self.height(j))..=j {
                let value = self.data[self.index(i, j)];
                if value == 0.0 {
                    continue;
                }
                coo.push(i - 1, j - 1, value);
                if i != j {
                    coo.push(j - 1, i - 1, value);
                }
            }
        }

        CsrMatrix::from(&coo)
    }
}
