//! Mathematical utilities: element stiffness formulations, the skyline
//! (profile) store and its LDLt factorization

pub mod ldlt;
pub mod quad;
pub mod skyline;

use nalgebra::{DMatrix, Matrix2, Matrix3, SMatrix, SVector};

pub use ldlt::{LdltFactorization, PivotTolerance};
pub use quad::{quad4_local_stiffness, quad4_stress, GAUSS_POINTS_2X2};
pub use skyline::{ProfileBuilder, SkylineMatrix};

pub type Mat2 = Matrix2<f64>;
pub type Mat3 = Matrix3<f64>;

/// 6x6 matrix for bar stiffness (2 nodes x 3 DOFs)
pub type Mat6 = SMatrix<f64, 6, 6>;
/// 6-element vector for bar displacements
pub type Vec6 = SVector<f64, 6>;
/// 8x8 matrix for quadrilateral stiffness (4 nodes x 2 DOFs)
pub type Mat8 = SMatrix<f64, 8, 8>;
/// 8-element vector for quadrilateral displacements
pub type Vec8 = SVector<f64, 8>;

/// Bars shorter than this are rejected as degenerate
pub const MIN_BAR_LENGTH: f64 = 1e-10;

/// Number of entries in the packed upper triangle of an `n x n` matrix
pub const fn packed_size(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Position of entry `(i, j)`, `i <= j`, in the packed upper triangle
///
/// Columns are stored one after another; within column `j` the diagonal
/// comes first, followed by rows `j-1, j-2, ..., 0`.
#[inline]
pub fn packed_index(i: usize, j: usize) -> usize {
    debug_assert!(i <= j, "packed_index expects i <= j");
    j * (j + 1) / 2 + (j - i)
}

/// Pack the upper triangle of a symmetric matrix column by column
pub fn pack_upper<const N: usize>(k: &SMatrix<f64, N, N>) -> Vec<f64> {
    let mut packed = vec![0.0; packed_size(N)];
    for j in 0..N {
        for i in 0..=j {
            packed[packed_index(i, j)] = k[(i, j)];
        }
    }
    packed
}

/// Expand a packed upper triangle back into a full symmetric matrix
pub fn unpack_upper(packed: &[f64], n: usize) -> DMatrix<f64> {
    let mut k = DMatrix::zeros(n, n);
    for j in 0..n {
        for i in 0..=j {
            let v = packed[packed_index(i, j)];
            k[(i, j)] = v;
            k[(j, i)] = v;
        }
    }
    k
}

/// Coordinate differences `j - i` and the squared length of a bar
pub fn bar_geometry(i_node: &[f64; 3], j_node: &[f64; 3]) -> ([f64; 3], f64) {
    let dx = [
        j_node[0] - i_node[0],
        j_node[1] - i_node[1],
        j_node[2] - i_node[2],
    ];
    let l2 = dx[0] * dx[0] + dx[1] * dx[1] + dx[2] * dx[2];
    (dx, l2)
}

/// Global stiffness of a two-node axial bar
///
/// `K = E*A/L^3 * d * d^T` with `d = [dx, dy, dz, -dx, -dy, -dz]`.
/// Returns `None` for a zero-length bar.
pub fn bar_stiffness(i_node: &[f64; 3], j_node: &[f64; 3], e: f64, area: f64) -> Option<Mat6> {
    let (dx, l2) = bar_geometry(i_node, j_node);
    let length = l2.sqrt();
    if !(length >= MIN_BAR_LENGTH) {
        return None;
    }

    let k = e * area / (length * l2);
    let d = Vec6::new(dx[0], dx[1], dx[2], -dx[0], -dx[1], -dx[2]);

    Some(d * d.transpose() * k)
}

/// Axial stress of a bar from its six global nodal displacements
///
/// `sigma = E/L^2 * (u_j - u_i) . (x_j - x_i)`
pub fn bar_stress(i_node: &[f64; 3], j_node: &[f64; 3], e: f64, u: &Vec6) -> Option<f64> {
    let (dx, l2) = bar_geometry(i_node, j_node);
    if !(l2.sqrt() >= MIN_BAR_LENGTH) {
        return None;
    }

    let s = Vec6::new(-dx[0], -dx[1], -dx[2], dx[0], dx[1], dx[2]) * (e / l2);
    Some(s.dot(u))
}
