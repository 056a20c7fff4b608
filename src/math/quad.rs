//! Four-node isoparametric quadrilateral in plane stress / plane strain
//!
//! - 2 DOFs per node (u, v), 8x8 stiffness
//! - Bilinear shape functions, nodes counter-clockwise starting at (-1, -1)
//! - Full 2x2 Gauss integration
//!
//! Strain vector is `[exx, eyy, gxy]`, stress vector `[sxx, syy, txy]`.

use nalgebra::SMatrix;

use super::{Mat2, Mat3, Mat8, Vec8};
use crate::elements::PlaneMaterial;

/// 1/sqrt(3)
const G: f64 = 0.577_350_269_189_625_8;

/// Integration points `(xi, eta)` in evaluation order, all with unit weight
pub const GAUSS_POINTS_2X2: [(f64, f64); 4] = [(-G, -G), (-G, G), (G, -G), (G, G)];

type Mat2x4 = SMatrix<f64, 2, 4>;
type Mat4x2 = SMatrix<f64, 4, 2>;
type Mat3x8 = SMatrix<f64, 3, 8>;

/// Parametric derivatives of the shape functions
///
/// Row 0 holds dN/dxi, row 1 holds dN/deta.
fn shape_derivatives(xi: f64, eta: f64) -> Mat2x4 {
    Mat2x4::new(
        eta - 1.0, 1.0 - eta, 1.0 + eta, -eta - 1.0,
        xi - 1.0, -xi - 1.0, 1.0 + xi, 1.0 - xi,
    ) / 4.0
}

/// Constitutive matrix `E/(1-nu^2) * [[1, nu, 0], [nu, 1, 0], [0, 0, (1-nu)/2]]`
fn constitutive_matrix(material: &PlaneMaterial) -> Mat3 {
    let (e, nu) = material.effective_constants();
    #[rustfmt::skip]
    let d = Mat3::new(
        1.0, nu,  0.0,
        nu,  1.0, 0.0,
        0.0, 0.0, (1.0 - nu) / 2.0,
    );
    d * (e / (1.0 - nu * nu))
}

/// Strain-displacement matrix and Jacobian determinant at one Gauss point
fn strain_displacement(
    point: usize,
    xi: f64,
    eta: f64,
    coords: &Mat4x2,
) -> Result<(Mat3x8, f64), String> {
    let gn = shape_derivatives(xi, eta);
    let j: Mat2 = gn * coords;

    let det = j[(0, 0)] * j[(1, 1)] - j[(0, 1)] * j[(1, 0)];
    if !(det > 0.0) {
        return Err(format!(
            "non-positive Jacobian determinant {:e} at Gauss point {}",
            det,
            point + 1
        ));
    }

    let j_inv = Mat2::new(j[(1, 1)], -j[(0, 1)], -j[(1, 0)], j[(0, 0)]) / det;
    let dn = j_inv * gn;

    let mut b = Mat3x8::zeros();
    for a in 0..4 {
        let (dx, dy) = (dn[(0, a)], dn[(1, a)]);
        b[(0, 2 * a)] = dx;
        b[(1, 2 * a + 1)] = dy;
        b[(2, 2 * a)] = dy;
        b[(2, 2 * a + 1)] = dx;
    }

    Ok((b, det))
}

fn coordinate_matrix(coords: &[[f64; 2]; 4]) -> Mat4x2 {
    Mat4x2::from_fn(|r, c| coords[r][c])
}

/// Stiffness matrix of a four-node quadrilateral
///
/// # Arguments
/// * `coords` - In-plane nodal coordinates, counter-clockwise
/// * `material` - Elastic constants and thickness
///
/// # Returns
/// 8x8 stiffness ordered `[u1, v1, u2, v2, u3, v3, u4, v4]`, or the reason the
/// geometry was rejected
pub fn quad4_local_stiffness(
    coords: &[[f64; 2]; 4],
    material: &PlaneMaterial,
) -> Result<Mat8, String> {
    let c = coordinate_matrix(coords);
    let d = constitutive_matrix(material);

    let mut k = Mat8::zeros();
    for (point, &(xi, eta)) in GAUSS_POINTS_2X2.iter().enumerate() {
        let (b, det) = strain_displacement(point, xi, eta, &c)?;
        k += b.transpose() * d * b * det;
    }

    Ok(k * material.thickness)
}

/// Stresses `[sxx, syy, txy]` at the four Gauss points
pub fn quad4_stress(
    coords: &[[f64; 2]; 4],
    material: &PlaneMaterial,
    u: &Vec8,
) -> Result<[[f64; 3]; 4], String> {
    let c = coordinate_matrix(coords);
    let d = constitutive_matrix(material);

    let mut stresses = [[0.0; 3]; 4];
    for (point, &(xi, eta)) in GAUSS_POINTS_2X2.iter().enumerate() {
        let (b, _) = strain_displacement(point, xi, eta, &c)?;
        let sigma = d * (b * u);
        stresses[point] = [sigma[0], sigma[1], sigma[2]];
    }

    Ok(stresses)
}
