//! Quad4 element - four-node isoparametric quadrilateral in the XY plane
//!
//! Nodes are numbered counter-clockwise. Each node contributes its X and Y
//! equations; the Z direction does not enter the element.

use serde::{Deserialize, Serialize};

use super::material::PlaneMaterial;
use super::node::Node;
use super::{gather, node_at, ElementId};
use crate::error::{FEAError, FEAResult};
use crate::math::{pack_upper, quad4_local_stiffness, quad4_stress, Vec8};
use crate::results::{ElementStress, QuadStress};

/// In-plane DOFs per node
const QUAD_NDF: usize = 2;

/// A four-node plane stress / plane strain quadrilateral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quad4 {
    /// 1-based node numbers, counter-clockwise
    pub nodes: [usize; 4],
    /// 1-based material set within the element group
    pub material: usize,
    /// Global equation numbers of `[u1, v1, u2, v2, u3, v3, u4, v4]`
    #[serde(skip)]
    pub(crate) location: [usize; 4 * QUAD_NDF],
}

impl Quad4 {
    /// Create a new quadrilateral
    pub fn new(nodes: [usize; 4], material: usize) -> Self {
        Self {
            nodes,
            material,
            location: [0; 4 * QUAD_NDF],
        }
    }

    pub fn location(&self) -> &[usize] {
        &self.location
    }

    pub fn generate_location_matrix(&mut self, nodes: &[Node]) -> FEAResult<()> {
        for (n, &number) in self.nodes.iter().enumerate() {
            let node = node_at(nodes, number)?;
            self.location[n * QUAD_NDF..(n + 1) * QUAD_NDF]
                .copy_from_slice(&node.bcode[..QUAD_NDF]);
        }
        Ok(())
    }

    fn plane_coordinates(&self, nodes: &[Node]) -> FEAResult<[[f64; 2]; 4]> {
        let mut coords = [[0.0; 2]; 4];
        for (c, &number) in coords.iter_mut().zip(self.nodes.iter()) {
            let node = node_at(nodes, number)?;
            *c = [node.coords[0], node.coords[1]];
        }
        Ok(coords)
    }

    /// Packed upper triangle of the 8x8 stiffness
    pub fn local_stiffness(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &PlaneMaterial,
    ) -> FEAResult<Vec<f64>> {
        let coords = self.plane_coordinates(nodes)?;
        let k = quad4_local_stiffness(&coords, material)
            .map_err(|reason| FEAError::InvalidGeometry { element: id, reason })?;
        Ok(pack_upper(&k))
    }

    /// Gauss point stresses from the global displacement vector
    pub fn stress(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &PlaneMaterial,
        displacement: &[f64],
    ) -> FEAResult<ElementStress> {
        let coords = self.plane_coordinates(nodes)?;
        let u: Vec8 = gather(&self.location, displacement);
        let gauss_points = quad4_stress(&coords, material, &u)
            .map_err(|reason| FEAError::InvalidGeometry { element: id, reason })?;

        Ok(ElementStress::Quad4(QuadStress { gauss_points }))
    }
}
