//! Bar element - two-node axial truss member in 3D

use serde::{Deserialize, Serialize};

use super::material::BarMaterial;
use super::node::{Node, NDF};
use super::{gather, node_at, ElementId};
use crate::error::{FEAError, FEAResult};
use crate::math::{bar_stiffness, bar_stress, pack_upper, Vec6};
use crate::results::ElementStress;

/// A pin-ended bar carrying axial force only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 1-based node numbers (i, j)
    pub nodes: [usize; 2],
    /// 1-based material set within the element group
    pub material: usize,
    /// Global equation numbers of `[ux_i, uy_i, uz_i, ux_j, uy_j, uz_j]`
    #[serde(skip)]
    pub(crate) location: [usize; 2 * NDF],
}

impl Bar {
    /// Create a new bar between two nodes
    pub fn new(i_node: usize, j_node: usize, material: usize) -> Self {
        Self {
            nodes: [i_node, j_node],
            material,
            location: [0; 2 * NDF],
        }
    }

    pub fn location(&self) -> &[usize] {
        &self.location
    }

    /// Copy the current equation numbers of both nodes into the location vector
    pub fn generate_location_matrix(&mut self, nodes: &[Node]) -> FEAResult<()> {
        for (n, &number) in self.nodes.iter().enumerate() {
            let node = node_at(nodes, number)?;
            self.location[n * NDF..(n + 1) * NDF].copy_from_slice(&node.bcode);
        }
        Ok(())
    }

    fn end_coordinates<'a>(&self, nodes: &'a [Node]) -> FEAResult<(&'a [f64; 3], &'a [f64; 3])> {
        let i = node_at(nodes, self.nodes[0])?;
        let j = node_at(nodes, self.nodes[1])?;
        Ok((&i.coords, &j.coords))
    }

    /// Packed upper triangle of the 6x6 global stiffness
    pub fn local_stiffness(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &BarMaterial,
    ) -> FEAResult<Vec<f64>> {
        let (xi, xj) = self.end_coordinates(nodes)?;
        let k = bar_stiffness(xi, xj, material.e, material.area)
            .ok_or_else(|| zero_length(id))?;
        Ok(pack_upper(&k))
    }

    /// Axial stress and force from the global displacement vector
    pub fn stress(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &BarMaterial,
        displacement: &[f64],
    ) -> FEAResult<ElementStress> {
        let (xi, xj) = self.end_coordinates(nodes)?;
        let u: Vec6 = gather(&self.location, displacement);
        let stress = bar_stress(xi, xj, material.e, &u).ok_or_else(|| zero_length(id))?;

        Ok(ElementStress::Bar {
            stress,
            axial_force: stress * material.area,
        })
    }
}

fn zero_length(id: ElementId) -> FEAError {
    FEAError::InvalidGeometry {
        element: id,
        reason: "bar has zero length".to_string(),
    }
}
