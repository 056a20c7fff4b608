//! Node - a point in 3D space carrying one boundary code per direction

use serde::{Deserialize, Serialize};

/// Number of degrees of freedom per node (X, Y, Z translations)
pub const NDF: usize = 3;

/// A nodal point of the mesh
///
/// Before equation numbering `bcode[d]` is a fixed/free flag (non-zero =
/// constrained). [`Model::number_equations`](crate::model::Model::number_equations)
/// overwrites it in place with the global equation number of that direction,
/// or 0 when the direction is constrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 1-based node number
    pub number: usize,
    /// X, Y, Z coordinates
    pub coords: [f64; 3],
    /// Boundary codes, later equation numbers
    pub bcode: [usize; NDF],
}

impl Node {
    /// Create a free node at the given coordinates
    pub fn new(number: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            number,
            coords: [x, y, z],
            bcode: [0; NDF],
        }
    }

    /// Constrain the directions flagged `true`
    pub fn with_fixed(mut self, dx: bool, dy: bool, dz: bool) -> Self {
        self.bcode = [dx as usize, dy as usize, dz as usize];
        self
    }

    /// Constrain all three directions
    pub fn fixed(self) -> Self {
        self.with_fixed(true, true, true)
    }

    /// Free to move in the XY plane only
    pub fn planar(self) -> Self {
        self.with_fixed(false, false, true)
    }

    /// Global equation number of a 0-based direction (0 = constrained)
    pub fn equation(&self, direction: usize) -> usize {
        self.bcode[direction]
    }
}
