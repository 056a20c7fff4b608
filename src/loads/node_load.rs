//! Node loads - concentrated forces applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::elements::NDF;
use crate::error::{FEAError, FEAResult};

/// A concentrated force at one node along one global direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// 1-based node number
    pub node: usize,
    /// 1-based direction: 1 = X, 2 = Y, 3 = Z
    pub direction: usize,
    /// Force magnitude
    pub magnitude: f64,
}

impl NodeLoad {
    pub fn new(node: usize, direction: usize, magnitude: f64) -> Self {
        Self {
            node,
            direction,
            magnitude,
        }
    }

    /// Force in X direction
    pub fn fx(node: usize, magnitude: f64) -> Self {
        Self::new(node, 1, magnitude)
    }

    /// Force in Y direction
    pub fn fy(node: usize, magnitude: f64) -> Self {
        Self::new(node, 2, magnitude)
    }

    /// Force in Z direction
    pub fn fz(node: usize, magnitude: f64) -> Self {
        Self::new(node, 3, magnitude)
    }

    pub fn validate(&self, num_nodes: usize) -> FEAResult<()> {
        if self.node == 0 || self.node > num_nodes {
            return Err(FEAError::NodeNotFound(self.node));
        }
        if self.direction == 0 || self.direction > NDF {
            return Err(FEAError::InvalidDirection {
                node: self.node,
                direction: self.direction,
            });
        }
        Ok(())
    }
}
