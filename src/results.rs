//! Result types for skyline analysis

use serde::{Deserialize, Serialize};

use crate::elements::ElementId;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// 1-based node number
    pub node: usize,
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ]
    pub fn from_array(node: usize, arr: [f64; 3]) -> Self {
        Self {
            node,
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }
}

/// `[sxx, syy, txy]` at each 2x2 Gauss point of a quadrilateral
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadStress {
    /// Points in integration order: (-,-), (-,+), (+,-), (+,+)
    pub gauss_points: [[f64; 3]; 4],
}

impl QuadStress {
    /// Mean of the Gauss point values
    pub fn average(&self) -> [f64; 3] {
        let mut avg = [0.0; 3];
        for point in &self.gauss_points {
            for (a, s) in avg.iter_mut().zip(point) {
                *a += s / 4.0;
            }
        }
        avg
    }

    /// Von Mises equivalent of the averaged in-plane state
    pub fn von_mises(&self) -> f64 {
        let [sx, sy, txy] = self.average();
        (sx.powi(2) - sx * sy + sy.powi(2) + 3.0 * txy.powi(2)).sqrt()
    }

    /// Maximum and minimum principal stress of the averaged state
    pub fn principal(&self) -> (f64, f64) {
        let [sx, sy, txy] = self.average();
        let s_avg = (sx + sy) / 2.0;
        let r = ((sx - sy).powi(2) / 4.0 + txy.powi(2)).sqrt();
        (s_avg + r, s_avg - r)
    }
}

/// Stress result of one element, by element kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementStress {
    Bar {
        /// Axial stress, tension positive
        stress: f64,
        /// Stress times cross-sectional area
        axial_force: f64,
    },
    Quad4(QuadStress),
}

/// Stress of one element tagged with its identity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementResult {
    pub id: ElementId,
    pub stress: ElementStress,
}

/// Solution of one load case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCaseResult {
    /// 0-based load case index
    pub load_case: usize,
    pub name: Option<String>,
    /// Solution vector indexed by equation number - 1
    pub displacements: Vec<f64>,
    /// Per-node displacements, constrained directions are zero
    pub node_displacements: Vec<NodeDisplacement>,
    /// Element stresses, group by group; empty when stress recovery is off
    pub element_stresses: Vec<ElementResult>,
}

impl LoadCaseResult {
    /// Displacement of a node by 1-based number
    pub fn node_displacement(&self, node: usize) -> Option<&NodeDisplacement> {
        node.checked_sub(1)
            .and_then(|i| self.node_displacements.get(i))
    }

    /// Stress of an element by its identity
    pub fn element_stress(&self, id: ElementId) -> Option<&ElementStress> {
        self.element_stresses
            .iter()
            .find(|r| r.id == id)
            .map(|r| &r.stress)
    }

    /// Largest translation magnitude over all nodes, with its node number
    pub fn max_displacement(&self) -> Option<(usize, f64)> {
        self.node_displacements
            .iter()
            .map(|d| (d.node, d.translation_magnitude()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Size of the model and of its skyline profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of nodes
    pub num_nodes: usize,
    /// Number of element groups
    pub num_groups: usize,
    /// Total number of elements over all groups
    pub num_elements: usize,
    /// Number of load cases
    pub num_load_cases: usize,
    /// Number of equations (NEQ)
    pub neq: usize,
    /// Number of stored matrix entries (NWK)
    pub nwk: usize,
    /// Maximum half bandwidth (MK)
    pub max_half_bandwidth: usize,
    /// Mean half bandwidth, NWK / NEQ
    pub mean_half_bandwidth: f64,
}

/// Everything a run produces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub title: String,
    pub summary: AnalysisSummary,
    /// One entry per load case; empty in data check mode
    pub load_cases: Vec<LoadCaseResult>,
}
