//! Skyline FEA - linear static finite element analysis on a profile solver
//!
//! This library assembles and solves `K * u = f` for small and medium meshes:
//! - Two-node axial bars in 3D
//! - Four-node isoparametric quadrilaterals (plane stress / plane strain)
//! - Skyline (profile) storage of the symmetric stiffness matrix
//! - In-place LDLt factorization reused across load cases
//!
//! ## Example
//! ```rust
//! use skyline_fea::prelude::*;
//!
//! let mut model = Model::new("Two bars");
//!
//! // Nodes, numbered in order; Y and Z are held so the line stays stable
//! model.add_node(Node::new(1, 0.0, 0.0, 0.0).fixed()).unwrap();
//! model.add_node(Node::new(2, 1.0, 0.0, 0.0).with_fixed(false, true, true)).unwrap();
//! model.add_node(Node::new(3, 2.0, 0.0, 0.0).with_fixed(false, true, true)).unwrap();
//!
//! // One group of bars sharing material set 1
//! let group = ElementGroup::new(ElementKind::Bar)
//!     .with_material(BarMaterial::new(1.0, 1.0))
//!     .with_element(Bar::new(1, 2, 1))
//!     .with_element(Bar::new(2, 3, 1));
//! model.add_group(group).unwrap();
//!
//! // Unit axial force at the free end
//! model.add_load_case(LoadCase::new().with_load(NodeLoad::fx(3, 1.0))).unwrap();
//!
//! // Analyze
//! let results = model.analyze(&AnalysisOptions::default()).unwrap();
//!
//! // Get results
//! let tip = results.load_cases[0].node_displacement(3).unwrap();
//! assert!((tip.dx - 2.0).abs() < 1e-12);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, SolutionMode};
    pub use crate::elements::{
        Bar, BarMaterial, Element, ElementGroup, ElementId, ElementKind, Material, Node,
        PlaneCondition, PlaneMaterial, Quad4, NDF,
    };
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::loads::{LoadCase, NodeLoad};
    pub use crate::math::{LdltFactorization, PivotTolerance, ProfileBuilder, SkylineMatrix};
    pub use crate::model::Model;
    pub use crate::results::{
        AnalysisResults, AnalysisSummary, ElementResult, ElementStress, LoadCaseResult,
        NodeDisplacement, QuadStress,
    };
}
