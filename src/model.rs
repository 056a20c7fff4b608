//! Model - the context object that owns the mesh and drives a run

use std::io::Read;

use log::{debug, info, warn};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, SolutionMode};
use crate::elements::{Element, ElementGroup, ElementId, Node};
use crate::error::{FEAError, FEAResult};
use crate::loads::LoadCase;
use crate::math::{ProfileBuilder, SkylineMatrix};
use crate::results::{
    AnalysisResults, AnalysisSummary, ElementResult, LoadCaseResult, NodeDisplacement,
};

/// A finite element model: nodes, element groups and load cases
///
/// Nodes are stored in number order, so node `n` lives at index `n - 1`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Heading of the job
    #[serde(default)]
    pub title: String,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub groups: Vec<ElementGroup>,
    #[serde(default)]
    pub load_cases: Vec<LoadCase>,

    /// Number of equations once boundary codes hold equation numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    neq: Option<usize>,
}

impl Model {
    /// Create a new empty model
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Load a model from JSON and check it like the `add_*` methods would
    pub fn from_json(json: &str) -> FEAResult<Self> {
        let model: Model = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_reader(reader: impl Read) -> FEAResult<Self> {
        let model: Model = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add the next node; nodes must arrive numbered 1, 2, 3, ...
    pub fn add_node(&mut self, mut node: Node) -> FEAResult<()> {
        let expected = self.nodes.len() + 1;
        if node.number != expected {
            return Err(FEAError::InputOrder {
                kind: "Nodal points",
                expected,
                provided: node.number,
            });
        }

        // Late nodes extend the numbering; node-major order is kept
        if let Some(neq) = self.neq.as_mut() {
            number_node(&mut node, neq);
        }

        self.nodes.push(node);
        Ok(())
    }

    /// Add an element group after checking its kinds and references
    pub fn add_group(&mut self, group: ElementGroup) -> FEAResult<()> {
        group.validate(self.groups.len(), self.nodes.len())?;
        self.groups.push(group);
        Ok(())
    }

    pub fn add_load_case(&mut self, load_case: LoadCase) -> FEAResult<()> {
        load_case.validate(self.nodes.len())?;
        self.load_cases.push(load_case);
        Ok(())
    }

    /// Check node order, groups and load cases of a deserialized model
    ///
    /// A model saved after numbering carries `neq`; its boundary codes are
    /// then equation numbers and must not exceed it.
    pub fn validate(&self) -> FEAResult<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.number != i + 1 {
                return Err(FEAError::InputOrder {
                    kind: "Nodal points",
                    expected: i + 1,
                    provided: node.number,
                });
            }
            if let Some(neq) = self.neq {
                if let Some(&eq) = node.bcode.iter().find(|&&eq| eq > neq) {
                    return Err(FEAError::DimensionMismatch {
                        expected: neq,
                        found: eq,
                    });
                }
            }
        }
        for (g, group) in self.groups.iter().enumerate() {
            group.validate(g, self.nodes.len())?;
        }
        for load_case in &self.load_cases {
            load_case.validate(self.nodes.len())?;
        }
        Ok(())
    }

    pub fn num_elements(&self) -> usize {
        self.groups.iter().map(|g| g.elements.len()).sum()
    }

    /// Number of equations, once numbered
    pub fn neq(&self) -> Option<usize> {
        self.neq
    }

    pub fn is_numbered(&self) -> bool {
        self.neq.is_some()
    }

    /// Every element with its identity and owning group
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementGroup, &Element)> {
        self.groups.iter().enumerate().flat_map(|(g, group)| {
            group
                .elements
                .iter()
                .enumerate()
                .map(move |(e, element)| (ElementId::new(g, e), group, element))
        })
    }

    // ========================
    // Assembly Pipeline
    // ========================

    /// Turn boundary flags into equation numbers and return NEQ
    ///
    /// Free directions are numbered 1, 2, ... node by node, direction by
    /// direction; constrained directions become 0. Runs once per model.
    pub fn number_equations(&mut self) -> usize {
        if let Some(neq) = self.neq {
            return neq;
        }

        let mut neq = 0;
        for node in &mut self.nodes {
            number_node(node, &mut neq);
        }

        self.neq = Some(neq);
        neq
    }

    /// Refresh every element's location vector from the node equation numbers
    pub fn generate_location_matrices(&mut self) -> FEAResult<()> {
        if !self.is_numbered() {
            return Err(FEAError::NotNumbered);
        }

        let nodes = &self.nodes;
        for group in &mut self.groups {
            for element in &mut group.elements {
                element.generate_location_matrix(nodes)?;
            }
        }
        Ok(())
    }

    /// Column heights from every location vector, then addresses and zeroed storage
    pub fn build_profile(&self) -> FEAResult<SkylineMatrix> {
        let neq = self.neq.ok_or(FEAError::NotNumbered)?;

        let mut profile = ProfileBuilder::new(neq);
        for (_, _, element) in self.elements() {
            profile.accumulate_column_heights(element.location())?;
        }

        Ok(profile.finish())
    }

    /// Scatter-add all element stiffnesses into `matrix`
    ///
    /// Every element stiffness is computed before the first entry is added,
    /// so a degenerate element leaves `matrix` untouched.
    pub fn assemble_stiffness(&self, matrix: &mut SkylineMatrix) -> FEAResult<()> {
        let contributions = self
            .elements()
            .map(|(id, group, element)| -> FEAResult<_> {
                let material = group.material_of(id.group, element)?;
                let packed = element.local_stiffness(id, &self.nodes, material)?;
                debug!("{} ({}): location {:?}", id, element.kind(), element.location());
                Ok((element.location(), packed))
            })
            .collect::<FEAResult<Vec<_>>>()?;

        for (location, packed) in contributions {
            matrix.assemble(&packed, location)?;
        }
        Ok(())
    }

    /// Fill `force` with the loads of one load case (0-based index)
    ///
    /// Loads on constrained directions are dropped.
    pub fn assemble_force(&self, load_case: usize, force: &mut DVector<f64>) -> FEAResult<()> {
        let neq = self.neq.ok_or(FEAError::NotNumbered)?;
        let case = self
            .load_cases
            .get(load_case)
            .ok_or(FEAError::LoadCaseNotFound(load_case + 1))?;
        if force.len() != neq {
            return Err(FEAError::DimensionMismatch {
                expected: neq,
                found: force.len(),
            });
        }

        force.fill(0.0);
        for load in &case.loads {
            load.validate(self.nodes.len())?;
            let node = &self.nodes[load.node - 1];
            match node.equation(load.direction - 1) {
                0 => debug!(
                    "Load on constrained direction {} of node {} dropped",
                    load.direction, load.node
                ),
                eq => force[eq - 1] += load.magnitude,
            }
        }
        Ok(())
    }

    /// Expand a solution vector to `[dx, dy, dz]` per node
    pub fn node_displacements(&self, displacement: &[f64]) -> Vec<NodeDisplacement> {
        self.nodes
            .iter()
            .map(|node| {
                let values = node.bcode.map(|eq| match eq {
                    0 => 0.0,
                    eq => displacement.get(eq - 1).copied().unwrap_or(0.0),
                });
                NodeDisplacement::from_array(node.number, values)
            })
            .collect()
    }

    /// Stress of every element under one solution vector
    pub fn element_stresses(&self, displacement: &[f64]) -> FEAResult<Vec<ElementResult>> {
        self.elements()
            .map(|(id, group, element)| -> FEAResult<_> {
                let material = group.material_of(id.group, element)?;
                let stress = element.stress(id, &self.nodes, material, displacement)?;
                Ok(ElementResult { id, stress })
            })
            .collect()
    }

    fn summary(&self, matrix: &SkylineMatrix) -> AnalysisSummary {
        AnalysisSummary {
            num_nodes: self.nodes.len(),
            num_groups: self.groups.len(),
            num_elements: self.num_elements(),
            num_load_cases: self.load_cases.len(),
            neq: matrix.neq(),
            nwk: matrix.nwk(),
            max_half_bandwidth: matrix.max_half_bandwidth(),
            mean_half_bandwidth: matrix.mean_half_bandwidth(),
        }
    }

    // ========================
    // Analysis
    // ========================

    /// Run the model: number, size the profile and, in execution mode,
    /// assemble, factorize once and solve every load case
    pub fn analyze(&mut self, options: &AnalysisOptions) -> FEAResult<AnalysisResults> {
        info!(
            "Analyzing '{}': {} nodes, {} element groups, {} elements, {} load cases",
            self.title,
            self.nodes.len(),
            self.groups.len(),
            self.num_elements(),
            self.load_cases.len()
        );

        let neq = self.number_equations();
        info!("Equations numbered: NEQ = {}", neq);

        self.generate_location_matrices()?;
        let mut stiffness = self.build_profile()?;
        let summary = self.summary(&stiffness);
        info!(
            "Skyline profile: NWK = {}, MK = {}, mean half bandwidth = {:.2}",
            summary.nwk, summary.max_half_bandwidth, summary.mean_half_bandwidth
        );

        let mut results = AnalysisResults {
            title: self.title.clone(),
            summary,
            load_cases: Vec::with_capacity(self.load_cases.len()),
        };

        if options.mode == SolutionMode::DataCheck {
            info!("Data check complete, no solution computed");
            return Ok(results);
        }

        self.assemble_stiffness(&mut stiffness)?;
        let factors = stiffness.factorize(options.pivot_tolerance)?;
        info!("Stiffness matrix factorized");

        let mut force = DVector::zeros(neq);
        for (index, case) in self.load_cases.iter().enumerate() {
            if case.is_empty() {
                warn!("Load case {} has no loads", index + 1);
            }

            self.assemble_force(index, &mut force)?;
            factors.solve_in_place(force.as_mut_slice())?;

            let element_stresses = if options.recover_stresses {
                self.element_stresses(force.as_slice())?
            } else {
                Vec::new()
            };

            results.load_cases.push(LoadCaseResult {
                load_case: index,
                name: case.name.clone(),
                displacements: force.as_slice().to_vec(),
                node_displacements: self.node_displacements(force.as_slice()),
                element_stresses,
            });
            info!("Load case {} solved", index + 1);
        }

        Ok(results)
    }
}

/// Overwrite a node's boundary flags with equation numbers, advancing `counter`
fn number_node(node: &mut Node, counter: &mut usize) {
    for code in node.bcode.iter_mut() {
        if *code != 0 {
            *code = 0;
        } else {
            *counter += 1;
            *code = *counter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Bar, BarMaterial, ElementKind};
    use crate::loads::NodeLoad;

    fn two_bar_model() -> Model {
        let mut model = Model::new("two bars");
        model.add_node(Node::new(1, 0.0, 0.0, 0.0).fixed()).unwrap();
        model
            .add_node(Node::new(2, 1.0, 0.0, 0.0).with_fixed(false, true, true))
            .unwrap();
        model
            .add_node(Node::new(3, 2.0, 0.0, 0.0).with_fixed(false, true, true))
            .unwrap();
        model
            .add_group(
                ElementGroup::new(ElementKind::Bar)
                    .with_material(BarMaterial::new(1.0, 1.0))
                    .with_element(Bar::new(1, 2, 1))
                    .with_element(Bar::new(2, 3, 1)),
            )
            .unwrap();
        model
    }

    #[test]
    fn test_node_order_enforced() {
        let mut model = Model::new("");
        model.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
        let err = model.add_node(Node::new(3, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            FEAError::InputOrder {
                expected: 2,
                provided: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_numbering_node_major_and_idempotent() {
        let mut model = Model::new("");
        model
            .add_node(Node::new(1, 0.0, 0.0, 0.0).with_fixed(false, true, false))
            .unwrap();
        model.add_node(Node::new(2, 1.0, 0.0, 0.0).fixed()).unwrap();
        model.add_node(Node::new(3, 2.0, 0.0, 0.0)).unwrap();

        assert_eq!(model.number_equations(), 5);
        assert_eq!(model.nodes[0].bcode, [1, 0, 2]);
        assert_eq!(model.nodes[1].bcode, [0, 0, 0]);
        assert_eq!(model.nodes[2].bcode, [3, 4, 5]);

        assert_eq!(model.number_equations(), 5);
        assert_eq!(model.nodes[2].bcode, [3, 4, 5]);

        model
            .add_node(Node::new(4, 3.0, 0.0, 0.0).with_fixed(true, false, true))
            .unwrap();
        assert_eq!(model.nodes[3].bcode, [0, 6, 0]);
        assert_eq!(model.neq(), Some(6));
    }

    #[test]
    fn test_pipeline_requires_numbering() {
        let mut model = two_bar_model();
        assert!(matches!(
            model.generate_location_matrices(),
            Err(FEAError::NotNumbered)
        ));
        assert!(matches!(model.build_profile(), Err(FEAError::NotNumbered)));
    }

    #[test]
    fn test_force_assembly_skips_constrained() {
        let mut model = two_bar_model();
        model
            .add_load_case(
                LoadCase::new()
                    .with_load(NodeLoad::fx(3, 1.0))
                    .with_load(NodeLoad::fy(3, 5.0))
                    .with_load(NodeLoad::fx(1, 7.0))
                    .with_load(NodeLoad::fx(3, 0.5)),
            )
            .unwrap();
        let neq = model.number_equations();
        assert_eq!(neq, 2);

        let mut force = DVector::from_element(neq, 9.0);
        model.assemble_force(0, &mut force).unwrap();
        assert_eq!(force.as_slice(), &[0.0, 1.5]);

        assert!(matches!(
            model.assemble_force(1, &mut force),
            Err(FEAError::LoadCaseNotFound(2))
        ));
    }

    #[test]
    fn test_invalid_load_rejected() {
        let mut model = two_bar_model();
        assert!(model
            .add_load_case(LoadCase::new().with_load(NodeLoad::fx(4, 1.0)))
            .is_err());
        assert!(model
            .add_load_case(LoadCase::new().with_load(NodeLoad::new(2, 0, 1.0)))
            .is_err());
    }

    #[test]
    fn test_data_check_sizes_profile_only() {
        let mut model = two_bar_model();
        model
            .add_load_case(LoadCase::new().with_load(NodeLoad::fx(3, 1.0)))
            .unwrap();

        let results = model.analyze(&AnalysisOptions::data_check()).unwrap();
        assert!(results.load_cases.is_empty());
        assert_eq!(results.summary.neq, 2);
        assert_eq!(results.summary.nwk, 3);
        assert_eq!(results.summary.max_half_bandwidth, 2);
        assert_eq!(results.summary.num_elements, 2);
    }

    #[test]
    fn test_json_model_validated() {
        let json = r#"{
            "title": "bad order",
            "nodes": [
                {"number": 2, "coords": [0.0, 0.0, 0.0], "bcode": [1, 1, 1]}
            ]
        }"#;
        assert!(matches!(
            Model::from_json(json),
            Err(FEAError::InputOrder { expected: 1, provided: 2, .. })
        ));
        assert!(matches!(
            Model::from_json("{ not json"),
            Err(FEAError::SerializationError(_))
        ));
    }

    #[test]
    fn test_numbered_model_round_trip() {
        let mut model = two_bar_model();
        model
            .add_load_case(LoadCase::new().with_load(NodeLoad::fx(3, 1.0)))
            .unwrap();
        let results = model.analyze(&AnalysisOptions::default()).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let mut reloaded = Model::from_json(&json).unwrap();
        assert_eq!(reloaded.neq(), Some(2));
        assert_eq!(reloaded.nodes[1].bcode, [1, 0, 0]);
        assert_eq!(reloaded.nodes[2].bcode, [2, 0, 0]);

        let again = reloaded.analyze(&AnalysisOptions::default()).unwrap();
        assert_eq!(again.summary.neq, 2);
        assert_eq!(again.load_cases[0].displacements, results.load_cases[0].displacements);
    }

    #[test]
    fn test_unnumbered_model_omits_neq() {
        let json = serde_json::to_string(&two_bar_model()).unwrap();
        assert!(!json.contains("neq"));
        assert!(!Model::from_json(&json).unwrap().is_numbered());
    }

    #[test]
    fn test_equation_beyond_neq_rejected() {
        let json = r#"{
            "nodes": [
                {"number": 1, "coords": [0.0, 0.0, 0.0], "bcode": [0, 0, 0]},
                {"number": 2, "coords": [1.0, 0.0, 0.0], "bcode": [3, 0, 0]}
            ],
            "neq": 2
        }"#;
        assert!(matches!(
            Model::from_json(json),
            Err(FEAError::DimensionMismatch { expected: 2, found: 3 })
        ));
    }
}
