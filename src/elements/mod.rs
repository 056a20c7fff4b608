//! Structural elements module
//!
//! Element kinds form a closed set, so dispatch is a `match` over [`Element`]
//! rather than a trait object. Elements refer to nodes and material sets by
//! 1-based number; the node list acts as an arena owned by the model.

mod bar;
mod material;
mod node;
mod quad;

use std::fmt;

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

pub use bar::Bar;
pub use material::{BarMaterial, Material, PlaneCondition, PlaneMaterial};
pub use node::{Node, NDF};
pub use quad::Quad4;

use crate::error::{FEAError, FEAResult};
use crate::math::packed_size;
use crate::results::ElementStress;

/// Element formulations known to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Two-node axial bar, 3 DOFs per node
    Bar,
    /// Four-node plane quadrilateral, 2 DOFs per node
    Quad4,
}

impl ElementKind {
    /// Length of the location vector
    pub fn num_dofs(&self) -> usize {
        match self {
            ElementKind::Bar => 2 * NDF,
            ElementKind::Quad4 => 8,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Bar => write!(f, "bar"),
            ElementKind::Quad4 => write!(f, "quad4"),
        }
    }
}

/// Position of an element in the model (0-based group and element index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    pub group: usize,
    pub element: usize,
}

impl ElementId {
    pub fn new(group: usize, element: usize) -> Self {
        Self { group, element }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {} of group {}", self.element + 1, self.group + 1)
    }
}

/// A finite element of any supported kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Bar(Bar),
    Quad4(Quad4),
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Bar(_) => ElementKind::Bar,
            Element::Quad4(_) => ElementKind::Quad4,
        }
    }

    /// 1-based node numbers, in element order
    pub fn node_numbers(&self) -> &[usize] {
        match self {
            Element::Bar(bar) => &bar.nodes,
            Element::Quad4(quad) => &quad.nodes,
        }
    }

    /// 1-based material set number
    pub fn material_set(&self) -> usize {
        match self {
            Element::Bar(bar) => bar.material,
            Element::Quad4(quad) => quad.material,
        }
    }

    /// Refresh the location vector from the nodes' equation numbers
    pub fn generate_location_matrix(&mut self, nodes: &[Node]) -> FEAResult<()> {
        match self {
            Element::Bar(bar) => bar.generate_location_matrix(nodes),
            Element::Quad4(quad) => quad.generate_location_matrix(nodes),
        }
    }

    /// Global equation number of each local DOF (0 = constrained)
    pub fn location(&self) -> &[usize] {
        match self {
            Element::Bar(bar) => bar.location(),
            Element::Quad4(quad) => quad.location(),
        }
    }

    /// Entries in the packed upper triangle of the local stiffness
    pub fn size_of_local_stiffness(&self) -> usize {
        packed_size(self.kind().num_dofs())
    }

    /// Packed upper-triangular stiffness, ordered like [`Element::location`]
    pub fn local_stiffness(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &Material,
    ) -> FEAResult<Vec<f64>> {
        match (self, material) {
            (Element::Bar(bar), Material::Bar(m)) => bar.local_stiffness(id, nodes, m),
            (Element::Quad4(quad), Material::Plane(m)) => quad.local_stiffness(id, nodes, m),
            _ => Err(self.mismatch(id, material)),
        }
    }

    /// Stress recovery from the global displacement vector of one load case
    pub fn stress(
        &self,
        id: ElementId,
        nodes: &[Node],
        material: &Material,
        displacement: &[f64],
    ) -> FEAResult<ElementStress> {
        match (self, material) {
            (Element::Bar(bar), Material::Bar(m)) => bar.stress(id, nodes, m, displacement),
            (Element::Quad4(quad), Material::Plane(m)) => {
                quad.stress(id, nodes, m, displacement)
            }
            _ => Err(self.mismatch(id, material)),
        }
    }

    fn mismatch(&self, id: ElementId, material: &Material) -> FEAError {
        FEAError::ElementKindMismatch {
            group: id.group + 1,
            expected: self.kind(),
            found: material.element_kind(),
        }
    }
}

impl From<Bar> for Element {
    fn from(bar: Bar) -> Self {
        Element::Bar(bar)
    }
}

impl From<Quad4> for Element {
    fn from(quad: Quad4) -> Self {
        Element::Quad4(quad)
    }
}

/// Elements of one kind sharing a table of material sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementGroup {
    pub kind: ElementKind,
    /// Material sets, referenced 1-based by the elements
    pub materials: Vec<Material>,
    pub elements: Vec<Element>,
}

impl ElementGroup {
    /// Create an empty group
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            materials: Vec::new(),
            elements: Vec::new(),
        }
    }

    pub fn with_material(mut self, material: impl Into<Material>) -> Self {
        self.materials.push(material.into());
        self
    }

    pub fn with_element(mut self, element: impl Into<Element>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn add_material(&mut self, material: impl Into<Material>) {
        self.materials.push(material.into());
    }

    pub fn add_element(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into());
    }

    /// Material set by 1-based number
    pub fn material(&self, set: usize) -> Option<&Material> {
        set.checked_sub(1).and_then(|i| self.materials.get(i))
    }

    /// Material set of an element, reporting a missing set against this group
    pub(crate) fn material_of(&self, group: usize, element: &Element) -> FEAResult<&Material> {
        let set = element.material_set();
        self.material(set).ok_or(FEAError::MaterialNotFound {
            group: group + 1,
            set,
        })
    }

    /// Check kinds, material values and references for the group at 0-based `group`
    pub fn validate(&self, group: usize, num_nodes: usize) -> FEAResult<()> {
        for material in &self.materials {
            if material.element_kind() != self.kind {
                return Err(FEAError::ElementKindMismatch {
                    group: group + 1,
                    expected: self.kind,
                    found: material.element_kind(),
                });
            }
            material.validate()?;
        }

        for element in &self.elements {
            if element.kind() != self.kind {
                return Err(FEAError::ElementKindMismatch {
                    group: group + 1,
                    expected: self.kind,
                    found: element.kind(),
                });
            }
            self.material_of(group, element)?;
            if let Some(&missing) = element
                .node_numbers()
                .iter()
                .find(|&&n| n == 0 || n > num_nodes)
            {
                return Err(FEAError::NodeNotFound(missing));
            }
        }

        Ok(())
    }
}

/// Look up a node by 1-based number
pub(crate) fn node_at(nodes: &[Node], number: usize) -> FEAResult<&Node> {
    number
        .checked_sub(1)
        .and_then(|i| nodes.get(i))
        .ok_or(FEAError::NodeNotFound(number))
}

/// Element displacement vector from the global one; constrained DOFs read 0
pub(crate) fn gather<const N: usize>(location: &[usize; N], displacement: &[f64]) -> SVector<f64, N> {
    SVector::from_fn(|k, _| match location[k] {
        0 => 0.0,
        eq => displacement.get(eq - 1).copied().unwrap_or(0.0),
    })
}
