//! Material and section property sets

use serde::{Deserialize, Serialize};

use super::ElementKind;
use crate::error::{FEAError, FEAResult};

/// Young's modulus and cross-sectional area of a bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarMaterial {
    /// Modulus of elasticity
    pub e: f64,
    /// Cross-sectional area
    pub area: f64,
}

impl BarMaterial {
    pub fn new(e: f64, area: f64) -> Self {
        Self { e, area }
    }

    pub fn validate(&self) -> FEAResult<()> {
        if !(self.e > 0.0) || !(self.area > 0.0) {
            return Err(FEAError::InvalidMaterial(format!(
                "bar material needs positive E and A (E = {}, A = {})",
                self.e, self.area
            )));
        }
        Ok(())
    }
}

/// In-plane idealization of a quadrilateral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaneCondition {
    /// Thin body, sigma_zz = 0
    #[default]
    Stress,
    /// Long body, epsilon_zz = 0
    Strain,
}

/// Isotropic elastic properties of a plane element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneMaterial {
    /// Modulus of elasticity
    pub e: f64,
    /// Poisson's ratio
    pub nu: f64,
    /// Out-of-plane thickness
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    #[serde(default)]
    pub condition: PlaneCondition,
}

fn default_thickness() -> f64 {
    1.0
}

impl PlaneMaterial {
    /// Plane stress material of unit thickness
    pub fn new(e: f64, nu: f64) -> Self {
        Self {
            e,
            nu,
            thickness: default_thickness(),
            condition: PlaneCondition::Stress,
        }
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn plane_strain(mut self) -> Self {
        self.condition = PlaneCondition::Strain;
        self
    }

    /// Modulus and ratio entering the plane-stress form `E/(1-nu^2)`
    ///
    /// Plane strain maps to `E/(1-nu^2)` and `nu/(1-nu)`.
    pub fn effective_constants(&self) -> (f64, f64) {
        match self.condition {
            PlaneCondition::Stress => (self.e, self.nu),
            PlaneCondition::Strain => (
                self.e / (1.0 - self.nu * self.nu),
                self.nu / (1.0 - self.nu),
            ),
        }
    }

    pub fn validate(&self) -> FEAResult<()> {
        if !(self.e > 0.0) || !(self.thickness > 0.0) {
            return Err(FEAError::InvalidMaterial(format!(
                "plane material needs positive E and thickness (E = {}, t = {})",
                self.e, self.thickness
            )));
        }
        if !(self.nu > -1.0 && self.nu < 0.5) {
            return Err(FEAError::InvalidMaterial(format!(
                "Poisson's ratio {} outside (-1, 0.5)",
                self.nu
            )));
        }
        Ok(())
    }
}

/// A material set of an element group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Material {
    Bar(BarMaterial),
    Plane(PlaneMaterial),
}

impl Material {
    /// Element kind this material set can be attached to
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Material::Bar(_) => ElementKind::Bar,
            Material::Plane(_) => ElementKind::Quad4,
        }
    }

    pub fn validate(&self) -> FEAResult<()> {
        match self {
            Material::Bar(m) => m.validate(),
            Material::Plane(m) => m.validate(),
        }
    }
}

impl From<BarMaterial> for Material {
    fn from(m: BarMaterial) -> Self {
        Material::Bar(m)
    }
}

impl From<PlaneMaterial> for Material {
    fn from(m: PlaneMaterial) -> Self {
        Material::Plane(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_strain_constants() {
        let mat = PlaneMaterial::new(210e9, 0.3).plane_strain();
        let (e, nu) = mat.effective_constants();
        assert_relative_eq!(e, 210e9 / 0.91, max_relative = 1e-12);
        assert_relative_eq!(nu, 0.3 / 0.7, max_relative = 1e-12);
    }

    #[test]
    fn test_invalid_materials() {
        assert!(BarMaterial::new(0.0, 1.0).validate().is_err());
        assert!(BarMaterial::new(1.0, -1.0).validate().is_err());
        assert!(PlaneMaterial::new(1.0, 0.5).validate().is_err());
        assert!(PlaneMaterial::new(1.0, 0.25).validate().is_ok());
    }
}
