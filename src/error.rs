//! Error types for the skyline solver

use thiserror::Error;

use crate::elements::{ElementId, ElementKind};

/// Main error type for model building, assembly and solution
#[derive(Error, Debug)]
pub enum FEAError {
    #[error("{kind} must be inputted in order: expected {expected}, provided {provided}")]
    InputOrder {
        kind: &'static str,
        expected: usize,
        provided: usize,
    },

    #[error("Node {0} not found in model")]
    NodeNotFound(usize),

    #[error("Material set {set} not found in element group {group}")]
    MaterialNotFound { group: usize, set: usize },

    #[error("Load case {0} not found in model")]
    LoadCaseNotFound(usize),

    #[error("Invalid direction {direction} for a load at node {node} (expected 1..=3)")]
    InvalidDirection { node: usize, direction: usize },

    #[error("Element group {group} holds {expected} entries but received {found}")]
    ElementKindMismatch {
        group: usize,
        expected: ElementKind,
        found: ElementKind,
    },

    #[error("Invalid geometry in {element}: {reason}")]
    InvalidGeometry { element: ElementId, reason: String },

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Stiffness matrix is not positive definite at equation {equation} (pivot = {pivot:e})")]
    NotPositiveDefinite { equation: usize, pivot: f64 },

    #[error("Entry ({row}, {column}) lies outside the skyline profile")]
    OutsideProfile { row: usize, column: usize },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Equation numbers not assigned - run number_equations() first")]
    NotNumbered,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for solver operations
pub type FEAResult<T> = Result<T, FEAError>;
