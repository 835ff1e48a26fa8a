//! Error types for the frame solver

use thiserror::Error;

/// Malformed model or load data, detected before any matrix work
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Node {0} not found in model")]
    NodeNotFound(usize),

    #[error("Duplicate node id {0}")]
    DuplicateNode(usize),

    #[error("Duplicate element id {0}")]
    DuplicateElement(usize),

    #[error("Element {element} connects node {node} to itself")]
    SelfConnected { element: usize, node: usize },

    #[error("Element {element} has zero length")]
    ZeroLength { element: usize },

    #[error("Element {element} has non-positive {property} ({value})")]
    NonPositiveProperty {
        element: usize,
        property: &'static str,
        value: f64,
    },

    #[error("DOF index {index} of node {node} is already used by node {other}")]
    DofCollision {
        node: usize,
        other: usize,
        index: usize,
    },

    #[error("Node {node} has a non-contiguous DOF range")]
    NonContiguousDofs { node: usize },

    #[error("Fixed node {node} carries equation indices")]
    FixedNodeWithDofs { node: usize },

    #[error("Free node {node} has no equation indices")]
    FreeNodeWithoutDofs { node: usize },

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Load applied to fixed node {0}")]
    LoadOnFixedNode(usize),
}

/// Main error type for frame analysis
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid model: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model has {dofs} free DOFs, exceeding the limit of {limit}")]
    ModelTooLarge { dofs: usize, limit: usize },

    #[error("Singular stiffness matrix: {reason}")]
    SingularSystem { node: Option<usize>, reason: String },

    #[error("Numeric failure: {0}")]
    NumericFailure(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl FrameError {
    /// True for failures caused by an unstable structure
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularSystem { .. })
    }

    /// True for failures raised before any matrix work
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ModelTooLarge { .. })
    }
}

/// Result type for frame analysis
pub type FrameResult<T> = Result<T, FrameError>;
