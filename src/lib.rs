//! RC Frame Solver - linear-elastic 3D frame analysis for building grids
//!
//! This library provides the structural analysis engine of a
//! reinforced-concrete building design tool:
//! - Grid model builder (columns and beams on a rectangular grid)
//! - 12x12 frame element stiffness and local-to-global transformation
//! - Dense global assembly with fixed-node elimination
//! - Cholesky solve with explicit singularity detection
//! - Nodal displacements, element end forces and support reactions
//!
//! Global Z is vertical. Every analysis is a pure function of the model,
//! the loads and the options.
//!
//! ## Example
//! ```rust
//! use rc_frame_solver::prelude::*;
//!
//! let column = ElementProperties::new(Material::concrete(30e6), Section::rectangular(0.4, 0.4));
//! let beam = ElementProperties::new(Material::concrete(30e6), Section::rectangular(0.3, 0.6));
//!
//! let grid = GridGeometry {
//!     x_spacings: vec![5.0, 5.0],
//!     y_spacings: vec![4.0],
//!     story_height: 3.0,
//!     stories: 2,
//!     column,
//!     beam,
//! };
//! let model = FrameModel::from_grid(&grid).unwrap();
//!
//! // 60 kN story force in X at the roof
//! let loads = distribute_at_level(&model, 6.0, 60_000.0, LoadComponent::Fx);
//!
//! let results = model.analyze_linear(&loads).unwrap();
//! let roof = results.displacement(grid.node_id(2, 0, 0)).unwrap();
//! assert!(roof.dx > 0.0);
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
    pub use crate::analysis::{analyze, SolverOptions};
    pub use crate::elements::{Element, ElementKind, ElementProperties, Material, Node, Section};
    pub use crate::error::{FrameError, FrameResult, ValidationError};
    pub use crate::loads::{distribute_at_level, LoadComponent, NodeLoad};
    pub use crate::model::{FrameModel, GridGeometry};
    pub use crate::results::{
        AnalysisResults, AnalysisSummary, ElementEndForces, MemberForces, NodeDisplacement,
        Reactions,
    };
}
