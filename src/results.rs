//! Result types for frame analysis

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Components as [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get horizontal (XY) translation magnitude
    pub fn horizontal_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2)).sqrt()
    }
}

/// Reaction forces at a fixed node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction force in Z direction
    pub fz: f64,
    /// Reaction moment about X axis
    pub mx: f64,
    /// Reaction moment about Y axis
    pub my: f64,
    /// Reaction moment about Z axis
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            fx: arr[0],
            fy: arr[1],
            fz: arr[2],
            mx: arr[3],
            my: arr[4],
            mz: arr[5],
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }
}

/// Internal forces at one end of an element, in local axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force in local y direction
    pub shear_y: f64,
    /// Shear force in local z direction
    pub shear_z: f64,
    /// Torsion
    pub torsion: f64,
    /// Bending moment about local y axis
    pub moment_y: f64,
    /// Bending moment about local z axis
    pub moment_z: f64,
}

impl MemberForces {
    /// Create from local force array at i-node
    pub fn from_i_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: -forces[0],
            shear_y: forces[1],
            shear_z: forces[2],
            torsion: -forces[3],
            moment_y: forces[4],
            moment_z: forces[5],
        }
    }

    /// Create from local force array at j-node
    pub fn from_j_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: forces[6],
            shear_y: -forces[7],
            shear_z: -forces[8],
            torsion: forces[9],
            moment_y: forces[10],
            moment_z: forces[11],
        }
    }
}

/// End forces of one element
///
/// `local` holds the forces and moments the end nodes exert on the element,
/// in element local axes: [Fx_i, Fy_i, Fz_i, Mx_i, My_i, Mz_i, Fx_j, ..., Mz_j].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementEndForces {
    pub element: usize,
    pub kind: ElementKind,
    pub local: [f64; 12],
}

impl ElementEndForces {
    /// Internal forces at the i-node
    pub fn at_i(&self) -> MemberForces {
        MemberForces::from_i_node_forces(&self.local)
    }

    /// Internal forces at the j-node
    pub fn at_j(&self) -> MemberForces {
        MemberForces::from_j_node_forces(&self.local)
    }

    /// Largest end moment magnitude about either local axis
    pub fn max_moment(&self) -> f64 {
        [4, 5, 10, 11]
            .iter()
            .map(|&k| self.local[k].abs())
            .fold(0.0, f64::max)
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Node with maximum displacement
    pub max_disp_node: Option<usize>,
    /// Maximum column drift ratio (horizontal relative displacement / length)
    pub max_drift_ratio: f64,
    /// Column with the maximum drift ratio
    pub max_drift_element: Option<usize>,
    /// Largest support reaction force magnitude
    pub max_reaction: f64,
    /// Fixed node with the largest reaction force
    pub max_reaction_node: Option<usize>,
    /// Maximum end moment over all elements
    pub max_moment: f64,
    /// Element with the maximum end moment
    pub max_moment_element: Option<usize>,
    /// Total number of nodes
    pub num_nodes: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Free DOFs (unknowns)
    pub free_dofs: usize,
}

/// Outcome of one successful solve
///
/// Everything here is derived from the solved displacement vector and is
/// read-only to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub(crate) displacements: Vec<(usize, NodeDisplacement)>,
    pub(crate) element_forces: Vec<ElementEndForces>,
    pub(crate) reactions: Vec<(usize, Reactions)>,
    pub(crate) solution: Vec<f64>,
    pub(crate) summary: AnalysisSummary,
    #[serde(skip)]
    pub(crate) node_index: HashMap<usize, usize>,
}

impl AnalysisResults {
    /// Displacement of a node, zero for fixed nodes
    pub fn displacement(&self, node: usize) -> Option<NodeDisplacement> {
        match self.node_index.get(&node) {
            Some(&k) => Some(self.displacements[k].1),
            None => self
                .displacements
                .iter()
                .find(|(id, _)| *id == node)
                .map(|(_, d)| *d),
        }
    }

    /// All node displacements in model node order
    pub fn displacements(&self) -> &[(usize, NodeDisplacement)] {
        &self.displacements
    }

    /// End forces of an element
    pub fn element_forces(&self, element: usize) -> Option<&ElementEndForces> {
        self.element_forces.iter().find(|f| f.element == element)
    }

    /// End forces of all elements in model order
    pub fn all_element_forces(&self) -> &[ElementEndForces] {
        &self.element_forces
    }

    /// Reactions at a fixed node
    pub fn reaction(&self, node: usize) -> Option<Reactions> {
        self.reactions
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, r)| *r)
    }

    /// Reactions at all fixed nodes
    pub fn reactions(&self) -> &[(usize, Reactions)] {
        &self.reactions
    }

    /// Solved free-DOF displacement vector
    pub fn solution(&self) -> &[f64] {
        &self.solution
    }

    /// Analysis summary
    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    /// True when the model had no free DOFs
    pub fn is_empty(&self) -> bool {
        self.solution.is_empty()
    }
}
