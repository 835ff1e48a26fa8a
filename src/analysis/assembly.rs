//! Element stiffness generation, global assembly and load vector mapping

use std::collections::HashMap;

use log::warn;
use rayon::prelude::*;

use crate::analysis::SolverOptions;
use crate::elements::{Element, ElementKind, Node};
use crate::error::{FrameError, FrameResult, ValidationError};
use crate::loads::NodeLoad;
use crate::math::{self, Mat, Mat12, Vec as FEVec, Vec12};
use crate::model::FrameModel;

/// One element's stiffness contribution, ready to scatter
#[derive(Debug, Clone)]
pub struct ElementStiffness {
    /// Element id
    pub element: usize,
    pub kind: ElementKind,
    pub i_node: usize,
    pub j_node: usize,
    /// Global equation index per element DOF, `None` for fixed ends
    pub dofs: [Option<usize>; 12],
    /// Stiffness in local axes
    pub k_local: Mat12,
    /// Global-to-local transformation
    pub transform: Mat12,
    /// Stiffness in global axes, `T^T * k_local * T`
    pub k_global: Mat12,
}

impl ElementStiffness {
    /// Compute the local and global stiffness of one element
    pub fn new(element: &Element, i_node: &Node, j_node: &Node) -> FrameResult<Self> {
        let length = i_node.distance_to(j_node);
        let transform = math::member_transformation_matrix(&i_node.coords(), &j_node.coords())
            .ok_or(ValidationError::ZeroLength {
                element: element.id,
            })?;

        let k_local = math::member_local_stiffness(
            element.material.e,
            element.material.g,
            element.section.a,
            element.section.iy,
            element.section.iz,
            element.section.j,
            length,
        );
        let k_global = transform.transpose() * k_local * transform;

        let i_dofs = i_node.dof_slots();
        let j_dofs = j_node.dof_slots();
        let dofs = std::array::from_fn(|k| if k < 6 { i_dofs[k] } else { j_dofs[k - 6] });

        Ok(Self {
            element: element.id,
            kind: element.kind,
            i_node: i_node.id,
            j_node: j_node.id,
            dofs,
            k_local,
            transform,
            k_global,
        })
    }

    /// Local end forces from the solved free-DOF vector: `k_local * T * d`
    pub fn local_end_forces(&self, d: &FEVec) -> Vec12 {
        let d_global = Vec12::from_fn(|k, _| self.dofs[k].map_or(0.0, |i| d[i]));
        let d_local = self.transform * d_global;
        self.k_local * d_local
    }
}

/// Compute every element's stiffness contribution
///
/// Elements are independent, so with `parallel` set the work is spread over
/// the rayon pool. The output keeps model element order either way.
pub fn element_contributions(model: &FrameModel, parallel: bool) -> FrameResult<Vec<ElementStiffness>> {
    let nodes = model.node_map();
    let compute = |element: &Element| -> FrameResult<ElementStiffness> {
        let i_node = nodes
            .get(&element.i_node)
            .ok_or(ValidationError::NodeNotFound(element.i_node))?;
        let j_node = nodes
            .get(&element.j_node)
            .ok_or(ValidationError::NodeNotFound(element.j_node))?;
        ElementStiffness::new(element, i_node, j_node)
    };

    if parallel {
        model.elements().par_iter().map(compute).collect()
    } else {
        model.elements().iter().map(compute).collect()
    }
}

/// Scatter element contributions into a dense global stiffness matrix
///
/// Rows and columns belonging to fixed DOFs are dropped, which enforces the
/// supports by elimination. Accumulation is a plain sum, so the result does
/// not depend on the order of `contributions`.
pub fn assemble(n_dofs: usize, contributions: &[ElementStiffness]) -> Mat {
    let mut k = Mat::zeros(n_dofs, n_dofs);

    for c in contributions {
        for (a, row) in c.dofs.iter().enumerate() {
            let Some(row) = *row else { continue };
            for (b, col) in c.dofs.iter().enumerate() {
                let Some(col) = *col else { continue };
                k[(row, col)] += c.k_global[(a, b)];
            }
        }
    }

    k
}

/// Build the free-DOF load vector
///
/// Loads on fixed nodes are ignored with a warning unless the options ask
/// for them to be rejected. Several loads on one DOF add up.
pub fn build_load_vector(
    model: &FrameModel,
    loads: &[NodeLoad],
    options: &SolverOptions,
) -> FrameResult<FEVec> {
    let nodes: HashMap<usize, &Node> = model.node_map();
    let mut f = FEVec::zeros(model.free_dof_count());

    for load in loads {
        let node = nodes
            .get(&load.node)
            .ok_or(ValidationError::NodeNotFound(load.node))?;

        if !load.magnitude.is_finite() {
            return Err(FrameError::NumericFailure(format!(
                "load {:?} on node {} is not finite",
                load.component, load.node
            )));
        }

        match node.dofs() {
            Some(dofs) => f[dofs[load.component.index()]] += load.magnitude,
            None if options.reject_fixed_node_loads => {
                return Err(ValidationError::LoadOnFixedNode(load.node).into());
            }
            None => warn!(
                "Ignoring {:?} = {} on fixed node {}",
                load.component, load.magnitude, load.node
            ),
        }
    }

    Ok(f)
}
