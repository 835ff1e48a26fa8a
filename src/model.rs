//! Frame model - nodes, elements and degree-of-freedom allocation

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::{self, SolverOptions};
use crate::elements::{Element, ElementProperties, Node};
use crate::error::{FrameError, FrameResult, ValidationError};
use crate::loads::NodeLoad;
use crate::math::MIN_LENGTH;
use crate::results::AnalysisResults;

/// Rectangular building grid description
///
/// Grid lines along X are separated by `x_spacings`, grid lines along Y by
/// `y_spacings`. Level 0 is the ground; levels `1..=stories` are floors
/// `story_height` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Bay widths along X in m
    pub x_spacings: Vec<f64>,
    /// Bay widths along Y in m
    pub y_spacings: Vec<f64>,
    /// Story height in m
    pub story_height: f64,
    /// Number of stories above ground
    pub stories: usize,
    /// Properties applied to every column
    pub column: ElementProperties,
    /// Properties applied to every beam
    pub beam: ElementProperties,
}

impl GridGeometry {
    /// Number of grid lines along X and Y
    pub fn grid_lines(&self) -> (usize, usize) {
        (self.x_spacings.len() + 1, self.y_spacings.len() + 1)
    }

    /// Node id of the grid point at (`story`, `row`, `col`)
    pub fn node_id(&self, story: usize, row: usize, col: usize) -> usize {
        let (nx, ny) = self.grid_lines();
        story * nx * ny + row * nx + col
    }

    /// Free DOFs the grid would produce, `None` if the count overflows
    pub fn free_dof_count(&self) -> Option<usize> {
        let (nx, ny) = self.grid_lines();
        nx.checked_mul(ny)?
            .checked_mul(self.stories)?
            .checked_mul(6)
    }

    /// Reject grids too large to build before anything is allocated
    ///
    /// The ground level is sized as if it were one more floor, so a grid
    /// with no stories cannot bypass the limit.
    fn check_size(&self, max_dofs: usize) -> FrameResult<()> {
        let (nx, ny) = self.grid_lines();
        let overflow = || {
            ValidationError::InvalidGrid(format!(
                "{nx}x{ny} grid with {} stories is too large to index",
                self.stories
            ))
        };

        let dofs = self.free_dof_count().ok_or_else(overflow)?;
        let nodes = nx
            .checked_mul(ny)
            .and_then(|n| n.checked_mul(self.stories.checked_add(1)?))
            .ok_or_else(overflow)?;
        let level_dofs = 6 * (nodes / (self.stories + 1));

        if dofs > max_dofs || level_dofs > max_dofs {
            return Err(FrameError::ModelTooLarge {
                dofs: dofs.max(level_dofs),
                limit: max_dofs,
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let spacings = self.x_spacings.iter().chain(&self.y_spacings);
        if let Some(bad) = spacings.copied().find(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ValidationError::InvalidGrid(format!(
                "grid spacing must be positive (received {bad})"
            )));
        }
        if !(self.story_height.is_finite() && self.story_height > 0.0) {
            return Err(ValidationError::InvalidGrid(format!(
                "story height must be positive (received {})",
                self.story_height
            )));
        }
        Ok(())
    }
}

/// Cumulative positions of grid lines starting at zero
fn grid_positions(spacings: &[f64]) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(spacings.iter().scan(0.0, |acc, s| {
            *acc += s;
            Some(*acc)
        }))
        .collect()
}

/// A validated frame model with allocated equation indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameModel {
    /// Nodes in DOF allocation order
    pub(crate) nodes: Vec<Node>,
    /// Column and beam elements
    pub(crate) elements: Vec<Element>,
}

impl FrameModel {
    // ========================
    // Model Building Methods
    // ========================

    /// Create an empty model
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Build a model from a building grid
    ///
    /// Nodes are created story by story, row by row (Y), column by column (X),
    /// with ids assigned in that order. Story 0 is fixed. Elements are the
    /// columns of every story followed, per floor, by beams along X and then
    /// beams along Y.
    ///
    /// Grids with more free DOFs than the default analysis limit are
    /// rejected; see [`FrameModel::from_grid_with_limit`].
    pub fn from_grid(grid: &GridGeometry) -> FrameResult<Self> {
        Self::from_grid_with_limit(grid, SolverOptions::default().max_dofs)
    }

    /// Build a model from a building grid, rejecting grids whose free DOF
    /// count exceeds `max_dofs` before any node is created
    pub fn from_grid_with_limit(grid: &GridGeometry, max_dofs: usize) -> FrameResult<Self> {
        grid.validate()?;
        grid.check_size(max_dofs)?;

        let xs = grid_positions(&grid.x_spacings);
        let ys = grid_positions(&grid.y_spacings);
        let (nx, ny) = grid.grid_lines();

        let mut nodes = Vec::with_capacity(nx * ny * (grid.stories + 1));
        for story in 0..=grid.stories {
            let z = story as f64 * grid.story_height;
            for (row, &y) in ys.iter().enumerate() {
                for (col, &x) in xs.iter().enumerate() {
                    let id = grid.node_id(story, row, col);
                    nodes.push(if story == 0 {
                        Node::fixed(id, x, y, z)
                    } else {
                        Node::new(id, x, y, z)
                    });
                }
            }
        }

        let mut elements: Vec<Element> = Vec::new();

        for story in 1..=grid.stories {
            for row in 0..ny {
                for col in 0..nx {
                    let id = elements.len();
                    elements.push(Element::column(
                        id,
                        grid.node_id(story - 1, row, col),
                        grid.node_id(story, row, col),
                        grid.column,
                    ));
                }
            }
        }

        for story in 1..=grid.stories {
            for row in 0..ny {
                for col in 0..nx.saturating_sub(1) {
                    let id = elements.len();
                    elements.push(Element::beam(
                        id,
                        grid.node_id(story, row, col),
                        grid.node_id(story, row, col + 1),
                        grid.beam,
                    ));
                }
            }
            for row in 0..ny.saturating_sub(1) {
                for col in 0..nx {
                    let id = elements.len();
                    elements.push(Element::beam(
                        id,
                        grid.node_id(story, row, col),
                        grid.node_id(story, row + 1, col),
                        grid.beam,
                    ));
                }
            }
        }

        let model = Self::from_parts(nodes, elements)?;
        debug!(
            "Built grid model: {}x{} grid, {} stories, {} nodes, {} elements, {} free DOFs",
            nx,
            ny,
            grid.stories,
            model.nodes.len(),
            model.elements.len(),
            model.free_dof_count()
        );
        Ok(model)
    }

    /// Build a model from explicit nodes and elements
    ///
    /// Equation indices are allocated in node order, six per free node.
    pub fn from_parts(nodes: Vec<Node>, elements: Vec<Element>) -> FrameResult<Self> {
        let mut model = Self { nodes, elements };
        model.allocate_dofs();
        model.validate()?;
        Ok(model)
    }

    /// Assign contiguous equation indices to free nodes, in node order
    fn allocate_dofs(&mut self) {
        let mut next = 0;
        for node in &mut self.nodes {
            node.dofs = if node.fixed {
                None
            } else {
                let base = next;
                next += 6;
                Some(std::array::from_fn(|k| base + k))
            };
        }
    }

    /// Check every model invariant
    ///
    /// Runs before any matrix work, so a deserialized model with
    /// hand-written equation indices is checked as well.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut coords: HashMap<usize, &Node> = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if coords.insert(node.id, node).is_some() {
                return Err(ValidationError::DuplicateNode(node.id));
            }
            if node.coords().iter().any(|c| !c.is_finite()) {
                return Err(ValidationError::InvalidGrid(format!(
                    "node {} has non-finite coordinates",
                    node.id
                )));
            }
        }

        self.validate_dofs()?;

        let mut element_ids = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !element_ids.insert(element.id) {
                return Err(ValidationError::DuplicateElement(element.id));
            }
            let i_node = coords
                .get(&element.i_node)
                .ok_or(ValidationError::NodeNotFound(element.i_node))?;
            let j_node = coords
                .get(&element.j_node)
                .ok_or(ValidationError::NodeNotFound(element.j_node))?;
            if element.i_node == element.j_node {
                return Err(ValidationError::SelfConnected {
                    element: element.id,
                    node: element.i_node,
                });
            }
            if !(i_node.distance_to(j_node) >= MIN_LENGTH) {
                return Err(ValidationError::ZeroLength {
                    element: element.id,
                });
            }
            if let Some((property, value)) = element
                .positive_properties()
                .find(|(_, v)| !(v.is_finite() && *v > 0.0))
            {
                return Err(ValidationError::NonPositiveProperty {
                    element: element.id,
                    property,
                    value,
                });
            }
        }

        Ok(())
    }

    fn validate_dofs(&self) -> Result<(), ValidationError> {
        let n_dofs = self.free_dof_count();
        let mut owners: HashMap<usize, usize> = HashMap::with_capacity(n_dofs);

        for node in &self.nodes {
            match (node.fixed, node.dofs) {
                (true, Some(_)) => return Err(ValidationError::FixedNodeWithDofs { node: node.id }),
                (false, None) => return Err(ValidationError::FreeNodeWithoutDofs { node: node.id }),
                (true, None) => {}
                (false, Some(dofs)) => {
                    let contiguous = dofs.iter().enumerate().all(|(k, &d)| d == dofs[0] + k);
                    if !contiguous || dofs[5] >= n_dofs {
                        return Err(ValidationError::NonContiguousDofs { node: node.id });
                    }
                    for index in dofs {
                        if let Some(other) = owners.insert(index, node.id) {
                            return Err(ValidationError::DofCollision {
                                node: node.id,
                                other,
                                index,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    // ========================
    // Accessors
    // ========================

    /// All nodes in allocation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All elements
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Find a node by id
    pub fn node(&self, id: usize) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find an element by id
    pub fn element(&self, id: usize) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Map from node id to node
    pub fn node_map(&self) -> HashMap<usize, &Node> {
        self.nodes.iter().map(|n| (n.id, n)).collect()
    }

    /// Number of free equations (6 per free node)
    pub fn free_dof_count(&self) -> usize {
        6 * self.nodes.iter().filter(|n| !n.fixed).count()
    }

    /// Free nodes whose elevation is within `tolerance` of `z`
    pub fn free_nodes_at_elevation(&self, z: f64, tolerance: f64) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |n| !n.fixed && (n.z - z).abs() <= tolerance)
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run linear static analysis with default options
    pub fn analyze_linear(&self, loads: &[NodeLoad]) -> FrameResult<AnalysisResults> {
        analysis::analyze(self, loads, &SolverOptions::default())
    }

    /// Run linear static analysis with custom options
    pub fn analyze(&self, loads: &[NodeLoad], options: &SolverOptions) -> FrameResult<AnalysisResults> {
        analysis::analyze(self, loads, options)
    }
}

impl Default for FrameModel {
    fn default() -> Self {
        Self::empty()
    }
}
