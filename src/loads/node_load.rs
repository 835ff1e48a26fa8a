//! Node loads - forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::model::FrameModel;

/// Force or moment axis of a nodal load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadComponent {
    Fx,
    Fy,
    Fz,
    Mx,
    My,
    Mz,
}

impl LoadComponent {
    /// All components in DOF order
    pub const ALL: [LoadComponent; 6] = [
        Self::Fx,
        Self::Fy,
        Self::Fz,
        Self::Mx,
        Self::My,
        Self::Mz,
    ];

    /// Offset of this component within a node's six DOFs
    pub fn index(self) -> usize {
        match self {
            Self::Fx => 0,
            Self::Fy => 1,
            Self::Fz => 2,
            Self::Mx => 3,
            Self::My => 4,
            Self::Mz => 5,
        }
    }
}

/// A single force or moment applied to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLoad {
    /// Id of the loaded node
    pub node: usize,
    /// Loaded axis
    pub component: LoadComponent,
    /// Magnitude in N or N·m
    pub magnitude: f64,
}

impl NodeLoad {
    /// Create a new node load
    pub fn new(node: usize, component: LoadComponent, magnitude: f64) -> Self {
        Self {
            node,
            component,
            magnitude,
        }
    }

    /// Create a load in X direction
    pub fn fx(node: usize, value: f64) -> Self {
        Self::new(node, LoadComponent::Fx, value)
    }

    /// Create a load in Y direction
    pub fn fy(node: usize, value: f64) -> Self {
        Self::new(node, LoadComponent::Fy, value)
    }

    /// Create a load in Z direction
    pub fn fz(node: usize, value: f64) -> Self {
        Self::new(node, LoadComponent::Fz, value)
    }

    /// Create a moment about Z
    pub fn mz(node: usize, value: f64) -> Self {
        Self::new(node, LoadComponent::Mz, value)
    }

    /// Return a copy with the magnitude multiplied by `factor`
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            magnitude: self.magnitude * factor,
            ..self
        }
    }
}

/// Split a story force equally among the free nodes at an elevation
///
/// Story forces from an equivalent lateral load procedure arrive as one
/// value per floor; this spreads each over the floor's nodes. Returns an
/// empty list when no free node lies within 1 mm of `elevation`.
pub fn distribute_at_level(
    model: &FrameModel,
    elevation: f64,
    total: f64,
    component: LoadComponent,
) -> Vec<NodeLoad> {
    let nodes: Vec<usize> = model
        .free_nodes_at_elevation(elevation, 1e-3)
        .map(|n| n.id)
        .collect();
    if nodes.is_empty() {
        return Vec::new();
    }

    let share = total / nodes.len() as f64;
    nodes
        .into_iter()
        .map(|id| NodeLoad::new(id, component, share))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementProperties, Material, Section};
    use crate::model::GridGeometry;

    #[test]
    fn test_component_index_order() {
        for (k, component) in LoadComponent::ALL.iter().enumerate() {
            assert_eq!(component.index(), k);
        }
    }

    #[test]
    fn test_scaled_load() {
        let load = NodeLoad::fx(3, 1000.0).scaled(2.5);
        assert_eq!(load.magnitude, 2500.0);
        assert_eq!(load.node, 3);
        assert_eq!(load.component, LoadComponent::Fx);
    }

    #[test]
    fn test_distribute_at_level() {
        let props = ElementProperties::new(Material::default(), Section::default());
        let grid = GridGeometry {
            x_spacings: vec![5.0, 5.0],
            y_spacings: vec![4.0],
            story_height: 3.0,
            stories: 2,
            column: props,
            beam: props,
        };
        let model = FrameModel::from_grid(&grid).unwrap();

        let loads = distribute_at_level(&model, 6.0, 60_000.0, LoadComponent::Fx);
        assert_eq!(loads.len(), 6);
        assert!(loads.iter().all(|l| l.magnitude == 10_000.0));
        assert!(loads.iter().all(|l| model.node(l.node).unwrap().z == 6.0));

        assert!(distribute_at_level(&model, 0.0, 1.0, LoadComponent::Fx).is_empty());
    }
}
