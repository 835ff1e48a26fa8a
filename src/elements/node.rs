//! Node element - represents a point in 3D space

use serde::{Deserialize, Serialize};

/// A 3D node in the frame model
///
/// `z` is the global vertical axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: usize,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (vertical)
    pub z: f64,
    /// Ground-level node with all six DOFs restrained
    pub fixed: bool,

    /// Global equation indices [DX, DY, DZ, RX, RY, RZ], `None` when fixed
    #[serde(default)]
    pub(crate) dofs: Option<[usize; 6]>,
}

impl Node {
    /// Create a new free node at the given coordinates
    pub fn new(id: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            x,
            y,
            z,
            fixed: false,
            dofs: None,
        }
    }

    /// Create a new fixed (ground) node
    pub fn fixed(id: usize, x: f64, y: f64, z: f64) -> Self {
        Self {
            fixed: true,
            ..Self::new(id, x, y, z)
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Equation indices, `None` for a fixed node
    pub fn dofs(&self) -> Option<[usize; 6]> {
        self.dofs
    }

    /// Equation index per axis, `None` where the axis is eliminated
    pub fn dof_slots(&self) -> [Option<usize>; 6] {
        match self.dofs {
            Some(dofs) => dofs.map(Some),
            None => [None; 6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(7, 1.0, 2.0, 3.0);
        assert_eq!(node.id, 7);
        assert_eq!(node.coords(), [1.0, 2.0, 3.0]);
        assert!(!node.fixed);
        assert_eq!(node.dof_slots(), [None; 6]);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0, 0.0, 0.0, 0.0);
        let n2 = Node::fixed(1, 3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
        assert!(n2.fixed);
    }

    #[test]
    fn test_dof_slots() {
        let mut node = Node::new(0, 0.0, 0.0, 3.0);
        node.dofs = Some([6, 7, 8, 9, 10, 11]);
        assert_eq!(node.dof_slots()[0], Some(6));
        assert_eq!(node.dof_slots()[5], Some(11));
    }
}
