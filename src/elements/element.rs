//! Frame element - 3D prismatic line member (column or beam)

use serde::{Deserialize, Serialize};

use super::{Material, Section};

/// Role of a frame element in the building grid
///
/// Columns and beams share the same stiffness formulation and differ only in
/// the section and material they are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Column,
    Beam,
}

/// Material and section pair supplied per element kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementProperties {
    pub material: Material,
    pub section: Section,
}

impl ElementProperties {
    pub fn new(material: Material, section: Section) -> Self {
        Self { material, section }
    }
}

/// A 3D frame element connecting two nodes by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier
    pub id: usize,
    /// Column or beam
    pub kind: ElementKind,
    /// Id of the i-node (start)
    pub i_node: usize,
    /// Id of the j-node (end)
    pub j_node: usize,
    /// Elastic constants
    pub material: Material,
    /// Cross-section constants
    pub section: Section,
}

impl Element {
    /// Create a new element
    pub fn new(
        id: usize,
        kind: ElementKind,
        i_node: usize,
        j_node: usize,
        properties: ElementProperties,
    ) -> Self {
        Self {
            id,
            kind,
            i_node,
            j_node,
            material: properties.material,
            section: properties.section,
        }
    }

    /// Create a column element
    pub fn column(id: usize, i_node: usize, j_node: usize, properties: ElementProperties) -> Self {
        Self::new(id, ElementKind::Column, i_node, j_node, properties)
    }

    /// Create a beam element
    pub fn beam(id: usize, i_node: usize, j_node: usize, properties: ElementProperties) -> Self {
        Self::new(id, ElementKind::Beam, i_node, j_node, properties)
    }

    /// Material and section as one record
    pub fn properties(&self) -> ElementProperties {
        ElementProperties::new(self.material, self.section)
    }

    /// Named stiffness constants that must be strictly positive
    pub(crate) fn positive_properties(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [("E", self.material.e), ("G", self.material.g)]
            .into_iter()
            .chain(self.section.properties())
    }
}
