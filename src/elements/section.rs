//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Moment of inertia about local y-axis in m⁴
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
}

impl Section {
    /// Create a new section with basic properties
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Create a rectangular section
    ///
    /// `width` is measured along local y and `depth` along local z, so
    /// `iy = width * depth³ / 12`.
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (long, short) = if width > depth {
            (width, depth)
        } else {
            (depth, width)
        };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self { a, iy, iz, j }
    }

    /// Create a solid circular section
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;

        Self {
            a,
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }

    /// Named property values, in the order they are validated
    pub(crate) fn properties(&self) -> [(&'static str, f64); 4] {
        [("A", self.a), ("Iy", self.iy), ("Iz", self.iz), ("J", self.j)]
    }
}

impl Default for Section {
    fn default() -> Self {
        // 400mm x 400mm column
        Self::rectangular(0.4, 0.4)
    }
}
