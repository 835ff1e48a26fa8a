//! Material properties

use serde::{Deserialize, Serialize};

/// Elastic material constants used by frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
}

impl Material {
    /// Create a new material from E and G
    pub fn new(e: f64, g: f64) -> Self {
        Self { e, g }
    }

    /// Create an isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)))
    }

    /// Create a concrete material from its characteristic strength `fck` in Pa
    ///
    /// Uses the TS500 modulus `Ec = 3250 * sqrt(fck) + 14000` (MPa) and nu = 0.2.
    pub fn concrete(fck: f64) -> Self {
        let fck_mpa = fck / 1e6;
        let e = (3250.0 * fck_mpa.sqrt() + 14000.0) * 1e6;
        Self::isotropic(e, 0.2)
    }
}

impl Default for Material {
    fn default() -> Self {
        // C30 concrete
        Self::concrete(30e6)
    }
}
