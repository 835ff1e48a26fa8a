//! Mathematical utilities for frame element calculations

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for element stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for element forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Elements whose vertical direction cosine exceeds this magnitude use the
/// fixed vertical axis convention instead of the general triad.
pub const VERTICAL_TOLERANCE: f64 = 0.9999;

/// Lengths below this are treated as coincident nodes
pub const MIN_LENGTH: f64 = 1e-10;

/// Compute the 3x3 direction cosine matrix of an element
///
/// Rows are the local x, y and z axes expressed in global coordinates,
/// with global Z vertical.
///
/// - Near-vertical elements: local x = ±Z, local y = +Y, local z = x × y.
/// - Other elements: local y is the horizontal perpendicular to local x,
///   local z = x × y (points upward).
///
/// The vertical convention is the limit of the general triad only for an
/// element leaning towards +X. For any other lean direction the local y
/// and z axes rotate about the member axis when `|cz|` crosses
/// [`VERTICAL_TOLERANCE`]: a column leaning towards +Y has local y = -X in
/// the general branch but +Y in the vertical one, so its bending stiffness
/// about each global axis switches between Iy and Iz at the threshold.
///
/// Returns `None` if the end points coincide.
pub fn member_rotation_matrix(i_node: &[f64; 3], j_node: &[f64; 3]) -> Option<Mat3> {
    let d = Vec3::new(
        j_node[0] - i_node[0],
        j_node[1] - i_node[1],
        j_node[2] - i_node[2],
    );
    let length = d.norm();
    if length < MIN_LENGTH {
        return None;
    }

    let x = d / length;
    let (cx, cy, cz) = (x[0], x[1], x[2]);

    let (x, y, z) = if cz.abs() > VERTICAL_TOLERANCE {
        let s = cz.signum();
        (
            Vec3::new(0.0, 0.0, s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-s, 0.0, 0.0),
        )
    } else {
        let proj = (cx * cx + cy * cy).sqrt();
        let y = Vec3::new(-cy / proj, cx / proj, 0.0);
        let z = Vec3::new(-cx * cz / proj, -cy * cz / proj, proj);
        (x, y, z)
    };

    Some(Mat3::from_rows(&[
        x.transpose(),
        y.transpose(),
        z.transpose(),
    ]))
}

/// Compute the transformation matrix for a 3D frame element
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
///
/// # Returns
/// 12x12 transformation matrix from global to local coordinates, or `None`
/// for a zero-length element
pub fn member_transformation_matrix(i_node: &[f64; 3], j_node: &[f64; 3]) -> Option<Mat12> {
    let r = member_rotation_matrix(i_node, j_node)?;

    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(&r);
    }

    Some(t)
}

/// Extract the 3x3 rotation matrix from a 12x12 transformation matrix
pub fn extract_rotation_matrix(t: &Mat12) -> Mat3 {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// DOF order per end is [ux, uy, uz, rx, ry, rz].
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
///
/// # Returns
/// 12x12 local stiffness matrix
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 1: shear Fy at i
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        // Row 2: shear Fz at i
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        // Row 3: torsion at i
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        // Row 4: moment My at i
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        // Row 5: moment Mz at i
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        // Row 6: axial at j
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 7: shear Fy at j
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        // Row 8: shear Fz at j
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        // Row 9: torsion at j
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        // Row 10: moment My at j
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        // Row 11: moment Mz at j
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Largest absolute deviation from symmetry in a square matrix
pub fn max_asymmetry(k: &Mat) -> f64 {
    let n = k.nrows();
    let mut worst: f64 = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            worst = worst.max((k[(i, j)] - k[(j, i)]).abs());
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthogonal(t: &Mat12) {
        let identity = t.transpose() * t;
        for i in 0..12 {
            for j in 0..12 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(identity[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_transformation_matrix_horizontal() {
        let t = member_transformation_matrix(&[0.0, 0.0, 3.0], &[5.0, 0.0, 3.0]).unwrap();

        // Beam along X: local axes coincide with global axes
        assert_relative_eq!(t[(0, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
        assert_orthogonal(&t);
    }

    #[test]
    fn test_transformation_matrix_beam_along_y() {
        let t = member_transformation_matrix(&[0.0, 0.0, 3.0], &[0.0, 4.0, 3.0]).unwrap();

        // local x = +Y, local y = -X, local z = +Z
        assert_relative_eq!(t[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 2)], 1.0, epsilon = 1e-12);
        assert_orthogonal(&t);
    }

    #[test]
    fn test_transformation_matrix_vertical() {
        let t = member_transformation_matrix(&[0.0, 0.0, 0.0], &[0.0, 0.0, 3.0]).unwrap();

        // local x = +Z, local y = +Y, local z = -X
        assert_relative_eq!(t[(0, 2)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(t[(2, 0)], -1.0, epsilon = 1e-12);
        assert_orthogonal(&t);

        let down = member_transformation_matrix(&[0.0, 0.0, 3.0], &[0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(down[(0, 2)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(down[(2, 0)], 1.0, epsilon = 1e-12);
        assert_orthogonal(&down);
    }

    #[test]
    fn test_transformation_matrix_inclined() {
        let t = member_transformation_matrix(&[1.0, -2.0, 0.5], &[4.0, 2.0, 6.0]).unwrap();
        assert_orthogonal(&t);

        // Right-handed triad: z = x cross y
        let r = extract_rotation_matrix(&t);
        let x = r.row(0).transpose();
        let y = r.row(1).transpose();
        let z = r.row(2).transpose();
        let cross = x.cross(&y);
        for k in 0..3 {
            assert_relative_eq!(cross[k], z[k], epsilon = 1e-12);
        }
        // local y stays horizontal
        assert_relative_eq!(y[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_branch_matches_general_limit() {
        // Leaning towards +X just inside the general branch
        let lean = 0.015;
        let general = member_rotation_matrix(&[0.0, 0.0, 0.0], &[lean, 0.0, 1.0]).unwrap();
        let vertical = member_rotation_matrix(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();

        let cz = 1.0 / (1.0 + lean * lean).sqrt();
        assert!(cz < VERTICAL_TOLERANCE);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(general[(i, j)], vertical[(i, j)], epsilon = 2e-2);
            }
        }
    }

    #[test]
    fn test_y_lean_rotates_local_axes_at_threshold() {
        let lean = 0.015;
        let general = member_rotation_matrix(&[0.0, 0.0, 0.0], &[0.0, lean, 1.0]).unwrap();
        let vertical = member_rotation_matrix(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0]).unwrap();

        // Local y is -X in the general branch, +Y in the vertical branch
        assert_relative_eq!(general[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(general[(1, 1)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(vertical[(1, 1)], 1.0, epsilon = 1e-12);

        // Local z swaps from about -Y to -X
        assert_relative_eq!(general[(2, 1)], -1.0, epsilon = 2e-4);
        assert_relative_eq!(vertical[(2, 0)], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_has_no_transform() {
        assert!(member_transformation_matrix(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn test_local_stiffness_symmetry() {
        let k = member_local_stiffness(30e9, 12.5e9, 0.12, 1.6e-3, 9e-4, 1.2e-3, 3.0);

        for i in 0..12 {
            for j in 0..12 {
                assert_eq!(k[(i, j)], k[(j, i)], "asymmetry at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_local_stiffness_behaviours_are_uncoupled() {
        let k = member_local_stiffness(30e9, 12.5e9, 0.12, 1.6e-3, 9e-4, 1.2e-3, 3.0);
        let axial = [0, 6];
        let torsion = [3, 9];
        let bend_z = [1, 5, 7, 11];
        let bend_y = [2, 4, 8, 10];
        let groups: [&[usize]; 4] = [&axial, &torsion, &bend_z, &bend_y];

        for (gi, a) in groups.iter().enumerate() {
            for (gj, b) in groups.iter().enumerate() {
                if gi == gj {
                    continue;
                }
                for &r in a.iter() {
                    for &c in b.iter() {
                        assert_eq!(k[(r, c)], 0.0);
                    }
                }
            }
        }

        assert_relative_eq!(k[(0, 0)], 30e9 * 0.12 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(k[(3, 3)], 12.5e9 * 1.2e-3 / 3.0, max_relative = 1e-12);
        assert_relative_eq!(k[(1, 1)], 12.0 * 30e9 * 9e-4 / 27.0, max_relative = 1e-12);
        assert_relative_eq!(k[(2, 2)], 12.0 * 30e9 * 1.6e-3 / 27.0, max_relative = 1e-12);
    }
}
