//! Dense direct solve of the reduced stiffness system

use std::time::Instant;

use log::log;

use crate::analysis::SolverOptions;
use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, Vec as FEVec};
use crate::model::FrameModel;

/// Id of the node that owns equation `index`
fn dof_owner(model: &FrameModel, index: usize) -> Option<usize> {
    model
        .nodes()
        .iter()
        .find(|n| n.dofs().is_some_and(|d| d.contains(&index)))
        .map(|n| n.id)
}

/// Solve `K d = F` for the free-DOF displacements
///
/// The reduced stiffness of a stable structure is symmetric positive
/// definite, so a Cholesky factorisation is used. A zero diagonal, a failed
/// factorisation or a vanishing pivot ratio is reported as a singular
/// system; non-finite input or output as a numeric failure.
pub fn solve(model: &FrameModel, k: Mat, f: &FEVec, options: &SolverOptions) -> FrameResult<FEVec> {
    let n = k.nrows();
    if n == 0 {
        return Ok(FEVec::zeros(0));
    }

    if k.iter().any(|v| !v.is_finite()) {
        return Err(FrameError::NumericFailure(
            "stiffness matrix contains non-finite entries".to_string(),
        ));
    }
    if f.iter().any(|v| !v.is_finite()) {
        return Err(FrameError::NumericFailure(
            "load vector contains non-finite entries".to_string(),
        ));
    }

    // A free DOF with no stiffness at all, e.g. an unconnected node
    let max_diag = k.diagonal().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if let Some(i) = (0..n).find(|&i| !(k[(i, i)] > max_diag * options.pivot_tolerance)) {
        let node = dof_owner(model, i);
        return Err(FrameError::SingularSystem {
            node,
            reason: match node {
                Some(id) => format!("no stiffness at equation {i} of node {id}"),
                None => format!("no stiffness at equation {i}"),
            },
        });
    }

    let start = Instant::now();
    let chol = k.cholesky().ok_or_else(|| FrameError::SingularSystem {
        node: None,
        reason: "stiffness matrix is not positive definite; check supports and connectivity"
            .to_string(),
    })?;

    let pivots = chol.l_dirty().diagonal().map(|v| v * v);
    let (min_at, min_pivot) = pivots
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, p)| if p < best.1 { (i, p) } else { best });
    let max_pivot = pivots.iter().copied().fold(0.0_f64, f64::max);
    if min_pivot < max_pivot * options.pivot_tolerance {
        return Err(FrameError::SingularSystem {
            node: dof_owner(model, min_at),
            reason: format!(
                "near-singular stiffness: pivot ratio {:.3e} at equation {}",
                min_pivot / max_pivot,
                min_at
            ),
        });
    }

    let d = chol.solve(f);
    if d.iter().any(|v| !v.is_finite()) {
        return Err(FrameError::NumericFailure(
            "solved displacements contain non-finite values".to_string(),
        ));
    }

    log!(
        options.level(),
        "Solved {} equations in {:?}",
        n,
        start.elapsed()
    );
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_system() {
        let d = solve(
            &FrameModel::empty(),
            Mat::zeros(0, 0),
            &FEVec::zeros(0),
            &SolverOptions::default(),
        )
        .unwrap();
        assert_eq!(d.len(), 0);
    }

    #[test]
    fn test_spd_system() {
        let k = Mat::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let f = FEVec::from_vec(vec![1.0, 2.0]);
        let d = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap();
        assert_relative_eq!(d[0], 1.0 / 11.0, max_relative = 1e-12);
        assert_relative_eq!(d[1], 7.0 / 11.0, max_relative = 1e-12);
    }

    #[test]
    fn test_zero_diagonal_is_singular() {
        let k = Mat::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 0.0]);
        let f = FEVec::from_vec(vec![1.0, 0.0]);
        let err = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_indefinite_is_singular() {
        let k = Mat::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        let f = FEVec::from_vec(vec![1.0, 1.0]);
        let err = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_rank_deficient_is_singular() {
        // Free-free spring: rigid body mode
        let k = Mat::from_row_slice(2, 2, &[1e9, -1e9, -1e9, 1e9]);
        let f = FEVec::from_vec(vec![1.0, -1.0]);
        let err = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_non_finite_is_numeric_failure() {
        let k = Mat::from_row_slice(2, 2, &[4.0, f64::NAN, f64::NAN, 3.0]);
        let f = FEVec::from_vec(vec![1.0, 2.0]);
        let err = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, FrameError::NumericFailure(_)));
    }

    #[test]
    fn test_overflowing_solution_is_numeric_failure() {
        // Well conditioned but far too soft for the load
        let k = Mat::from_row_slice(2, 2, &[1e-300, 0.0, 0.0, 2e-300]);
        let f = FEVec::from_vec(vec![1e300, 1.0]);
        let err = solve(&FrameModel::empty(), k, &f, &SolverOptions::default()).unwrap_err();
        assert!(matches!(err, FrameError::NumericFailure(ref msg) if msg.contains("solved")));
    }
}
