//! Linear static analysis pipeline and its options

pub mod assembly;
pub mod solver;

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use log::{log, warn, Level};
use serde::{Deserialize, Serialize};

use crate::elements::ElementKind;
use crate::error::{FrameError, FrameResult};
use crate::loads::NodeLoad;
use crate::math::Vec as FEVec;
use crate::model::FrameModel;
use crate::results::{
    AnalysisResults, AnalysisSummary, ElementEndForces, NodeDisplacement, Reactions,
};

pub use assembly::{assemble, build_load_vector, element_contributions, ElementStiffness};
pub use solver::solve;

/// Options for linear static analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Generate element stiffness on the rayon thread pool
    pub parallel: bool,
    /// Reject models with more free DOFs than this
    pub max_dofs: usize,
    /// Log a warning for models with more free DOFs than this
    pub warn_dofs: usize,
    /// Smallest accepted ratio of Cholesky pivots (min / max)
    pub pivot_tolerance: f64,
    /// Fail on loads at fixed nodes instead of ignoring them
    pub reject_fixed_node_loads: bool,
    /// Check global force equilibrium after the solve
    pub check_statics: bool,
    /// Relative tolerance for the equilibrium check
    pub statics_tolerance: f64,
    /// Report pipeline stages at info level instead of debug
    pub log: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_dofs: 6000,
            warn_dofs: 2000,
            pivot_tolerance: 1e-12,
            reject_fixed_node_loads: false,
            check_statics: false,
            statics_tolerance: 1e-6,
            log: false,
        }
    }
}

impl SolverOptions {
    /// Load options from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> FrameResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Generate element stiffness on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the free-DOF limit
    pub fn with_max_dofs(mut self, max_dofs: usize) -> Self {
        self.max_dofs = max_dofs;
        self
    }

    /// Set the singularity pivot tolerance
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Fail on loads applied to fixed nodes
    pub fn rejecting_fixed_node_loads(mut self) -> Self {
        self.reject_fixed_node_loads = true;
        self
    }

    /// Enable the equilibrium check
    pub fn with_statics_check(mut self) -> Self {
        self.check_statics = true;
        self
    }

    pub(crate) fn level(&self) -> Level {
        if self.log {
            Level::Info
        } else {
            Level::Debug
        }
    }
}

/// Run linear static analysis on a model
///
/// Validation, load mapping, element stiffness generation, assembly, solve
/// and result mapping run in sequence. Nothing is retained between calls.
pub fn analyze(
    model: &FrameModel,
    loads: &[NodeLoad],
    options: &SolverOptions,
) -> FrameResult<AnalysisResults> {
    let start = Instant::now();
    let level = options.level();

    model.validate()?;

    let n_dofs = model.free_dof_count();
    if n_dofs > options.max_dofs {
        return Err(FrameError::ModelTooLarge {
            dofs: n_dofs,
            limit: options.max_dofs,
        });
    }
    if n_dofs > options.warn_dofs {
        warn!(
            "Model has {} free DOFs; dense stiffness needs {:.1} MB",
            n_dofs,
            (n_dofs * n_dofs * 8) as f64 / 1e6
        );
    }

    let f = build_load_vector(model, loads, options)?;
    let contributions = element_contributions(model, options.parallel)?;
    let k = assemble(n_dofs, &contributions);
    log!(
        level,
        "Assembled {}x{} stiffness from {} elements",
        n_dofs,
        n_dofs,
        contributions.len()
    );

    let d = solve(model, k, &f, options)?;
    let results = map_results(model, &contributions, d);

    if options.check_statics {
        check_statics(model, &f, &results, options);
    }

    log!(level, "Linear analysis finished in {:?}", start.elapsed());
    Ok(results)
}

/// Expand the solved vector onto nodes, recover element end forces and
/// reactions, and summarise
fn map_results(
    model: &FrameModel,
    contributions: &[ElementStiffness],
    d: FEVec,
) -> AnalysisResults {
    let displacements: Vec<(usize, NodeDisplacement)> = model
        .nodes()
        .iter()
        .map(|node| {
            let values = match node.dofs() {
                Some(dofs) => dofs.map(|i| d[i]),
                None => [0.0; 6],
            };
            (node.id, NodeDisplacement::from_array(values))
        })
        .collect();

    let mut reactions: HashMap<usize, [f64; 6]> = model
        .nodes()
        .iter()
        .filter(|n| n.fixed)
        .map(|n| (n.id, [0.0; 6]))
        .collect();

    let mut element_forces = Vec::with_capacity(contributions.len());
    for c in contributions {
        let f_local = c.local_end_forces(&d);
        let f_global = c.transform.transpose() * f_local;

        for (end, node) in [(0, c.i_node), (6, c.j_node)] {
            if let Some(r) = reactions.get_mut(&node) {
                for k in 0..6 {
                    r[k] += f_global[end + k];
                }
            }
        }

        element_forces.push(ElementEndForces {
            element: c.element,
            kind: c.kind,
            local: std::array::from_fn(|k| f_local[k]),
        });
    }

    let reactions: Vec<(usize, Reactions)> = model
        .nodes()
        .iter()
        .filter_map(|n| reactions.get(&n.id).map(|r| (n.id, Reactions::from_array(*r))))
        .collect();

    let node_index = displacements
        .iter()
        .enumerate()
        .map(|(k, (id, _))| (*id, k))
        .collect();

    let summary = summarize(
        model,
        &displacements,
        &node_index,
        &element_forces,
        &reactions,
        d.len(),
    );

    AnalysisResults {
        displacements,
        element_forces,
        reactions,
        solution: d.iter().copied().collect(),
        summary,
        node_index,
    }
}

fn summarize(
    model: &FrameModel,
    displacements: &[(usize, NodeDisplacement)],
    node_index: &HashMap<usize, usize>,
    element_forces: &[ElementEndForces],
    reactions: &[(usize, Reactions)],
    free_dofs: usize,
) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        num_nodes: model.nodes().len(),
        num_elements: model.elements().len(),
        free_dofs,
        ..Default::default()
    };

    for (id, disp) in displacements {
        let mag = disp.translation_magnitude();
        if mag > summary.max_displacement {
            summary.max_displacement = mag;
            summary.max_disp_node = Some(*id);
        }
    }

    for element in model.elements().iter().filter(|e| e.kind == ElementKind::Column) {
        // node_index positions follow model node order
        let (Some(&i), Some(&j)) = (
            node_index.get(&element.i_node),
            node_index.get(&element.j_node),
        ) else {
            continue;
        };
        let length = model.nodes()[i].distance_to(&model.nodes()[j]);
        let di = displacements[i].1;
        let dj = displacements[j].1;
        let drift = ((dj.dx - di.dx).powi(2) + (dj.dy - di.dy).powi(2)).sqrt() / length;
        if drift > summary.max_drift_ratio {
            summary.max_drift_ratio = drift;
            summary.max_drift_element = Some(element.id);
        }
    }

    for (id, reaction) in reactions {
        let force = reaction.force_magnitude();
        if force > summary.max_reaction {
            summary.max_reaction = force;
            summary.max_reaction_node = Some(*id);
        }
    }

    for forces in element_forces {
        let moment = forces.max_moment();
        if moment > summary.max_moment {
            summary.max_moment = moment;
            summary.max_moment_element = Some(forces.element);
        }
    }

    summary
}

/// Compare applied forces with support reactions and log any imbalance
fn check_statics(model: &FrameModel, f: &FEVec, results: &AnalysisResults, options: &SolverOptions) {
    let mut applied = [0.0; 3];
    for dofs in model.nodes().iter().filter_map(|n| n.dofs()) {
        for k in 0..3 {
            applied[k] += f[dofs[k]];
        }
    }

    let mut reacted = [0.0; 3];
    for (_, r) in results.reactions() {
        reacted[0] += r.fx;
        reacted[1] += r.fy;
        reacted[2] += r.fz;
    }

    let scale = applied.iter().map(|v: &f64| v.abs()).fold(1.0, f64::max);
    let residual = (0..3)
        .map(|k| (applied[k] + reacted[k]).abs())
        .fold(0.0, f64::max);

    if residual > options.statics_tolerance * scale {
        warn!(
            "Statics check failed: applied {:?}, reactions {:?}, residual {:.3e}",
            applied, reacted, residual
        );
    } else {
        log!(options.level(), "Statics check passed (residual {:.3e})", residual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = SolverOptions::default();
        assert!(options.parallel);
        assert_eq!(options.max_dofs, 6000);
        assert!(!options.reject_fixed_node_loads);
        assert_eq!(options.level(), Level::Debug);
        assert_eq!(options.with_logging().level(), Level::Info);
    }

    #[test]
    fn test_options_partial_json_uses_defaults() {
        let options: SolverOptions =
            serde_json::from_str(r#"{ "parallel": false, "max_dofs": 120 }"#).unwrap();
        assert!(!options.parallel);
        assert_eq!(options.max_dofs, 120);
        assert_eq!(options.pivot_tolerance, 1e-12);
        assert_eq!(options.warn_dofs, 2000);
    }

    #[test]
    fn test_options_from_missing_file() {
        let err = SolverOptions::from_json_file("/nonexistent/solver.json").unwrap_err();
        assert!(matches!(err, FrameError::IoError(_)));
    }

    #[test]
    fn test_summary_drift_and_reaction() {
        use crate::elements::{Element, ElementProperties, Material, Node, Section};
        use approx::assert_relative_eq;

        let col = ElementProperties::new(Material::concrete(30e6), Section::rectangular(0.4, 0.4));
        let beam = ElementProperties::new(Material::concrete(30e6), Section::rectangular(0.3, 0.6));
        let nodes = vec![
            Node::fixed(0, 0.0, 0.0, 0.0),
            Node::fixed(1, 6.0, 0.0, 0.0),
            Node::new(2, 0.0, 0.0, 3.0),
            Node::new(3, 6.0, 0.0, 3.0),
        ];
        let elements = vec![
            Element::column(0, 0, 2, col),
            Element::column(1, 1, 3, col),
            Element::beam(2, 2, 3, beam),
        ];
        let model = FrameModel::from_parts(nodes, elements).unwrap();
        let results = model.analyze_linear(&[NodeLoad::fx(2, 20_000.0)]).unwrap();
        let summary = results.summary();

        let drift = |id| results.displacement(id).unwrap().horizontal_magnitude() / 3.0;
        let (expected, column) = if drift(2) >= drift(3) { (drift(2), 0) } else { (drift(3), 1) };
        assert_relative_eq!(summary.max_drift_ratio, expected, max_relative = 1e-12);
        assert_eq!(summary.max_drift_element, Some(column));

        let largest = results
            .reactions()
            .iter()
            .map(|(_, r)| r.force_magnitude())
            .fold(0.0, f64::max);
        let node = summary.max_reaction_node.unwrap();
        assert!(node == 0 || node == 1);
        assert_eq!(results.reaction(node).unwrap().force_magnitude(), largest);
        assert_eq!(summary.max_reaction, largest);
        assert!(largest > 0.0);
    }
}
