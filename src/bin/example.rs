//! RC Frame Solver Example - three-story, two-by-two bay building

use anyhow::Context;
use rc_frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== RC Frame Solver Example: 2x2 Bay, 3 Story Frame ===\n");

    // C30 concrete, 40x40 columns and 30x60 beams (m)
    let concrete = Material::concrete(30e6);
    let grid = GridGeometry {
        x_spacings: vec![6.0, 6.0],
        y_spacings: vec![5.0, 5.0],
        story_height: 3.2,
        stories: 3,
        column: ElementProperties::new(concrete, Section::rectangular(0.4, 0.4)),
        beam: ElementProperties::new(concrete, Section::rectangular(0.3, 0.6)),
    };

    let model = FrameModel::from_grid(&grid).context("failed to build grid model")?;
    println!(
        "Model: {} nodes, {} elements, {} free DOFs\n",
        model.nodes().len(),
        model.elements().len(),
        model.free_dof_count()
    );

    // Equivalent lateral story forces in X (N), growing with height
    let story_forces = [80_000.0, 160_000.0, 240_000.0];
    let mut loads = Vec::new();
    for (k, force) in story_forces.iter().enumerate() {
        let elevation = (k + 1) as f64 * grid.story_height;
        loads.extend(distribute_at_level(&model, elevation, *force, LoadComponent::Fx));
    }

    println!("Running linear analysis...\n");
    let options = SolverOptions::default().with_statics_check();
    let results = model.analyze(&loads, &options).context("analysis failed")?;

    println!("Corner Column Line Displacements:");
    for story in 0..=grid.stories {
        let id = grid.node_id(story, 0, 0);
        let disp = results
            .displacement(id)
            .with_context(|| format!("no displacement for node {id}"))?;
        println!(
            "  Level {} (node {}): DX={:.3}mm, DY={:.3}mm, RY={:.6}rad",
            story,
            id,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.ry
        );
    }

    println!("\nInter-story Drift (corner line):");
    for story in 1..=grid.stories {
        let below = results.displacement(grid.node_id(story - 1, 0, 0)).unwrap_or_default();
        let above = results.displacement(grid.node_id(story, 0, 0)).unwrap_or_default();
        let drift = (above.dx - below.dx) / grid.story_height;
        println!("  Story {}: {:.5} ({:.3}mm)", story, drift, (above.dx - below.dx) * 1000.0);
    }

    println!("\nBase Reactions:");
    let mut base_shear = 0.0;
    for (node, rxn) in results.reactions() {
        base_shear += rxn.fx;
        println!(
            "  Node {}: FX={:.2}kN, FZ={:.2}kN, MY={:.2}kN·m",
            node,
            rxn.fx / 1000.0,
            rxn.fz / 1000.0,
            rxn.my / 1000.0
        );
    }
    println!("  Total base shear: {:.2}kN", base_shear / 1000.0);

    let summary = results.summary();
    println!("\nSummary:");
    if let Some(node) = summary.max_disp_node {
        println!(
            "  Max displacement: {:.3}mm at node {}",
            summary.max_displacement * 1000.0,
            node
        );
    }
    if let Some(element) = summary.max_drift_element {
        println!(
            "  Max drift ratio: {:.5} in column {}",
            summary.max_drift_ratio, element
        );
    }
    if let Some(element) = summary.max_moment_element {
        println!(
            "  Max moment: {:.2}kN·m in element {}",
            summary.max_moment / 1000.0,
            element
        );
    }

    println!("\n=== Analysis Complete ===");
    Ok(())
}
