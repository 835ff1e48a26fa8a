//! Benchmarks for the frame solver

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rc_frame_solver::prelude::*;

fn create_cantilever_model() -> (FrameModel, Vec<NodeLoad>) {
    let props = ElementProperties::new(Material::concrete(30e6), Section::rectangular(0.3, 0.5));
    let nodes = vec![Node::fixed(0, 0.0, 0.0, 0.0), Node::new(1, 0.0, 0.0, 10.0)];
    let model = FrameModel::from_parts(nodes, vec![Element::column(0, 0, 1, props)]).unwrap();
    (model, vec![NodeLoad::fx(1, -10_000.0)])
}

fn create_grid_frame(stories: usize, bays: usize) -> (FrameModel, Vec<NodeLoad>) {
    let concrete = Material::concrete(30e6);
    let grid = GridGeometry {
        x_spacings: vec![6.0; bays],
        y_spacings: vec![5.0; bays],
        story_height: 3.5,
        stories,
        column: ElementProperties::new(concrete, Section::rectangular(0.4, 0.4)),
        beam: ElementProperties::new(concrete, Section::rectangular(0.3, 0.6)),
    };
    let model = FrameModel::from_grid(&grid).unwrap();

    let loads = (1..=stories)
        .flat_map(|story| {
            let z = story as f64 * grid.story_height;
            distribute_at_level(&model, z, 50_000.0 * story as f64, LoadComponent::Fx)
        })
        .collect();

    (model, loads)
}

fn benchmark_cantilever(c: &mut Criterion) {
    let (model, loads) = create_cantilever_model();
    c.bench_function("cantilever_linear", |b| {
        b.iter(|| black_box(model.analyze_linear(&loads).unwrap()))
    });
}

fn benchmark_small_frame(c: &mut Criterion) {
    let (model, loads) = create_grid_frame(3, 2);
    c.bench_function("grid_3story_2x2bay_linear", |b| {
        b.iter(|| black_box(model.analyze_linear(&loads).unwrap()))
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    let (model, loads) = create_grid_frame(10, 3);
    let sequential = SolverOptions::default().sequential();
    c.bench_function("grid_10story_3x3bay_linear", |b| {
        b.iter(|| black_box(model.analyze_linear(&loads).unwrap()))
    });
    c.bench_function("grid_10story_3x3bay_sequential", |b| {
        b.iter(|| black_box(model.analyze(&loads, &sequential).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_cantilever,
    benchmark_small_frame,
    benchmark_medium_frame,
);

criterion_main!(benches);
