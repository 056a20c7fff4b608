//! Benchmarks for the skyline solver

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skyline_fea::prelude::*;

fn create_bar_chain(num_bars: usize) -> Model {
    let mut model = Model::new("bar chain");
    model.add_node(Node::new(1, 0.0, 0.0, 0.0).fixed()).unwrap();
    for n in 1..=num_bars {
        model
            .add_node(Node::new(n + 1, n as f64, 0.0, 0.0).with_fixed(false, true, true))
            .unwrap();
    }

    let mut group = ElementGroup::new(ElementKind::Bar).with_material(BarMaterial::new(200e9, 1e-3));
    for n in 1..=num_bars {
        group.add_element(Bar::new(n, n + 1, 1));
    }
    model.add_group(group).unwrap();

    model
        .add_load_case(LoadCase::new().with_load(NodeLoad::fx(num_bars + 1, 1.0e3)))
        .unwrap();
    model
}

fn create_quad_grid(nx: usize, ny: usize) -> Model {
    let node = |i: usize, j: usize| j * (nx + 1) + i + 1;

    let mut model = Model::new("quad grid");
    for j in 0..=ny {
        for i in 0..=nx {
            model
                .add_node(
                    Node::new(node(i, j), i as f64, j as f64, 0.0).with_fixed(i == 0, i == 0, true),
                )
                .unwrap();
        }
    }

    let mut group = ElementGroup::new(ElementKind::Quad4)
        .with_material(PlaneMaterial::new(210e9, 0.3).with_thickness(0.01));
    for j in 0..ny {
        for i in 0..nx {
            group.add_element(Quad4::new(
                [node(i, j), node(i + 1, j), node(i + 1, j + 1), node(i, j + 1)],
                1,
            ));
        }
    }
    model.add_group(group).unwrap();

    // Tip shear and tip tension as two load cases on one factorization
    model
        .add_load_case(LoadCase::new().with_load(NodeLoad::fy(node(nx, ny), -1.0e3)))
        .unwrap();
    model
        .add_load_case(LoadCase::new().with_load(NodeLoad::fx(node(nx, 0), 1.0e3)))
        .unwrap();
    model
}

fn benchmark_bar_chain(c: &mut Criterion) {
    c.bench_function("bar_chain_1000", |b| {
        b.iter(|| {
            let mut model = create_bar_chain(1000);
            let results = model.analyze(&AnalysisOptions::default()).unwrap();
            black_box(results);
        })
    });
}

fn benchmark_small_grid(c: &mut Criterion) {
    c.bench_function("quad_grid_20x5", |b| {
        b.iter(|| {
            let mut model = create_quad_grid(20, 5);
            let results = model.analyze(&AnalysisOptions::default()).unwrap();
            black_box(results);
        })
    });
}

fn benchmark_medium_grid(c: &mut Criterion) {
    c.bench_function("quad_grid_80x20", |b| {
        b.iter(|| {
            let mut model = create_quad_grid(80, 20);
            let results = model.analyze(&AnalysisOptions::default()).unwrap();
            black_box(results);
        })
    });
}

fn benchmark_factorize_only(c: &mut Criterion) {
    let mut model = create_quad_grid(80, 20);
    model.number_equations();
    model.generate_location_matrices().unwrap();
    let mut k = model.build_profile().unwrap();
    model.assemble_stiffness(&mut k).unwrap();

    c.bench_function("ldlt_quad_grid_80x20", |b| {
        b.iter(|| {
            let factors = k.clone().factorize(PivotTolerance::default()).unwrap();
            black_box(factors);
        })
    });
}

criterion_group!(
    benches,
    benchmark_bar_chain,
    benchmark_small_grid,
    benchmark_medium_grid,
    benchmark_factorize_only,
);

criterion_main!(benches);
