use approx::assert_relative_eq;
use skyline_fea::prelude::*;

fn env_usize(name: &str, default_val: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(default_val)
}

/// Node number of grid point (i, j), i along X
fn grid_node(nx: usize, i: usize, j: usize) -> usize {
    j * (nx + 1) + i + 1
}

/// Strip `lx` x `ly` under total end tension `p` on its right edge
///
/// The left edge is held in X, the bottom-left corner also in Y, so the
/// strip can contract freely. Edge loads are the consistent nodal forces of a
/// uniform traction.
fn build_tension_strip(nx: usize, ny: usize, material: PlaneMaterial, p: f64) -> Model {
    let (lx, ly) = (4.0_f64, 1.0_f64);

    let mut model = Model::new("tension strip");
    for j in 0..=ny {
        let y = ly * (j as f64) / (ny as f64);
        for i in 0..=nx {
            let x = lx * (i as f64) / (nx as f64);
            let node = Node::new(grid_node(nx, i, j), x, y, 0.0)
                .with_fixed(i == 0, i == 0 && j == 0, true);
            model.add_node(node).unwrap();
        }
    }

    // Counter-clockwise: (bl, br, tr, tl)
    let mut group = ElementGroup::new(ElementKind::Quad4).with_material(material);
    for j in 0..ny {
        for i in 0..nx {
            group.add_element(Quad4::new(
                [
                    grid_node(nx, i, j),
                    grid_node(nx, i + 1, j),
                    grid_node(nx, i + 1, j + 1),
                    grid_node(nx, i, j + 1),
                ],
                1,
            ));
        }
    }
    model.add_group(group).unwrap();

    let mut load_case = LoadCase::named("end tension");
    for j in 0..=ny {
        let share = if j == 0 || j == ny { 0.5 } else { 1.0 };
        load_case.add_load(NodeLoad::fx(grid_node(nx, nx, j), p * share / ny as f64));
    }
    model.add_load_case(load_case).unwrap();

    model
}

#[test]
fn tension_strip_uniform_stress() {
    let nx = env_usize("SKYLINE_STRIP_NX", 8);
    let ny = env_usize("SKYLINE_STRIP_NY", 2);
    let (e, nu, t, p) = (1000.0, 0.3, 0.1, 2.0);

    let mut model = build_tension_strip(nx, ny, PlaneMaterial::new(e, nu).with_thickness(t), p);
    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    let case = &results.load_cases[0];

    // sxx = P / (ly * t), exact for bilinear elements
    let sxx = p / (1.0 * t);
    for node in &model.nodes {
        let d = case.node_displacement(node.number).unwrap();
        let [x, y, _] = node.coords;
        assert_relative_eq!(d.dx, sxx / e * x, epsilon = 1e-10);
        assert_relative_eq!(d.dy, -nu * sxx / e * y, epsilon = 1e-10);
        assert_eq!(d.dz, 0.0);
    }

    assert_eq!(case.element_stresses.len(), nx * ny);
    for result in &case.element_stresses {
        let ElementStress::Quad4(stress) = result.stress else {
            panic!("expected quad stress for {}", result.id);
        };
        for point in stress.gauss_points {
            assert_relative_eq!(point[0], sxx, epsilon = 1e-9);
            assert_relative_eq!(point[1], 0.0, epsilon = 1e-9);
            assert_relative_eq!(point[2], 0.0, epsilon = 1e-9);
        }
        assert_relative_eq!(stress.von_mises(), sxx, epsilon = 1e-9);
    }

    eprintln!("Tension strip");
    eprintln!("  mesh: nx={nx}, ny={ny} (elements={})", nx * ny);
    eprintln!(
        "  NEQ = {}, NWK = {}, MK = {}",
        results.summary.neq, results.summary.nwk, results.summary.max_half_bandwidth
    );
}

#[test]
fn plane_strain_stiffens_strip() {
    let (nx, ny) = (4, 1);
    let (e, nu, p) = (1000.0, 0.25, 1.0);

    let mut model = build_tension_strip(nx, ny, PlaneMaterial::new(e, nu).plane_strain(), p);
    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    let tip = results.load_cases[0]
        .node_displacement(grid_node(nx, nx, 0))
        .unwrap();

    // Uniaxial stress with eps_zz = 0: exx = (1 - nu^2) * sxx / E
    let sxx = p;
    assert_relative_eq!(tip.dx, (1.0 - nu * nu) * sxx / e * 4.0, epsilon = 1e-12);
}

#[test]
fn stress_recovery_can_be_skipped() {
    let mut model = build_tension_strip(2, 1, PlaneMaterial::new(1.0, 0.0), 1.0);
    let options = AnalysisOptions::default().with_stress_recovery(false);
    let results = model.analyze(&options).unwrap();
    assert!(results.load_cases[0].element_stresses.is_empty());
    assert_eq!(results.load_cases[0].displacements.len(), results.summary.neq);
}

#[test]
fn inverted_quad_rejected() {
    let mut model = Model::new("inverted");
    let corners = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    for (n, c) in corners.iter().enumerate() {
        model
            .add_node(Node::new(n + 1, c[0], c[1], 0.0).planar())
            .unwrap();
    }
    model
        .add_group(
            ElementGroup::new(ElementKind::Quad4)
                .with_material(PlaneMaterial::new(1.0, 0.3))
                .with_element(Quad4::new([1, 4, 3, 2], 1)),
        )
        .unwrap();

    match model.analyze(&AnalysisOptions::default()) {
        Err(FEAError::InvalidGeometry { element, reason }) => {
            assert_eq!(element, ElementId::new(0, 0));
            assert!(reason.contains("Jacobian"));
        }
        other => panic!("expected geometry failure, got {other:?}"),
    }
}

#[test]
fn json_strip_runs() {
    let mut model = Model::from_json(include_str!("../demos/plate_strip.json")).unwrap();

    let check = model.analyze(&AnalysisOptions::data_check()).unwrap();
    assert!(check.load_cases.is_empty());
    assert_eq!(check.summary.neq, 9);

    let results = model.analyze(&AnalysisOptions::default()).unwrap();
    let tip = results.load_cases[0].node_displacement(3).unwrap();
    // sxx = 1 over a unit section, E = 1000, length 2
    assert_relative_eq!(tip.dx, 2.0e-3, epsilon = 1e-12);
}
