//! Property tests for the relaxation and normalization invariants.

use proptest::prelude::*;

use super::force::{ForceModel, pair_magnitude};
use super::types::Point;
use super::compute_layout;
use crate::config::LayoutConfig;
use crate::ir::Graph;

#[derive(Debug, Clone)]
struct GraphSpec {
    radii: Vec<f64>,
    edges: Vec<(usize, usize)>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
}

fn graph_spec() -> impl Strategy<Value = GraphSpec> {
    (1usize..6).prop_flat_map(|n| {
        (
            prop::collection::vec(10.0f64..50.0, n),
            prop::collection::vec((0..n, 0..n), 0..8),
            prop::collection::vec(0..n, 0..3),
            prop::collection::vec(0..n, 0..3),
        )
            .prop_map(|(radii, edges, inputs, outputs)| GraphSpec {
                radii,
                edges,
                inputs,
                outputs,
            })
    })
}

fn build(spec: &GraphSpec) -> Graph {
    let mut graph = Graph::new();
    for (idx, radius) in spec.radii.iter().enumerate() {
        graph.ensure_node(&format!("n{idx}"), None, None, Some(*radius));
    }
    for (src, dst) in &spec.edges {
        if src != dst {
            graph.connect(&format!("n{src}"), &format!("n{dst}"));
        }
    }
    for idx in &spec.inputs {
        graph.add_input(&format!("n{idx}"));
    }
    for idx in &spec.outputs {
        graph.add_output(&format!("n{idx}"));
    }
    graph
}

fn point() -> impl Strategy<Value = Point> {
    (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn normalized_layout_touches_origin(spec in graph_spec(), seed in any::<u64>()) {
        let config = LayoutConfig {
            iterations_per_node: 20,
            seed,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&build(&spec), &config);
        let border = config.border;
        let min_x = layout.nodes.values().map(|n| n.x - (n.radius + border)).fold(f64::MAX, f64::min);
        let min_y = layout.nodes.values().map(|n| n.y - (n.radius + border)).fold(f64::MAX, f64::min);
        let max_x = layout.nodes.values().map(|n| n.x + n.radius + border).fold(f64::MIN, f64::max);
        let max_y = layout.nodes.values().map(|n| n.y + n.radius + border).fold(f64::MIN, f64::max);
        prop_assert_eq!(min_x, 0.0);
        prop_assert_eq!(min_y, 0.0);
        prop_assert!((max_x - layout.width).abs() < 1e-6);
        prop_assert!((max_y - layout.height).abs() < 1e-6);
    }

    #[test]
    fn pairwise_forces_sum_to_zero(
        radii in prop::collection::vec(10.0f64..50.0, 2..7),
        positions in prop::collection::vec(point(), 7),
        edges in prop::collection::vec((0usize..7, 0usize..7), 0..10),
    ) {
        let n = radii.len();
        let mut model = ForceModel::new(radii, 1.4);
        for (a, b) in edges {
            if a < n && b < n {
                model.connect(a, b);
            }
        }
        let forces = model.pairwise_forces(&positions[..n]);
        let total = forces.iter().fold(Point::default(), |acc, f| acc + *f);
        prop_assert!(total.length() < 1e-8, "net force {:?}", total);
    }

    #[test]
    fn unconnected_magnitude_is_never_attractive(distance in 0.0f64..2000.0, target in 0.0f64..200.0) {
        prop_assert!(pair_magnitude(distance, target, false) <= 0.0);
        prop_assert_eq!(pair_magnitude(distance, target, true), distance - target);
    }
}
