mod bounds;
pub(crate) mod force;
#[cfg(test)]
mod proptests;
pub(crate) mod types;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::Graph;
use force::{ForceModel, initial_positions, relax};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashMap};

/// Places every node of `graph` by force relaxation and normalizes the result
/// onto a canvas whose top-left corner is the origin.
///
/// Connections that name an unknown node are skipped; call
/// [`Graph::validate`] first to reject them instead.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> Layout {
    let nodes: Vec<_> = graph.nodes.values().collect();
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.key.as_str(), idx))
        .collect();
    let radii: Vec<f64> = nodes
        .iter()
        .map(|node| node.radius.unwrap_or(config.node_radius))
        .collect();

    let mut model = ForceModel::new(radii.clone(), config.separation_factor);
    for (src, dst) in graph.internal_connections() {
        match (index.get(src), index.get(dst)) {
            (Some(&a), Some(&b)) => model.connect(a, b),
            _ => log::warn!("skipping connection {src} -> {dst}: unknown node"),
        }
    }
    for key in graph.inputs() {
        if let Some(&idx) = index.get(key) {
            model.mark_input(idx);
        }
    }
    for key in graph.outputs() {
        if let Some(&idx) = index.get(key) {
            model.mark_output(idx);
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut positions = initial_positions(nodes.len(), config.spread_per_node, &mut rng);
    relax(&model, &mut positions, config);
    let (width, height) = bounds::truncate(&mut positions, &radii, config.border);
    log::debug!(
        "laid out {} nodes on a {width:.1}x{height:.1} canvas",
        nodes.len()
    );

    let nodes = nodes
        .into_iter()
        .zip(positions)
        .zip(radii)
        .map(|((node, pos), radius)| {
            let layout = NodeLayout {
                key: node.key.clone(),
                label: node.label.clone(),
                fill: node.fill.clone(),
                radius,
                x: pos.x,
                y: pos.y,
            };
            (node.key.clone(), layout)
        })
        .collect::<BTreeMap<_, _>>();

    Layout {
        nodes,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragSchedule;

    fn distance(layout: &Layout, a: &str, b: &str) -> f64 {
        let (_, d) = layout.nodes[a].center().direction_to(layout.nodes[b].center());
        d
    }

    #[test]
    fn empty_graph_has_empty_canvas() {
        let layout = compute_layout(&Graph::new(), &LayoutConfig::default());
        assert!(layout.nodes.is_empty());
        assert_eq!((layout.width, layout.height), (0.0, 0.0));
    }

    #[test]
    fn single_node_is_centered_on_minimal_canvas() {
        let mut graph = Graph::new();
        graph.ensure_node("solo", None, None, None);
        let layout = compute_layout(&graph, &LayoutConfig::default());
        assert!((layout.width - 90.0).abs() < 1e-9);
        assert!((layout.height - 90.0).abs() < 1e-9);
        let node = &layout.nodes["solo"];
        assert!((node.x - 45.0).abs() < 1e-9);
        assert!((node.y - 45.0).abs() < 1e-9);
    }

    #[test]
    fn input_lands_left_of_output() {
        let mut graph = Graph::new();
        graph.connect("a", "b");
        graph.add_input("a");
        graph.add_output("b");
        let layout = compute_layout(&graph, &LayoutConfig::default());
        assert!(layout.nodes["a"].x < layout.nodes["b"].x);
    }

    #[test]
    fn chain_settles_at_target_separation() {
        let mut graph = Graph::new();
        graph.connect("a", "b");
        graph.connect("b", "c");
        let layout = compute_layout(&graph, &LayoutConfig::default());
        let ab = distance(&layout, "a", "b");
        let bc = distance(&layout, "b", "c");
        let ac = distance(&layout, "a", "c");
        assert!((ab - 84.0).abs() < 1.0, "ab = {ab}");
        assert!((bc - 84.0).abs() < 1.0, "bc = {bc}");
        // a and c repel but never attract; they end up the farthest pair.
        assert!(ac > 83.0, "ac = {ac}");
        assert!(ac + 1.0 >= ab.max(bc), "ac = {ac}");
    }

    #[test]
    fn layout_is_reproducible_for_a_seed() {
        let mut graph = Graph::new();
        graph.connect("x", "y");
        graph.connect("y", "z");
        graph.add_input("x");
        let config = LayoutConfig::default();
        let first = compute_layout(&graph, &config);
        let second = compute_layout(&graph, &config);
        for (key, node) in &first.nodes {
            assert_eq!(node.x, second.nodes[key].x);
            assert_eq!(node.y, second.nodes[key].y);
        }
    }

    #[test]
    fn settle_schedule_keeps_flow_direction() {
        let mut graph = Graph::new();
        graph.connect("a", "b");
        graph.add_input("a");
        graph.add_output("b");
        let config = LayoutConfig {
            schedule: DragSchedule::Settle,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&graph, &config);
        assert!(layout.nodes["a"].x < layout.nodes["b"].x);
        assert!((distance(&layout, "a", "b") - 84.0).abs() < 1.0);
    }

    #[test]
    fn per_node_radius_overrides_default() {
        let mut graph = Graph::new();
        graph.ensure_node("big", None, None, Some(50.0));
        let layout = compute_layout(&graph, &LayoutConfig::default());
        assert_eq!(layout.nodes["big"].radius, 50.0);
        assert!((layout.width - 130.0).abs() < 1e-9);
    }
}
