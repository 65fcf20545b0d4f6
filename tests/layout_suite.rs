use std::path::Path;

use netdiag::{Config, Graph, Layout, LayoutConfig, compute_layout, parse_graph, render_svg};

fn fixture(name: &str) -> Graph {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_graph(&input).expect("parse failed")
}

fn render_fixture(name: &str) -> (Graph, Layout, String) {
    let graph = fixture(name);
    let config = Config::default();
    let layout = compute_layout(&graph, &config.layout);
    let svg = render_svg(&layout, &graph, &config.theme, &config.render);
    (graph, layout, svg)
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert_eq!(svg.matches("<marker").count(), 1, "{fixture}: marker count");
}

fn assert_touches_origin(layout: &Layout, border: f64, fixture: &str) {
    let min_x = layout
        .nodes
        .values()
        .map(|n| n.x - n.radius - border)
        .fold(f64::MAX, f64::min);
    let min_y = layout
        .nodes
        .values()
        .map(|n| n.y - n.radius - border)
        .fold(f64::MAX, f64::min);
    assert!(min_x.abs() < 1e-6, "{fixture}: min x {min_x}");
    assert!(min_y.abs() < 1e-6, "{fixture}: min y {min_y}");
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "single.net",
        "pipeline.net",
        "chain.net",
        "fanout.net",
        "mlp.json",
    ];

    let border = LayoutConfig::default().border;
    for name in candidates {
        let (graph, layout, svg) = render_fixture(name);
        assert_valid_svg(&svg, name);
        assert_touches_origin(&layout, border, name);
        assert_eq!(
            svg.matches("<circle").count(),
            graph.nodes.len(),
            "{name}: one circle per node"
        );
        let expected_lines =
            graph.internal_connections().count() + graph.inputs().len() + graph.outputs().len();
        assert_eq!(svg.matches("<line").count(), expected_lines, "{name}: line count");
    }
}

#[test]
fn single_node_fills_minimal_canvas() {
    let (_, layout, svg) = render_fixture("single.net");
    assert!((layout.width - 90.0).abs() < 1e-9);
    assert!((layout.height - 90.0).abs() < 1e-9);
    assert!(svg.contains("width=\"90\"") || svg.contains("width=\"89\""));
    let node = &layout.nodes["solo"];
    assert!((node.x - 45.0).abs() < 1e-9);
    assert!((node.y - 45.0).abs() < 1e-9);
}

#[test]
fn pipeline_flows_left_to_right() {
    let (_, layout, svg) = render_fixture("pipeline.net");
    assert!(layout.nodes["a"].x < layout.nodes["b"].x);
    assert_eq!(svg.matches("<line").count(), 3);
}

#[test]
fn chain_has_two_edges_and_no_stubs() {
    let (graph, layout, svg) = render_fixture("chain.net");
    assert!(graph.inputs().is_empty() && graph.outputs().is_empty());
    assert_eq!(svg.matches("<line").count(), 2);
    let b = layout.nodes["b"].center();
    let (_, ab) = b.direction_to(layout.nodes["a"].center());
    let (_, cb) = b.direction_to(layout.nodes["c"].center());
    assert!((ab - cb).abs() < 1.0, "ab = {ab}, cb = {cb}");
}

#[test]
fn mlp_inputs_sit_left_of_outputs() {
    let (graph, layout, _) = render_fixture("mlp.json");
    assert_eq!(graph.inputs().into_iter().collect::<Vec<_>>(), vec!["0"]);
    assert_eq!(graph.outputs().into_iter().collect::<Vec<_>>(), vec!["4"]);
    assert!(layout.nodes["0"].x < layout.nodes["4"].x);
    assert_eq!(layout.nodes["4"].radius, 34.0);
}

#[test]
fn rendering_twice_is_byte_identical() {
    let (graph, layout, first) = render_fixture("fanout.net");
    let config = Config::default();
    let second = render_svg(&layout, &graph, &config.theme, &config.render);
    assert_eq!(first, second);
}

#[test]
fn canvas_matches_declared_dimensions() {
    let (_, layout, svg) = render_fixture("fanout.net");
    let width = layout.width as u32;
    let height = layout.height as u32;
    assert!(svg.contains(&format!("width=\"{width}\" height=\"{height}\"")));
    assert!(svg.contains(&format!("viewBox=\"0 0 {width} {height}\"")));
}

#[test]
fn render_network_rejects_dangling_json_paths() {
    let input = r#"{"nodes": [{"key": 0}], "paths": [{"src": 0, "dst": 7}]}"#;
    assert!(netdiag::render_network(input, &Config::default()).is_err());
}
