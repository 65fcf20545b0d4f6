#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, DragSchedule, LayoutConfig, RenderConfig, load_config};
pub use ir::{Connection, Endpoint, Graph, GraphError, Node};
pub use layout::{Layout, NodeLayout, compute_layout};
pub use parser::{ParseError, parse_graph};
pub use render::render_svg;
pub use theme::Theme;

/// Validates, lays out and renders `graph` in one go.
pub fn render_graph(graph: &Graph, config: &Config) -> Result<String, GraphError> {
    graph.validate()?;
    let layout = compute_layout(graph, &config.layout);
    Ok(render_svg(&layout, graph, &config.theme, &config.render))
}

/// Parses `input` (text or JSON encoding) and renders it to SVG.
pub fn render_network(input: &str, config: &Config) -> Result<String, ParseError> {
    let graph = parse_graph(input)?;
    Ok(render_graph(&graph, config)?)
}
