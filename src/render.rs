use crate::config::RenderConfig;
use crate::ir::Graph;
use crate::layout::{Layout, NodeLayout, Point};
use crate::theme::Theme;
use anyhow::{Context, Result};
use std::path::Path;

/// Serializes a finished layout as a standalone SVG document.
///
/// The output depends only on the arguments, so rendering the same layout
/// twice yields identical bytes.
pub fn render_svg(layout: &Layout, graph: &Graph, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    // Canvas dimensions are truncated, never rounded up.
    let width = layout.width as u32;
    let height = layout.height as u32;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" markerWidth=\"6\" markerHeight=\"6\" viewBox=\"-3 -3 6 6\" refX=\"2\" refY=\"0\" markerUnits=\"strokeWidth\" orient=\"auto\"><polygon points=\"-1,0 -3,3 3,0 -3,-3\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    if let Some(background) = &theme.background {
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{background}\"/>"
        ));
    }

    for node in layout.nodes.values() {
        svg.push_str(&node_svg(node, theme, config));
    }

    for (src, dst) in graph.internal_connections() {
        if src == dst {
            continue;
        }
        let (Some(src), Some(dst)) = (layout.nodes.get(src), layout.nodes.get(dst)) else {
            continue;
        };
        let (dir, _) = src.center().direction_to(dst.center());
        let start = src.center() + dir * (src.radius * config.line_trim_factor);
        let end = dst.center() - dir * (dst.radius * config.line_trim_factor);
        svg.push_str(&line_svg(start, end, theme));
    }

    for key in graph.inputs() {
        let Some(node) = layout.nodes.get(key) else {
            continue;
        };
        let start = Point::new(node.x - node.radius - config.stub_length, node.y);
        let end = Point::new(node.x - node.radius * config.line_trim_factor, node.y);
        svg.push_str(&line_svg(start, end, theme));
    }
    for key in graph.outputs() {
        let Some(node) = layout.nodes.get(key) else {
            continue;
        };
        let start = Point::new(node.x + node.radius * config.line_trim_factor, node.y);
        let end = Point::new(node.x + node.radius + config.stub_length, node.y);
        svg.push_str(&line_svg(start, end, theme));
    }

    svg.push_str("</svg>");
    svg
}

/// Font size that fits `label` inside a circle of `radius`.
pub fn label_font_size(label: &str, radius: f64, config: &RenderConfig) -> f64 {
    let cap = config.label_max_factor * radius;
    let chars = label.chars().count();
    if chars == 0 {
        return cap;
    }
    (config.label_fit_factor * radius / chars as f64).min(cap)
}

fn node_svg(node: &NodeLayout, theme: &Theme, config: &RenderConfig) -> String {
    let fill = node.fill.as_deref().unwrap_or(&theme.node_fill);
    let size = label_font_size(&node.label, node.radius, config);
    let text_y = node.y + config.label_baseline_shift * size;
    format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/><text fill=\"{}\" font-size=\"{size:.2}\" text-anchor=\"middle\" font-family=\"{}\" x=\"{:.2}\" y=\"{text_y:.2}\">{}</text>",
        node.x,
        node.y,
        node.radius,
        escape_xml(fill),
        theme.node_text_color,
        escape_xml(&theme.font_family),
        node.x,
        escape_xml(&node.label)
    )
}

fn line_svg(start: Point, end: Point, theme: &Theme) -> String {
    format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow)\"/>",
        start.x, start.y, end.x, end.y, theme.line_color, theme.line_width
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme.font_family.clone();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let scale = render_cfg.png_scale.max(0.01);
    let width = (size.width() as f32 * scale).ceil() as u32;
    let height = (size.height() as f32 * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate {width}x{height} pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
