use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the left-to-right drag on boundary nodes is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragSchedule {
    /// One block of iterations with `constant_drag` applied throughout.
    Constant,
    /// A block with `settle_drag`, then a block of pure relaxation.
    Settle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_radius: f64,
    /// Target separation is this factor times the sum of both radii.
    pub separation_factor: f64,
    pub rate: f64,
    pub iterations_per_node: usize,
    /// Initial positions are spread over a square of this size per node.
    pub spread_per_node: f64,
    pub schedule: DragSchedule,
    pub constant_drag: f64,
    pub settle_drag: f64,
    pub border: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_radius: 30.0,
            separation_factor: 1.4,
            rate: 0.1,
            iterations_per_node: 100,
            spread_per_node: 100.0,
            schedule: DragSchedule::Constant,
            constant_drag: 20.0,
            settle_drag: 100.0,
            border: 15.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Edge lines stop this factor times the radius away from a node center.
    pub line_trim_factor: f64,
    pub stub_length: f64,
    pub label_fit_factor: f64,
    pub label_max_factor: f64,
    pub label_baseline_shift: f64,
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_trim_factor: 1.1,
            stub_length: 10.0,
            label_fit_factor: 3.2,
            label_max_factor: 0.5,
            label_baseline_shift: 0.3,
            png_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    node_fill: Option<String>,
    node_text_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f64>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    node_radius: Option<f64>,
    separation_factor: Option<f64>,
    rate: Option<f64>,
    iterations_per_node: Option<usize>,
    spread_per_node: Option<f64>,
    schedule: Option<DragSchedule>,
    constant_drag: Option<f64>,
    settle_drag: Option<f64>,
    border: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    line_trim_factor: Option<f64>,
    stub_length: Option<f64>,
    label_fit_factor: Option<f64>,
    label_max_factor: Option<f64>,
    label_baseline_shift: Option<f64>,
    png_scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Layers a JSON5 (or plain JSON) document over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme `{theme_name}`"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_text_color {
            config.theme.node_text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = Some(v);
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.node_radius {
            target.node_radius = v;
        }
        if let Some(v) = layout.separation_factor {
            target.separation_factor = v;
        }
        if let Some(v) = layout.rate {
            target.rate = v;
        }
        if let Some(v) = layout.iterations_per_node {
            target.iterations_per_node = v;
        }
        if let Some(v) = layout.spread_per_node {
            target.spread_per_node = v;
        }
        if let Some(v) = layout.schedule {
            target.schedule = v;
        }
        if let Some(v) = layout.constant_drag {
            target.constant_drag = v;
        }
        if let Some(v) = layout.settle_drag {
            target.settle_drag = v;
        }
        if let Some(v) = layout.border {
            target.border = v;
        }
        if let Some(v) = layout.seed {
            target.seed = v;
        }
    }

    if let Some(render) = parsed.render {
        let target = &mut config.render;
        if let Some(v) = render.line_trim_factor {
            target.line_trim_factor = v;
        }
        if let Some(v) = render.stub_length {
            target.stub_length = v;
        }
        if let Some(v) = render.label_fit_factor {
            target.label_fit_factor = v;
        }
        if let Some(v) = render.label_max_factor {
            target.label_max_factor = v;
        }
        if let Some(v) = render.label_baseline_shift {
            target.label_baseline_shift = v;
        }
        if let Some(v) = render.png_scale {
            target.png_scale = v;
        }
    }

    Ok(config)
}
