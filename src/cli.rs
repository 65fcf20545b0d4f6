use crate::config::{Config, DragSchedule, load_config};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_graph;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "netdiag", version, about = "Force-directed diagrams of dataflow networks")]
pub struct Args {
    /// Input file (.net text or .json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for the initial node placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Drag schedule (overrides the config file)
    #[arg(long, value_enum)]
    pub schedule: Option<ScheduleArg>,

    /// PNG scale factor
    #[arg(short = 's', long = "scale")]
    pub scale: Option<f32>,

    /// Also write the computed layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Log layout progress to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ScheduleArg {
    Constant,
    Settle,
}

impl From<ScheduleArg> for DragSchedule {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::Constant => DragSchedule::Constant,
            ScheduleArg::Settle => DragSchedule::Settle,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let input = read_input(args.input.as_deref())?;
    let graph = parse_graph(&input).context("failed to parse network")?;
    graph.validate()?;

    let layout = compute_layout(&graph, &config.layout);
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout, &graph)
            .with_context(|| format!("failed to write layout dump {}", path.display()))?;
    }

    let svg = render_svg(&layout, &graph, &config.theme, &config.render);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if let Some(seed) = args.seed {
        config.layout.seed = seed;
    }
    if let Some(schedule) = args.schedule {
        config.layout.schedule = schedule.into();
    }
    if let Some(scale) = args.scale {
        config.render.png_scale = scale;
    }
    config
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "netdiag",
            "--seed",
            "9",
            "--schedule",
            "settle",
            "-s",
            "2",
        ]);
        let config = apply_overrides(Config::default(), &args);
        assert_eq!(config.layout.seed, 9);
        assert_eq!(config.layout.schedule, DragSchedule::Settle);
        assert_eq!(config.render.png_scale, 2.0);
    }

    #[test]
    fn png_needs_an_output_path() {
        assert!(ensure_output(&None, "png").is_err());
        let path = PathBuf::from("out.png");
        assert_eq!(ensure_output(&Some(path.clone()), "png").unwrap(), path);
    }
}
