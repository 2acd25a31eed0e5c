use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crop_positioner::config::{load_positioner_config, load_positioner_config_from};
use crop_positioner::crop::AspectRatio;
use crop_positioner::geometry::{FocalPoint, Size};
use crop_positioner::{logging, PositionRequest};

/// Pick a focal point for an image by positioning a fixed-ratio crop frame.
#[derive(Debug, Parser)]
#[command(name = "crop-positioner", version)]
struct Cli {
    /// Image path, `file://` URL, or site path resolved against `asset_root`.
    image: String,

    /// Target aspect ratio: a preset such as `16/9`, `21/9`, `4/3`, or a number.
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Previously saved focal point to start from, as `x,y` percentages.
    #[arg(long, value_parser = parse_pair)]
    focal: Option<(f64, f64)>,

    /// Drag the crop frame by `dx,dy` display pixels. Repeatable.
    #[arg(long = "drag", value_parser = parse_pair, allow_hyphen_values = true)]
    drags: Vec<(f64, f64)>,

    /// Width of the editor container.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Height of the available viewport.
    #[arg(long, default_value_t = 900.0)]
    height: f64,

    /// Read settings from this file instead of the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_pair(input: &str) -> Result<(f64, f64), String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{input}`"))?;
    let x = x.trim().parse::<f64>().map_err(|err| err.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|err| err.to_string())?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_positioner_config_from(path),
        None => load_positioner_config(),
    };
    let request = PositionRequest {
        source: cli.image.clone(),
        aspect: cli.aspect.unwrap_or(config.default_aspect),
        initial_focal: cli.focal.map(|(x, y)| FocalPoint::new(x, y)),
        container: Size::new(cli.width, cli.height),
        drags: cli.drags,
    };

    let focal = crop_positioner::run(config, &request)
        .with_context(|| format!("could not position {}", request.source))?;
    println!("{}", serde_json::to_string(&focal)?);
    Ok(())
}
