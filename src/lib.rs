pub mod config;
pub mod crop;
pub mod error;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod logging;
pub mod media;
pub mod positioner;
pub mod state;
pub use error::{AppError, AppResult};

use config::PositionerConfig;
use crop::AspectRatio;
use geometry::{FocalPoint, Point, Size};
use input::{DragUpdate, PointerEvent};
use loader::FileImageLoader;
use positioner::{CropPositioner, FixedContainer};

/// One scripted editing pass: open `source`, replay `drags`, confirm.
#[derive(Debug, Clone)]
pub struct PositionRequest {
    pub source: String,
    pub aspect: AspectRatio,
    pub initial_focal: Option<FocalPoint>,
    /// Container size reported to the editor.
    pub container: Size,
    /// Each drag grabs the rect at its center and moves it by `(dx, dy)`.
    pub drags: Vec<(f64, f64)>,
}

/// Entrypoint used by the CLI: runs a full session against the local
/// filesystem and returns the confirmed focal point.
pub fn run(config: PositionerConfig, request: &PositionRequest) -> AppResult<FocalPoint> {
    tracing::info!(source = %request.source, aspect = %request.aspect, "positioning image");

    let loader = match &config.asset_root {
        Some(root) => FileImageLoader::with_asset_root(root),
        None => FileImageLoader::new(),
    };
    let mut positioner = CropPositioner::new(config, FixedContainer(request.container));
    positioner.open_with_focal(request.source.clone(), request.aspect, request.initial_focal)?;
    positioner.load_with(&loader)?;

    for &(dx, dy) in &request.drags {
        replay_drag(&mut positioner, dx, dy);
    }

    Ok(positioner.confirm()?)
}

fn replay_drag(positioner: &mut CropPositioner<FixedContainer>, dx: f64, dy: f64) {
    let Some(grab) = positioner.overlay().map(|overlay| overlay.crop.center()) else {
        return;
    };
    let release = Point::new(grab.x + dx, grab.y + dy);
    let updates = [
        positioner.on_pointer(PointerEvent::Down(grab)),
        positioner.on_pointer(PointerEvent::Move(release)),
        positioner.on_pointer(PointerEvent::Up(release)),
    ];
    tracing::debug!(?updates, "replayed drag");
    if let [_, DragUpdate::Moved(landed), _] = updates {
        tracing::info!(x = landed.x, y = landed.y, "crop rect dragged");
    }
}
