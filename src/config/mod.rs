use std::path::{Path, PathBuf};

use crate::crop::{AspectRatio, DEFAULT_CROP_FILL};
use crate::geometry::Size;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "crop-positioner";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_MAX_EDITOR_WIDTH: f64 = 800.0;
const DEFAULT_VIEWPORT_HEIGHT_FACTOR: f64 = 0.7;
const DEFAULT_NUDGE_STEP: f64 = 1.0;
const DEFAULT_NUDGE_STEP_LARGE: f64 = 10.0;

/// Editor settings from `config.json`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PositionerConfig {
    pub max_editor_width: f64,
    pub viewport_height_factor: f64,
    pub crop_fill_factor: f64,
    pub default_aspect: AspectRatio,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    pub asset_root: Option<PathBuf>,
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            max_editor_width: DEFAULT_MAX_EDITOR_WIDTH,
            viewport_height_factor: DEFAULT_VIEWPORT_HEIGHT_FACTOR,
            crop_fill_factor: DEFAULT_CROP_FILL,
            default_aspect: AspectRatio::default(),
            nudge_step: DEFAULT_NUDGE_STEP,
            nudge_step_large: DEFAULT_NUDGE_STEP_LARGE,
            asset_root: None,
        }
    }
}

fn positive_or(value: f64, fallback: f64, key: &str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(key, value, fallback, "config value must be positive; using default");
        fallback
    }
}

fn fraction_or(value: f64, fallback: f64, key: &str) -> f64 {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        value
    } else {
        tracing::warn!(key, value, fallback, "config value must be in (0, 1]; using default");
        fallback
    }
}

impl PositionerConfig {
    /// Replaces out-of-range values with their defaults.
    pub fn validated(self) -> Self {
        let nudge_step = positive_or(self.nudge_step, DEFAULT_NUDGE_STEP, "nudge_step");
        let mut nudge_step_large = positive_or(
            self.nudge_step_large,
            DEFAULT_NUDGE_STEP_LARGE,
            "nudge_step_large",
        );
        if nudge_step_large < nudge_step {
            let fallback = nudge_step.max(DEFAULT_NUDGE_STEP_LARGE);
            tracing::warn!(
                nudge_step,
                nudge_step_large,
                fallback,
                "nudge_step_large is smaller than nudge_step; using default"
            );
            nudge_step_large = fallback;
        }

        Self {
            max_editor_width: positive_or(
                self.max_editor_width,
                DEFAULT_MAX_EDITOR_WIDTH,
                "max_editor_width",
            ),
            viewport_height_factor: fraction_or(
                self.viewport_height_factor,
                DEFAULT_VIEWPORT_HEIGHT_FACTOR,
                "viewport_height_factor",
            ),
            crop_fill_factor: fraction_or(
                self.crop_fill_factor,
                DEFAULT_CROP_FILL,
                "crop_fill_factor",
            ),
            nudge_step,
            nudge_step_large,
            ..self
        }
    }

    /// Editor bounds for a measured container: width capped at
    /// `max_editor_width`, height a share of the available viewport.
    /// Degenerate measurements pass through unchanged.
    pub fn container_bounds(&self, measured: Size) -> Size {
        if !measured.is_drawable() {
            return measured;
        }
        Size::new(
            measured.width.min(self.max_editor_width),
            measured.height * self.viewport_height_factor,
        )
    }

    pub const fn nudge_step(&self, large: bool) -> f64 {
        if large {
            self.nudge_step_large
        } else {
            self.nudge_step
        }
    }
}

pub fn load_positioner_config() -> PositionerConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_positioner_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_positioner_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> PositionerConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return PositionerConfig::default(),
    };
    if !path.exists() {
        return PositionerConfig::default();
    }
    load_positioner_config_from(&path)
}

pub fn load_positioner_config_from(path: &Path) -> PositionerConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str::<PositionerConfig>(&contents)
            .map(PositionerConfig::validated)
            .unwrap_or_else(|err| {
                tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
                PositionerConfig::default()
            }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            PositionerConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
