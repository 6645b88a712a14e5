use serde::{Deserialize, Deserializer};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::czml::{Palette, Rgba};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("time step must be a whole number of seconds between 1s and {max}s, got {0:?}", max = u32::MAX)]
    InvalidTimeStep(Duration),
    #[error("invalid palette: {0}")]
    InvalidPalette(String),
}

const SATELLITE_IMAGE_URI: &str = concat!(
    "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAABAAAAAQCAYAAAAf8/9hAAAAAXNS",
    "R0IArs4c6QAAAARnQU1BAACxjwv8YQUAAAAJcEhZcwAADsMAAA7DAcdvqGQAAADJSURBVDhPnZ",
    "HRDcMgEEMZjVEYpaNklIzSEfLfD4qNnXAJSFWfhO7w2Zc0Tf9QG2rXrEzSUeZLOGm47WoH95x3",
    "Hl3jEgilvDgsOQUTqsNl68ezEwn1vae6lceSEEYvvWNT/Rxc4CXQNGadho1NXoJ+9iaqc2xi2x",
    "bt23PJCDIB6TQjOC6Bho/sDy3fBQT8PrVhibU7yBFcEPaRxOoeTwbwByCOYf9VGp1BYI1BA+Ee",
    "HhmfzKbBoJEQwn1yzUZtyspIQUha85MpkNIXB7GizqDEECsAAAAASUVORK5CYII="
);

/// Styling and sampling settings for scene assembly.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_billboard_scale")]
    pub billboard_scale: f64,
    #[serde(default = "default_label_font")]
    pub label_font: String,
    #[serde(default = "default_satellite_image_uri")]
    pub satellite_image_uri: String,
    /// Clock multiplier of the document packet.
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,
    #[serde(default = "default_description_template")]
    pub description_template: String,
    #[serde(
        default = "default_time_step",
        deserialize_with = "deserialize_duration"
    )]
    pub time_step: Duration,
    /// Extra position samples past the window end.
    #[serde(default = "default_sample_margin")]
    pub sample_margin: usize,
    #[serde(
        default = "default_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub default_duration: Duration,
    #[serde(default = "default_rgba")]
    pub default_rgba: Rgba,
    /// Give each satellite the next palette colour instead of `default_rgba`.
    #[serde(default = "default_cycle_colors")]
    pub cycle_colors: bool,
    #[serde(default)]
    pub palette: Option<Vec<[u8; 3]>>,
    /// File of `r g b` lines, used when `palette` is not set.
    #[serde(default)]
    pub palette_file: Option<PathBuf>,
    #[serde(default = "default_path_width")]
    pub path_width: f64,
    #[serde(default = "default_path_resolution")]
    pub path_resolution: u32,
    #[serde(default = "default_interpolation_degree")]
    pub interpolation_degree: u32,
}

fn default_billboard_scale() -> f64 {
    1.5
}

fn default_label_font() -> String {
    "11pt Lucida Console".to_string()
}

fn default_satellite_image_uri() -> String {
    SATELLITE_IMAGE_URI.to_string()
}

fn default_multiplier() -> u32 {
    60
}

fn default_description_template() -> String {
    "Orbit of Satellite: ".to_string()
}

fn default_time_step() -> Duration {
    Duration::from_secs(300)
}

fn default_sample_margin() -> usize {
    5
}

fn default_duration() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_rgba() -> Rgba {
    Rgba([213, 255, 0, 255])
}

fn default_cycle_colors() -> bool {
    true
}

fn default_path_width() -> f64 {
    1.0
}

fn default_path_resolution() -> u32 {
    120
}

fn default_interpolation_degree() -> u32 {
    5
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            billboard_scale: default_billboard_scale(),
            label_font: default_label_font(),
            satellite_image_uri: default_satellite_image_uri(),
            multiplier: default_multiplier(),
            description_template: default_description_template(),
            time_step: default_time_step(),
            sample_margin: default_sample_margin(),
            default_duration: default_duration(),
            default_rgba: default_rgba(),
            cycle_colors: default_cycle_colors(),
            palette: None,
            palette_file: None,
            path_width: default_path_width(),
            path_resolution: default_path_resolution(),
            interpolation_degree: default_interpolation_degree(),
        }
    }
}

impl SceneConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.step_seconds()?;
        Ok(config)
    }

    /// Sampling cadence in whole seconds.
    pub fn step_seconds(&self) -> Result<NonZeroU32, ConfigError> {
        let invalid = || ConfigError::InvalidTimeStep(self.time_step);
        if self.time_step.subsec_nanos() != 0 {
            return Err(invalid());
        }
        u32::try_from(self.time_step.as_secs())
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(invalid)
    }

    /// Colours handed out to satellites in file order.
    pub fn resolve_palette(&self) -> Result<Palette, ConfigError> {
        if !self.cycle_colors {
            return Ok(Palette::single(self.default_rgba));
        }
        if let Some(colors) = &self.palette {
            let colors = colors.iter().map(|[r, g, b]| Rgba::opaque(*r, *g, *b)).collect();
            return Palette::new(colors)
                .ok_or_else(|| ConfigError::InvalidPalette("palette is empty".into()));
        }
        if let Some(path) = &self.palette_file {
            let text = std::fs::read_to_string(path)?;
            return Palette::from_rgb_lines(&text).map_err(ConfigError::InvalidPalette);
        }
        Ok(Palette::default())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}
