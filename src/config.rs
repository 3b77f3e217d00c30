//! Scene and stream configuration.
//!
//! A [`SceneConfig`] can be loaded from JSON; every field has a default so an
//! empty object `{}` gives the stock scene.
//!
//! ```json
//! {
//!     "n_instances": 4000,
//!     "use_cube": false,
//!     "seed": 42,
//!     "pointer_tracking": true,
//!     "top_colors": ["#ff3030", "#121214"],
//!     "bottom_colors": ["#5050ff", "#121214"],
//!     "background": "#1d2132"
//! }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::stream::Direction;

/// Lowest instance count the count controls will go to.
pub const MIN_INSTANCES: u32 = 500;

/// Instance count at which the stream scale bottoms out, counted above [`MIN_INSTANCES`].
pub const SCALE_FALLOFF_INSTANCES: f32 = 50_000.0;

/// How much of the scale is lost at the falloff point.
pub const SCALE_FALLOFF: f32 = 0.8;

/// Linear RGB color parsed from a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub Vec3);

impl Rgb {
    /// Parse `#rrggbb` (sRGB) into linear RGB.
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| srgb_to_linear(v as f32 / 255.0))
                .map_err(|_| ConfigError::InvalidColor(hex.to_string()))
        };
        Ok(Rgb(Vec3::new(channel(0)?, channel(2)?, channel(4)?)))
    }

    pub fn to_array(self) -> [f32; 3] {
        self.0.to_array()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Stream scale for a given instance count: shrinks from 1.0 to 0.2 as the
/// count climbs from 500 to 50 500.
pub fn derived_scale(n_instances: u32) -> f32 {
    let excess = (n_instances as f32 - MIN_INSTANCES as f32) / SCALE_FALLOFF_INSTANCES;
    1.0 - excess.clamp(0.0, 1.0) * SCALE_FALLOFF
}

/// Whole-scene settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Spheres per stream.
    pub n_instances: u32,
    /// Draw cubes instead of spheres.
    pub use_cube: bool,
    /// Seed for particle generation. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Forward pointer moves to the magnification uniform.
    pub pointer_tracking: bool,
    pub top_colors: [Rgb; 2],
    pub bottom_colors: [Rgb; 2],
    pub background: Rgb,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let hex = |s: &str| Rgb::from_hex(s).unwrap_or(Rgb(Vec3::ZERO));
        Self {
            n_instances: 1000,
            use_cube: false,
            seed: None,
            pointer_tracking: false,
            top_colors: [hex("#ff3030"), hex("#121214")],
            bottom_colors: [hex("#5050ff"), hex("#121214")],
            background: hex("#1d2132"),
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_instances == 0 {
            return Err(ConfigError::ZeroInstances);
        }
        Ok(())
    }

    /// Per-stream config for one direction.
    pub fn stream(&self, direction: Direction) -> StreamConfig {
        let colors = match direction {
            Direction::Forward => self.top_colors,
            Direction::Backward => self.bottom_colors,
        };
        StreamConfig {
            n_instances: self.n_instances,
            scale_factor: derived_scale(self.n_instances),
            colors,
            direction,
        }
    }
}

/// Static settings a [`crate::ParticleStream`] is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub n_instances: u32,
    pub scale_factor: f32,
    pub colors: [Rgb; 2],
    pub direction: Direction,
}

impl StreamConfig {
    pub fn new(n_instances: u32, direction: Direction) -> Self {
        let white = Rgb(Vec3::ONE);
        Self {
            n_instances,
            scale_factor: 1.0,
            colors: [white, white],
            direction,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_colors(mut self, colors: [Rgb; 2]) -> Self {
        self.colors = colors;
        self
    }

    /// Reject counts and scales the stream cannot render.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_instances == 0 {
            return Err(ConfigError::ZeroInstances);
        }
        if !(self.scale_factor > 0.0 && self.scale_factor <= 1.0) {
            return Err(ConfigError::ScaleOutOfRange(self.scale_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_scale() {
        assert_eq!(derived_scale(500), 1.0);
        assert_eq!(derived_scale(2), 1.0);
        assert!((derived_scale(25_500) - 0.6).abs() < 1e-6);
        assert!((derived_scale(50_500) - 0.2).abs() < 1e-6);
        assert!((derived_scale(200_000) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_hex_parsing() {
        let white = Rgb::from_hex("#ffffff").expect("white should parse");
        assert!((white.0 - Vec3::ONE).length() < 1e-5);
        assert_eq!(Rgb::from_hex("#000000").map(|c| c.0).ok(), Some(Vec3::ZERO));
        let no_hash = Rgb::from_hex("808080").expect("hash is optional");
        assert!((no_hash.0.x - 0.2158605).abs() < 1e-4);
        assert!(matches!(Rgb::from_hex("#fff"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#gg0000"), Err(ConfigError::InvalidColor(_))));
        // `from_str_radix` alone would take a leading sign.
        assert!(matches!(Rgb::from_hex("#+f+f+f"), Err(ConfigError::InvalidColor(_))));
        assert!(matches!(Rgb::from_hex("#-1ffff"), Err(ConfigError::InvalidColor(_))));
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = SceneConfig::from_json("{}").expect("empty config should parse");
        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.n_instances, 1000);
        assert!(!config.pointer_tracking);
    }

    #[test]
    fn test_json_overrides() {
        let config = SceneConfig::from_json(
            r##"{ "n_instances": 3000, "use_cube": true, "seed": 5, "top_colors": ["#ffffff", "#000000"] }"##,
        )
        .expect("config should parse");
        assert_eq!(config.n_instances, 3000);
        assert!(config.use_cube);
        assert_eq!(config.seed, Some(5));
        assert!((config.top_colors[0].0 - Vec3::ONE).length() < 1e-5);
    }

    #[test]
    fn test_json_rejects_bad_values() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "n_instances": 0 }"#),
            Err(ConfigError::ZeroInstances)
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "n_instances": -5 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "background": "blue" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_stream_config_validation() {
        assert!(StreamConfig::new(1, Direction::Forward).validate().is_ok());
        assert!(matches!(
            StreamConfig::new(0, Direction::Forward).validate(),
            Err(ConfigError::ZeroInstances)
        ));
        for bad in [0.0, -0.5, 1.5, f32::NAN] {
            assert!(matches!(
                StreamConfig::new(10, Direction::Backward).with_scale_factor(bad).validate(),
                Err(ConfigError::ScaleOutOfRange(_))
            ));
        }
    }

    #[test]
    fn test_scene_to_stream_config() {
        let scene = SceneConfig {
            n_instances: 25_500,
            ..SceneConfig::default()
        };
        let top = scene.stream(Direction::Forward);
        let bottom = scene.stream(Direction::Backward);
        assert_eq!(top.colors, scene.top_colors);
        assert_eq!(bottom.colors, scene.bottom_colors);
        assert!((top.scale_factor - 0.6).abs() < 1e-6);
        assert!(top.validate().is_ok());
    }
}
