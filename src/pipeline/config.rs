//! Terrain generation configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::DEFAULT_WALL_DEPTH;
use crate::noise::{NoiseKind, OctaveConfig};
use crate::terrain::{SphereProjection, TerrainShape, Theme, ThemeBand, ThemeError, ThemePreset};

/// Deepest subdivision accepted; a sphere at this depth already has ~50M leaves.
pub const MAX_DEPTH: u32 = 12;

/// Errors raised before any geometry is built.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Polygon needs at least 3 segments, got {0}")]
    TooFewSegments(u32),
    #[error("Subdivision depth must be between 1 and 12, got {0}")]
    InvalidDepth(u32),
    #[error("At least one noise octave is required")]
    NoOctaves,
    #[error("'{0}' must be positive, got {1}")]
    NonPositive(&'static str, f32),
    #[error("'{0}' must be finite, got {1}")]
    NonFinite(&'static str, f32),
    #[error("Theme '{theme}' is not available on {shape} terrain")]
    UnsupportedTheme {
        theme: &'static str,
        shape: TerrainShape,
    },
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one terrain generation run depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub shape: TerrainShape,
    /// Edge count of the flat base polygon.
    pub segs_c: u32,
    /// Radius of the flat base polygon; also the island mask radius.
    pub radius: f32,
    /// Half-extent of the cube the sphere is cut from.
    pub terrain_scale: f32,
    /// Subdivision depth; 1 keeps the coarse base triangles.
    pub max_depth: u32,
    pub noise: NoiseKind,
    pub octaves: OctaveConfig,
    pub theme: ThemePreset,
    /// Band table replacing the preset's colours; the preset's height policy is kept.
    pub theme_bands: Option<Vec<ThemeBand>>,
    /// Drop of each wall below its roof.
    pub wall_depth: f32,
    pub sphere_projection: SphereProjection,
    /// Seeds the noise source and the per-run noise offsets.
    pub seed: u64,
    /// Slice coarse triangles on the rayon pool.
    pub parallel: bool,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::flat()
    }
}

impl TerrainConfig {
    /// Five-sided polygon of radius 3 at depth 6.
    pub fn flat() -> Self {
        Self {
            shape: TerrainShape::Flat,
            segs_c: 5,
            radius: 3.0,
            terrain_scale: 1.0,
            max_depth: 6,
            noise: NoiseKind::Simplex,
            octaves: OctaveConfig::with_noise_scale(8.0),
            theme: ThemePreset::Mountain,
            theme_bands: None,
            wall_depth: DEFAULT_WALL_DEPTH,
            sphere_projection: SphereProjection::Normalize,
            seed: 0,
            parallel: true,
        }
    }

    /// Unit sphere at depth 5.
    pub fn sphere() -> Self {
        Self {
            shape: TerrainShape::Sphere,
            max_depth: 5,
            octaves: OctaveConfig::with_noise_scale(15.0),
            ..Self::flat()
        }
    }

    pub fn for_shape(shape: TerrainShape) -> Self {
        match shape {
            TerrainShape::Flat => Self::flat(),
            TerrainShape::Sphere => Self::sphere(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects configurations no mesh can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth < 1 || self.max_depth > MAX_DEPTH {
            return Err(ConfigError::InvalidDepth(self.max_depth));
        }
        if self.shape == TerrainShape::Flat && self.segs_c < 3 {
            return Err(ConfigError::TooFewSegments(self.segs_c));
        }
        if self.octaves.octaves == 0 {
            return Err(ConfigError::NoOctaves);
        }

        for (name, value) in [
            ("radius", self.radius),
            ("terrain_scale", self.terrain_scale),
            ("noise_scale", self.octaves.noise_scale),
            ("wall_depth", self.wall_depth),
        ] {
            check_finite(name, value)?;
            if value <= 0.0 {
                return Err(ConfigError::NonPositive(name, value));
            }
        }
        for (name, value) in [
            ("amplitude", self.octaves.amplitude),
            ("frequency", self.octaves.frequency),
            ("persistence", self.octaves.persistence),
            ("lacunarity", self.octaves.lacunarity),
        ] {
            check_finite(name, value)?;
        }

        if !self.theme.supports(self.shape) {
            return Err(ConfigError::UnsupportedTheme {
                theme: self.theme.name(),
                shape: self.shape,
            });
        }
        self.resolve_theme()?;
        Ok(())
    }

    /// The colour theme this run slices with.
    pub fn resolve_theme(&self) -> Result<Theme, ConfigError> {
        let preset = self.theme.theme(self.shape);
        match &self.theme_bands {
            None => Ok(preset),
            Some(bands) => Ok(Theme::new(
                format!("{}-custom", preset.name()),
                bands.clone(),
                preset.height_policy(),
            )?),
        }
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite(name, value))
    }
}
