//! Fractal octave summation turning vertex coordinates into terrain heights.

use std::fmt::Debug;
use std::ops::{Add, Mul};

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::source::ScalarNoise;

/// Range of the integer per-octave offsets drawn for each run.
pub const OCTAVE_OFFSET_RANGE: i32 = 1000;
/// Upper bound of the per-run time offset.
pub const TIME_OFFSET_MAX: f32 = 1000.0;

/// Configuration for multi-octave height synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctaveConfig {
    /// Number of noise octaves summed per vertex.
    pub octaves: u32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// Coordinate multiplier of the first octave.
    pub frequency: f32,
    /// Amplitude decay per octave.
    pub persistence: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Scale applied to the final sample coordinates. Smaller values give sparser noise.
    pub noise_scale: f32,
}

impl Default for OctaveConfig {
    fn default() -> Self {
        Self {
            octaves: 3,
            amplitude: 1.0,
            frequency: 0.055,
            persistence: 0.375,
            lacunarity: 2.52,
            noise_scale: 8.0,
        }
    }
}

impl OctaveConfig {
    /// Default octave settings with a given noise scale.
    pub fn with_noise_scale(noise_scale: f32) -> Self {
        Self {
            noise_scale,
            ..Default::default()
        }
    }
}

/// Coordinates the synthesizer can sample: 2D for flat terrain, 3D for spheres.
pub trait NoisePoint:
    Copy + Debug + Send + Sync + Add<Output = Self> + Mul<f32, Output = Self>
{
    fn splat(v: f32) -> Self;

    fn sample(self, noise: &dyn ScalarNoise) -> f32;

    /// Integer-valued offset with every component in `[-range, range]`.
    fn random_offset<R: Rng>(rng: &mut R, range: i32) -> Self;
}

impl NoisePoint for Vec2 {
    fn splat(v: f32) -> Self {
        Vec2::splat(v)
    }

    fn sample(self, noise: &dyn ScalarNoise) -> f32 {
        noise.noise_2d(self.x, self.y)
    }

    fn random_offset<R: Rng>(rng: &mut R, range: i32) -> Self {
        Vec2::new(
            rng.random_range(-range..=range) as f32,
            rng.random_range(-range..=range) as f32,
        )
    }
}

impl NoisePoint for Vec3 {
    fn splat(v: f32) -> Self {
        Vec3::splat(v)
    }

    fn sample(self, noise: &dyn ScalarNoise) -> f32 {
        noise.noise_3d(self.x, self.y, self.z)
    }

    fn random_offset<R: Rng>(rng: &mut R, range: i32) -> Self {
        Vec3::new(
            rng.random_range(-range..=range) as f32,
            rng.random_range(-range..=range) as f32,
            rng.random_range(-range..=range) as f32,
        )
    }
}

/// Random state drawn once per run and shared by every vertex of the mesh,
/// so neighbouring triangles sample one continuous field.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseField<C> {
    pub time_offset: f32,
    pub offsets: Vec<C>,
}

impl<C: NoisePoint> NoiseField<C> {
    /// Draws a time offset in `[0, 1000)` and one offset per octave.
    pub fn random<R: Rng>(octaves: u32, rng: &mut R) -> Self {
        let time_offset = rng.random_range(0.0..TIME_OFFSET_MAX);
        let offsets = (0..octaves)
            .map(|_| C::random_offset(rng, OCTAVE_OFFSET_RANGE))
            .collect();
        Self { time_offset, offsets }
    }

    /// A field with no time shift and all-zero octave offsets.
    pub fn zeroed(octaves: u32) -> Self {
        Self {
            time_offset: 0.0,
            offsets: vec![C::splat(0.0); octaves as usize],
        }
    }
}

/// Sums noise octaves into a single height value.
pub struct NoiseOctaveSynthesizer {
    config: OctaveConfig,
    noise: Box<dyn ScalarNoise>,
}

impl NoiseOctaveSynthesizer {
    pub fn new(config: OctaveConfig, noise: Box<dyn ScalarNoise>) -> Self {
        Self { config, noise }
    }

    pub fn config(&self) -> &OctaveConfig {
        &self.config
    }

    /// Height at `coords` for a fixed time offset and per-octave offsets.
    ///
    /// Octave `i` samples `((coords * frequency + offsets[i]) + time_offset) * noise_scale`.
    /// Octaves without an offset are skipped.
    pub fn height<C: NoisePoint>(&self, coords: C, time_offset: f32, offsets: &[C]) -> f32 {
        let cfg = &self.config;
        let mut height = 0.0f32;
        let mut amplitude = cfg.amplitude;
        let mut frequency = cfg.frequency;

        for &offset in offsets.iter().take(cfg.octaves as usize) {
            let sample = coords * frequency + offset;
            let noise = ((sample + C::splat(time_offset)) * cfg.noise_scale).sample(&*self.noise);

            height += amplitude * noise;
            frequency *= cfg.lacunarity;
            amplitude *= cfg.persistence;
        }

        height
    }

    /// Height at `coords` within a run's noise field.
    pub fn sample_field<C: NoisePoint>(&self, coords: C, field: &NoiseField<C>) -> f32 {
        self.height(coords, field.time_offset, &field.offsets)
    }
}
