//! Scalar noise sources sampled by the octave synthesizer.

use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// A deterministic scalar noise function.
///
/// Flat terrain samples it in 2D (x, y), spherical terrain in 3D. Values
/// must land in [-1, 1]; the synthesizer does not renormalise.
pub trait ScalarNoise: Send + Sync {
    fn noise_2d(&self, x: f32, y: f32) -> f32;
    fn noise_3d(&self, x: f32, y: f32, z: f32) -> f32;
}

/// Which noise source a run samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    /// Single-octave simplex gradient noise.
    #[default]
    Simplex,
    /// Cellular (Worley) distance noise.
    Cellular,
}

impl NoiseKind {
    /// Builds the noise source for this kind.
    pub fn build(self, seed: i32) -> Box<dyn ScalarNoise> {
        match self {
            NoiseKind::Simplex => Box::new(SimplexNoise::new(seed)),
            NoiseKind::Cellular => Box::new(CellularNoise::new(seed)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NoiseKind::Simplex => "simplex",
            NoiseKind::Cellular => "cellular",
        }
    }
}

/// Lattice sampled once per source to find the raw output span.
const CALIBRATION_2D: usize = 256;
const CALIBRATION_3D: usize = 40;
const CALIBRATION_FREQ: f32 = 0.173;

/// Raw output span of a simdnoise generator.
///
/// simdnoise returns unnormalised values (simplex peaks near 0.02, cellular
/// distances run from 0 to below 1), so each source measures its span on a
/// dense lattice and maps samples onto [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseSpan {
    pub min: f32,
    pub max: f32,
}

impl NoiseSpan {
    /// Span centred on zero, for sign-symmetric noise.
    pub fn symmetric(min: f32, max: f32) -> Self {
        let peak = min.abs().max(max.abs());
        Self { min: -peak, max: peak }
    }

    /// Maps a raw sample onto [-1, 1]. Samples past the measured span are
    /// clamped.
    pub fn normalize(self, raw: f32) -> f32 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 0.0;
        }
        ((raw - self.min) / width * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// Simplex noise backed by simdnoise, normalised to [-1, 1].
#[derive(Debug, Clone, Copy)]
pub struct SimplexNoise {
    seed: i32,
    span_2d: NoiseSpan,
    span_3d: NoiseSpan,
}

impl SimplexNoise {
    pub fn new(seed: i32) -> Self {
        let (_, min_2d, max_2d) = NoiseBuilder::fbm_2d(CALIBRATION_2D, CALIBRATION_2D)
            .with_seed(seed)
            .with_freq(CALIBRATION_FREQ)
            .with_octaves(1)
            .generate();
        let (_, min_3d, max_3d) = NoiseBuilder::fbm_3d(CALIBRATION_3D, CALIBRATION_3D, CALIBRATION_3D)
            .with_seed(seed)
            .with_freq(CALIBRATION_FREQ)
            .with_octaves(1)
            .generate();
        Self {
            seed,
            span_2d: NoiseSpan::symmetric(min_2d, max_2d),
            span_3d: NoiseSpan::symmetric(min_3d, max_3d),
        }
    }
}

impl ScalarNoise for SimplexNoise {
    fn noise_2d(&self, x: f32, y: f32) -> f32 {
        let raw = NoiseBuilder::fbm_2d_offset(x, 1, y, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];
        self.span_2d.normalize(raw)
    }

    fn noise_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        let raw = NoiseBuilder::fbm_3d_offset(x, 1, y, 1, z, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];
        self.span_3d.normalize(raw)
    }
}

/// Cellular distance noise backed by simdnoise, stretched to [-1, 1].
#[derive(Debug, Clone, Copy)]
pub struct CellularNoise {
    seed: i32,
    span_2d: NoiseSpan,
    span_3d: NoiseSpan,
}

impl CellularNoise {
    pub fn new(seed: i32) -> Self {
        let (_, min_2d, max_2d) = NoiseBuilder::cellular_2d(CALIBRATION_2D, CALIBRATION_2D)
            .with_seed(seed)
            .with_freq(CALIBRATION_FREQ)
            .generate();
        let (_, min_3d, max_3d) = NoiseBuilder::cellular_3d(CALIBRATION_3D, CALIBRATION_3D, CALIBRATION_3D)
            .with_seed(seed)
            .with_freq(CALIBRATION_FREQ)
            .generate();
        Self {
            seed,
            span_2d: NoiseSpan { min: min_2d, max: max_2d },
            span_3d: NoiseSpan { min: min_3d, max: max_3d },
        }
    }
}

impl ScalarNoise for CellularNoise {
    fn noise_2d(&self, x: f32, y: f32) -> f32 {
        let raw = NoiseBuilder::cellular_2d_offset(x, 1, y, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .generate()
            .0[0];
        self.span_2d.normalize(raw)
    }

    fn noise_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        let raw = NoiseBuilder::cellular_3d_offset(x, 1, y, 1, z, 1)
            .with_seed(self.seed)
            .with_freq(1.0)
            .generate()
            .0[0];
        self.span_3d.normalize(raw)
    }
}
