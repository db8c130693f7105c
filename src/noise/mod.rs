//! Noise sampling for terrain heights.
//!
//! Scalar noise is an injected collaborator; simdnoise provides the built-in
//! simplex and cellular sources. The octave synthesizer sums them into one
//! height per vertex.

mod fractal;
mod source;

pub use fractal::{
    NoiseField, NoiseOctaveSynthesizer, NoisePoint, OctaveConfig, OCTAVE_OFFSET_RANGE,
    TIME_OFFSET_MAX,
};
pub use source::{CellularNoise, NoiseKind, NoiseSpan, ScalarNoise, SimplexNoise};
