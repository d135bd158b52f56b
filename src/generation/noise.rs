//! # Noise Module
//!
//! The deterministic value-noise field behind the terrain height function.
//! The lattice noise itself comes from the `noise` crate; this module adds
//! the octave accumulation loop on top of it.

use noise::{NoiseFn, Value};

use crate::config::NoiseConfig;

/// A seeded, multi-octave 2D value-noise field.
///
/// Sampling is a pure function of the construction parameters and the input
/// coordinates: two fields built from the same `NoiseConfig` return identical
/// values for identical inputs, across processes and runs. The seed
/// parameterizes the underlying lattice permutation, so distinct seeds
/// decorrelate the whole field rather than merely shifting it.
pub struct NoiseField {
    source: Value,
    scale: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl NoiseField {
    /// Builds a field from the configured noise parameters.
    pub fn new(config: &NoiseConfig) -> Self {
        NoiseField {
            source: Value::new(config.seed),
            scale: config.scale,
            octaves: config.octaves,
            persistence: config.persistence,
            lacunarity: config.lacunarity,
        }
    }

    /// Samples the field at a world-space position.
    ///
    /// Accumulates `octaves` lattice samples, each scaled by the running
    /// amplitude and frequency, then normalizes by the total amplitude so the
    /// result stays in `[-1, 1]` regardless of the octave count.
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..self.octaves {
            let sx = x * self.scale * frequency;
            let sz = z * self.scale * frequency;
            sum += amplitude * self.source.get([sx, sz]);
            amplitude_sum += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        sum / amplitude_sum
    }
}
