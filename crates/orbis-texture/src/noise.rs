//! Seeded fractal Brownian motion (fBm) over 3D simplex noise.
//!
//! Sums octaves of simplex noise, each doubling in frequency and halving in
//! amplitude by default, and normalizes the sum back into `[-1, 1]` so callers
//! can treat the field as a unit-range scalar regardless of octave count.

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};

/// Seed used when no other seed is configured.
pub const DEFAULT_SEED: u64 = 4_372_857;

/// Configuration for [`NoiseField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Seed for the simplex permutation table. Same seed, same field.
    pub seed: u64,
    /// Number of octaves to sum. Values below 1 are treated as 1.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Exponent applied to the normalized sum, preserving sign.
    /// `1.0` leaves the distribution unchanged; larger values flatten lowlands.
    pub redistribution: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            redistribution: 1.0,
        }
    }
}

/// A deterministic fractal scalar field over 3D points.
///
/// Stateless after construction: [`sample`](Self::sample) takes `&self`, so one
/// field can be shared across any number of synthesis passes or threads.
pub struct NoiseField {
    noise: Simplex,
    params: NoiseParams,
    max_amplitude: f64,
}

impl NoiseField {
    /// Create a field from the given parameters.
    pub fn new(params: NoiseParams) -> Self {
        let noise = Simplex::new(simplex_seed(params.seed));
        let mut max_amplitude = 0.0;
        let mut amplitude = 1.0;
        for _ in 0..params.octaves.max(1) {
            max_amplitude += amplitude;
            amplitude *= params.persistence;
        }
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Create a field with default parameters and the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(NoiseParams {
            seed,
            ..Default::default()
        })
    }

    /// Sample the field at `point`. The result is always finite and in `[-1, 1]`.
    ///
    /// Non-finite input samples as `0.0`.
    pub fn sample(&self, point: DVec3) -> f64 {
        if !point.is_finite() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..self.params.octaves.max(1) {
            let p = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        let normalized = if self.max_amplitude.is_normal() {
            (total / self.max_amplitude).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let shaped = if self.params.redistribution == 1.0 {
            normalized
        } else {
            normalized.signum() * normalized.abs().powf(self.params.redistribution)
        };

        if shaped.is_finite() { shaped } else { 0.0 }
    }

    /// The seed this field was built from.
    pub fn seed(&self) -> u64 {
        self.params.seed
    }

    /// Sum of all octave amplitudes (the normalization divisor).
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }
}

/// Fold a 64-bit seed into the 32-bit seed the permutation table takes, so
/// the high half still selects a different field.
fn simplex_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(NoiseParams::default())
    }
}
