//! Texture options and the noise-to-surface-height mapping.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseField;
use crate::shimmer::FINE_NOISE_SCALE;

/// Smallest water depth accepted after sanitizing.
pub const MIN_WATER_DEPTH: f64 = 1e-3;

/// User-facing synthesis options, replaced wholesale on every redraw.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureOptions {
    /// Multiplier applied to vertex positions before sampling noise.
    pub noise_scale: f64,
    /// Gain on the floor-to-ceiling span.
    pub magnitude: f64,
    /// Minimum surface height ("sea floor"), in `[0, 1]`.
    pub floor: f64,
    /// Upper reference height, in `[0, 1]`.
    pub ceiling: f64,
    /// Height of the water column above the floor. Must be positive.
    pub water_depth: f64,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            noise_scale: 1.2,
            magnitude: 1.0,
            floor: 0.2,
            ceiling: 1.0,
            water_depth: 0.05,
        }
    }
}

impl TextureOptions {
    /// Land/water cutoff: `floor + water_depth`.
    pub fn water_level(&self) -> f64 {
        self.floor + self.water_depth
    }

    /// Scale applied to raw noise: `|ceiling - floor| * magnitude`.
    pub fn mid_scale(&self) -> f64 {
        (self.ceiling - self.floor).abs() * self.magnitude
    }

    /// Returns `true` if every documented bound holds.
    pub fn is_within_bounds(&self) -> bool {
        *self == self.sanitized()
    }

    /// Clamp every field into its documented range.
    ///
    /// Non-finite values fall back to the default for that field. Synthesis
    /// never rejects options; a clamped value just paints differently.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            noise_scale: finite_or(self.noise_scale, defaults.noise_scale),
            magnitude: finite_or(self.magnitude, defaults.magnitude),
            floor: finite_or(self.floor, defaults.floor).clamp(0.0, 1.0),
            ceiling: finite_or(self.ceiling, defaults.ceiling).clamp(0.0, 1.0),
            water_depth: finite_or(self.water_depth, defaults.water_depth).max(MIN_WATER_DEPTH),
        }
    }
}

/// Map a raw noise sample to a paintable height in `[0, 1]`.
///
/// ```text
/// mid    = |ceiling - floor| * magnitude
/// height = min(1, floor + clamp(sample * mid, 0, 1))
/// ```
///
/// Only scales up from `floor`, so every point sits at least at the sea floor.
pub fn surface_height(sample: f64, options: &TextureOptions) -> f64 {
    let raised = (sample * options.mid_scale()).clamp(0.0, 1.0);
    let raised = if raised.is_nan() { 0.0 } else { raised };
    (options.floor + raised).min(1.0)
}

/// Per-pass height sampling: a noise field plus one set of options, with the
/// derived constants computed once.
pub struct HeightMapper<'a> {
    noise: &'a NoiseField,
    options: TextureOptions,
    water_level: f64,
}

impl<'a> HeightMapper<'a> {
    /// Bundle `noise` with `options` for one synthesis pass.
    pub fn new(noise: &'a NoiseField, options: TextureOptions) -> Self {
        Self {
            noise,
            water_level: options.water_level(),
            options,
        }
    }

    /// Height for a raw noise sample.
    pub fn height(&self, sample: f64) -> f64 {
        surface_height(sample, &self.options)
    }

    /// Height of the surface at a vertex position.
    pub fn vertex_height(&self, position: Vec3) -> f64 {
        self.height(self.raw_noise(position))
    }

    /// Raw noise at a vertex position, scaled by `noise_scale`.
    pub fn raw_noise(&self, position: Vec3) -> f64 {
        self.noise
            .sample(position.as_dvec3() * self.options.noise_scale)
    }

    /// High-frequency noise at a vertex, effectively white noise across
    /// neighboring vertices. Drives the water shimmer.
    pub fn fine_noise(&self, position: Vec3) -> f64 {
        self.noise
            .sample(position.as_dvec3() * self.options.noise_scale * FINE_NOISE_SCALE)
    }

    /// Land/water cutoff for this pass.
    pub fn water_level(&self) -> f64 {
        self.water_level
    }

    /// Returns `true` if `height` is below the water level.
    pub fn is_water(&self, height: f64) -> bool {
        height < self.water_level
    }

    /// The options this pass was built from.
    pub fn options(&self) -> &TextureOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TextureOptions {
        TextureOptions {
            noise_scale: 1.0,
            magnitude: 1.0,
            floor: 0.2,
            ceiling: 1.0,
            water_depth: 0.05,
        }
    }

    #[test]
    fn test_zero_sample_sits_on_floor() {
        assert_eq!(surface_height(0.0, &options()), 0.2);
    }

    #[test]
    fn test_huge_sample_saturates_at_one() {
        assert_eq!(surface_height(1.0e9, &options()), 1.0);
    }

    #[test]
    fn test_negative_sample_never_goes_below_floor() {
        assert_eq!(surface_height(-0.7, &options()), 0.2);
    }

    #[test]
    fn test_mid_range_scales_by_span_and_magnitude() {
        let opts = TextureOptions {
            magnitude: 0.5,
            ..options()
        };
        // mid = 0.8 * 0.5 = 0.4; 0.5 * 0.4 = 0.2
        assert!((surface_height(0.5, &opts) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_height_always_in_unit_range() {
        let opts = TextureOptions {
            floor: 0.9,
            magnitude: 10.0,
            ..options()
        };
        for i in -100..=100 {
            let h = surface_height(i as f64 * 0.05, &opts);
            assert!((0.0..=1.0).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_water_level() {
        assert!((options().water_level() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let wild = TextureOptions {
            noise_scale: f64::NAN,
            magnitude: 2.0,
            floor: -0.5,
            ceiling: 3.0,
            water_depth: 0.0,
        };
        assert!(!wild.is_within_bounds());
        let clean = wild.sanitized();
        assert_eq!(clean.noise_scale, TextureOptions::default().noise_scale);
        assert_eq!(clean.magnitude, 2.0);
        assert_eq!(clean.floor, 0.0);
        assert_eq!(clean.ceiling, 1.0);
        assert_eq!(clean.water_depth, MIN_WATER_DEPTH);
        assert!(clean.is_within_bounds());
    }

    #[test]
    fn test_default_options_are_valid() {
        assert!(TextureOptions::default().is_within_bounds());
    }

    #[test]
    fn test_mapper_uses_scaled_noise() {
        let noise = NoiseField::with_seed(11);
        let opts = TextureOptions {
            noise_scale: 2.0,
            ..options()
        };
        let mapper = HeightMapper::new(&noise, opts);
        let p = Vec3::new(0.3, 0.4, 0.5);
        let expected = noise.sample(p.as_dvec3() * 2.0);
        assert_eq!(mapper.raw_noise(p), expected);
        assert_eq!(mapper.vertex_height(p), surface_height(expected, &opts));
    }

    #[test]
    fn test_mapper_water_classification() {
        let noise = NoiseField::default();
        let mapper = HeightMapper::new(&noise, options());
        assert!(mapper.is_water(0.2));
        assert!(mapper.is_water(0.2499));
        assert!(!mapper.is_water(0.2501));
        assert!(!mapper.is_water(0.8));
    }
}
