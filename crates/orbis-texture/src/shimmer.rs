//! Per-vertex water shimmer applied to each displacement animation frame.

use std::f64::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input scale multiplier for the fine noise channel.
pub const FINE_NOISE_SCALE: f64 = 100.0;

/// Peak height offset of the [`ShimmerProfile::Ripple`] profile.
pub const RIPPLE_AMPLITUDE: f64 = 0.01;

/// Peak offset of the [`ShimmerProfile::Swell`] profile, relative to the
/// pass's noise span (`|ceiling - floor| * magnitude`).
pub const SWELL_AMPLITUDE: f64 = 0.05;

/// How strongly water heights wobble between animation frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShimmerProfile {
    /// Fixed small offset, independent of terrain relief.
    #[default]
    Ripple,
    /// Offset proportional to the terrain relief. Uses the same phase term as
    /// `Ripple` and only scales the amplitude; there is no position-hashed
    /// phase variant.
    Swell,
    /// No animation jitter; every frame is identical.
    Still,
}

impl ShimmerProfile {
    /// Peak offset for a pass whose noise span is `mid_scale`.
    pub fn amplitude(self, mid_scale: f64) -> f64 {
        match self {
            ShimmerProfile::Ripple => RIPPLE_AMPLITUDE,
            ShimmerProfile::Swell => mid_scale * SWELL_AMPLITUDE,
            ShimmerProfile::Still => 0.0,
        }
    }
}

/// Everything the displacement painter needs about one vertex, captured once
/// per pass and then replayed for every animation frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexShimmer {
    /// Texture-space position of the vertex.
    pub point: Vec2,
    /// Surface height in `[0, 1]`.
    pub height: f64,
    /// Whether the vertex lies below the water level.
    pub water: bool,
    /// Fine noise sample at the vertex.
    pub fine_noise: f64,
    /// Random loop phase in `[0, 1)`.
    pub phase: f64,
}

impl VertexShimmer {
    /// Height offset of this vertex in animation frame `frame` of `frame_count`.
    ///
    /// `(sin(fine_noise + sin((frame / frame_count + phase) * τ)) + 1) / 2 * amplitude`
    /// for water vertices, zero for land. The inner sine completes one period
    /// per loop, so the last frame flows back into the first.
    pub fn offset(&self, frame: u32, frame_count: u32, amplitude: f64) -> f64 {
        if !self.water {
            return 0.0;
        }
        let t = f64::from(frame) / f64::from(frame_count.max(1)) + self.phase;
        let wave = (self.fine_noise + (t * TAU).sin()).sin();
        (wave + 1.0) / 2.0 * amplitude
    }

    /// Height painted for `frame`: base height plus shimmer.
    pub fn frame_height(&self, frame: u32, frame_count: u32, amplitude: f64) -> f64 {
        self.height + self.offset(frame, frame_count, amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(water: bool) -> VertexShimmer {
        VertexShimmer {
            point: Vec2::new(10.0, 10.0),
            height: 0.21,
            water,
            fine_noise: 0.3,
            phase: 0.25,
        }
    }

    #[test]
    fn test_land_never_shimmers() {
        let v = vertex(false);
        for frame in 0..8 {
            assert_eq!(v.offset(frame, 8, RIPPLE_AMPLITUDE), 0.0);
        }
    }

    #[test]
    fn test_water_offset_bounded_by_amplitude() {
        let v = vertex(true);
        for frame in 0..12 {
            let o = v.offset(frame, 12, RIPPLE_AMPLITUDE);
            assert!((0.0..=RIPPLE_AMPLITUDE).contains(&o), "offset {o}");
        }
    }

    #[test]
    fn test_water_offset_varies_over_the_loop() {
        let v = vertex(true);
        let offsets: Vec<f64> = (0..8).map(|f| v.offset(f, 8, RIPPLE_AMPLITUDE)).collect();
        let spread = offsets.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            - offsets.iter().cloned().fold(f64::INFINITY, f64::min);
        assert!(spread > 1e-4, "shimmer barely moves: {offsets:?}");
    }

    #[test]
    fn test_loop_is_periodic() {
        let v = vertex(true);
        let first = v.offset(0, 6, RIPPLE_AMPLITUDE);
        let wrapped = v.offset(6, 6, RIPPLE_AMPLITUDE);
        assert!((first - wrapped).abs() < 1e-12);
    }

    #[test]
    fn test_offset_is_pure() {
        let v = vertex(true);
        assert_eq!(v.offset(3, 8, 0.05), v.offset(3, 8, 0.05));
    }

    #[test]
    fn test_profile_amplitudes() {
        assert_eq!(ShimmerProfile::Ripple.amplitude(0.8), RIPPLE_AMPLITUDE);
        assert!((ShimmerProfile::Swell.amplitude(0.8) - 0.04).abs() < 1e-12);
        assert_eq!(ShimmerProfile::Still.amplitude(0.8), 0.0);
        assert_eq!(ShimmerProfile::default(), ShimmerProfile::Ripple);
    }
}
