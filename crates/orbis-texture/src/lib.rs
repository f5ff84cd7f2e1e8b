//! Procedural planet surface textures.
//!
//! Given a triangle mesh with UVs and a seeded noise field, paints three
//! equirectangular surfaces: an animated displacement map, a color map and a
//! roughness map. [`PlanetTextureSet`] ties the pieces together; the other
//! modules are usable on their own.

mod animation;
mod error;
mod face;
mod height;
mod mesh;
mod noise;
mod paint;
mod planet;
mod shimmer;

pub use animation::{AnimationStrip, PlaybackState};
pub use error::TextureError;
pub use face::{FaceWalker, Faces, VertexRef, for_each_face};
pub use height::{HeightMapper, MIN_WATER_DEPTH, TextureOptions, surface_height};
pub use mesh::Mesh;
pub use noise::{DEFAULT_SEED, NoiseField, NoiseParams};
pub use paint::{
    DISC_RADIUS, FaceSample, PaintPolicy, REFLECTIVE_TONE, SEAM_MARGIN, SEAM_SHIFT,
    SHALLOW_ROUGHNESS_CUTOFF, SeamSide, SurfacePainter, WATER_ROUGHNESS_CUTOFF,
    displacement_value, face_color,
};
pub use planet::{PlanetTextureSet, SurfaceKind, SynthesisSettings};
pub use shimmer::{
    FINE_NOISE_SCALE, RIPPLE_AMPLITUDE, SWELL_AMPLITUDE, ShimmerProfile, VertexShimmer,
};
