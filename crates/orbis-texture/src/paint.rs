//! Per-face painting of the displacement, color and roughness surfaces.
//!
//! Each mesh face is mapped from UV space to pixel space and painted three
//! ways: grayscale discs at its corners (displacement), a filled and stroked
//! triangle tinted by average height (color), and for water faces a glossy
//! triangle (roughness). Faces near the left or right edge are painted a
//! second time shifted by almost one surface width so the texture wraps
//! cleanly across the UV seam.

use glam::Vec2;
use image::Rgba;
use orbis_raster::{Color, RasterSurface, gray};
use serde::{Deserialize, Serialize};

use crate::face::VertexRef;
use crate::height::{HeightMapper, TextureOptions};
use crate::shimmer::{ShimmerProfile, VertexShimmer};

/// Radius of the displacement disc painted at every vertex, in pixels.
pub const DISC_RADIUS: f32 = 5.0;

/// Distance from the left/right edge within which a face is duplicated.
pub const SEAM_MARGIN: f32 = 10.0;

/// Fraction of the surface width by which seam duplicates are shifted.
pub const SEAM_SHIFT: f32 = 0.998;

/// Roughness value of water faces. Untouched (land) pixels stay white.
pub const REFLECTIVE_TONE: u8 = 0x55;

/// Roughness cutoff marking every face below the water level as water.
pub const WATER_ROUGHNESS_CUTOFF: f64 = 1.0;

/// Stricter roughness cutoff leaving a strip of matte shallows along coasts.
pub const SHALLOW_ROUGHNESS_CUTOFF: f64 = 0.81;

/// Tunable constants of the painter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintPolicy {
    /// Displacement disc radius in pixels.
    pub disc_radius: f32,
    /// Edge distance that triggers seam duplication, in pixels.
    pub seam_margin: f32,
    /// Seam duplicate offset as a fraction of the surface width.
    pub seam_shift: f32,
    /// A face is glossy when `height_avg < water_level * roughness_cutoff`.
    pub roughness_cutoff: f64,
    /// Gray value written for glossy faces.
    pub reflective_tone: u8,
    /// Animation jitter applied to water vertices.
    pub shimmer: ShimmerProfile,
}

impl Default for PaintPolicy {
    fn default() -> Self {
        Self {
            disc_radius: DISC_RADIUS,
            seam_margin: SEAM_MARGIN,
            seam_shift: SEAM_SHIFT,
            roughness_cutoff: WATER_ROUGHNESS_CUTOFF,
            reflective_tone: REFLECTIVE_TONE,
            shimmer: ShimmerProfile::default(),
        }
    }
}

/// Which edge of the surface a face touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeamSide {
    /// Near `x = 0`; the duplicate is shifted right.
    Left,
    /// Near `x = width`; the duplicate is shifted left.
    Right,
}

impl SeamSide {
    fn direction(self) -> f32 {
        match self {
            SeamSide::Left => 1.0,
            SeamSide::Right => -1.0,
        }
    }
}

/// One face after UV mapping and height sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceSample {
    /// Corner positions in pixel space.
    pub points: [Vec2; 3],
    /// Corner surface heights.
    pub heights: [f64; 3],
    /// Mean of `heights`.
    pub height_avg: f64,
    /// Edge the face touches, if any. When corners sit near both edges the
    /// last corner walked decides.
    pub seam: Option<SeamSide>,
}

/// Paints faces onto surfaces of a fixed size.
#[derive(Clone, Debug)]
pub struct SurfacePainter {
    width: u32,
    height: u32,
    policy: PaintPolicy,
}

impl SurfacePainter {
    /// Create a painter for `width × height` surfaces.
    pub fn new(width: u32, height: u32, policy: PaintPolicy) -> Self {
        Self {
            width,
            height,
            policy,
        }
    }

    /// The painter's policy constants.
    pub fn policy(&self) -> &PaintPolicy {
        &self.policy
    }

    /// Map a UV coordinate to pixel space. V is flipped because row 0 is the
    /// top of the surface.
    pub fn texture_point(&self, uv: Vec2) -> Vec2 {
        Vec2::new(
            uv.x * (self.width as f32 - 2.0) + 0.5,
            (1.0 - uv.y) * (self.height as f32 - 2.0) + 0.5,
        )
    }

    /// Edge the polygon through `points` touches, if any.
    pub fn seam_side(&self, points: &[Vec2]) -> Option<SeamSide> {
        let mut side = None;
        for p in points {
            if p.x < self.policy.seam_margin {
                side = Some(SeamSide::Left);
            } else if p.x > self.width as f32 - self.policy.seam_margin {
                side = Some(SeamSide::Right);
            }
        }
        side
    }

    /// Map and sample one face.
    pub fn sample_face(&self, mapper: &HeightMapper<'_>, face: &[VertexRef; 3]) -> FaceSample {
        let points = face.map(|v| self.texture_point(v.uv));
        let heights = face.map(|v| mapper.vertex_height(v.position));
        FaceSample {
            points,
            heights,
            height_avg: heights.iter().sum::<f64>() / 3.0,
            seam: self.seam_side(&points),
        }
    }

    /// Returns `true` if the face gets the glossy roughness tone.
    pub fn is_reflective(&self, face: &FaceSample, options: &TextureOptions) -> bool {
        face.height_avg < options.water_level() * self.policy.roughness_cutoff
    }

    /// Fill and stroke the face on the color surface.
    pub fn paint_color<S: RasterSurface + ?Sized>(
        &self,
        surface: &mut S,
        face: &FaceSample,
        options: &TextureOptions,
    ) {
        let color = face_color(face.height_avg, options);
        self.for_each_copy(face, |points| {
            surface.fill_polygon(points, color);
            surface.stroke_polygon(points, color);
        });
    }

    /// Fill the face with the reflective tone if it is water. Returns whether
    /// anything was painted.
    pub fn paint_roughness<S: RasterSurface + ?Sized>(
        &self,
        surface: &mut S,
        face: &FaceSample,
        options: &TextureOptions,
    ) -> bool {
        if !self.is_reflective(face, options) {
            return false;
        }
        let tone = gray(self.policy.reflective_tone);
        self.for_each_copy(face, |points| surface.fill_polygon(points, tone));
        true
    }

    /// Paint one vertex disc for animation frame `frame`.
    pub fn paint_displacement<S: RasterSurface + ?Sized>(
        &self,
        surface: &mut S,
        vertex: &VertexShimmer,
        frame: u32,
        frame_count: u32,
        amplitude: f64,
    ) {
        let value = displacement_value(vertex.frame_height(frame, frame_count, amplitude));
        surface.fill_circle(vertex.point, self.policy.disc_radius, gray(value));
    }

    fn for_each_copy(&self, face: &FaceSample, mut draw: impl FnMut(&[Vec2])) {
        draw(&face.points);
        if let Some(side) = face.seam {
            let dx = side.direction() * self.width as f32 * self.policy.seam_shift;
            let shifted = face.points.map(|p| Vec2::new(p.x + dx, p.y));
            draw(&shifted);
        }
    }
}

/// Base color of a face with average height `height_avg`.
///
/// ```text
/// r = 0.1
/// g = clamp01(sin(h / 2 + 0.5))²
/// b = clamp01((water_level - h) / water_depth)
/// ```
pub fn face_color(height_avg: f64, options: &TextureOptions) -> Color {
    let r = 0.1;
    let g = (height_avg / 2.0 + 0.5).sin().clamp(0.0, 1.0).powi(2);
    let b = ((options.water_level() - height_avg) / options.water_depth).clamp(0.0, 1.0);
    Rgba([channel(r), channel(g), channel(b), 255])
}

/// Gray level of a displacement height, saturating outside `[0, 1]`.
pub fn displacement_value(height: f64) -> u8 {
    channel(height)
}

fn channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (255.0 * value).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use orbis_raster::{BLACK, ImageSurface, WHITE};

    use super::*;

    const SIZE: u32 = 64;

    fn options() -> TextureOptions {
        TextureOptions {
            noise_scale: 1.0,
            magnitude: 1.0,
            floor: 0.2,
            ceiling: 1.0,
            water_depth: 0.05,
        }
    }

    fn painter() -> SurfacePainter {
        SurfacePainter::new(SIZE, SIZE, PaintPolicy::default())
    }

    fn face_from_uvs(painter: &SurfacePainter, uvs: [Vec2; 3], height: f64) -> FaceSample {
        let points = uvs.map(|uv| painter.texture_point(uv));
        FaceSample {
            points,
            heights: [height; 3],
            height_avg: height,
            seam: painter.seam_side(&points),
        }
    }

    fn painted_in(surface: &ImageSurface, row: u32, columns: std::ops::Range<u32>) -> bool {
        columns
            .into_iter()
            .any(|x| surface.get_pixel(x, row) != Some(WHITE))
    }

    #[test]
    fn test_texture_point_mapping() {
        let p = painter();
        assert_eq!(p.texture_point(Vec2::new(0.0, 1.0)), Vec2::new(0.5, 0.5));
        assert_eq!(p.texture_point(Vec2::new(1.0, 0.0)), Vec2::new(62.5, 62.5));
        assert_eq!(p.texture_point(Vec2::new(0.5, 0.5)), Vec2::new(31.5, 31.5));
    }

    #[test]
    fn test_land_color_is_green_dominant() {
        let c = face_color(0.8, &options());
        assert_eq!(c[0], 25);
        assert_eq!(c[2], 0, "land above water level has no blue");
        assert_eq!(c[1], 156);
    }

    #[test]
    fn test_deep_water_color_is_fully_blue() {
        let c = face_color(0.1, &options());
        assert_eq!(c[2], 255);
        assert!(c[2] > c[1]);
    }

    #[test]
    fn test_color_channels_never_overflow() {
        for i in -20..=40 {
            let c = face_color(i as f64 * 0.1, &options());
            assert_eq!(c[3], 255);
            assert_eq!(c[0], 25);
        }
    }

    #[test]
    fn test_displacement_value_saturates() {
        assert_eq!(displacement_value(0.2), 51);
        assert_eq!(displacement_value(1.0), 255);
        assert_eq!(displacement_value(1.5), 255);
        assert_eq!(displacement_value(-0.5), 0);
        assert_eq!(displacement_value(f64::NAN), 0);
    }

    #[test]
    fn test_water_face_gets_reflective_tone() {
        let p = painter();
        let mut roughness = ImageSurface::filled(SIZE, SIZE, WHITE).unwrap();
        let face = face_from_uvs(
            &p,
            [
                Vec2::new(0.3, 0.7),
                Vec2::new(0.7, 0.7),
                Vec2::new(0.5, 0.3),
            ],
            0.22,
        );
        assert!(p.paint_roughness(&mut roughness, &face, &options()));
        assert_eq!(roughness.get_pixel(31, 31), Some(gray(REFLECTIVE_TONE)));
        assert_eq!(roughness.get_pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn test_land_face_leaves_roughness_untouched() {
        let p = painter();
        let mut roughness = ImageSurface::filled(SIZE, SIZE, WHITE).unwrap();
        let face = face_from_uvs(
            &p,
            [
                Vec2::new(0.3, 0.7),
                Vec2::new(0.7, 0.7),
                Vec2::new(0.5, 0.3),
            ],
            0.25,
        );
        assert!(!p.paint_roughness(&mut roughness, &face, &options()));
        assert!(roughness.is_uniform(WHITE));
    }

    #[test]
    fn test_shallow_cutoff_keeps_coast_matte() {
        let p = SurfacePainter::new(
            SIZE,
            SIZE,
            PaintPolicy {
                roughness_cutoff: SHALLOW_ROUGHNESS_CUTOFF,
                ..Default::default()
            },
        );
        let face = face_from_uvs(&p, [Vec2::splat(0.4), Vec2::splat(0.5), Vec2::splat(0.6)], 0.22);
        // 0.22 < 0.25 but not below 0.25 * 0.81
        assert!(!p.is_reflective(&face, &options()));
        let deep = FaceSample {
            height_avg: 0.2,
            ..face
        };
        assert!(p.is_reflective(&deep, &options()));
    }

    #[test]
    fn test_seam_side_detection() {
        let p = painter();
        assert_eq!(p.seam_side(&[Vec2::new(5.0, 1.0)]), Some(SeamSide::Left));
        assert_eq!(p.seam_side(&[Vec2::new(60.0, 1.0)]), Some(SeamSide::Right));
        assert_eq!(p.seam_side(&[Vec2::new(30.0, 1.0)]), None);
        // Last corner walked wins.
        assert_eq!(
            p.seam_side(&[Vec2::new(60.0, 1.0), Vec2::new(2.0, 1.0)]),
            Some(SeamSide::Left)
        );
    }

    #[test]
    fn test_face_straddling_seam_paints_both_edges() {
        let p = painter();
        let mut color = ImageSurface::filled(SIZE, SIZE, WHITE).unwrap();
        let face = face_from_uvs(
            &p,
            [
                Vec2::new(0.001, 0.6),
                Vec2::new(0.999, 0.6),
                Vec2::new(0.001, 0.4),
            ],
            0.5,
        );
        p.paint_color(&mut color, &face, &options());

        let margin = SEAM_MARGIN as u32;
        let row = 26;
        assert!(painted_in(&color, row, 0..margin), "left edge columns");
        assert!(
            painted_in(&color, row, SIZE - margin..SIZE),
            "right edge columns"
        );
    }

    #[test]
    fn test_wrapped_face_is_duplicated_on_left_edge() {
        let p = painter();
        let mut color = ImageSurface::filled(SIZE, SIZE, WHITE).unwrap();
        // A seam face whose low corner was pushed past u = 1.
        let face = face_from_uvs(
            &p,
            [
                Vec2::new(0.95, 0.6),
                Vec2::new(1.05, 0.6),
                Vec2::new(1.0, 0.4),
            ],
            0.5,
        );
        assert_eq!(face.seam, Some(SeamSide::Right));
        p.paint_color(&mut color, &face, &options());

        let row = 26;
        assert_ne!(color.get_pixel(SIZE - 1, row), Some(WHITE), "right edge column");
        assert_ne!(color.get_pixel(0, row), Some(WHITE), "wrapped copy on left edge");
    }

    #[test]
    fn test_water_seam_face_is_glossy_on_both_edges() {
        let p = painter();
        let mut roughness = ImageSurface::filled(SIZE, SIZE, WHITE).unwrap();
        let face = face_from_uvs(
            &p,
            [
                Vec2::new(0.95, 0.6),
                Vec2::new(1.05, 0.6),
                Vec2::new(1.0, 0.4),
            ],
            0.22,
        );
        assert!(p.paint_roughness(&mut roughness, &face, &options()));

        let row = 26;
        let glossy = Some(gray(REFLECTIVE_TONE));
        assert_eq!(roughness.get_pixel(SIZE - 1, row), glossy, "right edge column");
        assert_eq!(roughness.get_pixel(0, row), glossy, "wrapped copy on left edge");
        assert_eq!(roughness.get_pixel(32, row), Some(WHITE));
    }

    #[test]
    fn test_displacement_disc_gray_matches_height() {
        let p = painter();
        let mut surface = ImageSurface::new(SIZE, SIZE).unwrap();
        let vertex = VertexShimmer {
            point: Vec2::new(20.0, 20.0),
            height: 0.6,
            water: false,
            fine_noise: 0.0,
            phase: 0.0,
        };
        p.paint_displacement(&mut surface, &vertex, 0, 1, 0.01);
        assert_eq!(surface.get_pixel(20, 20), Some(gray(153)));
        assert_eq!(surface.get_pixel(20, 27), Some(BLACK));
    }
}
