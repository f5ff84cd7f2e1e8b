//! The [`RasterSurface`] capability and its `image`-backed implementation.

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::error::RasterError;
use crate::{Color, shapes};

/// Opaque white.
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Opaque black.
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Opaque gray with the same value on all three color channels.
pub const fn gray(value: u8) -> Color {
    Rgba([value, value, value, 255])
}

/// A fixed-size 2D pixel buffer addressable by integer pixel coordinate.
///
/// Row 0 is the top of the surface. Drawing outside the surface is clipped,
/// never an error. Only [`width`](Self::width), [`height`](Self::height),
/// [`get_pixel`](Self::get_pixel) and [`put_pixel`](Self::put_pixel) are
/// required; the shape primitives are built on top of them and may be
/// overridden with faster versions.
pub trait RasterSurface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Returns the pixel at `(x, y)`, or `None` outside the surface.
    fn get_pixel(&self, x: u32, y: u32) -> Option<Color>;

    /// Writes one pixel. Coordinates outside the surface are ignored.
    fn put_pixel(&mut self, x: i64, y: i64, color: Color);

    /// Fills pixels `x0..x1` of row `y`, clipped to the surface.
    fn fill_span(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= i64::from(self.height()) {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(i64::from(self.width()));
        for x in start..end {
            self.put_pixel(x, y, color);
        }
    }

    /// Overwrites every pixel with `color`.
    fn clear(&mut self, color: Color) {
        let width = i64::from(self.width());
        for y in 0..i64::from(self.height()) {
            self.fill_span(y, 0, width, color);
        }
    }

    /// Fills the closed polygon through `points` (pixel-center sampling).
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        shapes::fill_polygon(self, points, color);
    }

    /// Draws the one-pixel outline of the closed polygon through `points`.
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color) {
        shapes::stroke_polygon(self, points, color);
    }

    /// Fills every pixel whose center lies within `radius` of `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        shapes::fill_circle(self, center, radius, color);
    }
}

/// A raster surface stored as a row-major RGBA8 [`RgbaImage`].
#[derive(Clone, Debug, PartialEq)]
pub struct ImageSurface {
    image: RgbaImage,
}

impl ImageSurface {
    /// Allocate a surface filled with `color`.
    ///
    /// Allocation is fallible so that an oversized configuration is reported
    /// to the caller instead of aborting the process.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, RasterError> {
        let pixel_count = (width as usize)
            .checked_mul(height as usize)
            .filter(|&n| n > 0)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        let bytes = pixel_count
            .checked_mul(4)
            .ok_or(RasterError::InvalidDimensions { width, height })?;

        let mut raw = Vec::new();
        raw.try_reserve_exact(bytes)
            .map_err(|_| RasterError::Allocation {
                width,
                height,
                bytes,
            })?;
        for _ in 0..pixel_count {
            raw.extend_from_slice(&color.0);
        }

        let image = RgbaImage::from_raw(width, height, raw)
            .ok_or(RasterError::InvalidDimensions { width, height })?;
        Ok(Self { image })
    }

    /// Allocate an opaque black surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        Self::filled(width, height, BLACK)
    }

    /// Wrap an existing image.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Borrow the underlying image, e.g. for upload or encoding.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Copy `rows` full rows from `src` starting at `src_row` into this
    /// surface starting at `dst_row`.
    ///
    /// The window is clipped to both surfaces; if the widths differ only the
    /// shared columns are copied.
    pub fn copy_rows_from(&mut self, src: &ImageSurface, src_row: u32, dst_row: u32, rows: u32) {
        let rows = rows
            .min(src.height().saturating_sub(src_row))
            .min(self.height().saturating_sub(dst_row));
        let copy_bytes = self.width().min(src.width()) as usize * 4;
        let src_stride = src.width() as usize * 4;
        let dst_stride = self.width() as usize * 4;
        let src_raw = src.image.as_raw();
        let dst_raw: &mut [u8] = &mut self.image;

        for row in 0..rows as usize {
            let s = (src_row as usize + row) * src_stride;
            let d = (dst_row as usize + row) * dst_stride;
            dst_raw[d..d + copy_bytes].copy_from_slice(&src_raw[s..s + copy_bytes]);
        }
    }

    /// Returns `true` if every pixel equals `color`.
    pub fn is_uniform(&self, color: Color) -> bool {
        self.image.pixels().all(|p| *p == color)
    }

    /// Number of pixels that differ from `color`.
    pub fn count_not(&self, color: Color) -> usize {
        self.image.pixels().filter(|p| **p != color).count()
    }

    /// Count the number of unique colors (ignoring alpha).
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for p in self.image.pixels() {
            colors.insert((p[0], p[1], p[2]));
        }
        colors.len()
    }
}

impl RasterSurface for ImageSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image.get_pixel_checked(x, y).copied()
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    fn fill_span(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= i64::from(self.height()) {
            return;
        }
        let start = x0.max(0) as usize;
        let end = x1.min(i64::from(self.width()));
        if end <= start as i64 {
            return;
        }
        let stride = self.width() as usize * 4;
        let row = y as usize * stride;
        let raw: &mut [u8] = &mut self.image;
        for px in raw[row + start * 4..row + end as usize * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&color.0);
        }
    }

    fn clear(&mut self, color: Color) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }
}
