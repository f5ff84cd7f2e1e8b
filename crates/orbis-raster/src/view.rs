//! A clipped, vertically translated window onto a taller surface.

use crate::{Color, RasterSurface};

/// A window of `height` rows starting at `origin_y` inside another surface.
///
/// Drawing through the view uses window-local coordinates: row 0 of the view
/// is row `origin_y` of the backing surface, and anything outside the window
/// is clipped. This lets a caller paint one animation frame of a vertical
/// strip without knowing where the frame lives.
pub struct FrameView<'a, S: RasterSurface + ?Sized> {
    surface: &'a mut S,
    origin_y: u32,
    height: u32,
}

impl<'a, S: RasterSurface + ?Sized> FrameView<'a, S> {
    /// Create a view of rows `origin_y..origin_y + height`, clipped to the
    /// backing surface.
    pub fn new(surface: &'a mut S, origin_y: u32, height: u32) -> Self {
        let height = height.min(surface.height().saturating_sub(origin_y));
        Self {
            surface,
            origin_y,
            height,
        }
    }

    /// First backing row covered by the view.
    pub fn origin_y(&self) -> u32 {
        self.origin_y
    }
}

impl<S: RasterSurface + ?Sized> RasterSurface for FrameView<'_, S> {
    fn width(&self) -> u32 {
        self.surface.width()
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if y >= self.height {
            return None;
        }
        self.surface.get_pixel(x, self.origin_y + y)
    }

    fn put_pixel(&mut self, x: i64, y: i64, color: Color) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        self.surface
            .put_pixel(x, y + i64::from(self.origin_y), color);
    }

    fn fill_span(&mut self, y: i64, x0: i64, x1: i64, color: Color) {
        if y < 0 || y >= i64::from(self.height) {
            return;
        }
        self.surface
            .fill_span(y + i64::from(self.origin_y), x0, x1, color);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::{BLACK, ImageSurface, WHITE};

    #[test]
    fn test_view_translates_rows() {
        let mut strip = ImageSurface::new(8, 24).unwrap();
        {
            let mut view = FrameView::new(&mut strip, 8, 8);
            view.put_pixel(3, 0, WHITE);
            assert_eq!(view.get_pixel(3, 0), Some(WHITE));
        }
        assert_eq!(strip.get_pixel(3, 8), Some(WHITE));
        assert_eq!(strip.count_not(BLACK), 1);
    }

    #[test]
    fn test_view_clips_to_its_window() {
        let mut strip = ImageSurface::new(16, 48).unwrap();
        {
            let mut view = FrameView::new(&mut strip, 16, 16);
            // Disc hanging over both the top and bottom of the window.
            view.fill_circle(Vec2::new(8.0, 8.0), 20.0, WHITE);
        }
        for y in 0..48 {
            let inside = (16..32).contains(&y);
            let expected = if inside { WHITE } else { BLACK };
            assert_eq!(strip.get_pixel(8, y), Some(expected), "row {y}");
        }
    }

    #[test]
    fn test_view_clear_only_touches_window() {
        let mut strip = ImageSurface::new(4, 12).unwrap();
        FrameView::new(&mut strip, 4, 4).clear(WHITE);
        assert_eq!(strip.count_not(BLACK), 16);
        assert_eq!(strip.get_pixel(0, 3), Some(BLACK));
        assert_eq!(strip.get_pixel(0, 4), Some(WHITE));
        assert_eq!(strip.get_pixel(0, 7), Some(WHITE));
        assert_eq!(strip.get_pixel(0, 8), Some(BLACK));
    }

    #[test]
    fn test_view_height_clipped_to_surface() {
        let mut strip = ImageSurface::new(4, 10).unwrap();
        let view = FrameView::new(&mut strip, 8, 4);
        assert_eq!(view.height(), 2);
    }
}
