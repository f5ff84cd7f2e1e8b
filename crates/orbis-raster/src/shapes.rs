//! Scanline rasterization of polygons, discs and outlines.
//!
//! All shapes are sampled at pixel centers `(x + 0.5, y + 0.5)` and written
//! through [`RasterSurface::fill_span`] / [`RasterSurface::put_pixel`], so they
//! are clipped by whatever surface (or [`crate::FrameView`]) they target.

use glam::Vec2;

use crate::{Color, RasterSurface};

/// Fill a closed polygon using the even-odd rule.
///
/// Fewer than three points, or any non-finite coordinate, draws nothing.
pub fn fill_polygon<S: RasterSurface + ?Sized>(surface: &mut S, points: &[Vec2], color: Color) {
    if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    let first_row = ((min_y - 0.5).ceil() as i64).max(0);
    let last_row = ((max_y - 0.5).floor() as i64).min(i64::from(surface.height()) - 1);

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for row in first_row..=last_row {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            // Half-open on y so shared vertices are counted once.
            if (a.y <= sample_y && b.y > sample_y) || (b.y <= sample_y && a.y > sample_y) {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil() as i64;
            let end = (pair[1] - 0.5).ceil() as i64;
            surface.fill_span(row, start, end, color);
        }
    }
}

/// Fill every pixel whose center is within `radius` of `center`.
pub fn fill_circle<S: RasterSurface + ?Sized>(
    surface: &mut S,
    center: Vec2,
    radius: f32,
    color: Color,
) {
    if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
        return;
    }

    let r2 = radius * radius;
    let first_row = ((center.y - radius - 0.5).ceil() as i64).max(0);
    let last_row =
        ((center.y + radius - 0.5).floor() as i64).min(i64::from(surface.height()) - 1);

    for row in first_row..=last_row {
        let dy = row as f32 + 0.5 - center.y;
        let rem = r2 - dy * dy;
        if rem < 0.0 {
            continue;
        }
        let half = rem.sqrt();
        let start = (center.x - half - 0.5).ceil() as i64;
        let end = (center.x + half - 0.5).floor() as i64 + 1;
        surface.fill_span(row, start, end, color);
    }
}

/// Draw the one-pixel outline of the closed polygon through `points`.
pub fn stroke_polygon<S: RasterSurface + ?Sized>(
    surface: &mut S,
    points: &[Vec2],
    color: Color,
) {
    if points.len() < 2 || points.iter().any(|p| !p.is_finite()) {
        return;
    }
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        draw_line(surface, a, b, color);
    }
}

fn draw_line<S: RasterSurface + ?Sized>(surface: &mut S, a: Vec2, b: Vec2, color: Color) {
    let max = Vec2::new(surface.width() as f32 + 1.0, surface.height() as f32 + 1.0);
    let Some((a, b)) = clip_segment(a, b, Vec2::splat(-1.0), max) else {
        return;
    };
    let delta = b - a;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let p = a + delta * (step as f32 / steps as f32);
        surface.put_pixel(p.x.floor() as i64, p.y.floor() as i64, color);
    }
}

/// Liang-Barsky clip of segment `a..b` to the box `min..max`. Returns `None`
/// if the segment misses the box.
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let delta = b - a;
    let mut t0 = 0.0_f32;
    let mut t1 = 1.0_f32;
    let edges = [
        (-delta.x, a.x - min.x),
        (delta.x, max.x - a.x),
        (-delta.y, a.y - min.y),
        (delta.y, max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + delta * t0, a + delta * t1))
}
