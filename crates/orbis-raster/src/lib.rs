//! CPU raster surfaces: RGBA pixel buffers with the small set of drawing
//! primitives the texture synthesis pipeline needs (polygon fill and stroke,
//! disc fill, clear, row-window copies), independent of any rendering engine.

mod error;
mod shapes;
mod surface;
mod view;

pub use error::RasterError;
pub use shapes::{fill_circle, fill_polygon, stroke_polygon};
pub use surface::{BLACK, ImageSurface, RasterSurface, WHITE, gray};
pub use view::FrameView;

/// RGBA8 pixel color used by every surface.
pub type Color = image::Rgba<u8>;
