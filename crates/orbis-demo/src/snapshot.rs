//! PNG export of raster surfaces.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use orbis_raster::ImageSurface;

/// Write `surface` to `<dir>/<name>.png`, creating `dir` if needed.
pub fn write_png(dir: &Path, name: &str, surface: &ImageSurface) -> Result<PathBuf, image::ImageError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.png"));
    surface.as_image().save_with_format(&path, ImageFormat::Png)?;
    tracing::debug!(path = %path.display(), "wrote snapshot");
    Ok(path)
}

/// File stem for animation frame `index`.
pub fn frame_name(index: u32) -> String {
    format!("displacement_frame_{index}")
}
