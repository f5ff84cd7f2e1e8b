use orbis_raster::RasterError;

/// Errors that can occur while building or redrawing planet textures.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// A surface or the animation strip could not be allocated.
    #[error("failed to allocate texture surface: {0}")]
    Raster(#[from] RasterError),
}
