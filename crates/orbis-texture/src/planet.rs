//! The planet texture set: three surfaces painted from one mesh and one noise
//! field, plus the displacement animation and upload bookkeeping.

use std::sync::Arc;
use std::time::Instant;

use orbis_raster::{BLACK, ImageSurface, RasterSurface, WHITE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::animation::AnimationStrip;
use crate::error::TextureError;
use crate::face::FaceWalker;
use crate::height::{HeightMapper, TextureOptions};
use crate::mesh::Mesh;
use crate::noise::NoiseField;
use crate::paint::{PaintPolicy, SurfacePainter};
use crate::shimmer::VertexShimmer;

/// Identifies one of the three output surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Grayscale height, animated.
    Displacement,
    /// RGB albedo.
    Color,
    /// Grayscale roughness; water is glossy.
    Roughness,
}

impl SurfaceKind {
    /// Every kind, in upload order.
    pub const ALL: [SurfaceKind; 3] = [
        SurfaceKind::Displacement,
        SurfaceKind::Color,
        SurfaceKind::Roughness,
    ];

    /// Lowercase name, used for file names and log fields.
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Displacement => "displacement",
            SurfaceKind::Color => "color",
            SurfaceKind::Roughness => "roughness",
        }
    }
}

/// Fixed parameters of a texture set, chosen once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Number of displacement animation frames.
    pub frame_count: u32,
    /// Playback rate. `None` plays one loop per second.
    pub fps: Option<f64>,
    /// Painter constants.
    pub paint: PaintPolicy,
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            frame_count: 8,
            fps: None,
            paint: PaintPolicy::default(),
        }
    }
}

impl SynthesisSettings {
    /// Effective playback rate.
    pub fn effective_fps(&self) -> f64 {
        self.fps
            .unwrap_or_else(|| f64::from(self.frame_count.max(1)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct UploadFlags {
    displacement: bool,
    color: bool,
    roughness: bool,
}

impl UploadFlags {
    fn get_mut(&mut self, kind: SurfaceKind) -> &mut bool {
        match kind {
            SurfaceKind::Displacement => &mut self.displacement,
            SurfaceKind::Color => &mut self.color,
            SurfaceKind::Roughness => &mut self.roughness,
        }
    }

    fn raise_all(&mut self) {
        *self = Self {
            displacement: true,
            color: true,
            roughness: true,
        };
    }
}

/// Displacement, color and roughness textures for one planet.
///
/// Owns its surfaces exclusively. The host calls [`redraw`](Self::redraw)
/// when options change and [`update`](Self::update) once per render tick,
/// then uploads whichever surfaces [`take_upload`](Self::take_upload)
/// reports as changed.
pub struct PlanetTextureSet {
    mesh: Arc<Mesh>,
    noise: NoiseField,
    settings: SynthesisSettings,
    painter: SurfacePainter,
    options: TextureOptions,
    water_level: f64,
    animation: AnimationStrip,
    color: ImageSurface,
    roughness: ImageSurface,
    uploads: UploadFlags,
}

impl PlanetTextureSet {
    /// Allocate all surfaces and paint them once with `options`.
    pub fn new(
        mesh: Arc<Mesh>,
        noise: NoiseField,
        options: TextureOptions,
        settings: SynthesisSettings,
    ) -> Result<Self, TextureError> {
        let (width, height) = (settings.width, settings.height);
        let displacement = ImageSurface::new(width, height)?;
        let animation =
            AnimationStrip::new(displacement, settings.frame_count, settings.effective_fps())?;
        let color = ImageSurface::filled(width, height, WHITE)?;
        let roughness = ImageSurface::filled(width, height, WHITE)?;

        info!(
            width,
            height,
            frames = animation.frame_count(),
            fps = animation.fps(),
            seed = noise.seed(),
            "allocated planet texture set"
        );

        let mut set = Self {
            mesh,
            noise,
            painter: SurfacePainter::new(width, height, settings.paint.clone()),
            settings,
            options: TextureOptions::default(),
            water_level: 0.0,
            animation,
            color,
            roughness,
            uploads: UploadFlags::default(),
        };
        set.redraw(options)?;
        Ok(set)
    }

    /// Repaint every surface from scratch with `options`.
    ///
    /// Out-of-range options are clamped. Playback restarts at frame 0 and
    /// all three surfaces are flagged for upload.
    pub fn redraw(&mut self, options: TextureOptions) -> Result<(), TextureError> {
        let started = Instant::now();

        let sanitized = options.sanitized();
        if sanitized != options {
            warn!(?options, ?sanitized, "texture options out of range, clamped");
        }
        self.options = sanitized;
        self.water_level = sanitized.water_level();

        self.color.clear(WHITE);
        self.roughness.clear(WHITE);
        self.animation.source_mut().clear(BLACK);
        self.animation
            .reset(self.settings.frame_count, self.settings.effective_fps())?;

        let mapper = HeightMapper::new(&self.noise, sanitized);
        let mut rng = ChaCha8Rng::seed_from_u64(self.noise.seed());
        let mut shimmer = Vec::with_capacity(self.mesh.face_count() * 3);
        let mut faces = 0usize;
        let mut glossy = 0usize;

        for face in FaceWalker::new(&self.mesh).faces() {
            let sample = self.painter.sample_face(&mapper, &face);
            self.painter
                .paint_color(&mut self.color, &sample, &sanitized);
            if self
                .painter
                .paint_roughness(&mut self.roughness, &sample, &sanitized)
            {
                glossy += 1;
            }

            for (corner, &height) in face.iter().zip(&sample.heights) {
                shimmer.push(VertexShimmer {
                    point: self.painter.texture_point(corner.uv),
                    height,
                    water: mapper.is_water(height),
                    fine_noise: mapper.fine_noise(corner.position),
                    phase: rng.random::<f64>(),
                });
            }
            faces += 1;
        }

        let frame_count = self.animation.frame_count();
        let amplitude = self
            .painter
            .policy()
            .shimmer
            .amplitude(sanitized.mid_scale());
        let painter = &self.painter;
        self.animation.draw_all_frames(|frame, view| {
            for vertex in &shimmer {
                painter.paint_displacement(view, vertex, frame, frame_count, amplitude);
            }
        });
        self.animation.present_frame(0);
        self.uploads.raise_all();

        debug!(
            discs_per_frame = shimmer.len(),
            glossy_faces = glossy,
            amplitude,
            "painted displacement frames"
        );
        info!(
            faces,
            frames = frame_count,
            water_level = self.water_level,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "redrew planet textures"
        );
        Ok(())
    }

    /// Advance the displacement animation using the wall clock. Returns
    /// `true` if the displacement surface changed.
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Advance the displacement animation as of `now`.
    pub fn update_at(&mut self, now: Instant) -> bool {
        let changed = self.animation.update_at(now);
        if changed {
            self.uploads.displacement = true;
        }
        changed
    }

    /// Returns `true` if `kind` changed since it was last taken.
    pub fn needs_upload(&self, kind: SurfaceKind) -> bool {
        match kind {
            SurfaceKind::Displacement => self.uploads.displacement,
            SurfaceKind::Color => self.uploads.color,
            SurfaceKind::Roughness => self.uploads.roughness,
        }
    }

    /// Read and clear the upload flag for `kind`.
    pub fn take_upload(&mut self, kind: SurfaceKind) -> bool {
        std::mem::take(self.uploads.get_mut(kind))
    }

    /// The current contents of one surface.
    pub fn surface(&self, kind: SurfaceKind) -> &ImageSurface {
        match kind {
            SurfaceKind::Displacement => self.animation.source(),
            SurfaceKind::Color => &self.color,
            SurfaceKind::Roughness => &self.roughness,
        }
    }

    /// Options of the last redraw, after clamping.
    pub fn options(&self) -> &TextureOptions {
        &self.options
    }

    /// Land/water cutoff of the last redraw.
    pub fn water_level(&self) -> f64 {
        self.water_level
    }

    /// The displacement animation.
    pub fn animation(&self) -> &AnimationStrip {
        &self.animation
    }

    /// Construction-time settings.
    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// The mesh being painted.
    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    /// The noise field heights are sampled from.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }
}
