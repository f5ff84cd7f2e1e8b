//! Pre-rendered raster animation: N frames stacked in one tall strip, copied
//! back into the live surface at a fixed rate.
//!
//! Painting every frame up front trades memory (N full-size copies) for a
//! per-tick cost of a single row-window copy.

use std::time::{Duration, Instant};

use orbis_raster::{FrameView, ImageSurface, RasterError, RasterSurface};

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// Where playback is in the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackState {
    /// Frame copied by the next advance, in `[0, frame_count)`.
    pub current_frame: u32,
    /// When the last advance happened. `None` until the first one, so the
    /// first update always advances.
    pub last_advance: Option<Instant>,
}

// ---------------------------------------------------------------------------
// AnimationStrip
// ---------------------------------------------------------------------------

/// Owns a source surface and a strip of `frame_count` pre-rendered variants.
///
/// Frame `i` occupies strip rows `[i * H, (i + 1) * H)` where `H` is the
/// source height. Call [`update`](Self::update) once per host tick.
pub struct AnimationStrip {
    source: ImageSurface,
    strip: ImageSurface,
    frame_count: u32,
    fps: f64,
    interval: Duration,
    playback: PlaybackState,
}

impl AnimationStrip {
    /// Allocate a strip for `frame_count` frames of `source`, played at `fps`.
    ///
    /// A frame count of 0 is treated as 1 (a still image). A rate that is not
    /// positive, not finite, or too slow for its frame interval to fit in a
    /// [`Duration`] falls back to one loop per second. Every frame starts
    /// as a copy of `source`.
    pub fn new(source: ImageSurface, frame_count: u32, fps: f64) -> Result<Self, RasterError> {
        let frame_count = frame_count.max(1);
        let (width, height) = source.dimensions();
        let strip_height = height
            .checked_mul(frame_count)
            .ok_or(RasterError::InvalidDimensions {
                width,
                height: u32::MAX,
            })?;
        let strip = ImageSurface::new(width, strip_height)?;

        let (fps, interval) = playback_rate(fps, frame_count);
        let mut anim = Self {
            source,
            strip,
            frame_count,
            fps,
            interval,
            playback: PlaybackState::default(),
        };
        anim.seed_frames();
        Ok(anim)
    }

    /// Allocate a strip that plays one full loop per second.
    pub fn with_default_rate(source: ImageSurface, frame_count: u32) -> Result<Self, RasterError> {
        Self::new(source, frame_count, f64::from(frame_count.max(1)))
    }

    /// Start over: every frame becomes a copy of the current source and
    /// playback restarts from frame 0. The strip is reallocated only when the
    /// frame count changes.
    pub fn reset(&mut self, frame_count: u32, fps: f64) -> Result<(), RasterError> {
        let frame_count = frame_count.max(1);
        if frame_count != self.frame_count {
            let (width, height) = self.source.dimensions();
            let strip_height =
                height
                    .checked_mul(frame_count)
                    .ok_or(RasterError::InvalidDimensions {
                        width,
                        height: u32::MAX,
                    })?;
            self.strip = ImageSurface::new(width, strip_height)?;
            self.frame_count = frame_count;
        }
        (self.fps, self.interval) = playback_rate(fps, frame_count);
        self.playback = PlaybackState::default();
        self.seed_frames();
        Ok(())
    }

    /// Paint every frame. `paint` is called once per frame index in order,
    /// each time with a view clipped to that frame, so the callback draws in
    /// source coordinates without knowing where the frame lives in the strip.
    pub fn draw_all_frames<F>(&mut self, mut paint: F)
    where
        F: FnMut(u32, &mut FrameView<'_, ImageSurface>),
    {
        let frame_height = self.source.height();
        for frame in 0..self.frame_count {
            let mut view = FrameView::new(&mut self.strip, frame * frame_height, frame_height);
            paint(frame, &mut view);
        }
    }

    /// Advance playback using the wall clock. Returns `true` if the source
    /// surface changed.
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Advance playback as of `now`.
    ///
    /// If at least one frame interval has passed since the last advance (or
    /// there was none), copy the current frame into the source, step to the
    /// next frame and return `true`. Never advances more than one frame per
    /// call, however long the gap.
    pub fn update_at(&mut self, now: Instant) -> bool {
        let due = match self.playback.last_advance {
            Some(last) => now.saturating_duration_since(last) >= self.frame_interval(),
            None => true,
        };
        if !due {
            return false;
        }

        self.present_frame(self.playback.current_frame);
        self.playback.current_frame = (self.playback.current_frame + 1) % self.frame_count;
        self.playback.last_advance = Some(now);
        true
    }

    /// Copy frame `frame` (wrapped to the frame count) into the source
    /// without touching playback state.
    pub fn present_frame(&mut self, frame: u32) {
        let frame_height = self.source.height();
        let frame = frame % self.frame_count;
        self.source
            .copy_rows_from(&self.strip, frame * frame_height, 0, frame_height);
    }

    /// Minimum time between two advances.
    pub fn frame_interval(&self) -> Duration {
        self.interval
    }

    /// The live surface the host uploads.
    pub fn source(&self) -> &ImageSurface {
        &self.source
    }

    /// Mutable access to the live surface.
    pub fn source_mut(&mut self) -> &mut ImageSurface {
        &mut self.source
    }

    /// The full strip of pre-rendered frames.
    pub fn strip(&self) -> &ImageSurface {
        &self.strip
    }

    /// Number of frames in the loop (at least 1).
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Playback rate in frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frame copied by the next advance.
    pub fn current_frame(&self) -> u32 {
        self.playback.current_frame
    }

    /// Current playback state.
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Returns `true` if the loop has more than one frame.
    pub fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// Give up the strip and return the live surface.
    pub fn into_source(self) -> ImageSurface {
        self.source
    }

    fn seed_frames(&mut self) {
        let frame_height = self.source.height();
        for frame in 0..self.frame_count {
            self.strip
                .copy_rows_from(&self.source, 0, frame * frame_height, frame_height);
        }
    }
}

/// Effective rate and frame interval for a requested rate.
fn playback_rate(fps: f64, frame_count: u32) -> (f64, Duration) {
    if fps.is_finite() && fps > 0.0 {
        if let Ok(interval) = Duration::try_from_secs_f64(1.0 / fps) {
            return (fps, interval);
        }
    }
    let fallback = f64::from(frame_count.max(1));
    (fallback, Duration::from_secs_f64(1.0 / fallback))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
