//! Command-line argument parsing for the Orbis tools.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Procedural planet texture synthesis")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Multiplier applied to vertex positions before sampling noise.
    #[arg(long)]
    pub noise_scale: Option<f64>,

    /// Height of the water column above the floor.
    #[arg(long)]
    pub water_depth: Option<f64>,

    /// Minimum surface height (sea floor), 0 to 1.
    #[arg(long)]
    pub floor: Option<f64>,

    /// Upper reference height, 0 to 1.
    #[arg(long)]
    pub ceiling: Option<f64>,

    /// Gain on the floor-to-ceiling span.
    #[arg(long)]
    pub magnitude: Option<f64>,

    /// Surface size in pixels (square).
    #[arg(long)]
    pub size: Option<u32>,

    /// Number of displacement animation frames.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Animation playback rate in frames per second.
    #[arg(long)]
    pub fps: Option<f64>,

    /// Sphere subdivision level.
    #[arg(long)]
    pub subdivisions: Option<u32>,

    /// Directory to write PNG snapshots to.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Number of simulated render ticks.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.noise.seed = seed;
        }
        if let Some(scale) = args.noise_scale {
            self.texture.noise_scale = scale;
        }
        if let Some(depth) = args.water_depth {
            self.texture.water_depth = depth;
        }
        if let Some(floor) = args.floor {
            self.texture.floor = floor;
        }
        if let Some(ceiling) = args.ceiling {
            self.texture.ceiling = ceiling;
        }
        if let Some(magnitude) = args.magnitude {
            self.texture.magnitude = magnitude;
        }
        if let Some(size) = args.size {
            self.surface.width = size;
            self.surface.height = size;
        }
        if let Some(frames) = args.frames {
            self.animation.frame_count = frames;
        }
        if let Some(fps) = args.fps {
            self.animation.fps = Some(fps);
        }
        if let Some(subdivisions) = args.subdivisions {
            self.mesh.subdivisions = subdivisions;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(ticks) = args.ticks {
            self.output.ticks = ticks;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
