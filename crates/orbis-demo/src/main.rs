//! Orbis demo: paints one planet's textures and writes them as PNGs.
//!
//! Stands in for a render loop: builds the texture set once, then runs a
//! fixed number of simulated ticks and saves the displacement surface each
//! time the animation flags it for upload.

mod snapshot;

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use orbis_config::{CliArgs, Config};
use orbis_texture::{Mesh, NoiseField, PlanetTextureSet, SurfaceKind};
use tracing::{info, warn};

fn main() {
    if let Err(e) = run() {
        eprintln!("orbis: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    orbis_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mesh = Arc::new(Mesh::geodesic_sphere(
        config.mesh.radius,
        config.mesh.subdivisions,
    ));
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        subdivisions = config.mesh.subdivisions,
        "built geodesic sphere"
    );

    let noise = NoiseField::new(config.noise.clone());
    let mut planet = PlanetTextureSet::new(
        mesh,
        noise,
        config.texture,
        config.synthesis_settings(),
    )?;

    let out = config.output.directory.as_path();
    for kind in SurfaceKind::ALL {
        if planet.take_upload(kind) {
            snapshot::write_png(out, kind.name(), planet.surface(kind))?;
        }
    }
    snapshot::write_png(out, "displacement_strip", planet.animation().strip())?;

    // Simulated render loop on a synthetic clock.
    let start = Instant::now();
    let tick = Duration::from_millis(config.output.tick_ms);
    let mut written = 0u32;
    for n in 0..config.output.ticks {
        planet.update_at(start + tick * n);
        if planet.take_upload(SurfaceKind::Displacement) {
            let shown = (planet.animation().current_frame() + planet.animation().frame_count()
                - 1)
                % planet.animation().frame_count();
            snapshot::write_png(
                out,
                &snapshot::frame_name(n),
                planet.surface(SurfaceKind::Displacement),
            )?;
            tracing::debug!(tick = n, frame = shown, "displacement advanced");
            written += 1;
        }
    }

    if config.output.ticks > 0 && written == 0 {
        warn!(
            ticks = config.output.ticks,
            tick_ms = config.output.tick_ms,
            "animation never advanced"
        );
    }
    info!(
        directory = %out.display(),
        frames_written = written,
        "wrote planet textures"
    );
    Ok(())
}
