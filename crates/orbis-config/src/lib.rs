//! Settings for the Orbis texture tools.
//!
//! Everything a host needs to build a planet texture set (texture options,
//! noise, surface size, animation, painter policy, mesh) plus output and
//! logging settings, persisted to disk as RON. CLI flags override the file.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, CONFIG_FILE, Config, DebugConfig, MeshConfig, OutputConfig, SurfaceConfig,
};
pub use error::ConfigError;
