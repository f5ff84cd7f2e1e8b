//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use orbis_texture::{NoiseParams, PaintPolicy, SynthesisSettings, TextureOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted config inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Height and color options, replaced on every redraw.
    pub texture: TextureOptions,
    /// Noise field parameters, including the seed.
    pub noise: NoiseParams,
    /// Output surface size.
    pub surface: SurfaceConfig,
    /// Displacement animation settings.
    pub animation: AnimationConfig,
    /// Painter constants.
    pub paint: PaintPolicy,
    /// Generated sphere mesh.
    pub mesh: MeshConfig,
    /// Where and how much the demo writes.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Output surface size in pixels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
}

/// Displacement animation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Number of pre-rendered frames in the loop.
    pub frame_count: u32,
    /// Playback rate; `None` plays one loop per second.
    pub fps: Option<f64>,
}

/// Geodesic sphere configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Sphere radius. Only the direction of each vertex affects the texture,
    /// scaled by `texture.noise_scale`.
    pub radius: f32,
    /// Icosahedron subdivision level. Each level quadruples the face count.
    pub subdivisions: u32,
}

/// Demo output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory PNG snapshots are written to.
    pub directory: PathBuf,
    /// Number of simulated render ticks after the initial draw.
    pub ticks: u32,
    /// Simulated time between ticks, in milliseconds.
    pub tick_ms: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,orbis_texture=trace").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for SurfaceConfig {
    fn default() -> Self {
        let settings = SynthesisSettings::default();
        Self {
            width: settings.width,
            height: settings.height,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let settings = SynthesisSettings::default();
        Self {
            frame_count: settings.frame_count,
            fps: settings.fps,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            subdivisions: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("orbis-output"),
            ticks: 16,
            tick_ms: 125,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Settings for [`PlanetTextureSet::new`](orbis_texture::PlanetTextureSet::new).
    pub fn synthesis_settings(&self) -> SynthesisSettings {
        SynthesisSettings {
            width: self.surface.width,
            height: self.surface.height,
            frame_count: self.animation.frame_count,
            fps: self.animation.fps,
            paint: self.paint.clone(),
        }
    }

    /// Per-user config directory: `<platform config dir>/orbis`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join("orbis"))
            .ok_or(ConfigError::NoConfigDir)
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Re-read the file: returns `Some(new_config)` if it differs from `self`,
    /// `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use orbis_texture::ShimmerProfile;

    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1024"));
        assert!(ron_str.contains("frame_count: 8"));
        assert!(ron_str.contains("seed: 4372857"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.animation.fps = Some(12.5);
        config.paint.shimmer = ShimmerProfile::Swell;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(texture: (floor: 0.3), surface: (width: 256))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.texture.floor, 0.3);
        assert_eq!(config.texture.ceiling, TextureOptions::default().ceiling);
        assert_eq!(config.surface.width, 256);
        assert_eq!(config.surface.height, 1024);
        assert_eq!(config.noise, NoiseParams::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_synthesis_settings_follow_config() {
        let mut config = Config::default();
        config.surface.width = 512;
        config.surface.height = 256;
        config.animation.frame_count = 3;
        config.animation.fps = Some(30.0);
        config.paint.disc_radius = 2.0;

        let settings = config.synthesis_settings();
        assert_eq!((settings.width, settings.height), (512, 256));
        assert_eq!(settings.frame_count, 3);
        assert_eq!(settings.effective_fps(), 30.0);
        assert_eq!(settings.paint.disc_radius, 2.0);
    }

    #[test]
    fn test_default_settings_match_texture_defaults() {
        assert_eq!(
            Config::default().synthesis_settings(),
            SynthesisSettings::default()
        );
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.texture.water_depth = 0.1;
        config.noise.seed = 99;
        config.output.directory = PathBuf::from("/tmp/planets");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.mesh.subdivisions = 2;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.mesh.subdivisions), Some(2));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::default().reload(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_allowed() {
        let ron_str = "// planet settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
