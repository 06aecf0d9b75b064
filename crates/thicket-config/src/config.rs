//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World-level terrain settings.
    pub world: WorldConfig,
    /// Chunk worker pool and preview region settings.
    pub generation: GenerationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Terrain preset. Only `Amplified` changes the biome blend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WorldType {
    #[default]
    Default,
    Amplified,
}

impl std::str::FromStr for WorldType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "normal" => Ok(Self::Default),
            "amplified" => Ok(Self::Amplified),
            other => Err(ConfigError::InvalidValue {
                field: "world_type",
                reason: format!("unknown world type `{other}`"),
            }),
        }
    }
}

/// World settings shared by every chunk the generator produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. Every chunk is a pure function of this and its coordinate.
    pub seed: u64,
    /// Terrain preset.
    pub world_type: WorldType,
    /// Place a bedrock floor at the bottom of each column.
    pub generate_bedrock: bool,
    /// Compress the raw terrain into the lower half of the column.
    pub squish: bool,
    /// Block layer below which open air is flooded with water.
    pub sea_level: i32,
}

/// Chunk worker pool and CLI preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Worker threads for background generation (0 = one per core, minus one).
    pub worker_threads: usize,
    /// Bound on queued requests and finished results.
    pub queue_capacity: usize,
    /// Radius in chunks of the square region the preview tool generates.
    pub region_radius: i32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_type: WorldType::Default,
            generate_bedrock: true,
            squish: true,
            sea_level: 31,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            queue_capacity: 256,
            region_radius: 2,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

/// Platform config directory for the generator, if one can be resolved.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("thicket"))
}

/// File name of the persisted settings inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

// --- Validation ---

impl WorldConfig {
    /// Reject settings the generator cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..255).contains(&self.sea_level) {
            return Err(ConfigError::InvalidValue {
                field: "sea_level",
                reason: format!("{} is outside 1..255", self.sea_level),
            });
        }
        Ok(())
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.region_radius < 0 {
            return Err(ConfigError::InvalidValue {
                field: "region_radius",
                reason: format!("{} is negative", self.region_radius),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.generation.validate()
    }

    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Wrote default settings to {}", path.display());
            return Ok(config);
        }

        let config = read_config(&path)?;
        log::info!("Loaded settings from {} (seed {})", path.display(), config.world.seed);
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .struct_names(false)
            .enumerate_arrays(false);
        let encoded = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Encode)?;
        std::fs::write(&path, encoded).map_err(write_err)
    }

    /// Re-read `config.ron`: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_config(&config_dir.join(CONFIG_FILE_NAME))?;
        if &fresh == self {
            return Ok(None);
        }
        log::info!("Settings changed on disk (seed {} -> {})", self.world.seed, fresh.world.seed);
        Ok(Some(fresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("sea_level: 31"));
        assert!(ron_str.contains("world_type: Default"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.world.world_type = WorldType::Amplified;
        config.world.seed = 0xdead_beef;
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(world: (seed: 7))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.world.seed, 7);
        assert!(config.world.squish);
        assert_eq!(config.generation, GenerationConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_world_type_from_str() {
        assert_eq!("AMPLIFIED".parse::<WorldType>().unwrap(), WorldType::Amplified);
        assert_eq!("normal".parse::<WorldType>().unwrap(), WorldType::Default);
        assert!("flat".parse::<WorldType>().is_err());
    }

    #[test]
    fn test_sea_level_validation() {
        let mut world = WorldConfig::default();
        assert!(world.validate().is_ok());
        world.sea_level = 0;
        assert!(matches!(
            world.validate(),
            Err(ConfigError::InvalidValue { field: "sea_level", .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.world.seed = 42;
        config.world.generate_bedrock = false;
        config.generation.worker_threads = 3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_generation_validation() {
        let mut config = Config::default();
        config.generation.queue_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "queue_capacity", .. })
        ));
        config.generation.queue_capacity = 8;
        config.generation.region_radius = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "(world: (seed: ").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_load_rejects_invalid_sea_level() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "(world: (sea_level: 400))").unwrap();
        assert!(Config::load_or_create(dir.path()).is_err());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.world.seed = 1234;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().world.seed, 1234);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }
}
