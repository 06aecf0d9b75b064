//! Configuration system for the Thicket terrain generator.
//!
//! Settings persist to disk as `config.ron`. CLI flags parsed with clap
//! override the loaded values, and unknown or missing fields fall back to
//! defaults so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, GenerationConfig, WorldConfig, WorldType,
    default_config_dir,
};
pub use error::ConfigError;
