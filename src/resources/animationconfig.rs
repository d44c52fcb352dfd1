//! Screen and playback configuration resource.
//!
//! Settings are read from an INI file. Missing keys keep their defaults, so
//! a partial or absent file is fine.
//!
//! # Configuration File Format
//!
//! ```ini
//! [screen]
//! max_pictures = 100
//!
//! [variables]
//! count = 1000
//!
//! [playback]
//! frames = 600
//! snapshot_every = 1
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_MAX_PICTURES: usize = 100;
const DEFAULT_VARIABLE_COUNT: usize = 1000;
const DEFAULT_FRAMES: u64 = 600;
const DEFAULT_SNAPSHOT_EVERY: u64 = 1;
const DEFAULT_CONFIG_PATH: &str = "./pictureanim.ini";

/// Configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Number of picture slots on the screen.
    pub max_pictures: usize,
    /// Number of declared game variables.
    pub variable_count: usize,
    /// Frames the headless player runs for.
    pub frames: u64,
    /// Print a snapshot every this many frames.
    pub snapshot_every: u64,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            max_pictures: DEFAULT_MAX_PICTURES,
            variable_count: DEFAULT_VARIABLE_COUNT,
            frames: DEFAULT_FRAMES,
            snapshot_every: DEFAULT_SNAPSHOT_EVERY,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Zero counts are
    /// raised to 1.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(max) = config.getuint("screen", "max_pictures").ok().flatten() {
            self.max_pictures = (max as usize).max(1);
        }
        if let Some(count) = config.getuint("variables", "count").ok().flatten() {
            self.variable_count = (count as usize).max(1);
        }
        if let Some(frames) = config.getuint("playback", "frames").ok().flatten() {
            self.frames = frames;
        }
        if let Some(every) = config.getuint("playback", "snapshot_every").ok().flatten() {
            self.snapshot_every = every.max(1);
        }

        info!(
            "Loaded config: {} pictures, {} variables, {} frames, snapshot every {}",
            self.max_pictures, self.variable_count, self.frames, self.snapshot_every
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("screen", "max_pictures", Some(self.max_pictures.to_string()));
        config.set("variables", "count", Some(self.variable_count.to_string()));
        config.set("playback", "frames", Some(self.frames.to_string()));
        config.set(
            "playback",
            "snapshot_every",
            Some(self.snapshot_every.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
