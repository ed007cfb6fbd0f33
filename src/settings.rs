use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "komikrat";

/// Rendering strategy for chapter views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMode {
    /// One page at a time, driven by the page navigator.
    #[default]
    Phone,
    /// Every page of the chapter stacked vertically.
    Classic,
}

impl ReadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingMode::Phone => "Phone",
            ReadingMode::Classic => "Classic",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ReadingMode::Phone => ReadingMode::Classic,
            ReadingMode::Classic => ReadingMode::Phone,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub reading_mode: ReadingMode,

    #[serde(default = "default_decode_workers")]
    pub decode_workers: usize,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_decode_workers() -> usize {
    crate::preload::DEFAULT_WORKERS
}

fn default_cache_capacity() -> usize {
    crate::preload::DEFAULT_CACHE_CAPACITY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            reading_mode: ReadingMode::default(),
            decode_workers: default_decode_workers(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Future migrations go here.

    settings.version = CURRENT_VERSION;
}

pub fn save_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, cannot save settings");
        return;
    };

    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, &path);
    }
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = match serde_yaml::to_string(settings) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

// Public API for accessing/modifying settings

pub fn get_settings() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_reading_mode() -> ReadingMode {
    SETTINGS.read().map(|s| s.reading_mode).unwrap_or_default()
}

/// Set and persist the reading mode immediately; every chapter view reads it
/// back on entry.
pub fn set_reading_mode(mode: ReadingMode) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.reading_mode = mode;
    }
    save_settings();
}

pub fn toggle_reading_mode() -> ReadingMode {
    let mode = get_reading_mode().toggled();
    set_reading_mode(mode);
    mode
}

pub fn get_decode_workers() -> usize {
    SETTINGS
        .read()
        .map(|s| s.decode_workers.max(1))
        .unwrap_or_else(|_| default_decode_workers())
}

pub fn get_cache_capacity() -> usize {
    SETTINGS
        .read()
        .map(|s| s.cache_capacity.max(1))
        .unwrap_or_else(|_| default_cache_capacity())
}
