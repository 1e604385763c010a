// Settings service
// Loads and stores calendar settings as TOML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::Settings;

const SETTINGS_FILE: &str = "calendar.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to `calendar.toml` in the platform config directory.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "calendar-grid")
            .ok_or_else(|| anyhow!("No home directory to place settings in"))?;
        Ok(dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the settings file.
    pub fn load(&self) -> Result<Settings> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;

        log::info!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<Settings> {
        if !self.path.exists() {
            log::warn!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        self.load()
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
