// src/config.rs

//! Configuration structures and the settings store of the windowing system.
//!
//! Every struct deserializes from JSON with defaults for missing fields, so
//! a partial (or empty) file is a valid configuration. `Config` doubles as
//! the settings store the windowing system reads its named settings from.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::resolution::{DisplayMode, ResolutionCalibration, ResolutionFlags};

/// Desired number of swap-chain buffers.
pub const SETTING_VIDEOSCREEN_NOOFBUFFERS: &str = "videoscreen.noofbuffers";
/// Whether the active display currently runs in HDR.
pub const SETTING_WINSYSTEM_IS_HDR_DISPLAY: &str = "winsystem.ishdrdisplay";

/// Named settings read and written by the windowing system.
pub trait SettingsStore: Send {
    fn get_int(&self, key: &str) -> Option<i64>;
    fn get_bool(&self, key: &str) -> Option<bool>;
    /// Returns false when `key` is not a boolean setting.
    fn set_bool(&mut self, key: &str, value: bool) -> bool;
}

// --- Top-Level Configuration Structure ---

/// Complete configuration of the windowing system.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub video_screen: VideoScreenConfig,
    pub winsystem: WinSystemConfig,
    /// Per-mode calibrations, keyed by mode label.
    pub calibrations: Vec<ResolutionCalibration>,
    /// Mode list reported by the headless driver.
    pub headless: HeadlessConfig,
}

impl Config {
    /// Reads a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reads `path` when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Config::default();
        }
        match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Config::default()
            }
        }
    }

    /// Copies back the settings the windowing system writes at runtime.
    pub fn sync_from(&mut self, store: &dyn SettingsStore) {
        if let Some(hdr) = store.get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY) {
            self.winsystem.is_hdr_display = hdr;
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

impl SettingsStore for Config {
    fn get_int(&self, key: &str) -> Option<i64> {
        match key {
            SETTING_VIDEOSCREEN_NOOFBUFFERS => Some(i64::from(self.video_screen.no_of_buffers)),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match key {
            SETTING_WINSYSTEM_IS_HDR_DISPLAY => Some(self.winsystem.is_hdr_display),
            _ => None,
        }
    }

    fn set_bool(&mut self, key: &str, value: bool) -> bool {
        match key {
            SETTING_WINSYSTEM_IS_HDR_DISPLAY => {
                self.winsystem.is_hdr_display = value;
                true
            }
            _ => false,
        }
    }
}

// --- Video Screen Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoScreenConfig {
    /// Number of swap-chain buffers (2 = double, 3 = triple buffering).
    pub no_of_buffers: u32,
}

impl Default for VideoScreenConfig {
    fn default() -> Self {
        VideoScreenConfig { no_of_buffers: 2 }
    }
}

// --- Windowing System Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WinSystemConfig {
    /// Last known HDR state of the display. The settings store rewrites it on
    /// init and toggle; `sync_from` carries it back before saving.
    pub is_hdr_display: bool,
    /// Windowed-mode width; 0 picks the built-in default.
    pub window_width: u32,
    /// Windowed-mode height; 0 picks the built-in default.
    pub window_height: u32,
}

// --- Headless Driver Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadlessConfig {
    pub output: String,
    pub desktop: DisplayMode,
    pub modes: Vec<DisplayMode>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        let progressive = ResolutionFlags::empty();
        let desktop = DisplayMode::new(1920, 1080, 59.94, progressive);
        HeadlessConfig {
            output: "HEADLESS-1".to_string(),
            desktop,
            modes: vec![
                desktop,
                DisplayMode::new(1920, 1080, 60.0, progressive),
                DisplayMode::new(1920, 1080, 50.0, progressive),
                DisplayMode::new(1920, 1080, 23.976, progressive),
                DisplayMode::new(1920, 1080, 25.0, ResolutionFlags::INTERLACED),
                DisplayMode::new(1280, 720, 60.0, progressive),
                DisplayMode::new(1280, 720, 50.0, progressive),
                DisplayMode::new(3840, 2160, 30.0, progressive),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.video_screen.no_of_buffers, 2);
        assert!(!config.winsystem.is_hdr_display);
        assert_eq!(config.headless.output, "HEADLESS-1");
        assert!(config.calibrations.is_empty());
    }

    #[test_log::test]
    fn partial_json_keeps_other_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "video_screen": { "no_of_buffers": 3 },
                "headless": { "modes": [ { "width": 640, "height": 480, "refresh_rate": 60.0 } ] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.video_screen.no_of_buffers, 3);
        assert_eq!(config.headless.modes.len(), 1);
        assert_eq!(config.headless.modes[0].flags, ResolutionFlags::empty());
        assert_eq!(config.headless.desktop.width, 1920);
    }

    #[test_log::test]
    fn settings_store_reads_and_writes_named_keys() {
        let mut config = Config::default();
        assert_eq!(config.get_int(SETTING_VIDEOSCREEN_NOOFBUFFERS), Some(2));
        assert_eq!(config.get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(false));

        assert!(config.set_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY, true));
        assert_eq!(config.get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(true));

        assert!(!config.set_bool("no.such.setting", true));
        assert_eq!(config.get_int("no.such.setting"), None);
    }

    #[test_log::test]
    fn config_survives_a_save_and_load() -> Result<()> {
        let path = std::env::temp_dir().join(format!("winsystem-config-{}.json", std::process::id()));
        let mut config = Config::default();
        config.winsystem.window_width = 1024;
        config.calibrations.push(ResolutionCalibration {
            mode: "HEADLESS-1: 1280x720 @ 60.00Hz".to_string(),
            overscan: crate::resolution::Overscan::full(1280, 720),
            subtitles: 690,
            pixel_ratio: 1.0,
        });

        config.save(&path)?;
        let loaded = Config::load(&path)?;
        fs::remove_file(&path)?;

        assert_eq!(loaded.winsystem.window_width, 1024);
        assert_eq!(loaded.calibrations, config.calibrations);
        Ok(())
    }

    #[test_log::test]
    fn runtime_hdr_flag_is_saved_after_sync() -> Result<()> {
        let path = std::env::temp_dir().join(format!("winsystem-sync-{}.json", std::process::id()));
        let mut runtime: Box<dyn SettingsStore> = Box::new(Config::default());
        assert!(runtime.set_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY, true));

        let mut persisted = Config::default();
        persisted.sync_from(runtime.as_ref());
        persisted.save(&path)?;
        let loaded = Config::load(&path)?;
        fs::remove_file(&path)?;

        assert!(loaded.winsystem.is_hdr_display);
        Ok(())
    }

    #[test_log::test]
    fn unreadable_config_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("winsystem-broken-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let config = Config::load_or_default(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(config.video_screen.no_of_buffers, 2);
    }
}
