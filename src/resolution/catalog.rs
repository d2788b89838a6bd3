// src/resolution/catalog.rs
//! The display-settings registry: every known mode, keyed by index.

use super::{Overscan, ResolutionInfo, RES_CUSTOM, RES_DESKTOP, RES_WINDOW};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Registry shared between the windowing system and settings UI code.
pub type SharedDisplaySettings = Arc<RwLock<DisplaySettings>>;

/// User calibration of a single mode, matched by its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionCalibration {
    pub mode: String,
    pub overscan: Overscan,
    pub subtitles: i32,
    pub pixel_ratio: f32,
}

/// Ordered catalog of display modes.
///
/// Index `RES_WINDOW` is the windowed mode, `RES_DESKTOP` the native mode and
/// everything from `RES_CUSTOM` on was enumerated from the platform.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    resolutions: Vec<ResolutionInfo>,
    calibrations: Vec<ResolutionCalibration>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySettings {
    pub fn new() -> Self {
        DisplaySettings {
            resolutions: vec![ResolutionInfo::default(); RES_CUSTOM],
            calibrations: Vec::new(),
        }
    }

    /// Wraps a fresh registry for sharing.
    pub fn shared() -> SharedDisplaySettings {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn resolution_info(&self, index: usize) -> Option<&ResolutionInfo> {
        self.resolutions.get(index)
    }

    pub fn resolution_info_mut(&mut self, index: usize) -> Option<&mut ResolutionInfo> {
        self.resolutions.get_mut(index)
    }

    /// Number of catalog entries, window and desktop included.
    pub fn len(&self) -> usize {
        self.resolutions.len()
    }

    /// Never true: window and desktop entries always exist.
    pub fn is_empty(&self) -> bool {
        self.resolutions.is_empty()
    }

    pub fn window(&self) -> &ResolutionInfo {
        &self.resolutions[RES_WINDOW]
    }

    pub fn window_mut(&mut self) -> &mut ResolutionInfo {
        &mut self.resolutions[RES_WINDOW]
    }

    pub fn desktop(&self) -> &ResolutionInfo {
        &self.resolutions[RES_DESKTOP]
    }

    pub fn desktop_mut(&mut self) -> &mut ResolutionInfo {
        &mut self.resolutions[RES_DESKTOP]
    }

    pub fn desktop_refresh_rate(&self) -> f32 {
        self.desktop().refresh_rate
    }

    /// Appends a custom mode and returns its index.
    pub fn add_resolution(&mut self, info: ResolutionInfo) -> usize {
        trace!("Adding resolution {} at index {}", info.mode, self.resolutions.len());
        self.resolutions.push(info);
        self.resolutions.len() - 1
    }

    /// Drops every platform-enumerated mode.
    pub fn clear_custom_resolutions(&mut self) {
        self.resolutions.truncate(RES_CUSTOM);
    }

    pub fn calibrations(&self) -> &[ResolutionCalibration] {
        &self.calibrations
    }

    pub fn set_calibrations(&mut self, calibrations: Vec<ResolutionCalibration>) {
        self.calibrations = calibrations;
    }

    /// Applies stored calibrations to every fullscreen mode with a matching
    /// label, clamping each value to a sane range for that mode.
    pub fn apply_calibrations(&mut self) {
        for res in self.resolutions.iter_mut().skip(RES_DESKTOP) {
            let Some(cal) = self.calibrations.iter().find(|c| c.mode == res.mode) else {
                continue;
            };

            let w = i64::from(res.width);
            let h = i64::from(res.height);
            res.overscan = Overscan {
                left: clamp_to(cal.overscan.left, -w / 4, w / 4),
                top: clamp_to(cal.overscan.top, -h / 4, h / 4),
                right: clamp_to(cal.overscan.right, w / 2, w * 5 / 4),
                bottom: clamp_to(cal.overscan.bottom, h / 2, h * 5 / 4),
            };
            res.subtitles = clamp_to(cal.subtitles, h / 2, h * 5 / 4);
            res.pixel_ratio = cal.pixel_ratio.clamp(0.5, 2.0);
            debug!("Applied calibration to {}", res.mode);
        }
    }

    /// Stores the current calibration of entry `index`, replacing any
    /// previous calibration with the same label. Returns false when the
    /// index does not exist.
    pub fn update_calibration(&mut self, index: usize) -> bool {
        let Some(res) = self.resolutions.get(index) else {
            return false;
        };
        let cal = ResolutionCalibration {
            mode: res.mode.clone(),
            overscan: res.overscan,
            subtitles: res.subtitles,
            pixel_ratio: res.pixel_ratio,
        };
        match self.calibrations.iter_mut().find(|c| c.mode == cal.mode) {
            Some(existing) => *existing = cal,
            None => self.calibrations.push(cal),
        }
        true
    }
}

/// Clamps `value` into `[min, max]`, with bounds computed wide and
/// saturated back into `i32`.
fn clamp_to(value: i32, min: i64, max: i64) -> i32 {
    let saturate = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    value.clamp(saturate(min), saturate(max))
}
