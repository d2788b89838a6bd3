// src/resolution/mod.rs
//! Display-mode descriptors and the catalog that owns them.
//!
//! - `ResolutionInfo`: one catalog entry (window, desktop or a custom mode)
//! - `catalog`: the display-settings registry, indexed by `RES_*`
//! - `selector`: deduplicated views for resolution and refresh-rate menus

pub mod catalog;
pub mod selector;


pub use catalog::{DisplaySettings, ResolutionCalibration, SharedDisplaySettings};
pub use selector::{
    default_refresh_rate, refresh_rates, screen_resolutions, RefreshRate, ResolutionWhr,
};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Catalog index of the windowed mode.
pub const RES_WINDOW: usize = 0;
/// Catalog index of the native desktop mode.
pub const RES_DESKTOP: usize = 1;
/// First catalog index holding a platform-enumerated mode.
pub const RES_CUSTOM: usize = 2;

/// Fraction of the screen height at which the subtitle baseline sits.
const SUBTITLE_BASELINE: f64 = 0.965;

const DEFAULT_WINDOW_WIDTH: u32 = 720;
const DEFAULT_WINDOW_HEIGHT: u32 = 480;

bitflags! {
    /// Presentation flags of a display mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ResolutionFlags: u32 {
        const INTERLACED = 1 << 0;
        const WIDESCREEN = 1 << 1;
        const PROGRESSIVE = 1 << 2;
        const MODE3D_SBS = 1 << 3; // stereo side-by-side
        const MODE3D_TB = 1 << 4; // stereo top-bottom
    }
}

impl ResolutionFlags {
    /// Bits that distinguish one mode shape from another.
    pub const MODE_MASK: Self = Self::from_bits_retain((1 << 5) - 1);

    /// The flags restricted to the mode field. Unknown bits are dropped.
    pub fn mode_flags(self) -> Self {
        self.intersection(Self::MODE_MASK)
    }
}

/// Overscan rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Overscan {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Overscan {
    /// An overscan covering exactly `width` x `height`.
    pub fn full(width: u32, height: u32) -> Self {
        Overscan {
            left: 0,
            top: 0,
            right: i32::try_from(width).unwrap_or(i32::MAX),
            bottom: i32::try_from(height).unwrap_or(i32::MAX),
        }
    }
}

/// A display mode as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: f32,
    #[serde(default)]
    pub flags: ResolutionFlags,
}

impl DisplayMode {
    pub fn new(width: u32, height: u32, refresh_rate: f32, flags: ResolutionFlags) -> Self {
        DisplayMode {
            width,
            height,
            refresh_rate,
            flags,
        }
    }
}

/// One entry of the resolution catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionInfo {
    pub width: u32,
    pub height: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub refresh_rate: f32,
    pub flags: ResolutionFlags,
    pub fullscreen: bool,
    pub pixel_ratio: f32,
    /// Subtitle baseline, in pixels from the top.
    pub subtitles: i32,
    pub overscan: Overscan,
    /// Human-readable label, also the key calibrations are stored under.
    pub mode: String,
    pub output: String,
}

impl Default for ResolutionInfo {
    fn default() -> Self {
        ResolutionInfo {
            width: 0,
            height: 0,
            screen_width: 0,
            screen_height: 0,
            refresh_rate: 0.0,
            flags: ResolutionFlags::empty(),
            fullscreen: false,
            pixel_ratio: 1.0,
            subtitles: 0,
            overscan: Overscan::default(),
            mode: String::new(),
            output: String::new(),
        }
    }
}

impl ResolutionInfo {
    /// Builds a fullscreen entry for a mode of `output`.
    pub fn desktop(
        output: &str,
        width: u32,
        height: u32,
        refresh_rate: f32,
        flags: ResolutionFlags,
    ) -> Self {
        let mut info = ResolutionInfo::default();
        info.update_desktop(output, width, height, refresh_rate, flags);
        info
    }

    /// Overwrites this entry so it describes a fullscreen mode of `output`.
    pub fn update_desktop(
        &mut self,
        output: &str,
        width: u32,
        height: u32,
        refresh_rate: f32,
        flags: ResolutionFlags,
    ) {
        self.overscan = Overscan::full(width, height);
        self.fullscreen = true;
        self.subtitles = subtitle_baseline(height);
        self.flags = flags;
        self.refresh_rate = refresh_rate;
        self.pixel_ratio = 1.0;
        self.width = width;
        self.height = height;
        self.screen_width = width;
        self.screen_height = height;
        self.mode = mode_label(output, width, height, refresh_rate, flags);
        self.output = output.to_string();
    }

    /// Fills in the windowed-mode defaults, keeping any size already set.
    pub fn apply_window_defaults(&mut self) {
        self.fullscreen = false;
        if self.width == 0 {
            self.width = DEFAULT_WINDOW_WIDTH;
        }
        if self.height == 0 {
            self.height = DEFAULT_WINDOW_HEIGHT;
        }
        self.screen_width = self.width;
        self.screen_height = self.height;
        if self.subtitles == 0 {
            self.subtitles = subtitle_baseline(self.height);
        }
        self.pixel_ratio = 1.0;
        self.mode = "Windowed".to_string();
    }

    /// Resizes the windowed mode. The caller resets the overscan afterwards.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.screen_width = width;
        self.screen_height = height;
        self.subtitles = subtitle_baseline(height);
    }

    /// The (screen width, screen height, mode flags) triple menus group by.
    pub fn shape(&self) -> (u32, u32, ResolutionFlags) {
        (self.screen_width, self.screen_height, self.flags.mode_flags())
    }
}

/// Subtitle baseline for a screen of the given height.
pub fn subtitle_baseline(height: u32) -> i32 {
    (SUBTITLE_BASELINE * f64::from(height)) as i32
}

/// Label of the form `"HDMI-1: 1920x1080 @ 59.94Hzi"`.
pub fn mode_label(
    output: &str,
    width: u32,
    height: u32,
    refresh_rate: f32,
    flags: ResolutionFlags,
) -> String {
    let mut label = format!("{}: {}x{}", output, width, height);
    if refresh_rate > 1.0 {
        label.push_str(&format!(" @ {:.2}Hz", refresh_rate));
    }
    if flags.contains(ResolutionFlags::INTERLACED) {
        label.push('i');
    }
    if flags.contains(ResolutionFlags::MODE3D_TB) {
        label.push_str("tab");
    }
    if flags.contains(ResolutionFlags::MODE3D_SBS) {
        label.push_str("sbs");
    }
    label
}
