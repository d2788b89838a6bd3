// src/lib.rs
//! Base windowing-system layer of a media center.
//!
//! Keeps the catalog of display modes, builds the resolution and
//! refresh-rate choices a settings menu offers, drives registered
//! render-loop clients once per tick, suppresses the OS screen saver and
//! probes (and on Windows toggles) HDR on the active display.

pub mod config;
pub mod display;
pub mod error;
pub mod hdr;
pub mod render_loop;
pub mod resolution;
pub mod screensaver;
pub mod winsystem;

pub use config::{Config, SettingsStore};
pub use display::{HeadlessDriver, WindowingDriver};
pub use error::WinSystemError;
pub use hdr::{HdrCapability, HdrProbe, HdrStatus, HdrToggle};
pub use render_loop::{RenderLoop, RenderLoopDispatcher, RenderLoopHandle};
pub use resolution::{
    DisplayMode, DisplaySettings, RefreshRate, ResolutionFlags, ResolutionInfo, ResolutionWhr,
};
pub use winsystem::WinSystem;

/// HDR probe for the platform the crate was built for.
#[cfg(target_os = "windows")]
pub fn platform_hdr() -> Box<dyn HdrCapability> {
    Box::new(HdrProbe::new(hdr::windows::DisplayConfigHdr::new()))
}

/// HDR probe for the platform the crate was built for.
#[cfg(not(target_os = "windows"))]
pub fn platform_hdr() -> Box<dyn HdrCapability> {
    Box::new(HdrProbe::new(hdr::NoHdrSupport))
}
