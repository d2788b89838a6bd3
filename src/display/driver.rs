// src/display/driver.rs
//! WindowingDriver trait - the platform primitives the windowing system needs.
//!
//! Backends provide mode enumeration and a message pump; everything else
//! (catalog bookkeeping, selection, render-loop dispatch) lives in
//! `WinSystem`.
//!
//! ## Lifecycle
//! 1. Construct the driver (connect to the display server, create nothing)
//! 2. `WinSystem::init_window_system` - enumerate modes once
//! 3. `message_pump` once per render-loop tick
//! 4. `Drop` - cleanup

use crate::resolution::{DisplayMode, Overscan, ResolutionInfo};
use crate::screensaver::OsScreenSaverImpl;
use anyhow::Result;

/// Minimal platform-specific windowing interface.
pub trait WindowingDriver {
    /// Name of the output modes are enumerated on, e.g. `"HDMI-1"`.
    fn output_name(&self) -> String;

    /// The mode the output is currently running.
    fn desktop_mode(&self) -> Result<DisplayMode>;

    /// Every mode the output supports, in platform order.
    fn enumerate_modes(&self) -> Result<Vec<DisplayMode>>;

    /// Processes pending window-system messages. Returns false when the
    /// platform asked the application to quit.
    fn message_pump(&mut self) -> bool;

    /// Resets the overscan of `res` after its size changed.
    fn reset_overscan(&self, res: &mut ResolutionInfo) {
        res.overscan = Overscan::full(res.width, res.height);
    }

    /// The platform's screen-saver hook, if it has one.
    fn os_screen_saver_impl(&mut self) -> Option<Box<dyn OsScreenSaverImpl>> {
        None
    }

    fn use_limited_color(&self) -> bool {
        false
    }

    fn clipboard_text(&self) -> String {
        String::new()
    }
}
