//! Headless windowing driver.
//!
//! Reports a configured mode list and counts message pumps. Used by tests
//! and by the demo binary on machines without a display.

use crate::config::HeadlessConfig;
use crate::display::driver::WindowingDriver;
use crate::resolution::DisplayMode;
use crate::screensaver::OsScreenSaverImpl;
use anyhow::{anyhow, Result};
use log::{info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct HeadlessDriver {
    output: String,
    desktop: DisplayMode,
    modes: Vec<DisplayMode>,
    pumps: usize,
    quit_requested: bool,
    enumeration_fails: bool,
    limited_color: bool,
    clipboard: String,
    screen_saver: Option<HeadlessScreenSaver>,
}

impl HeadlessDriver {
    pub fn new(config: &HeadlessConfig) -> Self {
        info!(
            "HeadlessDriver::new() output={} with {} modes",
            config.output,
            config.modes.len()
        );
        HeadlessDriver {
            output: config.output.clone(),
            desktop: config.desktop,
            modes: config.modes.clone(),
            pumps: 0,
            quit_requested: false,
            enumeration_fails: false,
            limited_color: false,
            clipboard: String::new(),
            screen_saver: None,
        }
    }

    /// Offers a screen-saver hook whose state can be observed.
    pub fn with_screen_saver(mut self, screen_saver: HeadlessScreenSaver) -> Self {
        self.screen_saver = Some(screen_saver);
        self
    }

    pub fn with_limited_color(mut self, limited: bool) -> Self {
        self.limited_color = limited;
        self
    }

    pub fn set_clipboard_text(&mut self, text: impl Into<String>) {
        self.clipboard = text.into();
    }

    /// Makes mode queries fail, as a disconnected output would.
    pub fn set_enumeration_fails(&mut self, fails: bool) {
        self.enumeration_fails = fails;
    }

    /// Replaces the reported mode list.
    pub fn set_modes(&mut self, desktop: DisplayMode, modes: Vec<DisplayMode>) {
        self.desktop = desktop;
        self.modes = modes;
    }

    /// The next pump reports a quit request.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn pump_count(&self) -> usize {
        self.pumps
    }
}

impl WindowingDriver for HeadlessDriver {
    fn output_name(&self) -> String {
        self.output.clone()
    }

    fn desktop_mode(&self) -> Result<DisplayMode> {
        if self.enumeration_fails {
            return Err(anyhow!("output {} is not connected", self.output));
        }
        Ok(self.desktop)
    }

    fn enumerate_modes(&self) -> Result<Vec<DisplayMode>> {
        if self.enumeration_fails {
            return Err(anyhow!("output {} is not connected", self.output));
        }
        Ok(self.modes.clone())
    }

    fn message_pump(&mut self) -> bool {
        self.pumps += 1;
        trace!("HeadlessDriver: message pump #{}", self.pumps);
        !std::mem::take(&mut self.quit_requested)
    }

    fn os_screen_saver_impl(&mut self) -> Option<Box<dyn OsScreenSaverImpl>> {
        self.screen_saver
            .clone()
            .map(|s| Box::new(s) as Box<dyn OsScreenSaverImpl>)
    }

    fn use_limited_color(&self) -> bool {
        self.limited_color
    }

    fn clipboard_text(&self) -> String {
        self.clipboard.clone()
    }
}

/// Screen-saver hook that only records whether it is inhibited.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScreenSaver {
    inhibited: Arc<AtomicBool>,
}

impl HeadlessScreenSaver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inhibited(&self) -> bool {
        self.inhibited.load(Ordering::SeqCst)
    }
}

impl OsScreenSaverImpl for HeadlessScreenSaver {
    fn inhibit(&mut self) {
        info!("HeadlessScreenSaver: inhibit");
        self.inhibited.store(true, Ordering::SeqCst);
    }

    fn uninhibit(&mut self) {
        info!("HeadlessScreenSaver: uninhibit");
        self.inhibited.store(false, Ordering::SeqCst);
    }
}
