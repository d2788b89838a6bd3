// src/winsystem/mod.rs
//! WinSystem - the platform-neutral half of the windowing system.
//!
//! Owns the windowing driver and wires it to the resolution catalog, the
//! settings store, the render-loop dispatcher, the HDR probe and the OS
//! screen-saver manager. The catalog and settings store are injected so the
//! settings UI and persistence layer can share them.

#[cfg(test)]
mod tests;

use crate::config::{SettingsStore, SETTING_VIDEOSCREEN_NOOFBUFFERS, SETTING_WINSYSTEM_IS_HDR_DISPLAY};
use crate::display::WindowingDriver;
use crate::error::{Result, WinSystemError};
use crate::hdr::{HdrCapability, HdrProbe, HdrStatus, HdrToggle, NoHdrSupport};
use crate::render_loop::{RenderLoop, RenderLoopDispatcher, RenderLoopHandle};
use crate::resolution::{
    self, DisplaySettings, RefreshRate, ResolutionFlags, ResolutionInfo, ResolutionWhr,
    SharedDisplaySettings,
};
use crate::screensaver::OsScreenSaverManager;
use log::{debug, info, warn};
use std::sync::{Arc, PoisonError, RwLockReadGuard, RwLockWriteGuard};

const DEFAULT_NO_OF_BUFFERS: i64 = 2;

pub struct WinSystem<D: WindowingDriver> {
    driver: D,
    display_settings: SharedDisplaySettings,
    settings: Box<dyn SettingsStore>,
    render_loop: Arc<RenderLoopDispatcher>,
    hdr: Box<dyn HdrCapability>,
    screen_saver: Option<OsScreenSaverManager>,
}

impl<D: WindowingDriver> WinSystem<D> {
    /// Creates a windowing system without HDR support.
    pub fn new(
        driver: D,
        display_settings: SharedDisplaySettings,
        settings: Box<dyn SettingsStore>,
    ) -> Self {
        WinSystem {
            driver,
            display_settings,
            settings,
            render_loop: Arc::new(RenderLoopDispatcher::new()),
            hdr: Box::new(HdrProbe::new(NoHdrSupport)),
            screen_saver: None,
        }
    }

    /// Replaces the HDR probe.
    pub fn with_hdr(mut self, hdr: Box<dyn HdrCapability>) -> Self {
        self.hdr = hdr;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn display_settings(&self) -> SharedDisplaySettings {
        Arc::clone(&self.display_settings)
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    fn catalog(&self) -> RwLockReadGuard<'_, DisplaySettings> {
        self.display_settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_mut(&self) -> RwLockWriteGuard<'_, DisplaySettings> {
        self.display_settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // --- Lifecycle ---

    /// Enumerates modes, applies calibrations and records the HDR state.
    pub fn init_window_system(&mut self) -> bool {
        self.update_resolutions();
        self.catalog_mut().apply_calibrations();
        let hdr = self.hdr.is_enabled();
        self.settings.set_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY, hdr);
        info!(
            "Window system initialised: {} resolutions, HDR {}",
            self.catalog().len(),
            if hdr { "on" } else { "off" }
        );
        true
    }

    pub fn destroy_window_system(&mut self) {
        self.screen_saver = None;
        debug!("Window system destroyed");
    }

    // --- Resolution catalog ---

    /// Refreshes the window entry defaults and re-enumerates desktop and
    /// custom modes from the driver.
    ///
    /// When the driver cannot report modes the previous entries are kept.
    pub fn update_resolutions(&mut self) {
        let output = self.driver.output_name();
        let desktop = self.driver.desktop_mode();
        let modes = self.driver.enumerate_modes();

        let mut catalog = self.catalog_mut();
        catalog.window_mut().apply_window_defaults();

        match desktop {
            Ok(mode) => catalog.desktop_mut().update_desktop(
                &output,
                mode.width,
                mode.height,
                mode.refresh_rate,
                mode.flags,
            ),
            Err(e) => warn!("Desktop mode of {} unavailable: {:#}", output, e),
        }

        match modes {
            Ok(modes) => {
                catalog.clear_custom_resolutions();
                for mode in modes {
                    catalog.add_resolution(ResolutionInfo::desktop(
                        &output,
                        mode.width,
                        mode.height,
                        mode.refresh_rate,
                        mode.flags,
                    ));
                }
                debug!("Enumerated {} modes on {}", catalog.len(), output);
            }
            Err(e) => warn!("Mode enumeration on {} failed: {:#}", output, e),
        }
    }

    /// Resizes the windowed mode and resets its overscan.
    pub fn set_window_resolution(&mut self, width: u32, height: u32) {
        let mut catalog = self.catalog_mut();
        let window = catalog.window_mut();
        window.set_window_size(width, height);
        self.driver.reset_overscan(window);
    }

    pub fn screen_resolutions(&self, preferred_refresh_rate: f32) -> Vec<ResolutionWhr> {
        resolution::screen_resolutions(&self.catalog(), preferred_refresh_rate)
    }

    pub fn refresh_rates(&self, width: u32, height: u32, flags: ResolutionFlags) -> Vec<RefreshRate> {
        resolution::refresh_rates(&self.catalog(), width, height, flags)
    }

    pub fn default_refresh_rate(&self, rates: &[RefreshRate]) -> Result<RefreshRate> {
        resolution::default_refresh_rate(&self.catalog(), rates)
    }

    /// Copy of catalog entry `index`.
    pub fn resolution_info(&self, index: usize) -> Result<ResolutionInfo> {
        let catalog = self.catalog();
        catalog
            .resolution_info(index)
            .cloned()
            .ok_or(WinSystemError::InvalidResolutionIndex {
                index,
                len: catalog.len(),
            })
    }

    // --- Settings and platform queries ---

    pub fn no_of_buffers(&self) -> i64 {
        self.settings
            .get_int(SETTING_VIDEOSCREEN_NOOFBUFFERS)
            .unwrap_or(DEFAULT_NO_OF_BUFFERS)
    }

    pub fn use_limited_color(&self) -> bool {
        self.driver.use_limited_color()
    }

    pub fn clipboard_text(&self) -> String {
        self.driver.clipboard_text()
    }

    /// The OS screen-saver manager, created on first use. `None` when the
    /// platform has no screen-saver hook.
    pub fn os_screen_saver(&mut self) -> Option<&OsScreenSaverManager> {
        if self.screen_saver.is_none() {
            if let Some(imp) = self.driver.os_screen_saver_impl() {
                debug!("Creating OS screen saver manager");
                self.screen_saver = Some(OsScreenSaverManager::new(imp));
            }
        }
        self.screen_saver.as_ref()
    }

    // --- Render loop ---

    pub fn register_render_loop<C: RenderLoop + 'static>(&self, client: &Arc<C>) -> RenderLoopHandle {
        self.render_loop.register(client)
    }

    pub fn unregister_render_loop(&self, handle: RenderLoopHandle) {
        self.render_loop.unregister(handle)
    }

    /// Dispatcher handle for subsystems registering from other threads.
    pub fn render_loop_dispatcher(&self) -> Arc<RenderLoopDispatcher> {
        Arc::clone(&self.render_loop)
    }

    /// One tick: pump platform messages, then notify every client. Returns
    /// false when the platform asked to quit.
    pub fn drive_render_loop(&mut self) -> bool {
        let running = self.driver.message_pump();
        self.render_loop.notify_frame();
        running
    }

    // --- HDR ---

    pub fn hdr_display_status(&self) -> HdrStatus {
        self.hdr.status()
    }

    pub fn is_display_hdr_enabled(&self) -> bool {
        self.hdr.is_enabled()
    }

    /// Flips HDR on the active display and records the resulting state.
    pub fn toggle_hdr(&mut self) -> Option<HdrToggle> {
        let toggle = self.hdr.toggle();
        if toggle.is_some() {
            let enabled = self.hdr.is_enabled();
            self.settings.set_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY, enabled);
        }
        toggle
    }
}
