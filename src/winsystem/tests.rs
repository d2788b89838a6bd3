// src/winsystem/tests.rs

use super::*;
use crate::config::{Config, HeadlessConfig};
use crate::display::{HeadlessDriver, HeadlessScreenSaver};
use crate::hdr::{DisplayConfigService, DisplayTarget, STATE_CAPABLE_OFF, STATE_CAPABLE_ON};
use crate::resolution::{DisplayMode, Overscan, ResolutionCalibration, RES_CUSTOM, RES_DESKTOP, RES_WINDOW};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;

// --- Test Helpers ---

fn headless_config() -> HeadlessConfig {
    let flags = ResolutionFlags::empty();
    HeadlessConfig {
        output: "TEST-1".to_string(),
        desktop: DisplayMode::new(1920, 1080, 59.94, flags),
        modes: vec![
            DisplayMode::new(1920, 1080, 60.0, flags),
            DisplayMode::new(1920, 1080, 50.0, flags),
            DisplayMode::new(1280, 720, 60.0, flags),
        ],
    }
}

fn win_system() -> WinSystem<HeadlessDriver> {
    WinSystem::new(
        HeadlessDriver::new(&headless_config()),
        DisplaySettings::shared(),
        Box::new(Config::default()),
    )
}

/// Display configuration whose state byte follows the set requests.
struct SwitchableDisplay {
    state: AtomicU8,
}

impl DisplayConfigService for Arc<SwitchableDisplay> {
    fn active_target(&self) -> Option<DisplayTarget> {
        Some(DisplayTarget::default())
    }

    fn advanced_color_state(&self, _target: DisplayTarget) -> Option<u8> {
        Some(self.state.load(Ordering::SeqCst))
    }

    fn set_advanced_color_state(&self, _target: DisplayTarget, enable: bool) -> bool {
        let state = if enable { STATE_CAPABLE_ON } else { STATE_CAPABLE_OFF };
        self.state.store(state, Ordering::SeqCst);
        true
    }
}

struct CountingClient {
    frames: AtomicUsize,
}

impl RenderLoop for CountingClient {
    fn frame_move(&self) {
        self.frames.fetch_add(1, Ordering::SeqCst);
    }
}

// --- Lifecycle and catalog ---

#[test_log::test]
fn init_populates_window_desktop_and_custom_modes() {
    let mut ws = win_system();
    assert!(ws.init_window_system());

    let window = ws.resolution_info(RES_WINDOW).unwrap();
    assert_eq!((window.width, window.height), (720, 480));
    assert_eq!(window.mode, "Windowed");

    let desktop = ws.resolution_info(RES_DESKTOP).unwrap();
    assert_eq!(desktop.mode, "TEST-1: 1920x1080 @ 59.94Hz");
    assert_eq!(desktop.output, "TEST-1");

    assert_eq!(ws.display_settings().read().unwrap().len(), RES_CUSTOM + 3);
    assert_eq!(
        ws.resolution_info(99),
        Err(WinSystemError::InvalidResolutionIndex { index: 99, len: 5 })
    );
}

#[test_log::test]
fn init_applies_stored_calibrations() {
    let settings = DisplaySettings::shared();
    settings.write().unwrap().set_calibrations(vec![ResolutionCalibration {
        mode: "TEST-1: 1280x720 @ 60.00Hz".to_string(),
        overscan: Overscan {
            left: 10,
            top: 10,
            right: 1270,
            bottom: 710,
        },
        subtitles: 680,
        pixel_ratio: 1.1,
    }]);
    let mut ws = WinSystem::new(
        HeadlessDriver::new(&headless_config()),
        settings,
        Box::new(Config::default()),
    );

    ws.init_window_system();

    let calibrated = ws.resolution_info(RES_CUSTOM + 2).unwrap();
    assert_eq!(calibrated.overscan.left, 10);
    assert_eq!(calibrated.subtitles, 680);
    assert_eq!(calibrated.pixel_ratio, 1.1);
}

#[test_log::test]
fn failed_enumeration_keeps_previous_modes() {
    let mut ws = win_system();
    ws.init_window_system();
    ws.driver_mut().set_enumeration_fails(true);

    ws.update_resolutions();

    assert_eq!(ws.display_settings().read().unwrap().len(), RES_CUSTOM + 3);
    assert_eq!(ws.resolution_info(RES_DESKTOP).unwrap().refresh_rate, 59.94);
}

#[test_log::test]
fn re_enumeration_replaces_custom_modes() {
    let mut ws = win_system();
    ws.init_window_system();
    ws.driver_mut().set_modes(
        DisplayMode::new(3840, 2160, 60.0, ResolutionFlags::empty()),
        vec![DisplayMode::new(3840, 2160, 60.0, ResolutionFlags::empty())],
    );

    ws.update_resolutions();

    let whrs = ws.screen_resolutions(0.0);
    assert_eq!(whrs.len(), 1);
    assert_eq!((whrs[0].width, whrs[0].height), (3840, 2160));
    assert_eq!(ws.resolution_info(RES_DESKTOP).unwrap().width, 3840);
}

#[test_log::test]
fn set_window_resolution_resizes_and_resets_overscan() {
    let mut ws = win_system();
    ws.init_window_system();

    ws.set_window_resolution(1024, 600);

    let window = ws.resolution_info(RES_WINDOW).unwrap();
    assert_eq!((window.screen_width, window.screen_height), (1024, 600));
    assert_eq!(window.subtitles, 579);
    assert_eq!(window.overscan, Overscan::full(1024, 600));
}

#[test_log::test]
fn selection_goes_through_the_shared_catalog() {
    let mut ws = win_system();
    ws.init_window_system();

    let whrs = ws.screen_resolutions(0.0);
    assert_eq!(whrs.len(), 2);

    let rates = ws.refresh_rates(1920, 1080, ResolutionFlags::empty());
    let values: Vec<f32> = rates.iter().map(|r| r.refresh_rate).collect();
    assert_eq!(values, vec![50.0, 59.94, 60.0]);

    let best = ws.default_refresh_rate(&rates).unwrap();
    assert_eq!(best.res_index, RES_DESKTOP);
    assert_eq!(ws.default_refresh_rate(&[]), Err(WinSystemError::NoRefreshRates));
}

// --- Settings and platform queries ---

#[test_log::test]
fn no_of_buffers_comes_from_settings() {
    let mut config = Config::default();
    config.video_screen.no_of_buffers = 3;
    let ws = WinSystem::new(
        HeadlessDriver::new(&headless_config()),
        DisplaySettings::shared(),
        Box::new(config),
    );
    assert_eq!(ws.no_of_buffers(), 3);
}

#[test_log::test]
fn platform_queries_delegate_to_the_driver() {
    let mut ws = WinSystem::new(
        HeadlessDriver::new(&headless_config()).with_limited_color(true),
        DisplaySettings::shared(),
        Box::new(Config::default()),
    );
    ws.driver_mut().set_clipboard_text("copied");

    assert!(ws.use_limited_color());
    assert_eq!(ws.clipboard_text(), "copied");
}

#[test_log::test]
fn screen_saver_manager_is_created_lazily() {
    let hook = HeadlessScreenSaver::new();
    let mut ws = WinSystem::new(
        HeadlessDriver::new(&headless_config()).with_screen_saver(hook.clone()),
        DisplaySettings::shared(),
        Box::new(Config::default()),
    );

    let guard = ws.os_screen_saver().unwrap().inhibit();
    assert!(hook.is_inhibited());
    assert!(ws.os_screen_saver().unwrap().is_inhibited());
    drop(guard);
    assert!(!hook.is_inhibited());

    ws.destroy_window_system();
    assert!(!ws.os_screen_saver().unwrap().is_inhibited());
}

#[test_log::test]
fn screen_saver_is_absent_without_platform_hook() {
    let mut ws = win_system();
    assert!(ws.os_screen_saver().is_none());
}

// --- Render loop ---

#[test_log::test]
fn drive_render_loop_pumps_messages_then_notifies() {
    let mut ws = win_system();
    let client = Arc::new(CountingClient {
        frames: AtomicUsize::new(0),
    });
    let handle = ws.register_render_loop(&client);

    assert!(ws.drive_render_loop());
    assert!(ws.drive_render_loop());
    assert_eq!(ws.driver().pump_count(), 2);
    assert_eq!(client.frames.load(Ordering::SeqCst), 2);

    ws.unregister_render_loop(handle);
    ws.driver_mut().request_quit();
    assert!(!ws.drive_render_loop());
    assert_eq!(client.frames.load(Ordering::SeqCst), 2);
}

#[test_log::test]
fn dispatcher_handle_is_shared_with_the_win_system() {
    let mut ws = win_system();
    let dispatcher = ws.render_loop_dispatcher();
    let client = Arc::new(CountingClient {
        frames: AtomicUsize::new(0),
    });

    dispatcher.register(&client);
    ws.drive_render_loop();

    assert_eq!(client.frames.load(Ordering::SeqCst), 1);
}

// --- HDR ---

#[test_log::test]
fn hdr_defaults_to_not_capable() {
    let mut ws = win_system();
    ws.init_window_system();
    assert_eq!(ws.hdr_display_status(), HdrStatus::NotCapable);
    assert!(!ws.is_display_hdr_enabled());
    assert_eq!(ws.toggle_hdr(), None);
    assert_eq!(ws.settings().get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(false));
}

#[test_log::test]
fn toggle_hdr_flips_state_and_records_it() {
    let display = Arc::new(SwitchableDisplay {
        state: AtomicU8::new(STATE_CAPABLE_OFF),
    });
    let mut ws = win_system().with_hdr(Box::new(HdrProbe::new(Arc::clone(&display))));
    ws.init_window_system();
    assert_eq!(ws.settings().get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(false));

    assert_eq!(ws.toggle_hdr(), Some(HdrToggle::TurnedOn));
    assert!(ws.is_display_hdr_enabled());
    assert_eq!(ws.settings().get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(true));

    assert_eq!(ws.toggle_hdr(), Some(HdrToggle::TurnedOff));
    assert_eq!(ws.hdr_display_status(), HdrStatus::CapableOff);
    assert_eq!(ws.settings().get_bool(SETTING_WINSYSTEM_IS_HDR_DISPLAY), Some(false));
}

#[test_log::test]
fn settings_store_can_be_any_implementation() {
    struct Recorder(Arc<Mutex<Vec<(String, bool)>>>);

    impl SettingsStore for Recorder {
        fn get_int(&self, _key: &str) -> Option<i64> {
            None
        }
        fn get_bool(&self, _key: &str) -> Option<bool> {
            None
        }
        fn set_bool(&mut self, key: &str, value: bool) -> bool {
            self.0.lock().unwrap().push((key.to_string(), value));
            true
        }
    }

    let writes = Arc::new(Mutex::new(Vec::new()));
    let mut ws = WinSystem::new(
        HeadlessDriver::new(&headless_config()),
        DisplaySettings::shared(),
        Box::new(Recorder(Arc::clone(&writes))),
    );
    ws.init_window_system();

    assert_eq!(ws.no_of_buffers(), 2);
    assert_eq!(
        *writes.lock().unwrap(),
        vec![(SETTING_WINSYSTEM_IS_HDR_DISPLAY.to_string(), false)]
    );
}
