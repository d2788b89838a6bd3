// src/main.rs

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};

use winsystem::config::Config;
use winsystem::display::HeadlessDriver;
use winsystem::resolution::{DisplaySettings, RES_DESKTOP};
use winsystem::{platform_hdr, RenderLoop, WinSystem};

const DEFAULT_CONFIG_PATH: &str = "winsystem.json";
const DEMO_TICKS: u64 = 3;

/// Render-loop client that only counts frames.
struct FrameCounter {
    frames: AtomicU64,
}

impl RenderLoop for FrameCounter {
    fn frame_move(&self) {
        let frame = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        info!("frame {}", frame);
    }
}

/// Enumerates the headless modes, prints the resolution menu and drives a
/// few render-loop ticks.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_default(&config_path);

    let display_settings = DisplaySettings::shared();
    {
        let mut catalog = display_settings
            .write()
            .map_err(|_| anyhow::anyhow!("display settings lock poisoned"))?;
        catalog.set_calibrations(config.calibrations.clone());
        let window = catalog.window_mut();
        window.width = config.winsystem.window_width;
        window.height = config.winsystem.window_height;
    }

    let driver = HeadlessDriver::new(&config.headless);
    let mut persisted = config.clone();
    let mut win_system = WinSystem::new(driver, display_settings, Box::new(config))
        .with_hdr(platform_hdr());
    win_system.init_window_system();

    let desktop = win_system
        .resolution_info(RES_DESKTOP)
        .context("Desktop mode missing after init")?;
    println!("Desktop: {}", desktop.mode);
    println!("HDR: {:?}", win_system.hdr_display_status());
    println!("Buffers: {}", win_system.no_of_buffers());

    for whr in win_system.screen_resolutions(desktop.refresh_rate) {
        let rates = win_system.refresh_rates(whr.width, whr.height, whr.flags);
        let listed: Vec<String> = rates
            .iter()
            .map(|r| format!("{:.3}", r.refresh_rate))
            .collect();
        match win_system.default_refresh_rate(&rates) {
            Ok(best) => println!(
                "{}x{} {:?}: [{}] default {:.3}Hz",
                whr.width,
                whr.height,
                whr.flags,
                listed.join(", "),
                best.refresh_rate
            ),
            Err(e) => warn!("{}x{}: {}", whr.width, whr.height, e),
        }
    }

    let counter = Arc::new(FrameCounter {
        frames: AtomicU64::new(0),
    });
    let handle = win_system.register_render_loop(&counter);
    for _ in 0..DEMO_TICKS {
        if !win_system.drive_render_loop() {
            break;
        }
    }
    win_system.unregister_render_loop(handle);

    win_system.destroy_window_system();
    persisted.sync_from(win_system.settings());
    persisted.save(&config_path)?;
    info!("Done after {} frames", counter.frames.load(Ordering::Relaxed));
    Ok(())
}
