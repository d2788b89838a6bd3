// src/display/drivers/mod.rs
//! Windowing driver implementations.

pub mod headless;

pub use headless::{HeadlessDriver, HeadlessScreenSaver};
