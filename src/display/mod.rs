// src/display/mod.rs
//! Platform windowing drivers.
//!
//! - WindowingDriver: platform primitives (mode enumeration, message pump)
//! - drivers: concrete implementations

pub mod driver;
pub mod drivers;

pub use driver::WindowingDriver;
pub use drivers::{HeadlessDriver, HeadlessScreenSaver};
