// src/hdr/mod.rs
//! HDR capability probe.
//!
//! `DisplayConfigService` is the only seam touching the platform. It speaks
//! in typed targets and a raw state byte; the packet layout stays inside
//! `packet` and the platform implementation. Every failure degrades to
//! "not capable" and is logged, never returned.

pub mod packet;
#[cfg(target_os = "windows")]
pub mod windows;


use log::{debug, info, warn};

/// Advanced-color state byte: display cannot do HDR.
pub const STATE_NOT_CAPABLE: u8 = 0xD0;
/// Advanced-color state byte: HDR capable, currently off.
pub const STATE_CAPABLE_OFF: u8 = 0xD1;
/// Advanced-color state byte: HDR capable, currently on.
pub const STATE_CAPABLE_ON: u8 = 0xD3;

/// HDR state of the active display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrStatus {
    NotCapable,
    CapableOff,
    CapableOn,
    Unknown,
}

impl HdrStatus {
    pub fn from_state(state: u8) -> Self {
        match state {
            STATE_NOT_CAPABLE => HdrStatus::NotCapable,
            STATE_CAPABLE_OFF => HdrStatus::CapableOff,
            STATE_CAPABLE_ON => HdrStatus::CapableOn,
            _ => HdrStatus::Unknown,
        }
    }

    /// Integer code persisted by older settings: 0 none, 1 off, 2 on.
    pub fn code(self) -> i32 {
        match self {
            HdrStatus::CapableOff => 1,
            HdrStatus::CapableOn => 2,
            HdrStatus::NotCapable | HdrStatus::Unknown => 0,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            HdrStatus::NotCapable => "No HDR capable",
            HdrStatus::CapableOff => "HDR capable and OFF",
            HdrStatus::CapableOn => "HDR capable and ON",
            HdrStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Graphics adapter identifier (a locally unique id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterId {
    pub low_part: u32,
    pub high_part: i32,
}

/// One output of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayTarget {
    pub adapter: AdapterId,
    pub id: u32,
}

/// Platform display-configuration queries the probe is built on.
pub trait DisplayConfigService: Send {
    /// First target-type mode among the active display paths.
    fn active_target(&self) -> Option<DisplayTarget>;

    /// Raw advanced-color state byte of `target`.
    fn advanced_color_state(&self, target: DisplayTarget) -> Option<u8>;

    /// Switches advanced color. Returns whether the platform accepted it.
    fn set_advanced_color_state(&self, target: DisplayTarget, enable: bool) -> bool;
}

/// Service for platforms without a display-configuration API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHdrSupport;

impl DisplayConfigService for NoHdrSupport {
    fn active_target(&self) -> Option<DisplayTarget> {
        None
    }

    fn advanced_color_state(&self, _target: DisplayTarget) -> Option<u8> {
        None
    }

    fn set_advanced_color_state(&self, _target: DisplayTarget, _enable: bool) -> bool {
        false
    }
}

/// Direction of an attempted HDR toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrToggle {
    TurnedOn,
    TurnedOff,
}

/// What the windowing system needs from an HDR probe.
pub trait HdrCapability: Send {
    fn status(&self) -> HdrStatus;

    /// Flips HDR on the active display when it is capable. Returns the
    /// direction attempted, or `None` when nothing was sent.
    fn toggle(&self) -> Option<HdrToggle>;

    fn is_enabled(&self) -> bool {
        self.status() == HdrStatus::CapableOn
    }
}

/// HDR probe over a display-configuration service.
pub struct HdrProbe<S> {
    service: S,
}

impl<S: DisplayConfigService> HdrProbe<S> {
    pub fn new(service: S) -> Self {
        HdrProbe { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn query(&self) -> Option<(DisplayTarget, u8)> {
        let Some(target) = self.service.active_target() else {
            debug!("HDR probe: no active display target");
            return None;
        };
        let Some(state) = self.service.advanced_color_state(target) else {
            debug!("HDR probe: advanced color query failed for {:?}", target);
            return None;
        };
        Some((target, state))
    }
}

impl<S: DisplayConfigService> HdrCapability for HdrProbe<S> {
    fn status(&self) -> HdrStatus {
        let Some((_, state)) = self.query() else {
            return HdrStatus::NotCapable;
        };
        let status = HdrStatus::from_state(state);
        debug!(
            "Advanced color query returned 0x{:02X} \"{}\" (status = {})",
            state,
            status.describe(),
            status.code()
        );
        status
    }

    fn toggle(&self) -> Option<HdrToggle> {
        let (target, state) = self.query()?;
        let (enable, toggle) = match HdrStatus::from_state(state) {
            HdrStatus::CapableOff => {
                info!("Toggle HDR On (OFF => ON).");
                (true, HdrToggle::TurnedOn)
            }
            HdrStatus::CapableOn => {
                info!("Toggle HDR Off (ON => OFF).");
                (false, HdrToggle::TurnedOff)
            }
            status => {
                debug!("HDR toggle skipped: {}", status.describe());
                return None;
            }
        };
        if !self.service.set_advanced_color_state(target, enable) {
            warn!("Setting advanced color state on {:?} failed", target);
        }
        Some(toggle)
    }
}
