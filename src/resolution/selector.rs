// src/resolution/selector.rs
//! Builds the candidate lists a resolution menu is populated from.
//!
//! The lists are rebuilt from the catalog on every call and never cached.

use super::{DisplaySettings, ResolutionFlags, RES_CUSTOM, RES_DESKTOP};
use crate::error::{Result, WinSystemError};
use log::trace;

/// One distinct (width, height, flags) shape and the catalog entry chosen to
/// represent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionWhr {
    pub width: u32,
    pub height: u32,
    pub flags: ResolutionFlags,
    pub res_index: usize,
}

/// One distinct refresh rate of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshRate {
    pub refresh_rate: f32,
    pub res_index: usize,
}

fn add_resolution(
    resolutions: &mut Vec<ResolutionWhr>,
    settings: &DisplaySettings,
    index: usize,
    preferred_refresh_rate: f32,
) {
    let Some(info) = settings.resolution_info(index) else {
        return;
    };
    let (width, height, flags) = info.shape();

    if let Some(existing) = resolutions
        .iter_mut()
        .find(|r| r.width == width && r.height == height && r.flags == flags)
    {
        // Only an exact hit on the preferred rate moves the representative.
        if preferred_refresh_rate > 0.0 && info.refresh_rate == preferred_refresh_rate {
            existing.res_index = index;
        }
        return;
    }

    resolutions.push(ResolutionWhr {
        width,
        height,
        flags,
        res_index: index,
    });
}

/// Distinct mode shapes among the custom modes, sorted by width, height and
/// then flags.
///
/// A `preferred_refresh_rate` above zero picks, for each shape, the last
/// entry whose rate equals it exactly; otherwise the first entry of a shape
/// represents it.
pub fn screen_resolutions(
    settings: &DisplaySettings,
    preferred_refresh_rate: f32,
) -> Vec<ResolutionWhr> {
    let mut resolutions = Vec::new();

    for index in RES_CUSTOM..settings.len() {
        add_resolution(&mut resolutions, settings, index, preferred_refresh_rate);
    }

    // Can't assume a sort order. The flags must take part in the key or two
    // shapes differing only in flags would compare equal.
    resolutions.sort_by_key(|r| (r.width, r.height, r.flags.bits()));

    trace!(
        "screen_resolutions({}) -> {} shapes",
        preferred_refresh_rate,
        resolutions.len()
    );
    resolutions
}

/// Distinct refresh rates available for one shape, ascending.
///
/// The desktop entry takes part, so the native rate is always offered for
/// the native shape.
pub fn refresh_rates(
    settings: &DisplaySettings,
    width: u32,
    height: u32,
    flags: ResolutionFlags,
) -> Vec<RefreshRate> {
    let target = (width, height, flags.mode_flags());
    let mut rates: Vec<RefreshRate> = Vec::new();

    for index in RES_DESKTOP..settings.len() {
        let Some(info) = settings.resolution_info(index) else {
            continue;
        };
        if info.shape() != target {
            continue;
        }
        if rates.iter().any(|r| r.refresh_rate == info.refresh_rate) {
            continue;
        }
        rates.push(RefreshRate {
            refresh_rate: info.refresh_rate,
            res_index: index,
        });
    }

    rates.sort_by(|a, b| a.refresh_rate.total_cmp(&b.refresh_rate));
    rates
}

/// The candidate closest to the desktop refresh rate.
///
/// Ties go to the earliest candidate; an exact match ends the search.
pub fn default_refresh_rate(
    settings: &DisplaySettings,
    rates: &[RefreshRate],
) -> Result<RefreshRate> {
    let (first, rest) = rates.split_first().ok_or(WinSystemError::NoRefreshRates)?;
    let target = settings.desktop_refresh_rate();

    let mut best = *first;
    let mut best_fitness = (target - first.refresh_rate).abs();

    for rate in rest {
        if best_fitness == 0.0 {
            break;
        }
        let fitness = (target - rate.refresh_rate).abs();
        if fitness < best_fitness {
            best_fitness = fitness;
            best = *rate;
        }
    }

    Ok(best)
}
