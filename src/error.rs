// src/error.rs
//! Error type for contract violations inside the windowing-system layer.
//!
//! Platform failures never show up here: they degrade capability and are
//! logged. Only caller mistakes are reported.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WinSystemError {
    #[error("no refresh rate candidates to choose from")]
    NoRefreshRates,
    #[error("resolution index {index} is out of range (catalog holds {len} entries)")]
    InvalidResolutionIndex { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, WinSystemError>;
