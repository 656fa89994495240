//! Haptic feedback seam.
//!
//! Desktop builds have no vibration motor; [`NoHaptics`] reports that and the
//! gesture code carries on. Failures never reach the caller of [`pulse`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HapticError {
    #[error("Haptic feedback is not available on this platform")]
    Unavailable,

    #[error("Haptic feedback failed: {0}")]
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImpactStyle {
    /// Card dropped into a new slot
    Light,
    /// Card armed by a long press
    Medium,
}

#[cfg_attr(test, mockall::automock)]
pub trait HapticFeedback {
    fn impact(&self, style: ImpactStyle) -> Result<(), HapticError>;
}

/// Platform without haptics
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn impact(&self, _style: ImpactStyle) -> Result<(), HapticError> {
        Err(HapticError::Unavailable)
    }
}

/// Fire an impact, swallowing any failure
pub fn pulse(haptics: &dyn HapticFeedback, style: ImpactStyle) {
    if let Err(e) = haptics.impact(style) {
        log::debug!("Ignoring haptic failure: {}", e);
    }
}
