// Single active editor
// The grid owns the one id that may be armed or dragging at a time

use std::time::{Duration, Instant};

/// Taps on empty grid space this soon after arming are ignored
pub const DISARM_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Default, Clone)]
pub struct ActiveEditor {
    active: Option<String>,
    activated_at: Option<Instant>,
}

impl ActiveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    /// Enable or disable edit mode for `id`.
    ///
    /// Enabling returns the id that was displaced, if any; the caller must
    /// cancel that card's gesture before the new one proceeds.
    pub fn request_edit_mode(&mut self, id: &str, enable: bool, now: Instant) -> Option<String> {
        if !enable {
            if self.is_editing(id) {
                self.active = None;
                self.activated_at = None;
            }
            return None;
        }

        if self.is_editing(id) {
            return None;
        }

        let displaced = self.active.replace(id.to_string());
        self.activated_at = Some(now);
        if let Some(previous) = &displaced {
            log::debug!("Edit mode moved from {} to {}", previous, id);
        }
        displaced
    }

    /// A tap landed on empty grid space; returns the id that was disarmed
    pub fn tap_empty_space(&mut self, now: Instant) -> Option<String> {
        let activated_at = self.activated_at?;
        if now.saturating_duration_since(activated_at) < DISARM_DEBOUNCE {
            return None;
        }
        self.activated_at = None;
        self.active.take()
    }

    pub fn clear(&mut self) -> Option<String> {
        self.activated_at = None;
        self.active.take()
    }
}
