//! Pure helpers for the day grid.

use egui::Color32;

use crate::utils::time::slot_offset_to_time;

/// Parse a hex color string to Color32.
///
/// Accepts `#RRGGBB` or `RRGGBB`; anything else yields `None`.
pub fn parse_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

/// Hour label for the time column, honouring the "12h"/"24h" setting
pub fn hour_label(hour: u32, time_format: &str) -> String {
    if time_format == "12h" {
        let display = match hour % 12 {
            0 => 12,
            h => h,
        };
        let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
        format!("{} {}", display, suffix)
    } else {
        format!("{:02}:00", hour % 24)
    }
}

/// `HH:MM` a dragged card top would land on
pub fn drop_time_label(slot_delta: i32, start_hour: u32, slot_minutes: u32) -> String {
    slot_offset_to_time(slot_delta.max(0), start_hour, slot_minutes)
}
