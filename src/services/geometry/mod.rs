//! Mapping between appointment time ranges and card pixel geometry.
//!
//! Continuous drags work in raw pixels; snapping to the slot grid happens
//! only when a gesture is committed.

use chrono::NaiveTime;

use crate::models::settings::GridConfig;
use crate::utils::time::{clamp, minutes_from_midnight};

/// Gap left below each card so neighbours never touch visually
pub const CARD_MARGIN: f32 = 4.0;
/// Cards never render shorter than this
pub const MIN_CARD_HEIGHT: f32 = 30.0;

/// Vertical placement of a card inside its worker column
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardGeometry {
    pub top: f32,
    pub height: f32,
}

impl CardGeometry {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Converts between minutes and pixels for one grid configuration
#[derive(Debug, Clone, Copy)]
pub struct GeometryMapper<'a> {
    config: &'a GridConfig,
}

impl<'a> GeometryMapper<'a> {
    pub fn new(config: &'a GridConfig) -> Self {
        Self { config }
    }

    /// Y offset of a minute-of-day from the top of the grid
    pub fn minutes_to_y(&self, minutes: i32) -> f32 {
        (minutes - self.config.day_start_minutes()) as f32 * self.config.pixels_per_minute()
    }

    /// Card geometry for a time range
    pub fn time_range_to_geometry(&self, start: NaiveTime, end: NaiveTime) -> CardGeometry {
        self.minutes_to_geometry(minutes_from_midnight(start), minutes_from_midnight(end))
    }

    pub fn minutes_to_geometry(&self, start: i32, end: i32) -> CardGeometry {
        let slot = self.config.slot_minutes as i32;
        let offset = start - self.config.day_start_minutes();
        let slot_index = offset.div_euclid(slot);
        let within_slot = offset.rem_euclid(slot);

        let top = slot_index as f32 * self.config.slot_pixel_height
            + within_slot as f32 * self.config.pixels_per_minute();
        let height = ((end - start) as f32 * self.config.pixels_per_minute() - CARD_MARGIN)
            .max(MIN_CARD_HEIGHT);

        CardGeometry { top, height }
    }

    /// Whole slots covered by a pixel delta
    pub fn pixel_delta_to_slot_delta(&self, delta_px: f32) -> i32 {
        (delta_px / self.config.slot_pixel_height).round() as i32
    }

    /// Start minute for a card top, snapped to the nearest slot
    pub fn top_to_minutes(&self, top: f32) -> i32 {
        self.config.day_start_minutes()
            + self.pixel_delta_to_slot_delta(top) * self.config.slot_minutes as i32
    }

    /// Duration for a dragged card height: nearest whole slots, at least one
    pub fn height_to_duration(&self, height: f32) -> i32 {
        self.pixel_delta_to_slot_delta(height).max(1) * self.config.slot_minutes as i32
    }

    /// Slot-snapped `(start, end)` minutes for a card geometry
    pub fn geometry_to_minutes(&self, geometry: CardGeometry) -> (i32, i32) {
        let start = self.top_to_minutes(geometry.top);
        (start, start + self.height_to_duration(geometry.height))
    }

    /// Column width for the viewport, clamped to the configured bounds
    pub fn column_width(&self, viewport_width: f32, visible_columns: usize) -> f32 {
        let available = (viewport_width - self.config.time_label_width).max(0.0);
        let raw = available / visible_columns.max(1) as f32;
        clamp(
            raw,
            self.config.min_column_width,
            self.config.max_column_width,
        )
    }

    /// Target column after a horizontal drag of `delta_x` pixels
    pub fn column_after_shift(
        &self,
        origin_column: usize,
        delta_x: f32,
        column_width: f32,
        visible_columns: usize,
    ) -> usize {
        if visible_columns == 0 || column_width <= 0.0 {
            return origin_column;
        }
        let shift = (delta_x / column_width).round() as i64;
        clamp(origin_column as i64 + shift, 0, visible_columns as i64 - 1) as usize
    }

    /// Y of the current-time indicator, or `None` outside the grid's hours
    pub fn now_indicator_y(&self, now: NaiveTime) -> Option<f32> {
        let minutes = minutes_from_midnight(now);
        if minutes < self.config.day_start_minutes() || minutes >= self.config.day_end_minutes() {
            return None;
        }
        Some(self.minutes_to_y(minutes))
    }
}
