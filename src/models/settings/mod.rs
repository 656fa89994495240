// Settings module
// Application settings and the day-view grid configuration

use serde::{Deserialize, Serialize};

/// Day-view grid geometry and interaction tuning.
///
/// Every core routine takes this explicitly; nothing inside the scheduling
/// code falls back to [`GridConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// First hour shown on the grid
    pub start_hour: u32,
    /// Hour the grid ends at (exclusive)
    pub end_hour: u32,
    /// Slot granularity in minutes
    pub slot_minutes: u32,
    /// Pixel height of one slot
    pub slot_pixel_height: f32,
    pub min_column_width: f32,
    pub max_column_width: f32,
    /// Width of the fixed hour-label column
    pub time_label_width: f32,
    /// Distance from the viewport edge at which a drag starts auto-scrolling
    pub edge_threshold: f32,
    /// Auto-scroll pixels per frame at full edge proximity
    pub auto_scroll_speed: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 18,
            slot_minutes: 15,
            slot_pixel_height: 35.0,
            min_column_width: 200.0,
            max_column_width: 280.0,
            time_label_width: 56.0,
            edge_threshold: 60.0,
            auto_scroll_speed: 14.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.end_hour > 24 {
            return Err("End hour must be 24 or earlier".to_string());
        }

        if self.start_hour >= self.end_hour {
            return Err("Start hour must be before end hour".to_string());
        }

        if self.slot_minutes == 0 || 60 % self.slot_minutes != 0 {
            return Err("Slot length must divide an hour evenly".to_string());
        }

        if self.slot_pixel_height <= 0.0 || self.time_label_width < 0.0 {
            return Err("Pixel sizes must be positive".to_string());
        }

        if self.min_column_width <= 0.0 || self.min_column_width > self.max_column_width {
            return Err("Column width bounds are invalid".to_string());
        }

        if self.edge_threshold < 0.0 || self.auto_scroll_speed < 0.0 {
            return Err("Auto-scroll tuning cannot be negative".to_string());
        }

        Ok(())
    }

    /// Grid start in minutes since midnight
    pub fn day_start_minutes(&self) -> i32 {
        (self.start_hour * 60) as i32
    }

    /// Grid end in minutes since midnight
    pub fn day_end_minutes(&self) -> i32 {
        (self.end_hour * 60) as i32
    }

    pub fn slot_count(&self) -> usize {
        ((self.end_hour - self.start_hour) * 60 / self.slot_minutes) as usize
    }

    pub fn pixels_per_minute(&self) -> f32 {
        self.slot_pixel_height / self.slot_minutes as f32
    }

    /// Total scrollable height of the time grid
    pub fn content_height(&self) -> f32 {
        self.slot_count() as f32 * self.slot_pixel_height
    }
}

/// Persisted application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub time_format: String,
    pub grid: GridConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            time_format: "24h".to_string(),
            grid: GridConfig::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.time_format != "12h" && self.time_format != "24h" {
            return Err("Time format must be '12h' or '24h'".to_string());
        }
        self.grid.validate()
    }
}
