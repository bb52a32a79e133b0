// Time grid mapper
// Converts between wall-clock times, window minutes, and board pixels

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};

use crate::models::settings::ScheduleSettings;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Linear mapping between the board's display window and screen pixels.
///
/// All times are normalized onto a single increasing minute scale: a time
/// whose hour falls before `day_start_hour` is treated as belonging to the
/// next day (plus 24h), so a window like 07:00..25:00 keeps "00:30" ordered
/// after "23:30".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub grid_minutes: u32,
    /// Pixel height of the full display window.
    pub height_px: f32,
}

impl TimeGrid {
    pub fn new(settings: &ScheduleSettings, height_px: f32) -> Self {
        Self {
            day_start_hour: settings.day_start_hour,
            day_end_hour: settings.day_end_hour,
            grid_minutes: settings.grid_minutes,
            height_px,
        }
    }

    /// Minutes covered by the display window; 0 for a degenerate window.
    pub fn total_minutes(&self) -> i32 {
        (self.day_end_hour as i32 - self.day_start_hour as i32).max(0) * 60
    }

    /// A degenerate window has no span. The mapper degrades to zero-height
    /// output instead of dividing by zero; callers render an empty board.
    pub fn is_degenerate(&self) -> bool {
        self.day_end_hour <= self.day_start_hour
    }

    /// First minute of the window on the normalized scale.
    pub fn window_start_minutes(&self) -> i32 {
        self.day_start_hour as i32 * 60
    }

    /// One-past-the-last minute of the window on the normalized scale.
    pub fn window_end_minutes(&self) -> i32 {
        self.window_start_minutes() + self.total_minutes()
    }

    /// Normalize a wall-clock time onto the window's minute scale.
    ///
    /// Hours earlier than the window start are pushed past midnight.
    pub fn time_to_minutes(&self, time: NaiveTime) -> i32 {
        let mut minutes = time.hour() as i32 * 60 + time.minute() as i32;
        if time.hour() < self.day_start_hour {
            minutes += MINUTES_PER_DAY;
        }
        minutes
    }

    /// Inverse of [`Self::time_to_minutes`]; the hour wraps mod 24 for display.
    pub fn minutes_to_time(&self, minutes: i32) -> NaiveTime {
        let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
        NaiveTime::from_hms_opt(wrapped as u32 / 60, wrapped as u32 % 60, 0)
            .expect("wrapped minutes are always a valid time of day")
    }

    pub fn pixels_per_minute(&self) -> f32 {
        let total = self.total_minutes();
        if total <= 0 {
            return 0.0;
        }
        self.height_px / total as f32
    }

    /// Vertical offset of a normalized minute value from the window top.
    pub fn minutes_to_pixels(&self, minutes: i32) -> f32 {
        (minutes - self.window_start_minutes()) as f32 * self.pixels_per_minute()
    }

    /// Normalized minute value for a vertical offset from the window top.
    ///
    /// A degenerate window maps everything to the window start.
    pub fn pixels_to_minutes(&self, y: f32) -> i32 {
        let ppm = self.pixels_per_minute();
        if ppm <= 0.0 {
            return self.window_start_minutes();
        }
        self.window_start_minutes() + (y / ppm).round() as i32
    }

    /// Round a normalized minute value to the nearest grid step. Idempotent.
    pub fn snap(&self, minutes: i32) -> i32 {
        let step = self.grid_minutes as i32;
        if step <= 0 {
            return minutes;
        }
        (minutes as f64 / step as f64).round() as i32 * step
    }
}

/// Parse a stored "HH:MM" time-of-day string.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .with_context(|| format!("Invalid time string: {}", s))
}

/// Format a time-of-day as "HH:MM" for storage.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}
