// Settings module
// Display window and grid configuration for the time-schedule board

use serde::{Deserialize, Serialize};

/// Grid granularities the board can snap to, in minutes.
pub const GRID_STEPS: [u32; 4] = [5, 10, 15, 30];

/// Board display settings.
///
/// The display window is expressed in whole hours; `day_end_hour` may exceed
/// 24 so a window can roll past midnight (e.g. 7..25 = 07:00 until 01:00 the
/// next day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub id: Option<i64>,
    /// First hour shown on the board (0..=23)
    pub day_start_hour: u32,
    /// Hour the board ends at; exclusive, may be > 24 for post-midnight windows
    pub day_end_hour: u32,
    /// Snap step for create/move/resize gestures, in minutes
    pub grid_minutes: u32,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            id: Some(1),
            day_start_hour: 7,
            day_end_hour: 25,
            grid_minutes: 30,
        }
    }
}

impl ScheduleSettings {
    /// Validate the settings.
    ///
    /// The layout engine tolerates a degenerate window (it renders an empty
    /// board rather than panicking), but persisted settings must be sane.
    pub fn validate(&self) -> Result<(), String> {
        if self.day_start_hour > 23 {
            return Err("Day start hour must be between 0 and 23".to_string());
        }

        if self.day_end_hour <= self.day_start_hour {
            return Err("Day end hour must be after day start hour".to_string());
        }

        if self.day_end_hour > 48 {
            return Err("Day end hour cannot exceed 48".to_string());
        }

        if !GRID_STEPS.contains(&self.grid_minutes) {
            return Err(format!(
                "Grid step must be one of {:?} minutes",
                GRID_STEPS
            ));
        }

        Ok(())
    }

    /// Total minutes spanned by the display window (0 when degenerate).
    pub fn window_minutes(&self) -> u32 {
        self.day_end_hour.saturating_sub(self.day_start_hour) * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ScheduleSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.day_start_hour, 7);
        assert_eq!(settings.day_end_hour, 25);
        assert_eq!(settings.grid_minutes, 30);
    }

    #[test]
    fn test_window_minutes() {
        let settings = ScheduleSettings::default();
        assert_eq!(settings.window_minutes(), 18 * 60);
    }

    #[test]
    fn test_window_minutes_degenerate_is_zero() {
        let settings = ScheduleSettings {
            day_start_hour: 10,
            day_end_hour: 10,
            ..Default::default()
        };
        assert_eq!(settings.window_minutes(), 0);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let settings = ScheduleSettings {
            day_start_hour: 12,
            day_end_hour: 8,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_allows_post_midnight_window() {
        let settings = ScheduleSettings {
            day_start_hour: 7,
            day_end_hour: 25,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test_case(5)]
    #[test_case(10)]
    #[test_case(15)]
    #[test_case(30)]
    fn test_validate_accepts_known_grid_steps(grid: u32) {
        let settings = ScheduleSettings {
            grid_minutes: grid,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test_case(0)]
    #[test_case(7)]
    #[test_case(60)]
    fn test_validate_rejects_unknown_grid_steps(grid: u32) {
        let settings = ScheduleSettings {
            grid_minutes: grid,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
