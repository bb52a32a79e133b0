// Board theme
// Palette for the day board plus hex color helpers

use egui::Color32;

/// Colors used by the day board chrome.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTheme {
    pub is_dark: bool,
    pub app_background: Color32,
    pub board_background: Color32,
    pub lane_header_background: Color32,
    pub grid_line: Color32,
    pub hour_line: Color32,
    pub lane_border: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub ghost_fill: Color32,
    pub milestone_marker: Color32,
}

impl BoardTheme {
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            board_background: Color32::from_rgb(255, 255, 255),
            lane_header_background: Color32::from_rgb(250, 250, 252),
            grid_line: Color32::from_rgb(235, 235, 235),
            hour_line: Color32::from_rgb(215, 215, 215),
            lane_border: Color32::from_rgb(220, 220, 220),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
            ghost_fill: Color32::from_rgba_unmultiplied(100, 150, 255, 90),
            milestone_marker: Color32::from_rgb(100, 100, 110),
        }
    }

    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(30, 30, 30),
            board_background: Color32::from_rgb(40, 40, 40),
            lane_header_background: Color32::from_rgb(35, 35, 38),
            grid_line: Color32::from_rgb(52, 52, 52),
            hour_line: Color32::from_rgb(70, 70, 70),
            lane_border: Color32::from_rgb(60, 60, 60),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
            ghost_fill: Color32::from_rgba_unmultiplied(100, 150, 255, 70),
            milestone_marker: Color32::from_rgb(180, 180, 190),
        }
    }

    /// Apply this theme to an egui context
    pub fn apply_to_context(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_dark {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };

        visuals.window_fill = self.app_background;
        visuals.panel_fill = self.app_background;
        visuals.override_text_color = Some(self.text_primary);

        ctx.set_visuals(visuals);
    }

    /// Convert Color32 to hex string for display
    pub fn color_to_hex(color: Color32) -> String {
        format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
    }

    /// Parse hex string to Color32
    pub fn hex_to_color(hex: &str) -> Result<Color32, String> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 {
            return Err("Hex color must be 6 characters".to_string());
        }

        let r = u8::from_str_radix(&hex[0..2], 16).map_err(|e| format!("Invalid red: {}", e))?;
        let g = u8::from_str_radix(&hex[2..4], 16).map_err(|e| format!("Invalid green: {}", e))?;
        let b = u8::from_str_radix(&hex[4..6], 16).map_err(|e| format!("Invalid blue: {}", e))?;

        Ok(Color32::from_rgb(r, g, b))
    }

    /// Parse an optional stored color, falling back to a neutral block color.
    pub fn entry_color(&self, hex: Option<&str>) -> Color32 {
        hex.and_then(|h| Self::hex_to_color(h).ok())
            .unwrap_or(if self.is_dark {
                Color32::from_rgb(90, 95, 105)
            } else {
                Color32::from_rgb(150, 155, 165)
            })
    }
}
