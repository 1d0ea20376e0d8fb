//! Theme module for the swipe calendar
//!
//! Defines the CalendarTheme palette, resolves the configured theme name
//! (including following the OS preference) and parses event colours.

use egui::Color32;

/// A calendar theme defining all colors used in the application
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarTheme {
    /// Whether this is a dark theme (affects base egui::Visuals)
    pub is_dark: bool,

    /// Application background color
    pub app_background: Color32,

    /// Weekend page background color
    pub weekend_background: Color32,

    /// Today's page background color
    pub today_background: Color32,

    /// Accent used for today's badge and borders
    pub today_border: Color32,

    /// Regular page background color
    pub day_background: Color32,

    /// Page border color
    pub day_border: Color32,

    /// Default fill for events without their own colour
    pub event_background: Color32,

    /// Primary text color (headings, dates)
    pub text_primary: Color32,

    /// Secondary text color (secondary info)
    pub text_secondary: Color32,
}

impl CalendarTheme {
    /// Create the default Light theme
    pub fn light() -> Self {
        Self {
            is_dark: false,
            app_background: Color32::from_rgb(245, 245, 245),
            weekend_background: Color32::from_rgb(250, 250, 252),
            today_background: Color32::from_rgb(230, 240, 255),
            today_border: Color32::from_rgb(100, 150, 255),
            day_background: Color32::from_rgb(255, 255, 255),
            day_border: Color32::from_rgb(220, 220, 220),
            event_background: Color32::from_rgb(66, 133, 244),
            text_primary: Color32::from_rgb(40, 40, 40),
            text_secondary: Color32::from_rgb(100, 100, 100),
        }
    }

    /// Create the default Dark theme
    pub fn dark() -> Self {
        Self {
            is_dark: true,
            app_background: Color32::from_rgb(30, 30, 30),
            weekend_background: Color32::from_rgb(35, 35, 38),
            today_background: Color32::from_rgb(50, 60, 80),
            today_border: Color32::from_rgb(100, 150, 255),
            day_background: Color32::from_rgb(40, 40, 40),
            day_border: Color32::from_rgb(60, 60, 60),
            event_background: Color32::from_rgb(52, 101, 186),
            text_primary: Color32::from_rgb(240, 240, 240),
            text_secondary: Color32::from_rgb(170, 170, 170),
        }
    }

    /// Resolve a `theme` setting. "system" follows the OS preference.
    pub fn from_setting(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "dark" => Self::dark(),
            "light" => Self::light(),
            _ => match dark_light::detect() {
                dark_light::Mode::Dark => Self::dark(),
                dark_light::Mode::Light | dark_light::Mode::Default => Self::light(),
            },
        }
    }

    /// The setting the theme button switches to: light, dark, system, light…
    pub fn next_setting(current: &str) -> &'static str {
        match current.to_lowercase().as_str() {
            "light" => "dark",
            "dark" => "system",
            _ => "light",
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

        visuals.widgets.noninteractive.bg_fill = self.day_background;
        visuals.widgets.inactive.bg_fill = self.day_background;
        visuals.widgets.hovered.bg_fill = self.today_background;
        visuals.widgets.active.bg_fill = self.today_background;

        visuals.override_text_color = Some(self.text_primary);

        ctx.set_visuals(visuals);
    }

    /// Parse "#RRGGBB" or "#RGB" to Color32
    pub fn hex_to_color(hex: &str) -> Result<Color32, String> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err("Invalid hex color".to_string());
        }

        let expanded = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err("Hex color must be 3 or 6 characters".to_string()),
        };

        let r = u8::from_str_radix(&expanded[0..2], 16).map_err(|_| "Invalid hex color")?;
        let g = u8::from_str_radix(&expanded[2..4], 16).map_err(|_| "Invalid hex color")?;
        let b = u8::from_str_radix(&expanded[4..6], 16).map_err(|_| "Invalid hex color")?;

        Ok(Color32::from_rgb(r, g, b))
    }

    /// Fill for an event chip: its own colour when valid, else the theme's.
    pub fn event_fill(&self, color: Option<&str>) -> Color32 {
        color
            .and_then(|hex| Self::hex_to_color(hex).ok())
            .unwrap_or(self.event_background)
    }
}
