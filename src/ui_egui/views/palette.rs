use crate::ui_egui::theme::CalendarTheme;
use egui::Color32;

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct DayStripPalette {
    pub strip_border: Color32,
    pub cell_bg: Color32,
    pub weekend_cell_bg: Color32,
    pub today_cell_bg: Color32,
    pub text: Color32,
    pub date_text: Color32,
    pub badge_bg: Color32,
    pub badge_text: Color32,
}

impl DayStripPalette {
    pub fn from_theme(theme: &CalendarTheme) -> Self {
        Self {
            strip_border: blend(theme.day_border, theme.app_background, 0.3),
            cell_bg: theme.day_background,
            weekend_cell_bg: theme.weekend_background,
            today_cell_bg: theme.today_background,
            text: theme.text_primary,
            date_text: theme.text_secondary,
            badge_bg: theme.today_border,
            badge_text: if theme.is_dark {
                Color32::from_rgb(20, 20, 20)
            } else {
                Color32::from_rgb(245, 245, 245)
            },
        }
    }
}
