use chrono::NaiveDate;
use egui_extras::DatePickerButton;
use std::time::Instant;

use super::CalendarApp;
use crate::ui_egui::swipe::NavDirection;
use crate::ui_egui::theme::CalendarTheme;
use crate::utils::date::today;

impl CalendarApp {
    pub(super) fn navigate_previous(&mut self) {
        self.navigate(NavDirection::Previous);
    }

    pub(super) fn navigate_next(&mut self) {
        self.navigate(NavDirection::Next);
    }

    pub(super) fn jump_to_today(&mut self) {
        self.jump_to(today());
    }

    /// Immediate navigation; the swipe animation only plays for adjacent days.
    pub(super) fn jump_to(&mut self, date: NaiveDate) {
        if self.navigator.set_focal_date(date) {
            log::debug!("Jumped to {}", date);
            self.refresh_events();
        }
    }

    fn navigate(&mut self, direction: NavDirection) {
        // The focal date moves when the slide completes (see DayView::show)
        if !self
            .navigator
            .navigate(direction, self.container_width, Instant::now())
        {
            log::trace!("Navigation {:?} ignored: gesture or animation in progress", direction);
        }
    }

    /// Starts loading the three visible days unless they are cached,
    /// already loading, or failed last time.
    pub(super) fn refresh_events(&mut self) {
        let range = self.navigator.window().range();
        self.event_cache.ensure_range(&self.event_source, range);
    }

    pub(super) fn retry_events(&mut self) {
        self.status_message = None;
        self.event_cache.clear_failures();
        self.refresh_events();
    }

    /// Cycles light, dark and system themes and remembers the choice.
    pub(super) fn cycle_theme(&mut self, ctx: &egui::Context) {
        let next = CalendarTheme::next_setting(&self.settings.theme);
        self.settings.theme = next.to_string();
        self.active_theme = CalendarTheme::from_setting(next);
        self.active_theme.apply_to_context(ctx);

        if let Err(e) = self.settings_service.save(&self.settings) {
            log::warn!("Failed to save theme setting: {:#}", e);
        }
    }

    pub(super) fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            if ui.button("◀").on_hover_text("Previous day").clicked() {
                self.navigate_previous();
            }
            if ui.button("Today").clicked() {
                self.jump_to_today();
            }
            if ui.button("▶").on_hover_text("Next day").clicked() {
                self.navigate_next();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let theme_icon = if self.active_theme.is_dark { "☀" } else { "🌙" };
                if ui
                    .button(theme_icon)
                    .on_hover_text(format!("Theme: {}", self.settings.theme))
                    .clicked()
                {
                    let ctx = ui.ctx().clone();
                    self.cycle_theme(&ctx);
                }

                let mut picked = self.navigator.focal_date();
                if ui
                    .add(DatePickerButton::new(&mut picked).id_source("focal_date_picker"))
                    .changed()
                {
                    self.jump_to(picked);
                }
            });
        });
    }
}
