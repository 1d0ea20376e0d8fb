//! Status bar showing the focal date, how many events it holds, and any
//! event loading problem with a retry button.

use super::CalendarApp;
use egui::{Color32, RichText};

/// Get theme-aware secondary text color
fn secondary_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_gray(160)
    } else {
        Color32::from_gray(100)
    }
}

fn warning_text_color(is_dark: bool) -> Color32 {
    if is_dark {
        Color32::from_rgb(255, 200, 80)
    } else {
        Color32::from_rgb(150, 100, 0)
    }
}

impl CalendarApp {
    /// Render the status bar at the bottom of the window
    pub(super) fn render_status_bar(&mut self, ctx: &egui::Context) {
        let is_dark = self.active_theme.is_dark;

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let focal = self.navigator.focal_date();
                    let count = self.event_cache.events_for(focal).len();
                    let summary = format!(
                        "{} · {} event{}",
                        focal.format("%a %d %b %Y"),
                        count,
                        if count == 1 { "" } else { "s" }
                    );
                    ui.label(RichText::new(summary).small().color(secondary_text_color(is_dark)));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if let Some(message) = self.status_message.clone() {
                            if ui.small_button("Retry").clicked() {
                                self.retry_events();
                            }
                            ui.label(
                                RichText::new(message)
                                    .small()
                                    .color(warning_text_color(is_dark)),
                            );
                        } else if self.settings.events.base_url.is_none() {
                            ui.label(
                                RichText::new("Offline")
                                    .small()
                                    .color(secondary_text_color(is_dark)),
                            );
                        }
                    });
                });
            });
    }
}
