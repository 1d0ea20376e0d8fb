use chrono::NaiveDate;
use egui::{Margin, Pos2, Rect, RichText, Stroke, Vec2};
use std::time::Instant;

use super::palette::DayStripPalette;
use crate::models::event::Event;
use crate::services::event_source::{DayState, EventCache};
use crate::ui_egui::swipe::{SwipeNavigator, TouchEvent};
use crate::ui_egui::theme::CalendarTheme;
use crate::utils::date::{day_heading, is_weekend, long_date, today};

/// Routes raw egui input to the swipe navigator.
///
/// Touch events are preferred; primary-button mouse drags stand in for a
/// finger on desktop until the first real touch is seen (egui also
/// synthesises pointer events for touches, which must not be counted twice).
#[derive(Debug, Default)]
pub struct PointerRouting {
    active_touch: Option<egui::TouchId>,
    mouse_down: bool,
    touch_seen: bool,
    scroll_locked: bool,
}

impl PointerRouting {
    pub fn translate(&mut self, events: &[egui::Event], container: Rect) -> Vec<TouchEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    self.touch_seen = true;
                    self.route_touch(*id, *phase, *pos, container, &mut out);
                }
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } if !self.touch_seen => {
                    if *pressed && container.contains(*pos) {
                        self.mouse_down = true;
                        out.push(TouchEvent::start(pos.x, pos.y));
                    } else if !*pressed && self.mouse_down {
                        self.mouse_down = false;
                        out.push(TouchEvent::end());
                    }
                }
                egui::Event::PointerMoved(pos) if !self.touch_seen && self.mouse_down => {
                    out.push(TouchEvent::moved(pos.x, pos.y));
                }
                egui::Event::PointerGone if self.mouse_down => {
                    self.mouse_down = false;
                    out.push(TouchEvent::cancel());
                }
                _ => {}
            }
        }
        out
    }

    /// Keeps native scrolling disabled from the moment a gesture asks for it
    /// until that gesture is over.
    pub fn update_scroll_lock(&mut self, suppress_requested: bool, gesture_active: bool) -> bool {
        if !gesture_active {
            self.scroll_locked = false;
        } else if suppress_requested {
            self.scroll_locked = true;
        }
        self.scroll_locked
    }

    fn route_touch(
        &mut self,
        id: egui::TouchId,
        phase: egui::TouchPhase,
        pos: Pos2,
        container: Rect,
        out: &mut Vec<TouchEvent>,
    ) {
        match phase {
            egui::TouchPhase::Start => {
                if self.active_touch.is_none() && container.contains(pos) {
                    self.active_touch = Some(id);
                    out.push(TouchEvent::start(pos.x, pos.y));
                }
            }
            egui::TouchPhase::Move => {
                if self.active_touch == Some(id) {
                    out.push(TouchEvent::moved(pos.x, pos.y));
                }
            }
            egui::TouchPhase::End => {
                if self.active_touch == Some(id) {
                    self.active_touch = None;
                    out.push(TouchEvent::end());
                }
            }
            egui::TouchPhase::Cancel => {
                if self.active_touch == Some(id) {
                    self.active_touch = None;
                    out.push(TouchEvent::cancel());
                }
            }
        }
    }
}

/// What the body of a day page shows.
#[derive(Debug, PartialEq)]
pub enum PageBody<'a> {
    Loading,
    /// Nothing scheduled, or the events could not be loaded
    Empty,
    Events(&'a [Event]),
}

pub fn page_body(events: &EventCache, date: NaiveDate) -> PageBody<'_> {
    match events.day_state(date) {
        DayState::Loading => PageBody::Loading,
        DayState::Failed => PageBody::Empty,
        DayState::Loaded => match events.events_for(date) {
            [] => PageBody::Empty,
            day_events => PageBody::Events(day_events),
        },
    }
}

pub struct DayView;

impl DayView {
    /// Paints the previous/current/next pages and feeds this frame's input to
    /// the navigator. Returns the new focal date when a swipe commit lands.
    pub fn show(
        ui: &mut egui::Ui,
        navigator: &mut SwipeNavigator,
        routing: &mut PointerRouting,
        events: &EventCache,
        theme: &CalendarTheme,
        page_height: f32,
    ) -> Option<NaiveDate> {
        let now = Instant::now();
        let available = ui.available_rect_before_wrap();
        let height = page_height.clamp(0.0, available.height());
        let container = Rect::from_min_size(available.min, Vec2::new(available.width(), height));
        let width = container.width();

        let input = ui.input(|i| i.events.clone());
        let mut suppress = false;
        for touch in routing.translate(&input, container) {
            suppress |= navigator.handle_touch(touch, width, now).suppress_default;
        }
        let scroll_locked = routing.update_scroll_lock(suppress, navigator.is_gesture_active());

        let committed = navigator.tick(now);
        if !navigator.transition_enabled() {
            log::trace!("Presenting post-commit frame without transition");
        }

        let palette = DayStripPalette::from_theme(theme);
        let offset = navigator.translate_x();
        for (index, date) in navigator.pages().into_iter().enumerate() {
            let left = container.left() + (index as f32 - 1.0) * width + offset;
            let page_rect = Rect::from_min_size(Pos2::new(left, container.top()), container.size());
            if !page_rect.intersects(container) {
                continue;
            }
            Self::show_page(
                ui,
                page_rect,
                container,
                date,
                events,
                theme,
                &palette,
                scroll_locked,
            );
        }

        ui.allocate_rect(container, egui::Sense::hover());

        if navigator.is_animating()
            || navigator.is_gesture_active()
            || !navigator.transition_enabled()
        {
            ui.ctx().request_repaint();
        }
        navigator.end_frame();

        committed
    }

    #[allow(clippy::too_many_arguments)]
    fn show_page(
        ui: &mut egui::Ui,
        page_rect: Rect,
        container: Rect,
        date: NaiveDate,
        events: &EventCache,
        theme: &CalendarTheme,
        palette: &DayStripPalette,
        scroll_locked: bool,
    ) {
        let is_today = date == today();
        let fill = if is_today {
            palette.today_cell_bg
        } else if is_weekend(date) {
            palette.weekend_cell_bg
        } else {
            palette.cell_bg
        };

        let mut page_ui = ui.child_ui(page_rect, egui::Layout::top_down(egui::Align::LEFT), None);
        page_ui.set_clip_rect(page_rect.intersect(container));

        egui::Frame::none()
            .fill(fill)
            .stroke(Stroke::new(1.0, palette.strip_border))
            .inner_margin(Margin::symmetric(16.0, 12.0))
            .show(&mut page_ui, |ui| {
                ui.set_min_size((page_rect.size() - Vec2::new(32.0, 24.0)).max(Vec2::ZERO));
                Self::show_header(ui, date, is_today, palette);
                ui.add_space(8.0);

                let day_events = match page_body(events, date) {
                    PageBody::Loading => {
                        ui.label(RichText::new("Loading events…").weak().italics());
                        return;
                    }
                    PageBody::Empty => {
                        ui.label(RichText::new("No events on this day").weak().italics());
                        return;
                    }
                    PageBody::Events(day_events) => day_events,
                };

                egui::ScrollArea::vertical()
                    .id_source(("day_page_scroll", date))
                    .drag_to_scroll(!scroll_locked)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for event in day_events {
                            Self::show_event(ui, event, theme);
                            ui.add_space(6.0);
                        }
                    });
            });
    }

    fn show_header(ui: &mut egui::Ui, date: NaiveDate, is_today: bool, palette: &DayStripPalette) {
        ui.horizontal(|row_ui| {
            row_ui.vertical(|text_ui| {
                text_ui.label(
                    RichText::new(day_heading(date))
                        .size(24.0)
                        .color(palette.text)
                        .strong(),
                );
                text_ui.label(
                    RichText::new(long_date(date))
                        .size(14.0)
                        .color(palette.date_text),
                );
            });

            if is_today {
                row_ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |badge_ui| {
                    egui::Frame::none()
                        .fill(palette.badge_bg)
                        .rounding(egui::Rounding::same(10.0))
                        .inner_margin(Margin::symmetric(12.0, 6.0))
                        .show(badge_ui, |badge_ui| {
                            badge_ui.label(
                                RichText::new("Today")
                                    .color(palette.badge_text)
                                    .size(12.0)
                                    .strong(),
                            );
                        });
                });
            }
        });
    }

    fn show_event(ui: &mut egui::Ui, event: &Event, theme: &CalendarTheme) {
        let fill = theme.event_fill(event.color.as_deref());
        let time_label = if event.all_day {
            "All day".to_string()
        } else {
            format!("{} – {}", event.start.format("%H:%M"), event.end.format("%H:%M"))
        };

        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(6.0))
            .inner_margin(Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(time_label).size(12.0).color(egui::Color32::WHITE));
                ui.label(
                    RichText::new(&event.title)
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                if let Some(description) = event
                    .description
                    .as_deref()
                    .filter(|d| !d.trim().is_empty())
                {
                    ui.label(
                        RichText::new(description)
                            .size(12.0)
                            .color(egui::Color32::from_white_alpha(210)),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::DateRange;
    use crate::services::event_source::EventSource;
    use crate::ui_egui::swipe::TouchPhase;
    use std::sync::Arc;
    use std::time::Duration;

    fn container() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 50.0), Vec2::new(400.0, 600.0))
    }

    fn touch(id: u64, phase: egui::TouchPhase, x: f32, y: f32) -> egui::Event {
        egui::Event::Touch {
            device_id: egui::TouchDeviceId(0),
            id: egui::TouchId(id),
            phase,
            pos: Pos2::new(x, y),
            force: None,
        }
    }

    fn phases(events: &[TouchEvent]) -> Vec<TouchPhase> {
        events.iter().map(|e| e.phase).collect()
    }

    #[test]
    fn test_touch_sequence_maps_one_to_one() {
        let mut routing = PointerRouting::default();
        let out = routing.translate(
            &[
                touch(1, egui::TouchPhase::Start, 200.0, 100.0),
                touch(1, egui::TouchPhase::Move, 80.0, 100.0),
                touch(1, egui::TouchPhase::End, 80.0, 100.0),
            ],
            container(),
        );
        assert_eq!(
            phases(&out),
            vec![TouchPhase::Start, TouchPhase::Move, TouchPhase::End]
        );
        assert_eq!(out[1].point.x, 80.0);
    }

    #[test]
    fn test_second_finger_is_ignored() {
        let mut routing = PointerRouting::default();
        let out = routing.translate(
            &[
                touch(1, egui::TouchPhase::Start, 200.0, 100.0),
                touch(2, egui::TouchPhase::Start, 100.0, 100.0),
                touch(2, egui::TouchPhase::Move, 10.0, 100.0),
                touch(2, egui::TouchPhase::Cancel, 10.0, 100.0),
            ],
            container(),
        );
        assert_eq!(phases(&out), vec![TouchPhase::Start]);
    }

    #[test]
    fn test_touch_outside_container_does_not_start() {
        let mut routing = PointerRouting::default();
        let out = routing.translate(&[touch(1, egui::TouchPhase::Start, 200.0, 10.0)], container());
        assert!(out.is_empty());
    }

    #[test]
    fn test_mouse_drag_stands_in_for_touch() {
        let mut routing = PointerRouting::default();
        let press = |pressed| egui::Event::PointerButton {
            pos: Pos2::new(300.0, 200.0),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        let out = routing.translate(
            &[
                press(true),
                egui::Event::PointerMoved(Pos2::new(150.0, 200.0)),
                press(false),
            ],
            container(),
        );
        assert_eq!(
            phases(&out),
            vec![TouchPhase::Start, TouchPhase::Move, TouchPhase::End]
        );
    }

    #[test]
    fn test_synthesised_pointer_ignored_after_touch() {
        let mut routing = PointerRouting::default();
        routing.translate(&[touch(1, egui::TouchPhase::Start, 200.0, 100.0)], container());
        let out = routing.translate(
            &[egui::Event::PointerButton {
                pos: Pos2::new(200.0, 100.0),
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            }],
            container(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_scroll_lock_lasts_for_gesture() {
        let mut routing = PointerRouting::default();
        assert!(!routing.update_scroll_lock(false, true));
        assert!(routing.update_scroll_lock(true, true));
        assert!(routing.update_scroll_lock(false, true));
        assert!(!routing.update_scroll_lock(false, false));
    }

    struct UnreachableSource;

    impl EventSource for UnreachableSource {
        fn fetch_events(&self, _range: DateRange) -> anyhow::Result<Vec<Event>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[test]
    fn test_failed_fetch_renders_empty_day_not_loading() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let range = DateRange::new(
            day - chrono::Duration::days(1),
            day + chrono::Duration::days(1),
        );
        let source: Arc<dyn EventSource> = Arc::new(UnreachableSource);
        let mut cache = EventCache::new();
        assert_eq!(page_body(&cache, day), PageBody::Loading);

        cache.ensure_range(&source, range);
        let deadline = Instant::now() + Duration::from_secs(5);
        while cache.has_pending() {
            assert!(Instant::now() < deadline, "fetch did not finish");
            cache.poll();
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(page_body(&cache, day), PageBody::Empty);
        assert_eq!(page_body(&cache, range.end), PageBody::Empty);
        assert_eq!(
            page_body(&cache, range.end + chrono::Duration::days(1)),
            PageBody::Loading
        );
    }
}
