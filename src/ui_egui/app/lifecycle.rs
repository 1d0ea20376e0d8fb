use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{CalendarApp, HEADER_HEIGHT};
use crate::models::settings::AppSettings;
use crate::services::event_source::{
    EventCache, EventSource, FetchOutcome, HttpEventSource, InMemoryEventSource,
};
use crate::services::settings::SettingsService;
use crate::ui_egui::swipe::SwipeNavigator;
use crate::ui_egui::theme::CalendarTheme;
use crate::ui_egui::viewport::{
    ViewportEvents, ViewportHeightStabilizer, ViewportSignal, ViewportSize,
};
use crate::ui_egui::views::{DayView, PointerRouting};
use crate::utils::date::today;

impl CalendarApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings_service: SettingsService,
        settings: AppSettings,
    ) -> Self {
        let active_theme = CalendarTheme::from_setting(&settings.theme);
        active_theme.apply_to_context(&cc.egui_ctx);

        let event_source = build_event_source(&settings);
        let initial_size = cc.egui_ctx.screen_rect().size();
        let stabilizer = ViewportHeightStabilizer::new(
            settings.viewport,
            ViewportSize::new(initial_size.x, initial_size.y),
        );

        let viewport_events = ViewportEvents::new();
        let pending_signals = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pending_signals);
        let subscription = viewport_events.subscribe(move |signal| sink.borrow_mut().push(signal));

        let mut app = Self {
            navigator: SwipeNavigator::new(settings.swipe, today()),
            routing: PointerRouting::default(),
            container_width: initial_size.x,
            event_source,
            event_cache: EventCache::new(),
            status_message: None,
            stabilizer,
            viewport_events,
            pending_signals,
            _viewport_subscription: subscription,
            last_viewport: None,
            visible: true,
            active_theme,
            settings,
            settings_service,
        };
        app.refresh_events();
        app
    }

    pub(super) fn handle_update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.publish_viewport_signals(ctx);
        self.apply_viewport_signals(now);
        if let Some(wait) = self.stabilizer.next_poll_in(now) {
            ctx.request_repaint_after(wait);
        }

        self.poll_events(ctx);
        self.handle_keyboard_shortcuts(ctx);

        egui::TopBottomPanel::top("day_header")
            .exact_height(HEADER_HEIGHT)
            .show(ctx, |ui| self.render_header(ui));

        self.render_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            // Lay the strip out against the stabilised height so chrome
            // jitter does not resize the pages mid-gesture.
            let page_height = (self.stabilizer.stable_height() - ui.min_rect().top()).max(0.0);
            self.container_width = ui.available_width();
            let committed = DayView::show(
                ui,
                &mut self.navigator,
                &mut self.routing,
                &self.event_cache,
                &self.active_theme,
                page_height,
            );
            if committed.is_some() {
                self.refresh_events();
            }
        });
    }

    /// Picks up finished background fetches and keeps repainting while
    /// any are still running.
    fn poll_events(&mut self, ctx: &egui::Context) {
        for outcome in self.event_cache.poll() {
            match outcome {
                FetchOutcome::Loaded(range) => {
                    log::debug!("Events loaded for {}..={}", range.start, range.end);
                    self.status_message = None;
                }
                FetchOutcome::Failed { .. } => {
                    self.status_message = Some("Couldn't load events".to_string());
                }
            }
        }
        if self.event_cache.has_pending() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }
    }

    /// Turns changes in egui's viewport info into signals for subscribers.
    fn publish_viewport_signals(&mut self, ctx: &egui::Context) {
        let size = ctx.screen_rect().size();
        let size = ViewportSize::new(size.x, size.y);
        if self.last_viewport != Some(size) {
            self.last_viewport = Some(size);
            self.viewport_events.publish(ViewportSignal::Resized(size));
        }

        let visible = !ctx.input(|i| i.viewport().minimized.unwrap_or(false));
        if visible != self.visible {
            self.visible = visible;
            self.viewport_events
                .publish(ViewportSignal::VisibilityChanged(visible));
        }
    }

    fn apply_viewport_signals(&mut self, now: Instant) {
        let signals: Vec<ViewportSignal> = self.pending_signals.borrow_mut().drain(..).collect();
        for signal in signals {
            match signal {
                ViewportSignal::Resized(size) => {
                    self.stabilizer.observe(size, now);
                }
                ViewportSignal::VisibilityChanged(visible) => {
                    log::info!("Window visibility changed: visible={}", visible);
                    if self.navigator.on_visibility_changed(visible).is_some() {
                        self.refresh_events();
                    }
                }
            }
        }
        self.stabilizer.poll(now);
    }
}

fn build_event_source(settings: &AppSettings) -> Arc<dyn EventSource> {
    match HttpEventSource::from_settings(&settings.events) {
        Ok(Some(source)) => {
            log::info!("Using event service at {:?}", settings.events.base_url);
            Arc::new(source)
        }
        Ok(None) => {
            log::info!("No event service configured; running offline");
            Arc::new(InMemoryEventSource::default())
        }
        Err(e) => {
            log::warn!("Failed to set up event service: {:#}; running offline", e);
            Arc::new(InMemoryEventSource::default())
        }
    }
}
