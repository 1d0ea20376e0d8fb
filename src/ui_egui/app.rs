mod lifecycle;
mod navigation;
mod shortcuts;
mod status_bar;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::models::settings::AppSettings;
use crate::services::event_source::{EventCache, EventSource};
use crate::services::settings::SettingsService;
use crate::ui_egui::swipe::SwipeNavigator;
use crate::ui_egui::theme::CalendarTheme;
use crate::ui_egui::viewport::{
    ViewportEvents, ViewportHeightStabilizer, ViewportSignal, ViewportSize, ViewportSubscription,
};
use crate::ui_egui::views::PointerRouting;

const HEADER_HEIGHT: f32 = 44.0;

pub struct CalendarApp {
    settings: AppSettings,
    settings_service: SettingsService,
    active_theme: CalendarTheme,
    /// Swipe state machine and the three-day window
    navigator: SwipeNavigator,
    routing: PointerRouting,
    /// Width of the page strip as laid out last frame
    container_width: f32,
    event_source: Arc<dyn EventSource>,
    /// Filled by background fetches; failed ranges are not retried until the user asks
    event_cache: EventCache,
    status_message: Option<String>,
    stabilizer: ViewportHeightStabilizer,
    viewport_events: ViewportEvents,
    /// Signals delivered by the viewport subscription, drained every frame
    pending_signals: Rc<RefCell<Vec<ViewportSignal>>>,
    _viewport_subscription: ViewportSubscription,
    last_viewport: Option<ViewportSize>,
    visible: bool,
}

impl eframe::App for CalendarApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.handle_update(ctx, frame);
    }
}
