// Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use std::time::{Duration, Instant};
use swipe_calendar::models::event::Event;
use swipe_calendar::models::settings::SwipeSettings;
use swipe_calendar::services::event_source::{EventCache, FetchOutcome};
use swipe_calendar::ui_egui::swipe::{SwipeNavigator, TouchEvent};

pub const CONTAINER_WIDTH: f32 = 390.0;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

pub fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .single()
        .expect("unambiguous fixture time")
}

pub fn event(title: &str, d: u32, start_hour: u32, end_hour: u32) -> Event {
    Event::new(title, local(2024, 6, d, start_hour), local(2024, 6, d, end_hour))
        .expect("valid fixture event")
}

pub fn navigator_at(focal: NaiveDate) -> SwipeNavigator {
    SwipeNavigator::new(SwipeSettings::default(), focal)
}

/// Feeds a horizontal drag from `from_x` to `to_x` and releases.
pub fn swipe(nav: &mut SwipeNavigator, from_x: f32, to_x: f32, now: Instant) {
    nav.handle_touch(TouchEvent::start(from_x, 300.0), CONTAINER_WIDTH, now);
    nav.handle_touch(TouchEvent::moved(to_x, 300.0), CONTAINER_WIDTH, now);
    nav.handle_touch(TouchEvent::end(), CONTAINER_WIDTH, now);
}

/// Runs the animator well past its duration.
pub fn settle_animation(nav: &mut SwipeNavigator, started: Instant) -> Option<NaiveDate> {
    let committed = nav.tick(started + Duration::from_millis(350));
    nav.end_frame();
    committed
}

/// Polls the cache until no background fetch is left, collecting outcomes.
pub fn wait_for_fetches(cache: &mut EventCache) -> Vec<FetchOutcome> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut outcomes = Vec::new();
    while cache.has_pending() {
        assert!(Instant::now() < deadline, "background fetch did not finish");
        outcomes.extend(cache.poll());
        std::thread::sleep(Duration::from_millis(2));
    }
    outcomes
}
