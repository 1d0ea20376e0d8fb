// Integration tests for swipe navigation, event loading and settings persistence
mod fixtures;

use fixtures::*;
use mockall::predicate::eq;
use mockall::{mock, Sequence};
use pretty_assertions::assert_eq;
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};
use swipe_calendar::models::event::{DateRange, Event};
use swipe_calendar::models::settings::AppSettings;
use swipe_calendar::services::event_source::{DayState, EventCache, EventSource, FetchOutcome};
use swipe_calendar::services::settings::SettingsService;
use swipe_calendar::ui_egui::swipe::{AnimationPhase, NavDirection, SwipeNavigator, TouchEvent};
use tempfile::TempDir;
use test_case::test_case;

mock! {
    pub Source {}

    impl EventSource for Source {
        fn fetch_events(&self, range: DateRange) -> anyhow::Result<Vec<Event>>;
    }
}

#[test]
fn test_left_swipe_scenario() {
    // start(x=200), move(x=80), end() on 2024-06-15
    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));

    swipe(&mut nav, 200.0, 80.0, now);
    assert_eq!(nav.phase(), AnimationPhase::Committing(NavDirection::Next));
    assert_eq!(nav.focal_date(), date(2024, 6, 15), "date moves only when the slide completes");

    assert_eq!(nav.tick(now + Duration::from_millis(300)), Some(date(2024, 6, 16)));
    assert_eq!(nav.pages(), [date(2024, 6, 15), date(2024, 6, 16), date(2024, 6, 17)]);
    assert_eq!(nav.translate_x(), 0.0);
    assert_eq!(nav.phase(), AnimationPhase::Idle);
}

#[test]
fn test_short_swipe_scenario() {
    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));

    swipe(&mut nav, 200.0, 150.0, now);
    assert_eq!(settle_animation(&mut nav, now), None);
    assert_eq!(nav.translate_x(), 0.0);
    assert_eq!(nav.phase(), AnimationPhase::Idle);
    assert_eq!(nav.focal_date(), date(2024, 6, 15));
}

#[test_case(200.0, 80.0, date(2024, 6, 16); "left swipe goes to next day")]
#[test_case(80.0, 200.0, date(2024, 6, 14); "right swipe goes to previous day")]
#[test_case(200.0, 99.0, date(2024, 6, 16); "just past the commit distance")]
#[test_case(200.0, 100.0, date(2024, 6, 15); "exactly the commit distance springs back")]
fn test_swipe_outcomes(from_x: f32, to_x: f32, expected: chrono::NaiveDate) {
    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));
    // Lock the axis with a long drag first, then finish at `to_x`
    nav.handle_touch(TouchEvent::start(from_x, 0.0), CONTAINER_WIDTH, now);
    let lock_x = if to_x < from_x { from_x - 150.0 } else { from_x + 150.0 };
    nav.handle_touch(TouchEvent::moved(lock_x, 0.0), CONTAINER_WIDTH, now);
    nav.handle_touch(TouchEvent::moved(to_x, 0.0), CONTAINER_WIDTH, now);
    nav.handle_touch(TouchEvent::end(), CONTAINER_WIDTH, now);

    settle_animation(&mut nav, now);
    assert_eq!(nav.focal_date(), expected);
    assert_eq!(nav.translate_x(), 0.0);
}

#[test]
fn test_consecutive_swipes_each_move_one_day() {
    let mut now = Instant::now();
    let mut nav = navigator_at(date(2024, 2, 27));

    for expected in [date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)] {
        swipe(&mut nav, 300.0, 20.0, now);
        assert_eq!(settle_animation(&mut nav, now), Some(expected));
        now += Duration::from_millis(400);
    }
}

#[test]
fn test_touch_during_commit_is_rejected() {
    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));
    swipe(&mut nav, 300.0, 20.0, now);

    let midway = now + Duration::from_millis(120);
    swipe(&mut nav, 20.0, 300.0, midway);
    assert_eq!(nav.phase(), AnimationPhase::Committing(NavDirection::Next));

    assert_eq!(settle_animation(&mut nav, now), Some(date(2024, 6, 16)));
    assert_eq!(settle_animation(&mut nav, midway), None);
}

#[test]
fn test_vertical_scroll_never_moves_strip() {
    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));
    nav.handle_touch(TouchEvent::start(100.0, 100.0), CONTAINER_WIDTH, now);
    for y in [150.0, 250.0, 400.0] {
        let response = nav.handle_touch(TouchEvent::moved(140.0, y), CONTAINER_WIDTH, now);
        assert!(!response.suppress_default);
        assert_eq!(nav.translate_x(), 0.0);
    }
    nav.handle_touch(TouchEvent::end(), CONTAINER_WIDTH, now);
    assert_eq!(settle_animation(&mut nav, now), None);
    assert_eq!(nav.focal_date(), date(2024, 6, 15));
}

#[test]
fn test_cache_fetches_window_range_once() {
    let mut source = MockSource::new();
    let mut seq = Sequence::new();
    let first = DateRange::new(date(2024, 6, 14), date(2024, 6, 16));
    let second = DateRange::new(date(2024, 6, 15), date(2024, 6, 17));

    source
        .expect_fetch_events()
        .with(eq(first))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![event("Pickup", 15, 15, 16), event("Swim", 16, 9, 10)]));
    source
        .expect_fetch_events()
        .with(eq(second))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(vec![event("Swim", 16, 9, 10), event("Dinner", 17, 18, 19)]));
    let source: Arc<dyn EventSource> = Arc::new(source);

    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));
    let mut cache = EventCache::new();

    assert!(cache.ensure_range(&source, nav.window().range()));
    wait_for_fetches(&mut cache);
    assert!(!cache.ensure_range(&source, nav.window().range()));

    swipe(&mut nav, 300.0, 20.0, now);
    settle_animation(&mut nav, now);
    assert!(cache.ensure_range(&source, nav.window().range()));
    wait_for_fetches(&mut cache);

    let titles: Vec<_> = cache
        .events_for(date(2024, 6, 17))
        .iter()
        .map(|e| e.title.clone())
        .collect();
    assert_eq!(titles, vec!["Dinner".to_string()]);
}

#[test]
fn test_cache_keeps_previous_data_on_fetch_error() {
    let mut source = MockSource::new();
    source
        .expect_fetch_events()
        .times(1)
        .returning(|_| Ok(vec![event("Pickup", 15, 15, 16)]));
    source
        .expect_fetch_events()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("service unavailable")));
    let source: Arc<dyn EventSource> = Arc::new(source);

    let mut cache = EventCache::new();
    cache.ensure_range(&source, DateRange::new(date(2024, 6, 14), date(2024, 6, 16)));
    wait_for_fetches(&mut cache);
    cache.ensure_range(&source, DateRange::new(date(2024, 6, 15), date(2024, 6, 17)));
    let outcomes = wait_for_fetches(&mut cache);

    assert!(matches!(outcomes.as_slice(), [FetchOutcome::Failed { .. }]));
    assert_eq!(cache.events_for(date(2024, 6, 15)).len(), 1);
    assert_eq!(cache.day_state(date(2024, 6, 15)), DayState::Loaded);
    assert_eq!(cache.day_state(date(2024, 6, 17)), DayState::Failed);
}

#[test]
fn test_hung_event_service_does_not_block_navigation() {
    let (release, gate) = mpsc::channel::<()>();
    let gate = Mutex::new(gate);
    let mut source = MockSource::new();
    source.expect_fetch_events().times(1).returning(move |_| {
        if let Ok(gate) = gate.lock() {
            let _ = gate.recv();
        }
        Ok(vec![event("Pickup", 15, 15, 16)])
    });
    let source: Arc<dyn EventSource> = Arc::new(source);

    let now = Instant::now();
    let mut nav = navigator_at(date(2024, 6, 15));
    let mut cache = EventCache::new();

    let started = Instant::now();
    assert!(cache.ensure_range(&source, nav.window().range()));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(cache.day_state(date(2024, 6, 15)), DayState::Loading);

    // The strip keeps responding while the fetch hangs
    swipe(&mut nav, 300.0, 20.0, now);
    assert_eq!(settle_animation(&mut nav, now), Some(date(2024, 6, 16)));
    assert!(cache.poll().is_empty());

    release.send(()).expect("fetch worker is waiting");
    wait_for_fetches(&mut cache);
    assert_eq!(cache.events_for(date(2024, 6, 15)).len(), 1);
}

#[test]
fn test_settings_persistence() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let service = SettingsService::new(dir.path().join("settings.toml"));

    let mut settings = service.load().expect("Failed to load defaults");
    assert_eq!(settings, AppSettings::default());

    settings.theme = "dark".to_string();
    settings.swipe.min_swipe_distance = 64.0;
    settings.swipe.animation_duration_ms = 220;
    settings.viewport.settle_delay_ms = 90;
    service.save(&settings).expect("Failed to save settings");

    // Simulate a restart with a fresh service
    let reloaded = SettingsService::new(dir.path().join("settings.toml"))
        .load()
        .expect("Failed to reload settings");
    assert_eq!(reloaded, settings);
}

#[test]
fn test_tuned_settings_drive_navigation() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[swipe]\nmin_swipe_distance = 30.0\naxis_lock_threshold = 20.0\nanimation_duration_ms = 100\n",
    )
    .expect("Failed to write settings");

    let settings = SettingsService::new(&path).load().expect("Failed to load settings");
    let mut nav = SwipeNavigator::new(settings.swipe, date(2024, 6, 15));

    let now = Instant::now();
    swipe(&mut nav, 100.0, 60.0, now);
    assert_eq!(nav.tick(now + Duration::from_millis(100)), Some(date(2024, 6, 16)));
}
