// Swipe day navigation
//
// Wires the gesture tracker, the animator and the day window together:
// touch events -> tracker -> animator -> (on commit) day window shift.

pub mod animator;
pub mod day_window;
pub mod gesture;

use chrono::NaiveDate;
use std::time::Instant;

pub use animator::{AnimationPhase, SwipeAnimator};
pub use day_window::DayWindow;
pub use gesture::{
    Axis, GestureTracker, NavDirection, SwipeDecision, TouchEvent, TouchPhase, TouchPoint,
};

use crate::models::settings::SwipeSettings;

/// What the host view should do with the platform event it just forwarded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchResponse {
    /// The event belonged to a live gesture
    pub accepted: bool,
    /// Swallow the platform's default scroll/zoom for this event
    pub suppress_default: bool,
}

pub struct SwipeNavigator {
    tracker: GestureTracker,
    animator: SwipeAnimator,
    window: DayWindow,
}

impl SwipeNavigator {
    pub fn new(settings: SwipeSettings, focal_date: NaiveDate) -> Self {
        Self {
            tracker: GestureTracker::new(settings),
            animator: SwipeAnimator::new(settings.animation_duration()),
            window: DayWindow::new(focal_date),
        }
    }

    pub fn focal_date(&self) -> NaiveDate {
        self.window.focal_date()
    }

    pub fn pages(&self) -> [NaiveDate; 3] {
        self.window.pages()
    }

    pub fn window(&self) -> &DayWindow {
        &self.window
    }

    pub fn translate_x(&self) -> f32 {
        self.animator.translate_x()
    }

    pub fn phase(&self) -> AnimationPhase {
        self.animator.phase()
    }

    pub fn transition_enabled(&self) -> bool {
        self.animator.transition_enabled()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_gesture_active(&self) -> bool {
        self.tracker.is_active()
    }

    pub fn handle_touch(
        &mut self,
        event: TouchEvent,
        container_width: f32,
        now: Instant,
    ) -> TouchResponse {
        match event.phase {
            TouchPhase::Start => TouchResponse {
                accepted: self.tracker.touch_start(event.point, self.animator.is_idle()),
                suppress_default: false,
            },
            TouchPhase::Move => {
                let Some(update) = self.tracker.touch_move(event.point) else {
                    return TouchResponse::default();
                };
                if update.axis == Axis::Horizontal {
                    if self.animator.phase() == AnimationPhase::Idle {
                        self.animator.begin_drag();
                    }
                    if let Some(offset) = update.offset {
                        log::trace!("Swipe drag offset {offset}");
                        self.animator.drag_to(offset);
                    }
                }
                TouchResponse {
                    accepted: true,
                    suppress_default: update.suppress_default,
                }
            }
            TouchPhase::End => {
                let decision = self.tracker.touch_end();
                self.resolve(decision, container_width, now)
            }
            TouchPhase::Cancel => {
                let decision = self.tracker.touch_cancel();
                self.resolve(decision, container_width, now)
            }
        }
    }

    /// Animated navigation without a gesture (toolbar buttons, arrow keys).
    pub fn navigate(
        &mut self,
        direction: NavDirection,
        container_width: f32,
        now: Instant,
    ) -> bool {
        if self.tracker.is_active() {
            return false;
        }
        self.animator.commit(direction, container_width, now)
    }

    /// Advances the running animation. Returns the new focal date in the
    /// frame a commit completes.
    pub fn tick(&mut self, now: Instant) -> Option<NaiveDate> {
        let direction = self.animator.tick(now)?;
        Some(self.apply_commit(direction))
    }

    /// Call after the frame has been painted.
    pub fn end_frame(&mut self) {
        self.animator.end_frame();
    }

    /// Jumps straight to `date`, superseding any gesture or animation.
    pub fn set_focal_date(&mut self, date: NaiveDate) -> bool {
        self.tracker.touch_cancel();
        self.animator.settle();
        self.animator.end_frame();
        self.window.set_focal_date(date)
    }

    /// Timers may have been throttled while hidden; on regain, settle any
    /// in-flight animation so nothing stays stuck mid-slide.
    pub fn on_visibility_changed(&mut self, visible: bool) -> Option<NaiveDate> {
        if !visible {
            log::debug!("Day view hidden (phase={:?})", self.animator.phase());
            return None;
        }
        self.tracker.touch_cancel();
        let settled = self.animator.settle()?;
        log::debug!("Settled pending {:?} commit after visibility regain", settled);
        Some(self.apply_commit(settled))
    }

    fn resolve(
        &mut self,
        decision: Option<SwipeDecision>,
        container_width: f32,
        now: Instant,
    ) -> TouchResponse {
        match decision {
            Some(SwipeDecision::Commit(direction)) => {
                self.animator.commit(direction, container_width, now);
            }
            Some(SwipeDecision::Cancel) => {
                self.animator.spring_back(now);
            }
            None => return TouchResponse::default(),
        }
        TouchResponse {
            accepted: true,
            suppress_default: false,
        }
    }

    fn apply_commit(&mut self, direction: NavDirection) -> NaiveDate {
        self.window.on_committed(direction);
        log::debug!("Committed {:?}; focal date now {}", direction, self.window.focal_date());
        self.window.focal_date()
    }
}
