// Gesture Tracker
//
// Turns a touch start/move/end sequence into a live horizontal offset and,
// on release, a navigation decision.
// - Axis is classified once, after travel exceeds the lock threshold
// - Vertical gestures are left to native scrolling
// - Horizontal gestures commit only past the minimum swipe distance

use crate::models::settings::SwipeSettings;

/// A touch coordinate in logical pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Lifecycle tag of a raw touch event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    /// Interrupted by the platform (incoming call, OS gesture)
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub point: TouchPoint,
}

impl TouchEvent {
    pub fn start(x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Start,
            point: TouchPoint::new(x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: TouchPhase::Move,
            point: TouchPoint::new(x, y),
        }
    }

    /// End events carry no meaningful coordinate; the last move wins.
    pub fn end() -> Self {
        Self {
            phase: TouchPhase::End,
            point: TouchPoint::new(0.0, 0.0),
        }
    }

    pub fn cancel() -> Self {
        Self {
            phase: TouchPhase::Cancel,
            point: TouchPoint::new(0.0, 0.0),
        }
    }
}

/// Classification of a gesture, fixed once decided
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Undecided,
    Horizontal,
    Vertical,
}

/// Day navigation requested by a committed swipe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavDirection {
    /// Finger moved right: show the day before
    Previous,
    /// Finger moved left: show the day after
    Next,
}

impl NavDirection {
    /// Sign of the strip offset that slides the target page into view.
    pub fn offset_sign(self) -> f32 {
        match self {
            NavDirection::Previous => 1.0,
            NavDirection::Next => -1.0,
        }
    }
}

/// Outcome of a finished gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDecision {
    Commit(NavDirection),
    /// Spring back without navigating
    Cancel,
}

/// State of one touch interaction, from start to end/cancel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub start_x: f32,
    pub start_y: f32,
    pub current_x: f32,
    pub axis: Axis,
    pub active: bool,
}

impl GestureSession {
    fn begin(point: TouchPoint) -> Self {
        Self {
            start_x: point.x,
            start_y: point.y,
            current_x: point.x,
            axis: Axis::Undecided,
            active: true,
        }
    }

    pub fn distance(&self) -> f32 {
        self.current_x - self.start_x
    }
}

/// Result of feeding a move event to the tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveUpdate {
    pub axis: Axis,
    /// Horizontal drag offset; `None` unless the gesture is horizontal
    pub offset: Option<f32>,
    /// The host should swallow the platform's default scroll/zoom
    pub suppress_default: bool,
}

pub struct GestureTracker {
    settings: SwipeSettings,
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new(settings: SwipeSettings) -> Self {
        Self {
            settings,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref().filter(|session| session.active)
    }

    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    /// Opens a session unless an animation is still running.
    pub fn touch_start(&mut self, point: TouchPoint, animator_idle: bool) -> bool {
        if !animator_idle {
            log::trace!("Touch start rejected: animation in flight");
            return false;
        }
        self.session = Some(GestureSession::begin(point));
        true
    }

    pub fn touch_move(&mut self, point: TouchPoint) -> Option<MoveUpdate> {
        let lock_threshold = self.settings.axis_lock_threshold;
        let suppress_threshold = self.settings.scroll_suppress_threshold;
        let session = self.session.as_mut().filter(|session| session.active)?;

        session.current_x = point.x;

        if session.axis == Axis::Undecided {
            let dx = (point.x - session.start_x).abs();
            let dy = (point.y - session.start_y).abs();
            if dx.max(dy) > lock_threshold {
                session.axis = if dx > dy {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                };
                log::debug!("Gesture axis locked to {:?} (dx={dx}, dy={dy})", session.axis);
            }
        }

        let update = match session.axis {
            Axis::Horizontal => {
                let offset = point.x - session.start_x;
                MoveUpdate {
                    axis: Axis::Horizontal,
                    offset: Some(offset),
                    suppress_default: offset.abs() > suppress_threshold,
                }
            }
            axis => MoveUpdate {
                axis,
                offset: None,
                suppress_default: false,
            },
        };
        Some(update)
    }

    pub fn touch_end(&mut self) -> Option<SwipeDecision> {
        let session = self.take_active()?;
        let distance = session.distance();

        let decision = if session.axis == Axis::Horizontal
            && distance.abs() > self.settings.min_swipe_distance
        {
            if distance > 0.0 {
                SwipeDecision::Commit(NavDirection::Previous)
            } else {
                SwipeDecision::Commit(NavDirection::Next)
            }
        } else {
            SwipeDecision::Cancel
        };

        log::debug!(
            "Gesture ended: axis={:?}, distance={distance}, decision={decision:?}",
            session.axis
        );
        Some(decision)
    }

    pub fn touch_cancel(&mut self) -> Option<SwipeDecision> {
        self.take_active().map(|session| {
            log::debug!("Gesture cancelled by platform (axis={:?})", session.axis);
            SwipeDecision::Cancel
        })
    }

    fn take_active(&mut self) -> Option<GestureSession> {
        let mut session = self.session.take().filter(|session| session.active)?;
        session.active = false;
        Some(session)
    }
}
