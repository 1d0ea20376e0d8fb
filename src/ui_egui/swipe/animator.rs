// Spring/Commit Animator
//
// Owns the horizontal offset of the three-page strip. A release either
// commits (slides a full page in the direction of travel) or springs back to
// centre. Only one transition runs at a time.

use std::time::{Duration, Instant};

use super::gesture::NavDirection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Strip centred, ready for a new gesture
    Idle,
    /// Strip follows the finger
    Dragging,
    /// Sliding a neighbouring page into view
    Committing(NavDirection),
    /// Returning to centre without navigating
    SpringingBack,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: f32,
    to: f32,
    started_at: Instant,
}

pub struct SwipeAnimator {
    duration: Duration,
    phase: AnimationPhase,
    translate_x: f32,
    transition: Option<Transition>,
    transition_enabled: bool,
}

impl SwipeAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            phase: AnimationPhase::Idle,
            translate_x: 0.0,
            transition: None,
            transition_enabled: true,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == AnimationPhase::Idle
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            AnimationPhase::Committing(_) | AnimationPhase::SpringingBack
        )
    }

    pub fn translate_x(&self) -> f32 {
        self.translate_x
    }

    /// False only for the frame in which a finished commit snapped the strip
    /// back to centre; the renderer must place that frame without easing.
    pub fn transition_enabled(&self) -> bool {
        self.transition_enabled
    }

    /// Re-enables transitions once the reset frame has been presented.
    pub fn end_frame(&mut self) {
        self.transition_enabled = true;
    }

    pub fn begin_drag(&mut self) -> bool {
        if self.phase != AnimationPhase::Idle {
            return false;
        }
        self.phase = AnimationPhase::Dragging;
        self.transition_enabled = true;
        true
    }

    pub fn drag_to(&mut self, offset: f32) {
        if self.phase == AnimationPhase::Dragging && offset.is_finite() {
            self.translate_x = offset;
        }
    }

    /// Slides a full container width in the direction of travel.
    pub fn commit(&mut self, direction: NavDirection, container_width: f32, now: Instant) -> bool {
        if !self.accepts_transition() {
            return false;
        }
        let width = if container_width.is_finite() {
            container_width.max(0.0)
        } else {
            0.0
        };
        self.start_transition(
            AnimationPhase::Committing(direction),
            direction.offset_sign() * width,
            now,
        );
        true
    }

    pub fn spring_back(&mut self, now: Instant) -> bool {
        if !self.accepts_transition() {
            return false;
        }
        if self.phase == AnimationPhase::Idle {
            // Already centred; nothing to animate
            return false;
        }
        self.start_transition(AnimationPhase::SpringingBack, 0.0, now);
        true
    }

    /// Advances the running transition. Returns the direction of a commit in
    /// the call that completes it, exactly once.
    pub fn tick(&mut self, now: Instant) -> Option<NavDirection> {
        let transition = self.transition?;
        let progress = self.progress(transition.started_at, now);
        self.translate_x =
            transition.from + (transition.to - transition.from) * ease_out_cubic(progress);

        if progress < 1.0 {
            return None;
        }
        self.finish()
    }

    /// Forces the animator back to a consistent resting state, e.g. after the
    /// window regains visibility and timers were throttled. A commit that was
    /// already decided is still reported.
    pub fn settle(&mut self) -> Option<NavDirection> {
        match self.phase {
            AnimationPhase::Idle => None,
            AnimationPhase::Dragging => {
                self.reset(true);
                None
            }
            AnimationPhase::Committing(_) | AnimationPhase::SpringingBack => self.finish(),
        }
    }

    fn accepts_transition(&self) -> bool {
        matches!(self.phase, AnimationPhase::Idle | AnimationPhase::Dragging)
    }

    fn start_transition(&mut self, phase: AnimationPhase, target: f32, now: Instant) {
        self.phase = phase;
        self.transition_enabled = true;
        self.transition = Some(Transition {
            from: self.translate_x,
            to: target,
            started_at: now,
        });
    }

    fn finish(&mut self) -> Option<NavDirection> {
        match self.phase {
            AnimationPhase::Committing(direction) => {
                // Callback and reset land in the same frame, without a transition
                self.reset(false);
                Some(direction)
            }
            _ => {
                self.reset(true);
                None
            }
        }
    }

    fn reset(&mut self, transition_enabled: bool) {
        self.phase = AnimationPhase::Idle;
        self.translate_x = 0.0;
        self.transition = None;
        self.transition_enabled = transition_enabled;
    }

    fn progress(&self, started_at: Instant, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}
