//! Viewport height stabilisation.
//!
//! Mobile shells resize the viewport while their toolbars slide in and out,
//! which makes layouts sized against the raw height jump around. The
//! stabiliser accepts real resizes (rotation, large jumps) immediately and
//! only adopts small height changes once they have held still for a while.
//!
//! Window-level signals are delivered through [`ViewportEvents`]; listeners
//! hold a [`ViewportSubscription`] that unregisters itself when dropped, so a
//! view that goes away cannot leave a dangling listener behind.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::models::settings::ViewportSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

pub struct ViewportHeightStabilizer {
    jitter_tolerance: f32,
    settle_delay: Duration,
    stable: ViewportSize,
    pending: Option<(f32, Instant)>,
}

impl ViewportHeightStabilizer {
    pub fn new(settings: ViewportSettings, initial: ViewportSize) -> Self {
        Self {
            jitter_tolerance: settings.jitter_tolerance,
            settle_delay: settings.settle_delay(),
            stable: initial,
            pending: None,
        }
    }

    pub fn stable_size(&self) -> ViewportSize {
        self.stable
    }

    pub fn stable_height(&self) -> f32 {
        self.stable.height
    }

    /// One hundredth of the stable height, the unit layouts size against.
    pub fn app_vh(&self) -> f32 {
        self.stable.height / 100.0
    }

    /// Records a raw size reading. Returns true if the stable size changed.
    pub fn observe(&mut self, size: ViewportSize, now: Instant) -> bool {
        if !size.width.is_finite() || !size.height.is_finite() {
            return false;
        }

        if (size.width - self.stable.width).abs() > f32::EPSILON {
            // Rotation or window resize: take it as-is
            return self.accept(size);
        }

        let delta = (size.height - self.stable.height).abs();
        if delta <= f32::EPSILON {
            self.pending = None;
            return false;
        }
        if delta > self.jitter_tolerance {
            return self.accept(size);
        }

        match self.pending {
            Some((height, _)) if (height - size.height).abs() <= f32::EPSILON => {}
            _ => self.pending = Some((size.height, now)),
        }
        self.poll(now)
    }

    /// Adopts a pending height once it has been stable for the settle delay.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some((height, since)) = self.pending else {
            return false;
        };
        if now.saturating_duration_since(since) < self.settle_delay {
            return false;
        }
        self.accept(ViewportSize::new(self.stable.width, height))
    }

    /// Time until a pending height would settle, for scheduling a repaint.
    pub fn next_poll_in(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|(_, since)| {
            self.settle_delay.saturating_sub(now.saturating_duration_since(since))
        })
    }

    fn accept(&mut self, size: ViewportSize) -> bool {
        self.pending = None;
        if size == self.stable {
            return false;
        }
        log::debug!(
            "Viewport stabilised at {}x{} (was {}x{})",
            size.width,
            size.height,
            self.stable.width,
            self.stable.height
        );
        self.stable = size;
        true
    }
}

/// Window-level signals a view may care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    Resized(ViewportSize),
    VisibilityChanged(bool),
}

type Listener = Box<dyn FnMut(ViewportSignal)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
    running: Option<u64>,
    running_dropped: bool,
}

/// Single-threaded fan-out of viewport signals to scoped listeners.
#[derive(Default, Clone)]
pub struct ViewportEvents {
    registry: Rc<RefCell<Registry>>,
}

impl ViewportEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        listener: impl FnMut(ViewportSignal) + 'static,
    ) -> ViewportSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, Box::new(listener));
        ViewportSubscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn publish(&self, signal: ViewportSignal) {
        // Listeners are taken out while they run so they may subscribe or
        // drop subscriptions without re-borrowing the registry.
        let ids: Vec<u64> = self.registry.borrow().listeners.keys().copied().collect();
        for id in ids {
            let listener = {
                let mut registry = self.registry.borrow_mut();
                registry.running = Some(id);
                registry.running_dropped = false;
                registry.listeners.remove(&id)
            };
            if let Some(mut listener) = listener {
                listener(signal);
                let mut registry = self.registry.borrow_mut();
                if !registry.running_dropped {
                    registry.listeners.insert(id, listener);
                }
            }
            self.registry.borrow_mut().running = None;
        }
    }
}

/// Keeps a listener registered; dropping it removes the listener.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct ViewportSubscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for ViewportSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                if registry.running == Some(self.id) {
                    registry.running_dropped = true;
                }
                registry.listeners.remove(&self.id);
            }
        }
    }
}
