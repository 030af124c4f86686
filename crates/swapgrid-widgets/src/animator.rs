#![forbid(unsafe_code)]

//! Layout animators.
//!
//! When the backing order changes, tiles jump to new slots. An animator turns
//! that jump into motion: the layout reports a `(from, to)` pair per moved
//! tile and reads back the interpolated rectangle each frame.

use std::collections::HashMap;
use std::time::Duration;

use swapgrid_core::animation::{Animation, EasingFn, RectTween, ease_out_cubic};
use swapgrid_core::geometry::Rect;

use crate::TileId;

/// Visual transitions of tiles between layout slots.
pub trait LayoutAnimator {
    /// Start moving `id` from `from` to `to`, replacing any running transition.
    fn transition(&mut self, id: &TileId, from: Rect, to: Rect);

    /// Advance every running transition by `dt`.
    fn tick(&mut self, dt: Duration);

    /// The in-flight rectangle for `id`, or `None` when it is at rest.
    fn current(&self, id: &TileId) -> Option<Rect>;

    /// Whether any transition is still running.
    fn is_animating(&self) -> bool;

    /// Drop every running transition; tiles snap to their slots.
    fn clear(&mut self) {}
}

/// Animator that never animates: tiles snap to their new slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

impl LayoutAnimator for InstantAnimator {
    fn transition(&mut self, _id: &TileId, _from: Rect, _to: Rect) {}

    fn tick(&mut self, _dt: Duration) {}

    fn current(&self, _id: &TileId) -> Option<Rect> {
        None
    }

    fn is_animating(&self) -> bool {
        false
    }
}

/// Duration-based eased slides.
#[derive(Debug, Clone)]
pub struct SlideAnimator {
    duration: Duration,
    easing: EasingFn,
    tweens: HashMap<TileId, RectTween>,
}

impl SlideAnimator {
    /// Default slide duration.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(180);

    /// Create an animator whose slides take `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: ease_out_cubic,
            tweens: HashMap::new(),
        }
    }

    /// Set the easing curve (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Slide duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Number of tiles currently in motion.
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

impl Default for SlideAnimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION)
    }
}

impl LayoutAnimator for SlideAnimator {
    fn transition(&mut self, id: &TileId, from: Rect, to: Rect) {
        if from == to {
            self.tweens.remove(id);
            return;
        }
        let tween = RectTween::new(from, to, self.duration).easing(self.easing);
        self.tweens.insert(id.clone(), tween);
    }

    fn tick(&mut self, dt: Duration) {
        for tween in self.tweens.values_mut() {
            tween.tick(dt);
        }
        self.tweens.retain(|_, tween| !tween.is_complete());
    }

    fn current(&self, id: &TileId) -> Option<Rect> {
        self.tweens.get(id).map(RectTween::current)
    }

    fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    fn clear(&mut self) {
        self.tweens.clear();
    }
}
