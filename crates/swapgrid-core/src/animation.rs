#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Time-based animations produce normalized `f32` progress in [0.0, 1.0] and
//! are advanced explicitly with [`Animation::tick`]; nothing here reads a
//! clock. Three building blocks cover what the grid needs:
//!
//! - [`RectTween`]: eased interpolation between two rectangles, used by the
//!   layout animator to slide tiles into new slots.
//! - [`Follow`]: per-frame exponential approach of a point toward a moving
//!   target, used by the drag ghost.
//! - [`Pulse`]: a never-ending oscillation with a configurable period, used
//!   for deadline blinking.

use std::f32::consts::TAU;
use std::time::Duration;

use crate::geometry::{Point, Rect};

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out. Close to a critically damped spring settling into place.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

fn nonzero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// RectTween
// ---------------------------------------------------------------------------

/// Eased interpolation from one rectangle to another over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct RectTween {
    from: Rect,
    to: Rect,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl RectTween {
    /// Create a tween with cubic ease-out.
    pub fn new(from: Rect, to: Rect, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: nonzero(duration),
            easing: ease_out_cubic,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated rectangle.
    pub fn current(&self) -> Rect {
        self.from.lerp(&self.to, self.value())
    }

    /// Destination rectangle.
    pub fn target(&self) -> Rect {
        self.to
    }
}

impl Animation for RectTween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Follow
// ---------------------------------------------------------------------------

/// Exponential per-frame approach toward a target point.
///
/// Each [`step`](Follow::step) covers `factor` of the remaining distance.
/// The factor is clamped to `[0.01, 1.0]`; `1.0` snaps to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Follow {
    position: Point,
    target: Point,
    factor: f32,
}

impl Follow {
    /// Smallest accepted factor; smaller values would never visibly move.
    pub const MIN_FACTOR: f32 = 0.01;

    /// Start at `position`, already resting on it.
    pub fn new(position: Point, factor: f32) -> Self {
        Self {
            position,
            target: position,
            factor: Self::clamp_factor(factor),
        }
    }

    /// Clamp a factor into the accepted range. NaN falls back to snapping.
    pub fn clamp_factor(factor: f32) -> f32 {
        if factor.is_nan() {
            1.0
        } else {
            factor.clamp(Self::MIN_FACTOR, 1.0)
        }
    }

    /// Retarget without moving.
    pub fn set_target(&mut self, target: Point) {
        self.target = target;
    }

    /// Advance one frame and return the new position.
    pub fn step(&mut self) -> Point {
        self.position = self.position.approach(self.target, self.factor);
        self.position
    }

    /// Current position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current target.
    pub fn target(&self) -> Point {
        self.target
    }

    /// Effective (clamped) factor.
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

// ---------------------------------------------------------------------------
// Pulse
// ---------------------------------------------------------------------------

/// Continuous oscillation between 0.0 and 1.0 with a fixed period. Never completes.
#[derive(Debug, Clone, Copy)]
pub struct Pulse {
    period: Duration,
    elapsed: Duration,
}

impl Pulse {
    /// Create a pulse with the given period (one full dim-bright-dim cycle).
    pub fn new(period: Duration) -> Self {
        Self {
            period: nonzero(period),
            elapsed: Duration::ZERO,
        }
    }

    /// Build a pulse from a period in seconds, as reported by deadline styling.
    pub fn from_secs(period_secs: f32) -> Self {
        Self::new(Duration::from_secs_f32(period_secs.max(0.0)))
    }

    /// Period of one cycle.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the pulse is in the bright half of its cycle.
    pub fn is_on(&self) -> bool {
        self.value() >= 0.5
    }
}

impl Animation for Pulse {
    fn tick(&mut self, dt: Duration) {
        let period = self.period.as_nanos();
        let elapsed = (self.elapsed + dt).as_nanos() % period;
        // `elapsed < period`, and the period came from a Duration.
        self.elapsed = Duration::from_nanos(u64::try_from(elapsed).unwrap_or(0));
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn value(&self) -> f32 {
        let phase = (self.elapsed.as_secs_f64() / self.period.as_secs_f64()) as f32;
        // Starts dim (0.0), peaks mid-cycle.
        0.5 - 0.5 * (phase * TAU).cos()
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
