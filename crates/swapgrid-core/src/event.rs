#![forbid(unsafe_code)]

//! Pointer events.
//!
//! The reorder engine consumes a small, backend-agnostic pointer model:
//! press, move, release, and cancel, each stamped with the instant it was
//! observed. Timestamps travel with the event so cooldowns can be evaluated
//! deterministically (and replayed in tests) instead of reading a clock.
//!
//! On native targets, [`PointerEvent::from_crossterm`] maps terminal mouse
//! reports into this model. Terminal drags (`Drag(button)`) and plain moves
//! both become [`PointerKind::Move`]; scroll reports have no pointer meaning
//! and map to `None`.

use std::time::Instant;

use bitflags::bitflags;

use crate::geometry::Point;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A button was pressed.
    Down,
    /// The pointer moved (with or without a button held).
    Move,
    /// A button was released.
    Up,
    /// The platform aborted the gesture (focus loss, touch cancel, ...).
    Cancel,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left mouse button, primary touch contact, pen tip.
    #[default]
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button.
    Middle,
}

bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    /// Button that changed state (`Down`/`Up`) or is held (`Move` during a
    /// terminal drag). Plain moves report `Primary`.
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// When the event was observed.
    pub at: Instant,
}

impl PointerEvent {
    /// Create an event with no modifiers and the primary button.
    #[must_use]
    pub fn new(kind: PointerKind, position: Point, at: Instant) -> Self {
        Self {
            kind,
            position,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
            at,
        }
    }

    /// Primary-button press at `(x, y)`.
    #[must_use]
    pub fn down(x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerKind::Down, Point::new(x, y), at)
    }

    /// Pointer move to `(x, y)`.
    #[must_use]
    pub fn moved(x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerKind::Move, Point::new(x, y), at)
    }

    /// Primary-button release at `(x, y)`.
    #[must_use]
    pub fn up(x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerKind::Up, Point::new(x, y), at)
    }

    /// Gesture cancellation at `(x, y)`.
    #[must_use]
    pub fn cancel(x: f32, y: f32, at: Instant) -> Self {
        Self::new(PointerKind::Cancel, Point::new(x, y), at)
    }

    /// Set the button (builder).
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the modifiers (builder).
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is a press of the primary button.
    #[must_use]
    pub fn is_primary_down(&self) -> bool {
        self.kind == PointerKind::Down && self.button == PointerButton::Primary
    }

    /// Whether this event ends a gesture (release or cancel).
    #[must_use]
    pub fn ends_gesture(&self) -> bool {
        matches!(self.kind, PointerKind::Up | PointerKind::Cancel)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod crossterm_mapping {
    use std::time::Instant;

    use crossterm::event as cte;

    use super::{Modifiers, PointerButton, PointerEvent, PointerKind};
    use crate::geometry::Point;

    impl PointerEvent {
        /// Map a crossterm mouse report observed at `at`.
        ///
        /// Cell coordinates become the cell's top-left corner in pointer space.
        /// Returns `None` for scroll reports.
        #[must_use]
        pub fn from_crossterm(event: cte::MouseEvent, at: Instant) -> Option<Self> {
            let (kind, button) = match event.kind {
                cte::MouseEventKind::Down(b) => (PointerKind::Down, map_button(b)),
                cte::MouseEventKind::Up(b) => (PointerKind::Up, map_button(b)),
                cte::MouseEventKind::Drag(b) => (PointerKind::Move, map_button(b)),
                cte::MouseEventKind::Moved => (PointerKind::Move, PointerButton::Primary),
                cte::MouseEventKind::ScrollUp
                | cte::MouseEventKind::ScrollDown
                | cte::MouseEventKind::ScrollLeft
                | cte::MouseEventKind::ScrollRight => return None,
            };
            Some(PointerEvent {
                kind,
                position: Point::new(f32::from(event.column), f32::from(event.row)),
                button,
                modifiers: map_modifiers(event.modifiers),
                at,
            })
        }
    }

    fn map_button(button: cte::MouseButton) -> PointerButton {
        match button {
            cte::MouseButton::Left => PointerButton::Primary,
            cte::MouseButton::Right => PointerButton::Secondary,
            cte::MouseButton::Middle => PointerButton::Middle,
        }
    }

    fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
        let mut mapped = Modifiers::NONE;
        if modifiers.contains(cte::KeyModifiers::SHIFT) {
            mapped |= Modifiers::SHIFT;
        }
        if modifiers.contains(cte::KeyModifiers::ALT) {
            mapped |= Modifiers::ALT;
        }
        if modifiers.contains(cte::KeyModifiers::CONTROL) {
            mapped |= Modifiers::CTRL;
        }
        if modifiers.contains(cte::KeyModifiers::SUPER)
            || modifiers.contains(cte::KeyModifiers::HYPER)
            || modifiers.contains(cte::KeyModifiers::META)
        {
            mapped |= Modifiers::SUPER;
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_position() {
        let now = Instant::now();
        let down = PointerEvent::down(1.0, 2.0, now);
        assert_eq!(down.kind, PointerKind::Down);
        assert_eq!(down.position, Point::new(1.0, 2.0));
        assert!(down.is_primary_down());
        assert!(!down.ends_gesture());

        assert!(PointerEvent::up(0.0, 0.0, now).ends_gesture());
        assert!(PointerEvent::cancel(0.0, 0.0, now).ends_gesture());
        assert!(!PointerEvent::moved(0.0, 0.0, now).ends_gesture());
    }

    #[test]
    fn secondary_press_is_not_primary_down() {
        let ev = PointerEvent::down(0.0, 0.0, Instant::now()).with_button(PointerButton::Secondary);
        assert!(!ev.is_primary_down());
    }

    #[test]
    fn modifiers_default_to_none() {
        let ev = PointerEvent::moved(0.0, 0.0, Instant::now());
        assert_eq!(ev.modifiers, Modifiers::NONE);
        let ev = ev.with_modifiers(Modifiers::SHIFT | Modifiers::CTRL);
        assert!(ev.modifiers.contains(Modifiers::CTRL));
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod crossterm_reports {
        use super::*;
        use ::crossterm::event as cte;

        fn mouse(kind: cte::MouseEventKind) -> cte::MouseEvent {
            cte::MouseEvent {
                kind,
                column: 12,
                row: 4,
                modifiers: cte::KeyModifiers::ALT,
            }
        }

        #[test]
        fn drag_maps_to_move_with_button() {
            let at = Instant::now();
            let ev = PointerEvent::from_crossterm(
                mouse(cte::MouseEventKind::Drag(cte::MouseButton::Left)),
                at,
            )
            .unwrap();
            assert_eq!(ev.kind, PointerKind::Move);
            assert_eq!(ev.button, PointerButton::Primary);
            assert_eq!(ev.position, Point::new(12.0, 4.0));
            assert_eq!(ev.modifiers, Modifiers::ALT);
            assert_eq!(ev.at, at);
        }

        #[test]
        fn right_press_maps_to_secondary() {
            let ev = PointerEvent::from_crossterm(
                mouse(cte::MouseEventKind::Down(cte::MouseButton::Right)),
                Instant::now(),
            )
            .unwrap();
            assert_eq!(ev.kind, PointerKind::Down);
            assert_eq!(ev.button, PointerButton::Secondary);
        }

        #[test]
        fn scroll_is_ignored() {
            assert!(
                PointerEvent::from_crossterm(mouse(cte::MouseEventKind::ScrollDown), Instant::now())
                    .is_none()
            );
        }
    }
}
