#![forbid(unsafe_code)]

//! Semantic gesture events produced by the detector.
//!
//! These are immutable values handed to the registered handler slots; the
//! detector never retains them after the call.
//!
//! # Invariants
//! 1. Every drag is well-formed: `MoveStart` → zero or more `MoveUpdate` →
//!    `MoveEnd`.
//! 2. Every scale sequence is well-formed: `ScaleStart` → zero or more
//!    `ScaleUpdate` → `ScaleEnd`.
//! 3. Every `LongPress` is followed by exactly one `LongPressEnd`, with only
//!    `LongPressMove` in between.
//! 4. `ScaleEvent::rotation` is always within `(-PI, PI]`.

use crate::event::{Buttons, Contact, ContactMove, ScrollSignal};
use crate::geometry::Offset;
use crate::touch::PointerId;

/// A pointer-anchored event: tap, double tap, long press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    pub pointer: PointerId,
    pub local_position: Offset,
    pub global_position: Offset,
    pub buttons: Buttons,
}

impl TapEvent {
    #[must_use]
    pub const fn new(
        pointer: PointerId,
        local_position: Offset,
        global_position: Offset,
        buttons: Buttons,
    ) -> Self {
        Self {
            pointer,
            local_position,
            global_position,
            buttons,
        }
    }

    /// Tap at the position of a contact, with explicitly chosen buttons.
    #[must_use]
    pub const fn from_contact(contact: &Contact, buttons: Buttons) -> Self {
        Self::new(
            contact.pointer,
            contact.local_position,
            contact.position,
            buttons,
        )
    }
}

/// A tap event plus the per-step displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEvent {
    pub pointer: PointerId,
    pub local_position: Offset,
    pub global_position: Offset,
    pub buttons: Buttons,
    pub delta: Offset,
    pub local_delta: Offset,
}

impl MoveEvent {
    #[must_use]
    pub const fn from_move(motion: &ContactMove) -> Self {
        Self {
            pointer: motion.pointer,
            local_position: motion.local_position,
            global_position: motion.position,
            buttons: motion.buttons,
            delta: motion.delta,
            local_delta: motion.local_delta,
        }
    }

    /// The pointer-anchored part of the event.
    #[must_use]
    pub const fn tap(&self) -> TapEvent {
        TapEvent::new(
            self.pointer,
            self.local_position,
            self.global_position,
            self.buttons,
        )
    }
}

/// Two-finger scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEvent {
    /// Midpoint between the two anchor fingers.
    pub focal_point: Offset,
    /// Current finger distance over the distance when the gesture began.
    pub scale: f64,
    /// Signed rotation since the gesture began, in radians.
    pub rotation: f64,
}

impl ScaleEvent {
    /// Rotation in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Scroll passthrough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub pointer: PointerId,
    pub local_position: Offset,
    pub global_position: Offset,
    pub scroll_delta: Offset,
}

impl From<&ScrollSignal> for ScrollEvent {
    fn from(signal: &ScrollSignal) -> Self {
        Self {
            pointer: signal.pointer,
            local_position: signal.local_position,
            global_position: signal.position,
            scroll_delta: signal.scroll_delta,
        }
    }
}

/// Every event the detector can emit, one variant per handler slot.
///
/// Handy for logging and for hosts that prefer a single event queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap(TapEvent),
    DoubleTap(TapEvent),
    MoveStart(MoveEvent),
    MoveUpdate(MoveEvent),
    MoveEnd(MoveEvent),
    ScaleStart(ScaleEvent),
    ScaleUpdate(ScaleEvent),
    ScaleEnd,
    LongPress(TapEvent),
    LongPressMove(MoveEvent),
    LongPressEnd(TapEvent),
    Scroll(ScrollEvent),
}

impl GestureEvent {
    /// Stable name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tap(_) => "tap",
            Self::DoubleTap(_) => "double_tap",
            Self::MoveStart(_) => "move_start",
            Self::MoveUpdate(_) => "move_update",
            Self::MoveEnd(_) => "move_end",
            Self::ScaleStart(_) => "scale_start",
            Self::ScaleUpdate(_) => "scale_update",
            Self::ScaleEnd => "scale_end",
            Self::LongPress(_) => "long_press",
            Self::LongPressMove(_) => "long_press_move",
            Self::LongPressEnd(_) => "long_press_end",
            Self::Scroll(_) => "scroll",
        }
    }

    /// Returns true for move-start, move-update and move-end.
    #[must_use]
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::MoveStart(_) | Self::MoveUpdate(_) | Self::MoveEnd(_)
        )
    }

    /// Returns true for scale-start, scale-update and scale-end.
    #[must_use]
    pub fn is_scale(&self) -> bool {
        matches!(
            self,
            Self::ScaleStart(_) | Self::ScaleUpdate(_) | Self::ScaleEnd
        )
    }

    /// Returns true for the three long-press events.
    #[must_use]
    pub fn is_long_press(&self) -> bool {
        matches!(
            self,
            Self::LongPress(_) | Self::LongPressMove(_) | Self::LongPressEnd(_)
        )
    }

    /// The pointer the event is anchored to, if any.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            Self::Tap(e) | Self::DoubleTap(e) | Self::LongPress(e) | Self::LongPressEnd(e) => {
                Some(e.pointer)
            }
            Self::MoveStart(e) | Self::MoveUpdate(e) | Self::MoveEnd(e) | Self::LongPressMove(e) => {
                Some(e.pointer)
            }
            Self::Scroll(e) => Some(e.pointer),
            Self::ScaleStart(_) | Self::ScaleUpdate(_) | Self::ScaleEnd => None,
        }
    }
}
