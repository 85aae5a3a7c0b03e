#![forbid(unsafe_code)]

//! Raw pointer input delivered by the host layer.
//!
//! The host has already applied device-pixel-ratio scaling and mapped
//! positions into both the global surface space and the detector's local
//! space. Events must arrive in true chronological order per surface.
//!
//! # Design Notes
//!
//! - `Contact::at` covers hosts that only track one coordinate space; local
//!   and global positions are then identical.
//! - `Buttons` use bitflags for easy combination.
//! - Cancellation carries the same payload as a release.

use bitflags::bitflags;

use crate::geometry::Offset;
use crate::touch::PointerId;

/// Canonical pointer input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// A contact touched the surface.
    Down(Contact),

    /// An active contact moved.
    Move(ContactMove),

    /// A contact lifted off the surface.
    Up(Contact),

    /// The platform aborted a contact (palm rejection, focus loss, ...).
    Cancel(Contact),

    /// Discrete scroll signal (mouse wheel, trackpad scroll).
    Scroll(ScrollSignal),
}

impl PointerEvent {
    /// Pointer the event belongs to.
    #[must_use]
    pub fn pointer(&self) -> PointerId {
        match self {
            Self::Down(c) | Self::Up(c) | Self::Cancel(c) => c.pointer,
            Self::Move(m) => m.pointer,
            Self::Scroll(s) => s.pointer,
        }
    }
}

/// Begin, end or cancel of a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub pointer: PointerId,
    /// Position in global surface coordinates.
    pub position: Offset,
    /// Position in the detector's local coordinates.
    pub local_position: Offset,
    /// Buttons held when the event was produced.
    pub buttons: Buttons,
}

impl Contact {
    /// A primary-button contact whose local and global positions coincide.
    #[must_use]
    pub const fn at(pointer: PointerId, position: Offset) -> Self {
        Self {
            pointer,
            position,
            local_position: position,
            buttons: Buttons::PRIMARY,
        }
    }

    /// Override the local position.
    #[must_use]
    pub const fn with_local_position(mut self, local_position: Offset) -> Self {
        self.local_position = local_position;
        self
    }

    /// Override the held buttons.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Movement of an active contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMove {
    pub pointer: PointerId,
    pub position: Offset,
    pub local_position: Offset,
    /// Displacement since the previous event for this pointer (global).
    pub delta: Offset,
    /// Displacement since the previous event for this pointer (local).
    pub local_delta: Offset,
    pub buttons: Buttons,
}

impl ContactMove {
    /// A primary-button move whose local and global spaces coincide.
    #[must_use]
    pub const fn new(pointer: PointerId, position: Offset, delta: Offset) -> Self {
        Self {
            pointer,
            position,
            local_position: position,
            delta,
            local_delta: delta,
            buttons: Buttons::PRIMARY,
        }
    }

    /// Override the local position and delta.
    #[must_use]
    pub const fn with_local(mut self, local_position: Offset, local_delta: Offset) -> Self {
        self.local_position = local_position;
        self.local_delta = local_delta;
        self
    }
}

/// A discrete scroll signal from a pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSignal {
    pub pointer: PointerId,
    pub position: Offset,
    pub local_position: Offset,
    pub scroll_delta: Offset,
}

bitflags! {
    /// Buttons held while a pointer event was produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// No buttons (hovering pen, released contact).
        const NONE      = 0b0000_0000;
        /// Primary button, also any finger contact.
        const PRIMARY   = 0b0000_0001;
        /// Secondary (right) button or pen barrel button.
        const SECONDARY = 0b0000_0010;
        /// Middle (wheel) button.
        const TERTIARY  = 0b0000_0100;
        /// Browser-style back button.
        const BACK      = 0b0000_1000;
        /// Browser-style forward button.
        const FORWARD   = 0b0001_0000;
    }
}
