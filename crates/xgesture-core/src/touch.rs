#![forbid(unsafe_code)]

//! Bookkeeping for contacts currently on the surface.
//!
//! [`TouchRegistry`] keeps touches in insertion order. Two-finger gestures
//! read entries 0 and 1 as the "first" and "second" finger, so the backing
//! store is a plain `Vec` rather than a hash map.

use std::fmt;

use crate::geometry::Offset;

/// Identifier of a contact, stable for as long as the contact stays down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerId(pub i64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PointerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One active contact point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: PointerId,
    /// Where the contact began, or where it was last re-anchored.
    pub start_offset: Offset,
    pub current_offset: Offset,
}

impl Touch {
    #[must_use]
    pub const fn new(id: PointerId, position: Offset) -> Self {
        Self {
            id,
            start_offset: position,
            current_offset: position,
        }
    }

    /// Squared displacement since the last anchor.
    #[inline]
    #[must_use]
    pub fn displacement_squared(&self) -> f64 {
        self.current_offset.distance_squared(self.start_offset)
    }
}

/// Active touches in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TouchRegistry {
    touches: Vec<Touch>,
}

impl TouchRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            touches: Vec::with_capacity(4),
        }
    }

    /// Register a new touch at `position`.
    ///
    /// Returns `false` and leaves the registry untouched if `id` is already
    /// active.
    pub fn add(&mut self, id: PointerId, position: Offset) -> bool {
        if self.contains(id) {
            return false;
        }
        self.touches.push(Touch::new(id, position));
        true
    }

    /// Move a touch. Returns `false` if `id` is not active.
    pub fn update_position(&mut self, id: PointerId, position: Offset) -> bool {
        match self.get_mut(id) {
            Some(touch) => {
                touch.current_offset = position;
                true
            }
            None => false,
        }
    }

    /// Re-anchor a touch so its start matches its current position.
    pub fn reset_start(&mut self, id: PointerId) -> bool {
        match self.get_mut(id) {
            Some(touch) => {
                touch.start_offset = touch.current_offset;
                true
            }
            None => false,
        }
    }

    /// Remove a touch, preserving the order of the rest.
    pub fn remove(&mut self, id: PointerId) -> Option<Touch> {
        let index = self.touches.iter().position(|t| t.id == id)?;
        Some(self.touches.remove(index))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: PointerId) -> bool {
        self.touches.iter().any(|t| t.id == id)
    }

    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<&Touch> {
        self.touches.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: PointerId) -> Option<&mut Touch> {
        self.touches.iter_mut().find(|t| t.id == id)
    }

    /// All touches, oldest first.
    #[inline]
    #[must_use]
    pub fn all(&self) -> &[Touch] {
        &self.touches
    }

    /// The two oldest touches, if at least two are active.
    #[must_use]
    pub fn first_two(&self) -> Option<(&Touch, &Touch)> {
        match self.touches.as_slice() {
            [first, second, ..] => Some((first, second)),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }
}
