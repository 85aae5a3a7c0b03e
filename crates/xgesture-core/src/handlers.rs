#![forbid(unsafe_code)]

//! Optional handler slots the detector emits into.
//!
//! Each slot is independently present or absent. Emitting into an empty slot
//! is a no-op. Whether the double-tap slot is filled also changes how taps
//! are resolved, so slots are fixed when the detector is built.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::semantic_event::{GestureEvent, MoveEvent, ScaleEvent, ScrollEvent, TapEvent};

type Slot<E> = Option<Box<dyn FnMut(&E)>>;
type Sink = Rc<RefCell<dyn FnMut(GestureEvent)>>;

fn route<E: Copy + 'static>(
    sink: &Sink,
    wrap: fn(E) -> GestureEvent,
) -> impl FnMut(&E) + 'static {
    let sink = Rc::clone(sink);
    move |e: &E| (&mut *sink.borrow_mut())(wrap(*e))
}

/// The set of callbacks a detector reports gestures to.
#[derive(Default)]
pub struct GestureHandlers {
    tap: Slot<TapEvent>,
    double_tap: Slot<TapEvent>,
    move_start: Slot<MoveEvent>,
    move_update: Slot<MoveEvent>,
    move_end: Slot<MoveEvent>,
    scale_start: Slot<ScaleEvent>,
    scale_update: Slot<ScaleEvent>,
    scale_end: Option<Box<dyn FnMut()>>,
    long_press: Slot<TapEvent>,
    long_press_move: Slot<MoveEvent>,
    long_press_end: Slot<TapEvent>,
    scroll: Slot<ScrollEvent>,
}

impl fmt::Debug for GestureHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureHandlers")
            .field("tap", &self.tap.is_some())
            .field("double_tap", &self.double_tap.is_some())
            .field("move_start", &self.move_start.is_some())
            .field("move_update", &self.move_update.is_some())
            .field("move_end", &self.move_end.is_some())
            .field("scale_start", &self.scale_start.is_some())
            .field("scale_update", &self.scale_update.is_some())
            .field("scale_end", &self.scale_end.is_some())
            .field("long_press", &self.long_press.is_some())
            .field("long_press_move", &self.long_press_move.is_some())
            .field("long_press_end", &self.long_press_end.is_some())
            .field("scroll", &self.scroll.is_some())
            .finish()
    }
}

impl GestureHandlers {
    /// No handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Route every slot, double tap included, into one sink.
    #[must_use]
    pub fn forward_all<F>(sink: F) -> Self
    where
        F: FnMut(GestureEvent) + 'static,
    {
        Self::forward(sink, true)
    }

    /// Route every slot into one sink, optionally leaving double tap empty so
    /// taps are reported without waiting.
    #[must_use]
    pub fn forward<F>(sink: F, with_double_tap: bool) -> Self
    where
        F: FnMut(GestureEvent) + 'static,
    {
        let sink: Sink = Rc::new(RefCell::new(sink));

        let handlers = Self::new()
            .on_tap(route(&sink, GestureEvent::Tap))
            .on_move_start(route(&sink, GestureEvent::MoveStart))
            .on_move_update(route(&sink, GestureEvent::MoveUpdate))
            .on_move_end(route(&sink, GestureEvent::MoveEnd))
            .on_scale_start(route(&sink, GestureEvent::ScaleStart))
            .on_scale_update(route(&sink, GestureEvent::ScaleUpdate))
            .on_long_press(route(&sink, GestureEvent::LongPress))
            .on_long_press_move(route(&sink, GestureEvent::LongPressMove))
            .on_long_press_end(route(&sink, GestureEvent::LongPressEnd))
            .on_scroll(route(&sink, GestureEvent::Scroll));
        let handlers = {
            let sink = Rc::clone(&sink);
            handlers.on_scale_end(move || (&mut *sink.borrow_mut())(GestureEvent::ScaleEnd))
        };
        if with_double_tap {
            handlers.on_double_tap(route(&sink, GestureEvent::DoubleTap))
        } else {
            handlers
        }
    }

    #[must_use]
    pub fn on_tap(mut self, f: impl FnMut(&TapEvent) + 'static) -> Self {
        self.tap = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_double_tap(mut self, f: impl FnMut(&TapEvent) + 'static) -> Self {
        self.double_tap = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_move_start(mut self, f: impl FnMut(&MoveEvent) + 'static) -> Self {
        self.move_start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_move_update(mut self, f: impl FnMut(&MoveEvent) + 'static) -> Self {
        self.move_update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_move_end(mut self, f: impl FnMut(&MoveEvent) + 'static) -> Self {
        self.move_end = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_scale_start(mut self, f: impl FnMut(&ScaleEvent) + 'static) -> Self {
        self.scale_start = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_scale_update(mut self, f: impl FnMut(&ScaleEvent) + 'static) -> Self {
        self.scale_update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_scale_end(mut self, f: impl FnMut() + 'static) -> Self {
        self.scale_end = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_long_press(mut self, f: impl FnMut(&TapEvent) + 'static) -> Self {
        self.long_press = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_long_press_move(mut self, f: impl FnMut(&MoveEvent) + 'static) -> Self {
        self.long_press_move = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_long_press_end(mut self, f: impl FnMut(&TapEvent) + 'static) -> Self {
        self.long_press_end = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_scroll(mut self, f: impl FnMut(&ScrollEvent) + 'static) -> Self {
        self.scroll = Some(Box::new(f));
        self
    }

    /// Whether a double-tap handler is registered.
    #[inline]
    #[must_use]
    pub fn has_double_tap(&self) -> bool {
        self.double_tap.is_some()
    }

    /// Invoke the slot matching `event`, if registered.
    pub(crate) fn dispatch(&mut self, event: &GestureEvent) {
        fn call<E>(slot: &mut Slot<E>, e: &E) {
            if let Some(f) = slot.as_mut() {
                f(e);
            }
        }

        match event {
            GestureEvent::Tap(e) => call(&mut self.tap, e),
            GestureEvent::DoubleTap(e) => call(&mut self.double_tap, e),
            GestureEvent::MoveStart(e) => call(&mut self.move_start, e),
            GestureEvent::MoveUpdate(e) => call(&mut self.move_update, e),
            GestureEvent::MoveEnd(e) => call(&mut self.move_end, e),
            GestureEvent::ScaleStart(e) => call(&mut self.scale_start, e),
            GestureEvent::ScaleUpdate(e) => call(&mut self.scale_update, e),
            GestureEvent::ScaleEnd => {
                if let Some(f) = self.scale_end.as_mut() {
                    f();
                }
            }
            GestureEvent::LongPress(e) => call(&mut self.long_press, e),
            GestureEvent::LongPressMove(e) => call(&mut self.long_press_move, e),
            GestureEvent::LongPressEnd(e) => call(&mut self.long_press_end, e),
            GestureEvent::Scroll(e) => call(&mut self.scroll, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Buttons;
    use crate::geometry::Offset;
    use crate::touch::PointerId;

    fn tap() -> TapEvent {
        TapEvent::new(PointerId(1), Offset::ZERO, Offset::ZERO, Buttons::PRIMARY)
    }

    #[test]
    fn empty_slot_is_noop() {
        let mut handlers = GestureHandlers::new();
        handlers.dispatch(&GestureEvent::Tap(tap()));
        handlers.dispatch(&GestureEvent::ScaleEnd);
        assert!(!handlers.has_double_tap());
    }

    #[test]
    fn dispatch_reaches_matching_slot_only() {
        let taps = Rc::new(RefCell::new(0));
        let doubles = Rc::new(RefCell::new(0));
        let mut handlers = GestureHandlers::new()
            .on_tap({
                let taps = Rc::clone(&taps);
                move |_| *taps.borrow_mut() += 1
            })
            .on_double_tap({
                let doubles = Rc::clone(&doubles);
                move |_| *doubles.borrow_mut() += 1
            });

        handlers.dispatch(&GestureEvent::Tap(tap()));
        handlers.dispatch(&GestureEvent::Tap(tap()));
        handlers.dispatch(&GestureEvent::DoubleTap(tap()));
        handlers.dispatch(&GestureEvent::LongPress(tap()));

        assert_eq!(*taps.borrow(), 2);
        assert_eq!(*doubles.borrow(), 1);
        assert!(handlers.has_double_tap());
    }

    #[test]
    fn forward_collects_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = GestureHandlers::forward_all({
            let log = Rc::clone(&log);
            move |e| log.borrow_mut().push(e)
        });
        handlers.dispatch(&GestureEvent::LongPress(tap()));
        handlers.dispatch(&GestureEvent::ScaleEnd);
        handlers.dispatch(&GestureEvent::DoubleTap(tap()));

        let kinds: Vec<_> = log.borrow().iter().map(GestureEvent::kind).collect();
        assert_eq!(kinds, vec!["long_press", "scale_end", "double_tap"]);
    }

    #[test]
    fn forward_without_double_tap_leaves_slot_empty() {
        let handlers = GestureHandlers::forward(|_| {}, false);
        assert!(!handlers.has_double_tap());
    }

    #[test]
    fn debug_lists_registered_slots() {
        let handlers = GestureHandlers::new().on_scroll(|_| {});
        let dbg = format!("{handlers:?}");
        assert!(dbg.contains("scroll: true"));
        assert!(dbg.contains("tap: false"));
    }
}
