#![forbid(unsafe_code)]

//! Gesture disambiguation: turns raw contacts into semantic gestures.
//!
//! [`GestureDetector`] consumes one [`PointerEvent`] at a time plus the
//! firings of its two debounce timers, and reports taps, double taps, long
//! presses, drags, two-finger scale/rotate and scroll through the handler
//! slots in [`GestureHandlers`].
//!
//! # State Machine
//!
//! ```text
//! Unknown --(1st down)--> PointerDown --(move)--> MoveStart --(up)--> Unknown
//! PointerDown --(long-press timer, still in tolerance)--> LongPress --(up)--> Unknown
//! PointerDown --(2nd down)--> ScaleStart --(move)--> Scaling --(up)--> Unknown
//! any --(3rd down)--> Unknown --(up, 2 left)--> ScaleStart
//! ```
//!
//! # Invariants
//!
//! 1. Exactly one [`GestureState`] is active; it only changes inside an input
//!    or timer handler.
//! 2. Tap and drag never both emit for the same down → up interaction.
//! 3. Drag, long-press and scale sequences are always closed exactly once,
//!    including when a second finger interrupts a drag or long press.
//! 4. With no contacts left, the state is `Unknown` and the registry is empty.
//! 5. A timer firing whose token is stale, or whose precondition no longer
//!    holds, changes nothing and emits nothing.
//!
//! # Failure Modes
//!
//! - Moves and releases for pointers that never went down are ignored.
//! - A third simultaneous contact parks the detector in `Unknown`; the scale
//!   sequence of the first two fingers stays open and is re-baselined (closed
//!   and restarted) on the next move once only two fingers remain.

use web_time::{Duration, Instant};

use crate::config::GestureConfig;
use crate::event::{Buttons, Contact, ContactMove, PointerEvent, ScrollSignal};
use crate::geometry::{Offset, rotation_between};
use crate::handlers::GestureHandlers;
use crate::semantic_event::{GestureEvent, MoveEvent, ScaleEvent, ScrollEvent, TapEvent};
use crate::timer::{DeadlineTimers, ManualTimers, TimerKind, TimerService, TimerToken};
use crate::touch::{PointerId, TouchRegistry};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The mutually exclusive gesture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureState {
    /// No gesture in progress, or too many contacts to recognise one.
    #[default]
    Unknown,
    /// One contact down, not yet classified.
    PointerDown,
    /// A single-finger drag is in progress.
    MoveStart,
    /// Two contacts down, waiting for the first move.
    ScaleStart,
    /// A two-finger scale/rotate is in progress.
    Scaling,
    /// A stationary contact outlived the long-press window.
    LongPress,
}

impl GestureState {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::PointerDown => "pointer_down",
            Self::MoveStart => "move_start",
            Self::ScaleStart => "scale_start",
            Self::Scaling => "scaling",
            Self::LongPress => "long_press",
        }
    }
}

/// Everything the detector remembers between events, besides the touches.
#[derive(Debug, Clone, Default)]
struct GestureContext {
    state: GestureState,
    /// The contact that armed the long-press timer.
    down: Option<Contact>,
    /// Latest position of the single-finger gesture, used to close it.
    anchor: Option<TapEvent>,
    /// Release position of the previous contact.
    last_tap_up: Option<Offset>,
    /// Tap held back until the double-tap window expires.
    deferred_tap: Option<TapEvent>,
    initial_scale_distance: f64,
    /// A scale-start was emitted and its scale-end is still owed.
    scale_open: bool,
    long_press_timer: Option<TimerToken>,
    double_tap_timer: Option<TimerToken>,
    generation: u64,
}

impl GestureContext {
    fn timer_slot(&mut self, kind: TimerKind) -> &mut Option<TimerToken> {
        match kind {
            TimerKind::DoubleTap => &mut self.double_tap_timer,
            TimerKind::LongPress => &mut self.long_press_timer,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureDetector
// ---------------------------------------------------------------------------

/// Stateful recognizer that turns contacts into semantic gesture events.
///
/// Feed input through [`handle`](Self::handle) (or the individual `on_*`
/// entry points) and hand timer tokens back through
/// [`on_timer`](Self::on_timer). All calls must come from the same thread,
/// one at a time.
pub struct GestureDetector<T: TimerService = ManualTimers> {
    config: GestureConfig,
    handlers: GestureHandlers,
    timers: T,
    touches: TouchRegistry,
    ctx: GestureContext,
}

impl<T: TimerService> std::fmt::Debug for GestureDetector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDetector")
            .field("state", &self.ctx.state)
            .field("touches", &self.touches.len())
            .field("scale_open", &self.ctx.scale_open)
            .finish()
    }
}

impl GestureDetector<ManualTimers> {
    /// Create a detector driven by a virtual clock.
    #[must_use]
    pub fn new(config: GestureConfig, handlers: GestureHandlers) -> Self {
        Self::with_timers(config, handlers, ManualTimers::new())
    }

    /// Move the virtual clock forward, firing due timers one at a time.
    ///
    /// Each firing is handled before the next is looked up, so a firing that
    /// cancels the other timer prevents it from running.
    pub fn advance(&mut self, by: Duration) {
        let until = self.timers.now() + by;
        while let Some(token) = self.timers.pop_due(until) {
            self.on_timer(token);
        }
        let rest = until.saturating_sub(self.timers.now());
        for token in self.timers.advance(rest) {
            self.on_timer(token);
        }
    }
}

impl GestureDetector<DeadlineTimers> {
    /// Fire every timer due at `now`. Call on each host tick.
    pub fn poll_timers(&mut self, now: Instant) {
        for token in self.timers.poll(now) {
            self.on_timer(token);
        }
    }
}

impl<T: TimerService> GestureDetector<T> {
    /// Create a detector with a host-provided timer service.
    #[must_use]
    pub fn with_timers(config: GestureConfig, handlers: GestureHandlers, timers: T) -> Self {
        Self {
            config,
            handlers,
            timers,
            touches: TouchRegistry::new(),
            ctx: GestureContext::default(),
        }
    }

    /// Dispatch a raw pointer event to the matching entry point.
    pub fn handle(&mut self, event: &PointerEvent) {
        match event {
            PointerEvent::Down(contact) => self.on_contact_begin(contact),
            PointerEvent::Move(motion) => self.on_contact_move(motion),
            PointerEvent::Up(contact) => self.on_contact_end(contact),
            PointerEvent::Cancel(contact) => self.on_contact_cancel(contact),
            PointerEvent::Scroll(signal) => self.on_scroll(signal),
        }
    }

    /// A contact touched the surface.
    pub fn on_contact_begin(&mut self, contact: &Contact) {
        if !self.touches.add(contact.pointer, contact.local_position) {
            #[cfg(feature = "tracing")]
            tracing::trace!(pointer = %contact.pointer, "duplicate contact ignored");
            return;
        }

        match self.touches.len() {
            1 => {
                self.ctx.down = Some(*contact);
                self.ctx.anchor = Some(TapEvent::from_contact(contact, contact.buttons));
                self.transition(GestureState::PointerDown, contact.pointer);
                self.schedule_timer(TimerKind::LongPress, self.config.long_press_window);
            }
            2 => {
                self.cancel_timer(TimerKind::LongPress);
                self.close_single_finger_gesture();
                self.transition(GestureState::ScaleStart, contact.pointer);
            }
            _ => self.transition(GestureState::Unknown, contact.pointer),
        }
    }

    /// An active contact moved.
    pub fn on_contact_move(&mut self, motion: &ContactMove) {
        let id = motion.pointer;
        if !self.touches.update_position(id, motion.local_position) {
            #[cfg(feature = "tracing")]
            tracing::trace!(pointer = %id, "move for unknown contact ignored");
            return;
        }
        self.cancel_timer(TimerKind::DoubleTap);

        match self.ctx.state {
            GestureState::LongPress if self.config.suppress_move_during_long_press => {
                let event = MoveEvent::from_move(motion);
                self.ctx.anchor = Some(event.tap());
                self.emit(GestureEvent::LongPressMove(event));
            }
            GestureState::LongPress | GestureState::PointerDown => self.start_drag(motion),
            GestureState::MoveStart => {
                let event = MoveEvent::from_move(motion);
                self.ctx.anchor = Some(event.tap());
                self.emit(GestureEvent::MoveUpdate(event));
            }
            GestureState::ScaleStart => self.start_scale(id),
            GestureState::Scaling => self.update_scale(),
            GestureState::Unknown => {
                self.touches.reset_start(id);
            }
        }
    }

    /// A contact lifted off the surface.
    pub fn on_contact_end(&mut self, contact: &Contact) {
        let id = contact.pointer;
        if self.touches.remove(id).is_none() {
            #[cfg(feature = "tracing")]
            tracing::trace!(pointer = %id, "release for unknown contact ignored");
            return;
        }
        self.cancel_timer(TimerKind::LongPress);
        let remaining = self.touches.len();

        match self.ctx.state {
            GestureState::PointerDown => {
                self.transition(GestureState::Unknown, id);
                self.resolve_tap(contact);
            }
            GestureState::ScaleStart | GestureState::Scaling => {
                self.transition(GestureState::Unknown, id);
                self.close_scale();
            }
            GestureState::MoveStart => {
                self.transition(GestureState::Unknown, id);
                self.emit(GestureEvent::MoveEnd(MoveEvent {
                    pointer: id,
                    local_position: contact.local_position,
                    global_position: contact.position,
                    buttons: self.pressed_buttons(contact),
                    delta: Offset::ZERO,
                    local_delta: Offset::ZERO,
                }));
            }
            GestureState::LongPress => {
                self.transition(GestureState::Unknown, id);
                let buttons = self.pressed_buttons(contact);
                self.emit(GestureEvent::LongPressEnd(TapEvent::from_contact(
                    contact, buttons,
                )));
            }
            GestureState::Unknown if remaining == 2 => {
                self.transition(GestureState::ScaleStart, id);
            }
            GestureState::Unknown => {
                if remaining < 2 {
                    self.close_scale();
                }
            }
        }

        if remaining == 0 {
            self.ctx.down = None;
            self.ctx.anchor = None;
        }
        self.ctx.last_tap_up = Some(contact.local_position);
    }

    /// The platform aborted a contact. Handled exactly like a release.
    pub fn on_contact_cancel(&mut self, contact: &Contact) {
        self.on_contact_end(contact);
    }

    /// Scroll passthrough; never touches gesture state.
    pub fn on_scroll(&mut self, signal: &ScrollSignal) {
        self.emit(GestureEvent::Scroll(ScrollEvent::from(signal)));
    }

    /// A timer scheduled by this detector fired.
    ///
    /// Stale tokens (cancelled or superseded) are ignored.
    pub fn on_timer(&mut self, token: TimerToken) {
        if *self.ctx.timer_slot(token.kind) != Some(token) {
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = ?token.kind, generation = token.generation, "stale timer ignored");
            return;
        }
        *self.ctx.timer_slot(token.kind) = None;

        match token.kind {
            TimerKind::DoubleTap => self.on_double_tap_timeout(),
            TimerKind::LongPress => self.on_long_press_timeout(),
        }
    }

    /// Drop every contact, cancel both timers and return to `Unknown`
    /// without emitting anything.
    ///
    /// Open sequences are not closed; the caller owns that cancellation (for
    /// example on focus loss).
    pub fn reset(&mut self) {
        self.cancel_timer(TimerKind::DoubleTap);
        self.cancel_timer(TimerKind::LongPress);
        self.touches.clear();
        self.ctx = GestureContext {
            generation: self.ctx.generation,
            ..GestureContext::default()
        };
    }

    /// Current gesture state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.ctx.state
    }

    /// Contacts currently on the surface.
    #[inline]
    #[must_use]
    pub fn touches(&self) -> &TouchRegistry {
        &self.touches
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn timers(&self) -> &T {
        &self.timers
    }

    #[inline]
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Whether a single-finger drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.ctx.state == GestureState::MoveStart
    }

    /// Whether a scale sequence has started and not yet ended.
    #[inline]
    #[must_use]
    pub fn is_scaling(&self) -> bool {
        self.ctx.scale_open
    }

    #[inline]
    #[must_use]
    pub fn is_long_pressing(&self) -> bool {
        self.ctx.state == GestureState::LongPress
    }

    /// Whether a tap is waiting for the double-tap window to expire.
    #[inline]
    #[must_use]
    pub fn has_pending_tap(&self) -> bool {
        self.ctx.double_tap_timer.is_some()
    }
}

// ---------------------------------------------------------------------------
// Internal handlers
// ---------------------------------------------------------------------------

impl<T: TimerService> GestureDetector<T> {
    fn start_drag(&mut self, motion: &ContactMove) {
        self.cancel_timer(TimerKind::LongPress);
        if self.ctx.state == GestureState::LongPress {
            self.close_single_finger_gesture();
        }
        self.touches.reset_start(motion.pointer);
        self.transition(GestureState::MoveStart, motion.pointer);
        let event = MoveEvent::from_move(motion);
        self.ctx.anchor = Some(event.tap());
        self.emit(GestureEvent::MoveStart(event));
    }

    fn start_scale(&mut self, id: PointerId) {
        let Some((first, second)) = self
            .touches
            .first_two()
            .map(|(first, second)| (first.id, second.id))
        else {
            self.touches.reset_start(id);
            return;
        };
        self.cancel_timer(TimerKind::LongPress);
        // Both anchors restart so rotation is measured from this instant.
        self.touches.reset_start(id);
        self.touches.reset_start(first);
        self.touches.reset_start(second);

        let Some((first, second)) = self.touches.first_two() else {
            return;
        };
        let focal_point = first.current_offset.midpoint(second.current_offset);
        self.ctx.initial_scale_distance = first.current_offset.distance(second.current_offset);

        self.transition(GestureState::Scaling, id);
        self.close_scale();
        self.ctx.scale_open = true;
        self.emit(GestureEvent::ScaleStart(ScaleEvent {
            focal_point,
            scale: 1.0,
            rotation: 0.0,
        }));
    }

    fn update_scale(&mut self) {
        let Some((first, second)) = self.touches.first_two() else {
            return;
        };
        let distance = first.current_offset.distance(second.current_offset);
        let scale = if self.ctx.initial_scale_distance > f64::EPSILON {
            distance / self.ctx.initial_scale_distance
        } else {
            1.0
        };
        let event = ScaleEvent {
            focal_point: first.current_offset.midpoint(second.current_offset),
            scale,
            rotation: rotation_between(
                first.start_offset,
                second.start_offset,
                first.current_offset,
                second.current_offset,
            ),
        };
        self.emit(GestureEvent::ScaleUpdate(event));
    }

    fn close_scale(&mut self) {
        if std::mem::take(&mut self.ctx.scale_open) {
            self.emit(GestureEvent::ScaleEnd);
        }
    }

    /// End a drag or long press that a second finger interrupted.
    fn close_single_finger_gesture(&mut self) {
        let Some(anchor) = self.ctx.anchor else {
            return;
        };
        match self.ctx.state {
            GestureState::MoveStart => self.emit(GestureEvent::MoveEnd(MoveEvent {
                pointer: anchor.pointer,
                local_position: anchor.local_position,
                global_position: anchor.global_position,
                buttons: anchor.buttons,
                delta: Offset::ZERO,
                local_delta: Offset::ZERO,
            })),
            GestureState::LongPress => self.emit(GestureEvent::LongPressEnd(anchor)),
            GestureState::Unknown
            | GestureState::PointerDown
            | GestureState::ScaleStart
            | GestureState::Scaling => {}
        }
    }

    fn resolve_tap(&mut self, contact: &Contact) {
        let tap = TapEvent::from_contact(contact, self.pressed_buttons(contact));
        let has_double_tap = self.handlers.has_double_tap();

        if !self.config.tap_waits_for_double_tap || !has_double_tap {
            self.emit(GestureEvent::Tap(tap));
        }
        if !has_double_tap {
            return;
        }

        if self.ctx.double_tap_timer.is_none() {
            self.start_double_tap_window(tap);
            return;
        }

        self.cancel_timer(TimerKind::DoubleTap);
        let near_previous = self.ctx.last_tap_up.is_some_and(|previous| {
            previous.distance_squared(contact.local_position)
                < self.config.double_tap_tolerance_sq()
        });
        if near_previous {
            self.emit(GestureEvent::DoubleTap(tap));
        } else {
            self.start_double_tap_window(tap);
        }
    }

    fn start_double_tap_window(&mut self, tap: TapEvent) {
        self.schedule_timer(TimerKind::DoubleTap, self.config.double_tap_window);
        self.ctx.deferred_tap = Some(tap);
    }

    fn on_double_tap_timeout(&mut self) {
        let deferred = self.ctx.deferred_tap.take();
        if !self.config.tap_waits_for_double_tap {
            return;
        }
        if let Some(tap) = deferred {
            self.emit(GestureEvent::Tap(tap));
        }
    }

    fn on_long_press_timeout(&mut self) {
        let Some(down) = self.ctx.down else {
            return;
        };
        let qualifies = match self.touches.all() {
            [touch] => {
                touch.id == down.pointer
                    && touch.displacement_squared() < self.config.long_press_tolerance_sq
            }
            _ => false,
        };
        if !qualifies {
            #[cfg(feature = "tracing")]
            tracing::trace!(pointer = %down.pointer, "long press precondition failed");
            return;
        }

        self.cancel_timer(TimerKind::DoubleTap);
        self.cancel_timer(TimerKind::LongPress);
        self.transition(GestureState::LongPress, down.pointer);
        let event = TapEvent::from_contact(&down, down.buttons);
        self.ctx.anchor = Some(event);
        self.emit(GestureEvent::LongPress(event));
    }

    /// Buttons that were held for this contact; releases usually report none.
    fn pressed_buttons(&self, contact: &Contact) -> Buttons {
        match self.ctx.down {
            Some(down) if down.pointer == contact.pointer => down.buttons | contact.buttons,
            _ => contact.buttons,
        }
    }

    fn schedule_timer(&mut self, kind: TimerKind, after: Duration) {
        self.cancel_timer(kind);
        self.ctx.generation += 1;
        let token = TimerToken {
            kind,
            generation: self.ctx.generation,
        };
        self.timers.schedule(token, after);
        *self.ctx.timer_slot(kind) = Some(token);
    }

    fn cancel_timer(&mut self, kind: TimerKind) {
        if let Some(token) = self.ctx.timer_slot(kind).take() {
            self.timers.cancel(token);
        }
        if kind == TimerKind::DoubleTap {
            self.ctx.deferred_tap = None;
        }
    }

    fn transition(&mut self, to: GestureState, pointer: PointerId) {
        let from = self.ctx.state;
        if from == to {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(from = from.as_str(), to = to.as_str(), pointer = %pointer, "gesture state transition");
        #[cfg(not(feature = "tracing"))]
        let _ = pointer;
        self.ctx.state = to;
    }

    fn emit(&mut self, event: GestureEvent) {
        #[cfg(feature = "tracing")]
        tracing::trace!(kind = event.kind(), "gesture event");
        self.handlers.dispatch(&event);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
