#![cfg_attr(not(test), forbid(unsafe_code))]

//! Touch gesture recognition: taps, double taps, long presses, drags,
//! two-finger scale/rotate and scroll passthrough.
//!
//! # Primary responsibilities
//! - **TouchRegistry**: the set of contacts currently on the surface.
//! - **GestureDetector**: the state machine that classifies contacts and
//!   drives the double-tap and long-press timers.
//! - **GestureHandlers**: optional callback slots the detector reports to.
//! - **TimerService**: the scheduled-callback capability the host supplies.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use xgesture_core::{Contact, GestureConfig, GestureDetector, GestureHandlers, Offset, PointerId};
//!
//! let handlers = GestureHandlers::new().on_long_press(|e| println!("long press at {:?}", e.local_position));
//! let mut detector = GestureDetector::new(GestureConfig::default(), handlers);
//!
//! detector.on_contact_begin(&Contact::at(PointerId(1), Offset::new(10.0, 10.0)));
//! detector.advance(Duration::from_millis(400));
//! assert!(detector.is_long_pressing());
//! ```

pub mod config;
pub mod detector;
pub mod event;
pub mod geometry;
pub mod handlers;
pub mod logging;
pub mod semantic_event;
pub mod timer;
pub mod touch;

pub use config::{ConfigError, DOUBLE_TAP_TOLERANCE_SQ, GestureConfig};
pub use detector::{GestureDetector, GestureState};
pub use event::{Buttons, Contact, ContactMove, PointerEvent, ScrollSignal};
pub use geometry::{Offset, rotation_between};
pub use handlers::GestureHandlers;
pub use semantic_event::{GestureEvent, MoveEvent, ScaleEvent, ScrollEvent, TapEvent};
pub use timer::{DeadlineTimers, ManualTimers, TimerKind, TimerService, TimerToken};
pub use touch::{PointerId, Touch, TouchRegistry};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
