//! Property-based invariant tests for the gesture detector.
//!
//! These tests drive `GestureDetector` with arbitrary pointer streams and
//! timer advances and verify:
//!
//! 1. No panics on arbitrary operation sequences
//! 2. Drag, scale and long-press sequences are well-formed
//! 3. No tap is reported while a drag is open
//! 4. Lifting every contact returns to `Unknown` with nothing left open
//! 5. Scale events carry finite values and rotation in (-PI, PI]
//! 6. Determinism: same operations yield the same events
//! 7. Drag deltas sum to the total displacement
//! 8. Scale equals D1/D0 and rotation equals the turned angle

use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;
use std::time::Duration;

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use xgesture_core::{
    Contact, ContactMove, GestureConfig, GestureDetector, GestureEvent, GestureHandlers,
    GestureState, Offset, PointerEvent, PointerId, ScrollSignal,
};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Down(i64, i16, i16),
    Move(i64, i16, i16),
    Up(i64, i16, i16),
    Cancel(i64),
    Advance(u16),
    Scroll(i16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i64..4, -50i16..50, -50i16..50).prop_map(|(id, x, y)| Op::Down(id, x, y)),
        4 => (0i64..4, -50i16..50, -50i16..50).prop_map(|(id, x, y)| Op::Move(id, x, y)),
        3 => (0i64..4, -50i16..50, -50i16..50).prop_map(|(id, x, y)| Op::Up(id, x, y)),
        1 => (0i64..4).prop_map(Op::Cancel),
        2 => (0u16..500).prop_map(Op::Advance),
        1 => any::<i16>().prop_map(Op::Scroll),
    ]
}

fn config_strategy() -> impl Strategy<Value = (GestureConfig, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(suppress, wait, double)| {
        (
            GestureConfig::default()
                .with_suppress_move_during_long_press(suppress)
                .with_tap_waits_for_double_tap(wait),
            double,
        )
    })
}

fn at(x: i16, y: i16) -> Offset {
    Offset::new(f64::from(x), f64::from(y))
}

type Log = Rc<RefCell<Vec<GestureEvent>>>;

fn detector(config: GestureConfig, with_double_tap: bool) -> (GestureDetector, Log) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    let handlers = GestureHandlers::forward(move |e| sink.borrow_mut().push(e), with_double_tap);
    (GestureDetector::new(config, handlers), log)
}

fn apply(d: &mut GestureDetector, op: &Op) {
    match *op {
        Op::Down(id, x, y) => d.handle(&PointerEvent::Down(Contact::at(PointerId(id), at(x, y)))),
        Op::Move(id, x, y) => {
            let to = at(x, y);
            let from = d
                .touches()
                .get(PointerId(id))
                .map_or(to, |t| t.current_offset);
            d.handle(&PointerEvent::Move(ContactMove::new(PointerId(id), to, to - from)));
        }
        Op::Up(id, x, y) => d.handle(&PointerEvent::Up(Contact::at(PointerId(id), at(x, y)))),
        Op::Cancel(id) => {
            let last = d
                .touches()
                .get(PointerId(id))
                .map_or(Offset::ZERO, |t| t.current_offset);
            d.handle(&PointerEvent::Cancel(Contact::at(PointerId(id), last)));
        }
        Op::Advance(ms) => d.advance(Duration::from_millis(u64::from(ms))),
        Op::Scroll(dy) => d.handle(&PointerEvent::Scroll(ScrollSignal {
            pointer: PointerId(100),
            position: Offset::ZERO,
            local_position: Offset::ZERO,
            scroll_delta: Offset::new(0.0, f64::from(dy)),
        })),
    }
}

fn lift_all(d: &mut GestureDetector) {
    let ids: Vec<PointerId> = d.touches().all().iter().map(|t| t.id).collect();
    for id in ids {
        d.on_contact_end(&Contact::at(id, Offset::ZERO));
    }
}

/// Tracks which sequences are open while replaying an event log.
#[derive(Debug, Default)]
struct SequenceChecker {
    drag: bool,
    scale: bool,
    long_press: bool,
}

impl SequenceChecker {
    fn check(&mut self, event: &GestureEvent) -> Result<(), String> {
        let ok = match event {
            GestureEvent::MoveStart(_) => !std::mem::replace(&mut self.drag, true),
            GestureEvent::MoveUpdate(_) => self.drag,
            GestureEvent::MoveEnd(_) => std::mem::replace(&mut self.drag, false),
            GestureEvent::ScaleStart(_) => !std::mem::replace(&mut self.scale, true),
            GestureEvent::ScaleUpdate(_) => self.scale,
            GestureEvent::ScaleEnd => std::mem::replace(&mut self.scale, false),
            GestureEvent::LongPress(_) => !std::mem::replace(&mut self.long_press, true),
            GestureEvent::LongPressMove(_) => self.long_press,
            GestureEvent::LongPressEnd(_) => std::mem::replace(&mut self.long_press, false),
            GestureEvent::Tap(_) | GestureEvent::DoubleTap(_) => !self.drag,
            GestureEvent::Scroll(_) => true,
        };
        if ok {
            Ok(())
        } else {
            Err(format!("{} out of order in {self:?}", event.kind()))
        }
    }

    fn all_closed(&self) -> bool {
        !self.drag && !self.scale && !self.long_press
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. No panics, state consistent with registry
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_streams_never_panic(
        (config, double) in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let (mut d, _log) = detector(config, double);
        for op in &ops {
            apply(&mut d, op);
            if d.touches().is_empty() {
                prop_assert_eq!(d.state(), GestureState::Unknown);
            }
            prop_assert!(d.touches().len() <= 4);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2-3. Sequences are well-formed
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sequences_well_formed(
        (config, double) in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let (mut d, log) = detector(config, double);
        for op in &ops {
            apply(&mut d, op);
        }
        let mut checker = SequenceChecker::default();
        for event in log.borrow().iter() {
            if let Err(msg) = checker.check(event) {
                prop_assert!(false, "{}", msg);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Lifting everything closes every sequence
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn lifting_all_contacts_closes_everything(
        (config, double) in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let (mut d, log) = detector(config, double);
        for op in &ops {
            apply(&mut d, op);
        }
        lift_all(&mut d);
        d.advance(Duration::from_secs(5));

        prop_assert!(d.touches().is_empty());
        prop_assert_eq!(d.state(), GestureState::Unknown);
        prop_assert!(!d.is_scaling());
        prop_assert!(!d.has_pending_tap());

        let mut checker = SequenceChecker::default();
        for event in log.borrow().iter() {
            if let Err(msg) = checker.check(event) {
                prop_assert!(false, "{}", msg);
            }
        }
        prop_assert!(checker.all_closed(), "open sequence left: {:?}", checker);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Scale values are sane
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scale_values_finite_and_bounded(
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let (mut d, log) = detector(GestureConfig::default(), false);
        for op in &ops {
            apply(&mut d, op);
        }
        for event in log.borrow().iter() {
            if let GestureEvent::ScaleStart(e) | GestureEvent::ScaleUpdate(e) = event {
                prop_assert!(e.scale.is_finite() && e.scale >= 0.0, "scale {}", e.scale);
                prop_assert!(e.rotation > -PI && e.rotation <= PI, "rotation {}", e.rotation);
                prop_assert!(e.focal_point.is_finite());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Determinism
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn same_stream_same_events(
        (config, double) in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..150),
    ) {
        let (mut a, log_a) = detector(config.clone(), double);
        let (mut b, log_b) = detector(config, double);
        for op in &ops {
            apply(&mut a, op);
            apply(&mut b, op);
        }
        prop_assert_eq!(&*log_a.borrow(), &*log_b.borrow());
        prop_assert_eq!(a.state(), b.state());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 7. Drag delta conservation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn drag_deltas_sum_to_displacement(
        steps in prop::collection::vec((-20i16..20, -20i16..20), 0..60),
    ) {
        let (mut d, log) = detector(GestureConfig::default(), true);
        apply(&mut d, &Op::Down(1, 0, 0));
        let (mut x, mut y) = (0i16, 0i16);
        for (dx, dy) in &steps {
            x += dx;
            y += dy;
            apply(&mut d, &Op::Move(1, x, y));
        }
        apply(&mut d, &Op::Up(1, x, y));

        let events = log.borrow();
        let total = events
            .iter()
            .filter_map(|e| match e {
                GestureEvent::MoveStart(m) | GestureEvent::MoveUpdate(m) => Some(m.delta),
                _ => None,
            })
            .fold(Offset::ZERO, |acc, delta| acc + delta);
        prop_assert_eq!(total, at(x, y));

        if steps.is_empty() {
            prop_assert!(!events.iter().any(GestureEvent::is_drag));
        } else {
            let drags = events.iter().filter(|e| e.is_drag()).count();
            prop_assert_eq!(drags, steps.len() + 1);
            prop_assert!(!events.iter().any(|e| matches!(e, GestureEvent::Tap(_))));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 8. Scale ratio and rotation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scale_ratio_and_rotation(
        d0 in 10.0f64..500.0,
        d1 in 10.0f64..500.0,
        theta in -3.0f64..3.0,
    ) {
        let (mut d, log) = detector(GestureConfig::default(), false);
        let first = PointerId(1);
        let second = PointerId(2);
        let start = Offset::new(d0, 0.0);
        d.on_contact_begin(&Contact::at(first, Offset::ZERO));
        d.on_contact_begin(&Contact::at(second, start));
        d.on_contact_move(&ContactMove::new(second, start, Offset::ZERO));

        // Counter-clockwise by theta on a y-down surface.
        let end = Offset::new(d1 * theta.cos(), -d1 * theta.sin());
        d.on_contact_move(&ContactMove::new(second, end, end - start));

        let events = log.borrow();
        let Some(GestureEvent::ScaleUpdate(update)) = events.last().copied() else {
            return Err(TestCaseError::fail(format!("expected scale update, got {events:?}")));
        };
        prop_assert!((update.scale - d1 / d0).abs() < 1e-9, "scale {} vs {}", update.scale, d1 / d0);
        prop_assert!((update.rotation - theta).abs() < 1e-9, "rotation {} vs {}", update.rotation, theta);
        prop_assert_eq!(update.focal_point, end * 0.5);
    }
}
