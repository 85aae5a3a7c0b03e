#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use xgesture_core::{
    Contact, ContactMove, GestureConfig, GestureDetector, GestureEvent, GestureHandlers,
    GestureState, Offset, PointerEvent, PointerId,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Down { id: u8, x: i16, y: i16 },
    Move { id: u8, x: i16, y: i16 },
    Up { id: u8, x: i16, y: i16 },
    Cancel { id: u8 },
    Advance { ms: u16 },
    Reset,
}

#[derive(Debug, Arbitrary)]
struct Input {
    suppress_move: bool,
    wait_for_double_tap: bool,
    with_double_tap: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = GestureConfig::default()
        .with_suppress_move_during_long_press(input.suppress_move)
        .with_tap_waits_for_double_tap(input.wait_for_double_tap);
    let handlers = GestureHandlers::forward(
        |event| {
            if let GestureEvent::ScaleUpdate(e) = event {
                assert!(e.scale.is_finite(), "non-finite scale");
                assert!(
                    e.rotation > -std::f64::consts::PI && e.rotation <= std::f64::consts::PI,
                    "rotation out of range"
                );
            }
        },
        input.with_double_tap,
    );
    let mut detector = GestureDetector::new(config, handlers);

    for op in input.ops.iter().take(1024) {
        match *op {
            Op::Down { id, x, y } => detector.handle(&PointerEvent::Down(Contact::at(
                PointerId(i64::from(id % 6)),
                Offset::new(f64::from(x), f64::from(y)),
            ))),
            Op::Move { id, x, y } => {
                let id = PointerId(i64::from(id % 6));
                let to = Offset::new(f64::from(x), f64::from(y));
                let from = detector.touches().get(id).map_or(to, |t| t.current_offset);
                detector.handle(&PointerEvent::Move(ContactMove::new(id, to, to - from)));
            }
            Op::Up { id, x, y } => detector.handle(&PointerEvent::Up(Contact::at(
                PointerId(i64::from(id % 6)),
                Offset::new(f64::from(x), f64::from(y)),
            ))),
            Op::Cancel { id } => detector.handle(&PointerEvent::Cancel(Contact::at(
                PointerId(i64::from(id % 6)),
                Offset::ZERO,
            ))),
            Op::Advance { ms } => detector.advance(Duration::from_millis(u64::from(ms))),
            Op::Reset => detector.reset(),
        }

        // Post-conditions that must always hold:
        assert!(detector.touches().len() <= 6, "registry grew past pointer space");
        if detector.touches().is_empty() {
            assert_eq!(detector.state(), GestureState::Unknown, "idle but not Unknown");
        }
    }
});
