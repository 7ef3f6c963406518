//! Property tests for aggregation and echo suppression

use leetaccel_pipeline::prelude::*;
use leetaccel_pipeline::window::AggregationWindow;
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Wheel)]
}

fn report() -> impl Strategy<Value = Vec<(Axis, i32)>> {
    prop::collection::vec((axis(), -1_000i32..=1_000), 0..8)
}

fn run_report(pipeline: &mut MotionPipeline<RecordingSink>, device: &DeviceId, report: &[(Axis, i32)]) {
    for (axis, value) in report {
        let _disposition = pipeline.on_event(device, InputEvent::rel(*axis, *value));
    }
    let _disposition = pipeline.on_event(device, InputEvent::sync());
}

proptest! {
    #[test]
    fn prop_identity_emits_last_value_per_axis(report in report()) {
        let dev = DeviceId::new("p");
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Decoupled));
        let _handle = pipeline.track(dev.clone());
        run_report(&mut pipeline, &dev, &report);

        let expected: Vec<InputEvent> = Axis::ALL
            .iter()
            .filter_map(|a| {
                report
                    .iter()
                    .rev()
                    .find(|(axis, _)| axis == a)
                    .map(|(_, v)| *v)
                    .filter(|v| *v != 0)
                    .map(|v| InputEvent::rel(*a, v).synthetic())
            })
            .collect();
        prop_assert_eq!(pipeline.sink().emitted(), expected);
        prop_assert_eq!(pipeline.sink().events().last().copied(), Some(InputEvent::sync()));
    }

    #[test]
    fn prop_every_echo_is_absorbed_exactly_once(
        reports in prop::collection::vec(report(), 1..12),
        sensitivity in 0.1f64..8.0,
    ) {
        let dev = DeviceId::new("p");
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Loopback));
        let applied = pipeline.apply_parameters(&leetaccel_curves::Parameters {
            sensitivity,
            ..leetaccel_curves::Parameters::default()
        });
        prop_assert!(applied.is_ok());
        let _handle = pipeline.track(dev.clone());

        for report in &reports {
            run_report(&mut pipeline, &dev, report);
            for (device, echo) in pipeline.sink_mut().take_echoes() {
                let _disposition = pipeline.on_event(&device, echo);
            }
            prop_assert_eq!(
                pipeline.controller(&dev).map(|c| c.state()),
                Some(ControllerState::Idle)
            );
        }

        let counters = pipeline.counters().snapshot();
        prop_assert_eq!(counters.echoes_absorbed, counters.motion_emitted);
        prop_assert_eq!(counters.unexpected_echoes, 0);
    }

    #[test]
    fn prop_emitted_speed_never_exceeds_output_cap(
        moves in prop::collection::vec((-1_000i32..=1_000, -1_000i32..=1_000), 1..40),
        sensitivity in 0.1f64..8.0,
        accel in 0.0f64..4.0,
        rotation in 0.0f64..=180.0,
        cap in 0.5f64..50.0,
        carry in any::<bool>(),
    ) {
        let dev = DeviceId::new("p");
        let settings = PipelineSettings {
            carry_remainder: carry,
            ..PipelineSettings::default()
        };
        let mut pipeline =
            MotionPipeline::with_settings(RecordingSink::new(EchoMode::Decoupled), settings);
        let applied = pipeline.apply_parameters(&leetaccel_curves::Parameters {
            sensitivity,
            accel_factor: accel,
            rotation_degrees: rotation,
            output_cap: cap,
            ..leetaccel_curves::Parameters::default()
        });
        prop_assert!(applied.is_ok());
        let _handle = pipeline.track(dev.clone());

        for (dx, dy) in moves {
            run_report(&mut pipeline, &dev, &[(Axis::X, dx), (Axis::Y, dy)]);
            let (x, y) = pipeline.sink().emitted().iter().fold((0, 0), |(x, y), e| match e.axis() {
                Some(Axis::X) => (e.value, y),
                Some(Axis::Y) => (x, e.value),
                _ => (x, y),
            });
            prop_assert!(f64::from(x).hypot(f64::from(y)) <= cap, "({}, {}) over cap {}", x, y, cap);
            pipeline.sink_mut().clear();
        }
    }

    #[test]
    fn prop_consumed_motion_never_reaches_sink_raw(report in report()) {
        let dev = DeviceId::new("p");
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Loopback));
        let _handle = pipeline.track(dev.clone());
        run_report(&mut pipeline, &dev, &report);

        prop_assert!(pipeline.sink().events().iter().all(|e| e.axis().is_none() || e.is_synthetic()));
    }
}

#[quickcheck]
fn qc_accumulate_is_saturating_sum(values: Vec<i32>) -> bool {
    let mut window = AggregationWindow::new(SameAxisPolicy::Accumulate);
    for v in &values {
        window.observe(Axis::X, *v);
    }
    let expected = values.iter().fold(0i32, |acc, v| acc.saturating_add(*v));
    window.flush().dx == expected
}
