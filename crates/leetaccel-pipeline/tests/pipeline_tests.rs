//! Integration tests for leetaccel-pipeline
//!
//! Drives the full pipeline with event streams and checks what reaches the
//! sink, in order.

use approx::assert_relative_eq;
use leetaccel_curves::{AccelMode, Parameters};
use leetaccel_errors::RTError;
use leetaccel_pipeline::prelude::*;
use leetaccel_pipeline::sink::OutputKind;

fn must<T, E: std::fmt::Debug>(r: Result<T, E>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("must() failed: {:?}", e),
    }
}

fn mouse() -> DeviceId {
    DeviceId::new("1-1:1.0")
}

fn pipeline_with(mode: EchoMode, sensitivity: f64) -> MotionPipeline<RecordingSink> {
    let mut pipeline = MotionPipeline::new(RecordingSink::new(mode));
    must(pipeline.apply_parameters(&Parameters {
        sensitivity,
        ..Parameters::default()
    }));
    let _handle = pipeline.track(mouse());
    pipeline
}

fn feed(pipeline: &mut MotionPipeline<RecordingSink>, device: &DeviceId, lines: &[&str]) {
    for line in lines {
        let _disposition = pipeline.on_event(device, must(line.parse::<InputEvent>()));
    }
}

fn replay_echoes(pipeline: &mut MotionPipeline<RecordingSink>) {
    for (device, echo) in pipeline.sink_mut().take_echoes() {
        let _disposition = pipeline.on_event(&device, echo);
    }
}

fn output(pipeline: &MotionPipeline<RecordingSink>) -> Vec<String> {
    pipeline.sink().events().iter().map(ToString::to_string).collect()
}

mod aggregation_tests {
    use super::*;

    #[test]
    fn test_one_event_per_axis_at_sync() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 1.0);
        feed(&mut pipeline, &mouse(), &["REL_X 5", "REL_Y 3", "SYN"]);

        assert_eq!(output(&pipeline), ["REL_X 5 *", "REL_Y 3 *", "SYN"]);
        let counters = pipeline.counters().snapshot();
        assert_eq!(counters.events_consumed, 2);
        assert_eq!(counters.motion_emitted, 2);
        assert_eq!(counters.windows_flushed, 1);
    }

    #[test]
    fn test_repeated_axis_overwrites_by_default() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 1.0);
        feed(&mut pipeline, &mouse(), &["REL_X 5", "REL_X 7", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_X 7 *", "SYN"]);
    }

    #[test]
    fn test_repeated_axis_accumulates_when_configured() {
        let settings = PipelineSettings {
            same_axis_policy: SameAxisPolicy::Accumulate,
            ..PipelineSettings::default()
        };
        let mut pipeline =
            MotionPipeline::with_settings(RecordingSink::new(EchoMode::Decoupled), settings);
        let _handle = pipeline.track(mouse());
        feed(&mut pipeline, &mouse(), &["REL_X 5", "REL_X 7", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_X 12 *", "SYN"]);
    }

    #[test]
    fn test_other_events_pass_through_in_order() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 1", "KEY 272 1", "REL 6 1", "SYN"]);
        assert_eq!(output(&pipeline), ["KEY 272 1", "REL 6 1", "REL_X 2 *", "SYN"]);
    }

    #[test]
    fn test_sync_without_motion_is_forwarded() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["SYN", "SYN"]);
        assert_eq!(output(&pipeline), ["SYN", "SYN"]);
        assert_eq!(pipeline.counters().snapshot().windows_flushed, 0);
    }

    #[test]
    fn test_zero_result_is_not_emitted() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 0", "SYN"]);
        assert_eq!(output(&pipeline), ["SYN"]);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Idle)
        );
    }

    #[test]
    fn test_wheel_is_not_accelerated() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 3.0);
        feed(&mut pipeline, &mouse(), &["REL_WHEEL -1", "REL_Y 2", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_Y 6 *", "REL_WHEEL -1 *", "SYN"]);
    }

    #[test]
    fn test_rotation_applies_to_motion() {
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Decoupled));
        must(pipeline.apply_parameters(&Parameters {
            rotation_degrees: 90.0,
            ..Parameters::default()
        }));
        let _handle = pipeline.track(mouse());
        feed(&mut pipeline, &mouse(), &["REL_X 5", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_Y 5 *", "SYN"]);
    }

    #[test]
    fn test_devices_aggregate_independently() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 1.0);
        let other = DeviceId::new("2-1:1.0");
        let _handle = pipeline.track(other.clone());

        feed(&mut pipeline, &mouse(), &["REL_X 4"]);
        feed(&mut pipeline, &other, &["REL_X 9", "SYN"]);
        feed(&mut pipeline, &mouse(), &["SYN"]);

        let records = pipeline.sink().records();
        let devices: Vec<&str> = records.iter().map(|r| r.device.as_str()).collect();
        assert_eq!(devices, ["2-1:1.0", "2-1:1.0", "1-1:1.0", "1-1:1.0"]);
        assert_eq!(output(&pipeline), ["REL_X 9 *", "SYN", "REL_X 4 *", "SYN"]);
    }
}

mod echo_tests {
    use super::*;

    #[test]
    fn test_echoes_pass_once_then_idle() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 4", "REL_Y -1", "SYN"]);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Suppressing { remaining: 2 })
        );

        replay_echoes(&mut pipeline);

        assert_eq!(
            output(&pipeline),
            ["REL_X 8 *", "REL_Y -2 *", "SYN", "REL_X 8 *", "REL_Y -2 *"]
        );
        let kinds: Vec<OutputKind> = pipeline.sink().records().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [
                OutputKind::Emitted,
                OutputKind::Emitted,
                OutputKind::PassedThrough,
                OutputKind::PassedThrough,
                OutputKind::PassedThrough,
            ]
        );
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Idle)
        );
        let counters = pipeline.counters().snapshot();
        assert_eq!(counters.echoes_absorbed, 2);
        assert_eq!(counters.outstanding_echoes(), 0);
        assert_eq!(counters.unexpected_echoes, 0);
    }

    #[test]
    fn test_motion_after_echoes_is_accelerated_again() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 1", "SYN"]);
        replay_echoes(&mut pipeline);
        pipeline.sink_mut().clear();

        feed(&mut pipeline, &mouse(), &["REL_X 3", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_X 6 *", "SYN"]);
    }

    #[test]
    fn test_device_motion_during_suppression_is_buffered() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 4", "SYN", "REL_Y 2"]);
        replay_echoes(&mut pipeline);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Buffering)
        );

        pipeline.sink_mut().clear();
        feed(&mut pipeline, &mouse(), &["SYN"]);
        assert_eq!(output(&pipeline), ["REL_Y 4 *", "SYN"]);
    }

    #[test]
    fn test_flush_while_suppressing_extends_guard() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 1.0);
        feed(&mut pipeline, &mouse(), &["REL_X 4", "SYN", "REL_X 2", "REL_Y 1", "SYN"]);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.outstanding_echoes()),
            Some(3)
        );

        replay_echoes(&mut pipeline);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Idle)
        );
        assert_eq!(pipeline.counters().snapshot().unexpected_echoes, 0);
    }

    #[test]
    fn test_unexpected_echo_is_forwarded_and_reported() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 3 *"]);

        assert_eq!(output(&pipeline), ["REL_X 3 *"]);
        let diagnostics = pipeline.drain_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.first().map(|d| d.error), Some(RTError::UnexpectedEcho));
        assert_eq!(pipeline.counters().snapshot().unexpected_echoes, 1);
        assert!(
            pipeline
                .controller(&mouse())
                .is_some_and(|c| c.window().is_empty())
        );
    }

    #[test]
    fn test_decoupled_sink_arms_no_guard() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 3", "SYN", "REL_X 1", "SYN"]);

        assert_eq!(output(&pipeline), ["REL_X 6 *", "SYN", "REL_X 2 *", "SYN"]);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Idle)
        );
    }
}

mod fault_tests {
    use super::*;

    fn overflowing() -> Parameters {
        Parameters {
            mode: AccelMode::Power,
            accel_factor: 1e308,
            exponent: 1.0,
            ..Parameters::default()
        }
    }

    #[test]
    fn test_curve_fault_passes_raw_motion() {
        let mut pipeline = MotionPipeline::new(RecordingSink::new(EchoMode::Loopback));
        must(pipeline.apply_parameters(&overflowing()));
        let _handle = pipeline.track(mouse());

        feed(&mut pipeline, &mouse(), &["REL_X 10", "REL_Y -2", "SYN"]);

        assert_eq!(output(&pipeline), ["REL_X 10 *", "REL_Y -2 *", "SYN"]);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.outstanding_echoes()),
            Some(2)
        );
        let counters = pipeline.counters().snapshot();
        assert_eq!(counters.curve_faults, 1);
        let errors: Vec<RTError> = pipeline.drain_diagnostics().iter().map(|d| d.error).collect();
        assert_eq!(errors, [RTError::CurveConfig]);
    }

    #[test]
    fn test_invalid_parameters_keep_previous_curve() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 2.0);
        let rejected = pipeline.apply_parameters(&Parameters {
            mode: AccelMode::Classic,
            exponent: 0.0,
            ..Parameters::default()
        });
        assert!(matches!(rejected, Err(PipelineError::Config(_))));

        feed(&mut pipeline, &mouse(), &["REL_X 1", "SYN"]);
        assert_eq!(output(&pipeline), ["REL_X 2 *", "SYN"]);
    }

    #[test]
    fn test_clamped_output_is_counted() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 4.0);
        feed(&mut pipeline, &mouse(), &["REL_X -2000000000", "SYN"]);

        assert_eq!(output(&pipeline), [format!("REL_X {} *", i32::MIN), "SYN".to_string()]);
        assert_eq!(pipeline.counters().snapshot().output_clamps, 1);
    }

    #[test]
    fn test_full_diagnostics_queue_counts_drops() {
        let settings = PipelineSettings {
            diagnostics_capacity: 1,
            ..PipelineSettings::default()
        };
        let mut pipeline =
            MotionPipeline::with_settings(RecordingSink::new(EchoMode::Loopback), settings);
        let _handle = pipeline.track(mouse());
        feed(&mut pipeline, &mouse(), &["REL_X 1 *", "REL_Y 1 *", "REL_X 2 *"]);

        assert_eq!(pipeline.drain_diagnostics().len(), 1);
        assert_eq!(pipeline.counters().snapshot().diagnostics_dropped, 2);
    }
}

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_untracked_device_passes_through() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        let stranger = DeviceId::new("9-9:1.0");
        feed(&mut pipeline, &stranger, &["REL_X 5", "SYN"]);

        assert_eq!(output(&pipeline), ["REL_X 5", "SYN"]);
        let counters = pipeline.counters().snapshot();
        assert_eq!(counters.events_seen, 2);
        assert_eq!(counters.events_passed_through, 2);
    }

    #[test]
    fn test_force_flush_ends_window() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 2.0);
        feed(&mut pipeline, &mouse(), &["REL_X 3"]);

        assert_eq!(must(pipeline.force_flush(&mouse())), 1);
        assert_eq!(output(&pipeline), ["REL_X 6 *", "SYN *"]);
        assert_eq!(must(pipeline.force_flush(&mouse())), 0);

        replay_echoes(&mut pipeline);
        assert_eq!(
            pipeline.controller(&mouse()).map(|c| c.state()),
            Some(ControllerState::Idle)
        );
        assert_eq!(pipeline.counters().snapshot().unexpected_echoes, 0);
    }

    #[test]
    fn test_force_flush_unknown_device() {
        let mut pipeline = pipeline_with(EchoMode::Loopback, 1.0);
        let result = pipeline.force_flush(&DeviceId::new("nope"));
        assert!(matches!(result, Err(PipelineError::UnknownDevice(_))));
    }

    #[test]
    fn test_untrack_flushes_pending_motion() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 1.0);
        feed(&mut pipeline, &mouse(), &["REL_Y 7"]);

        assert!(pipeline.untrack(&mouse()).is_some());
        assert!(!pipeline.is_tracked(&mouse()));
        assert_eq!(output(&pipeline), ["REL_Y 7 *", "SYN *"]);
        assert!(pipeline.untrack(&mouse()).is_none());
    }

    #[test]
    fn test_feed_swaps_at_window_boundary() {
        let mut pipeline = pipeline_with(EchoMode::Decoupled, 1.0);
        let feed_handle = pipeline.attach_feed();

        feed(&mut pipeline, &mouse(), &["REL_X 2"]);
        let outcome = must(feed_handle.publish(&Parameters {
            sensitivity: 3.0,
            ..Parameters::default()
        }));
        assert_eq!(outcome, PublishOutcome::Published { generation: 1 });
        assert_relative_eq!(pipeline.curve().sensitivity(), 1.0);

        feed(&mut pipeline, &mouse(), &["SYN"]);
        assert_eq!(output(&pipeline), ["REL_X 6 *", "SYN"]);
        assert!(!feed_handle.has_pending());
        assert_eq!(feed_handle.collect_retired(), 1);
        assert_eq!(pipeline.state_snapshot().curve_generation, 1);
    }
}
