//! Unit tests for pipeline counters and event queues.

use leetaccel_atomic::{CounterSnapshot, PipelineCounters};

mod counter_tests {
    use super::*;

    #[test]
    fn test_each_counter_is_independent() {
        let counters = PipelineCounters::new();
        counters.inc_seen();
        counters.inc_seen();
        counters.inc_consumed();
        counters.inc_passed_through();
        counters.inc_echo_absorbed();
        counters.inc_curve_fault();
        counters.inc_output_clamp();
        counters.inc_unexpected_echo();
        counters.inc_diagnostic_dropped();
        counters.record_flush(2);

        let expected = CounterSnapshot {
            events_seen: 2,
            events_consumed: 1,
            events_passed_through: 1,
            motion_emitted: 2,
            echoes_absorbed: 1,
            windows_flushed: 1,
            curve_faults: 1,
            output_clamps: 1,
            unexpected_echoes: 1,
            diagnostics_dropped: 1,
        };
        assert_eq!(counters.snapshot(), expected);
    }

    #[test]
    fn test_accessors_match_snapshot() {
        let counters = PipelineCounters::default();
        counters.inc_seen();
        counters.record_flush(3);
        assert_eq!(counters.events_seen(), counters.snapshot().events_seen);
        assert_eq!(counters.motion_emitted(), 3);
    }

    #[test]
    fn test_outstanding_echoes_saturates() {
        let snapshot = CounterSnapshot {
            echoes_absorbed: 5,
            ..CounterSnapshot::default()
        };
        assert_eq!(snapshot.outstanding_echoes(), 0);
    }
}

mod queue_tests {
    use leetaccel_atomic::queues::{DEFAULT_QUEUE_CAPACITY, EventQueue};

    #[test]
    fn test_default_capacity() {
        let queue: EventQueue<u64> = EventQueue::default();
        assert_eq!(queue.capacity(), DEFAULT_QUEUE_CAPACITY);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_drop_counts_losses() {
        let queue = EventQueue::with_capacity(3);
        let accepted = (0..10u32).filter(|&i| queue.push_drop(i)).count();
        assert_eq!(accepted, 3);
        assert_eq!(queue.dropped(), 7);
        let kept: Vec<u32> = queue.drain().collect();
        assert_eq!(kept, vec![0, 1, 2]);
    }

    #[test]
    fn test_queue_reusable_after_drain() {
        let queue = EventQueue::with_capacity(2);
        assert!(queue.push_drop('a'));
        assert_eq!(queue.drain().count(), 1);
        assert!(queue.push_drop('b'));
        assert_eq!(queue.pop(), Some('b'));
    }
}
