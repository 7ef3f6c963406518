//! Property-based tests for leetaccel-atomic using quickcheck.

use leetaccel_atomic::PipelineCounters;
use leetaccel_atomic::queues::EventQueue;
use quickcheck_macros::quickcheck;

#[quickcheck]
fn prop_seen_counts_every_increment(incs: u8) -> bool {
    let counters = PipelineCounters::new();
    for _ in 0..incs {
        counters.inc_seen();
    }
    counters.events_seen() == u64::from(incs)
}

#[quickcheck]
fn prop_flush_sums_emitted(batches: Vec<u8>) -> bool {
    let counters = PipelineCounters::new();
    for &n in &batches {
        counters.record_flush(u64::from(n));
    }
    let snapshot = counters.snapshot();
    let expected: u64 = batches.iter().map(|&n| u64::from(n)).sum();
    snapshot.motion_emitted == expected && snapshot.windows_flushed == batches.len() as u64
}

#[quickcheck]
fn prop_snapshot_and_reset_clears(seen: u8, faults: u8) -> bool {
    let counters = PipelineCounters::new();
    for _ in 0..seen {
        counters.inc_seen();
    }
    for _ in 0..faults {
        counters.inc_curve_fault();
    }
    let first = counters.snapshot_and_reset();
    let second = counters.snapshot();
    first.events_seen == u64::from(seen)
        && first.curve_faults == u64::from(faults)
        && second.events_seen == 0
        && second.curve_faults == 0
}

#[quickcheck]
fn prop_queue_accepts_plus_drops_equals_pushes(capacity: u8, pushes: u16) -> bool {
    let queue = EventQueue::with_capacity(usize::from(capacity));
    let accepted = (0..pushes).filter(|&i| queue.push_drop(i)).count() as u64;
    accepted + queue.dropped() == u64::from(pushes) && queue.len() as u64 == accepted
}

#[quickcheck]
fn prop_queue_preserves_order(values: Vec<u32>) -> bool {
    let queue = EventQueue::with_capacity(values.len());
    for &v in &values {
        if queue.push(v).is_err() {
            return false;
        }
    }
    queue.drain().collect::<Vec<_>>() == values
}
