//! Concurrency tests for leetaccel-atomic.
//!
//! These tests verify thread-safety properties of the counters and queues.

use std::sync::Arc;
use std::thread;

use leetaccel_atomic::PipelineCounters;
use leetaccel_atomic::queues::EventQueue;

#[test]
fn test_concurrent_increment_from_many_devices() {
    let counters = Arc::new(PipelineCounters::new());
    let num_threads: u64 = 8;
    let events_per_thread: u64 = 10_000;

    let handles: Vec<_> = (0..num_threads)
        .map(|_| {
            let counters = Arc::clone(&counters);
            thread::spawn(move || {
                for i in 0..events_per_thread {
                    counters.inc_seen();
                    if i % 4 == 3 {
                        counters.record_flush(2);
                    } else {
                        counters.inc_consumed();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().is_ok(), "thread panicked unexpectedly");
    }

    let snapshot = counters.snapshot();
    let total = num_threads * events_per_thread;
    assert_eq!(snapshot.events_seen, total);
    assert_eq!(snapshot.windows_flushed, total / 4);
    assert_eq!(snapshot.motion_emitted, total / 2);
    assert_eq!(snapshot.events_consumed, total - total / 4);
}

#[test]
fn test_producer_consumer_loses_nothing_when_counted() {
    let queue = Arc::new(EventQueue::with_capacity(64));
    let produced: u64 = 50_000;

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            for i in 0..produced {
                let _accepted = queue.push_drop(i);
            }
        })
    };

    let mut received: u64 = 0;
    let mut last: Option<u64> = None;
    let mut in_order = true;
    loop {
        for value in queue.drain() {
            if last.is_some_and(|prev| value <= prev) {
                in_order = false;
            }
            last = Some(value);
            received += 1;
        }
        if producer.is_finished() && queue.is_empty() {
            break;
        }
        thread::yield_now();
    }

    assert!(producer.join().is_ok(), "producer panicked unexpectedly");
    received += queue.drain().count() as u64;
    assert!(in_order);
    assert_eq!(received + queue.dropped(), produced);
}
