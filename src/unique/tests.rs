use super::*;
cfg_not_loom! {
use std::thread;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Spins until the workers have caught up with `done`.
fn wait_until(mut done: impl FnMut() -> bool) {
    while !done() {
        thread::yield_now();
    }
}

fn drain<T>(queue: &UniqueQueue<T>) -> Vec<T>
where
    T: Eq + Hash + Clone + Send + 'static,
{
    queue.front().iter().collect()
}

#[test]
fn st_single_push_single_pop() {
    init_logger();
    let queue = UniqueQueue::new(2);
    queue.send(1).unwrap();
    assert_eq!(queue.recv(), Ok(1));
}

#[test]
fn st_multiple_push_single_pop() {
    init_logger();
    let queue = UniqueQueue::new(2);
    queue.send(1).unwrap();
    queue.send(2).unwrap();
    assert_eq!(queue.recv(), Ok(1));
}

#[test]
fn st_multiple_push_multiple_pop() {
    init_logger();
    let queue = UniqueQueue::new(3);
    queue.send(1).unwrap();
    queue.send(2).unwrap();
    queue.send(3).unwrap();

    assert_eq!(queue.recv(), Ok(1));
    assert_eq!(queue.recv(), Ok(2));
    queue.send(4).unwrap();
    assert_eq!(queue.recv(), Ok(3));
    assert_eq!(queue.recv(), Ok(4));
}

#[test]
fn mt_close_propagates_after_drain() {
    init_logger();
    let queue = UniqueQueue::new(5);
    let front = queue.front().clone();
    let consumer = thread::spawn(move || front.iter().collect::<Vec<_>>());

    queue.send(1).unwrap();
    queue.send(2).unwrap();
    queue.send(3).unwrap();
    queue.close();

    assert_eq!(consumer.join().unwrap(), [1, 2, 3]);
    assert_eq!(queue.recv(), Err(RecvError {}), "the output should stay closed");
}

#[test]
fn mt_duplicates_of_pending_values_are_suppressed() {
    init_logger();
    let queue = UniqueQueue::new(2);
    let back = queue.back().clone();
    thread::spawn(move || {
        for value in [1, 2, 3, 1, 1, 3] {
            back.send(value).unwrap();
        }
        back.close();
    });

    assert_eq!(drain(&queue), [1, 2, 3]);
}

#[test]
fn st_ignore_once_admits_a_single_duplicate() {
    init_logger();
    let queue = UniqueQueue::new(2);
    for value in [1, 2, 3, 1, 1] {
        queue.send(value).unwrap();
    }
    wait_until(|| queue.is_constrained(&3));

    queue.ignore_once(3);
    assert!(!queue.is_constrained(&3));
    queue.send(3).unwrap();
    queue.send(3).unwrap();
    queue.close();

    assert_eq!(drain(&queue), [1, 2, 3, 3]);
}

#[test]
fn st_auto_release_readmits_delivered_values() {
    init_logger();
    let queue = UniqueQueue::with_config(Config {
        capacity: 6,
        auto_release: true,
    });
    queue.send(1).unwrap();
    queue.send(2).unwrap();
    // still pending, so it's dropped
    queue.send(1).unwrap();
    queue.send(7).unwrap();
    wait_until(|| queue.is_constrained(&7));

    assert_eq!(queue.recv(), Ok(1));
    // 1 was taken by a consumer, so it can be queued again
    assert!(!queue.is_constrained(&1));
    queue.send(1).unwrap();

    assert_eq!(queue.recv(), Ok(2));
    assert_eq!(queue.recv(), Ok(7));
    assert_eq!(queue.recv(), Ok(1));
    queue.close();
    assert_eq!(queue.recv(), Err(RecvError {}));
}

#[test]
fn st_auto_release_happens_before_recv_returns() {
    init_logger();
    for _ in 0..500 {
        let queue = UniqueQueue::with_config(Config {
            capacity: 6,
            auto_release: true,
        });
        queue.send(1).unwrap();
        assert_eq!(queue.recv(), Ok(1));
        queue.send(1).unwrap();
        queue.close();
        assert_eq!(drain(&queue), [1], "re-sent value should be admitted");
    }
}

#[test]
fn st_enabling_auto_release_after_construction() {
    init_logger();
    let queue = UniqueQueue::new(2);
    queue.send(1).unwrap();
    wait_until(|| queue.is_constrained(&1));

    // 1 may already sit in the delivery worker; the flag applies at hand-off.
    queue.set_auto_release(true);
    assert_eq!(queue.recv(), Ok(1));
    assert!(!queue.is_constrained(&1));

    queue.send(1).unwrap();
    assert_eq!(queue.recv(), Ok(1));
    assert_eq!(queue.constrained_len(), 0);
}

#[test]
fn st_disabling_auto_release_keeps_constraint() {
    init_logger();
    let queue = UniqueQueue::with_config(Config {
        capacity: 2,
        auto_release: true,
    });
    queue.set_auto_release(false);
    queue.send(1).unwrap();
    assert_eq!(queue.recv(), Ok(1));
    assert!(queue.is_constrained(&1));

    queue.send(1).unwrap();
    queue.send(2).unwrap();
    queue.close();
    assert_eq!(drain(&queue), [2]);
}

#[test]
fn st_constraint_outlives_delivery_without_auto_release() {
    init_logger();
    let queue = UniqueQueue::new(2);
    queue.send(1).unwrap();
    let working_on = queue.recv().unwrap();

    queue.send(1).unwrap();
    queue.send(2).unwrap();
    wait_until(|| queue.is_constrained(&2));
    assert!(queue.is_constrained(&1));

    queue.release(&working_on);
    assert!(!queue.is_constrained(&1));
    queue.send(1).unwrap();
    queue.close();

    assert_eq!(drain(&queue), [2, 1]);
}

#[test]
fn st_add_constraint_blocks_arrivals() {
    init_logger();
    let queue = UniqueQueue::new(2);
    assert_eq!(queue.add_constraint(5), Ok(()));
    assert_eq!(queue.add_constraint(5), Err(AlreadyConstrained(5)));

    queue.send(5).unwrap();
    queue.send(6).unwrap();
    queue.close();

    assert_eq!(drain(&queue), [6]);
    assert!(queue.is_constrained(&5));
    queue.remove_constraint(&5);
    assert_eq!(queue.constrained_len(), 1, "6 is still held");
}

#[test]
fn st_add_constraint_rearms_ignored_value() {
    let queue = UniqueQueue::<u32>::new(1);
    queue.ignore_once(5);
    assert!(queue.add_constraint(5).is_ok());
    assert!(queue.add_constraint(5).is_err());
    assert_eq!(queue.constrained_len(), 1);
}

#[test]
fn st_removing_unconstrained_value_is_noop() {
    let queue = UniqueQueue::<u32>::new(1);
    queue.remove_constraint(&9);
    queue.release(&9);
    assert_eq!(queue.constrained_len(), 0);
}

#[test]
fn mt_rendezvous_queue() {
    init_logger();
    let queue = UniqueQueue::new(0);
    assert_eq!(queue.capacity(), 0);
    let back = queue.back().clone();
    thread::spawn(move || {
        for value in [1, 2, 2, 3] {
            back.send(value).unwrap();
        }
        back.close();
    });

    assert_eq!(drain(&queue), [1, 2, 3]);
}

#[test]
fn mt_many_producers_deliver_each_value_once() {
    init_logger();
    let queue = UniqueQueue::new(4);
    let producers: Vec<_> = (0..4)
        .map(|_| {
            let back = queue.back().clone();
            thread::spawn(move || {
                for value in (0..50).chain(0..50) {
                    back.send(value).unwrap();
                }
            })
        })
        .collect();
    let back = queue.back().clone();
    thread::spawn(move || {
        for p in producers {
            p.join().unwrap();
        }
        back.close();
    });

    let mut delivered = drain(&queue);
    assert_eq!(delivered.len(), 50);
    delivered.sort_unstable();
    assert_eq!(delivered, (0..50).collect::<Vec<_>>());
}

#[test]
fn st_send_after_close_fails() {
    init_logger();
    let queue = UniqueQueue::new(1);
    queue.close();
    queue.close();
    assert_eq!(queue.send(1), Err(SendError(1)));
    assert_eq!(queue.recv(), Err(RecvError {}));
}

#[test]
fn st_config_is_applied() {
    let queue = UniqueQueue::<u8>::with_config(Config {
        capacity: 3,
        auto_release: true,
    });
    assert_eq!(queue.capacity(), 3);
    assert!(queue.auto_release());
    queue.set_auto_release(false);
    assert!(!queue.auto_release());
    assert_eq!(Config::default(), Config { capacity: 0, auto_release: false });
}
}

cfg_loom! {
fn model<F>(f: F)
where
    F: Fn() + Sync + Send + 'static,
{
    let mut model = loom::model::Builder::new();
    model.preemption_bound = Some(2);
    model.check(f);
}

#[test]
fn mt_duplicates_suppressed() {
    model(|| {
        let queue = UniqueQueue::new(1);
        queue.send(1).unwrap();
        queue.send(1).unwrap();
        queue.close();
        let delivered: Vec<_> = queue.front().iter().collect();
        assert_eq!(delivered, [1]);
    });
}

#[test]
fn mt_close_propagates() {
    model(|| {
        let queue = UniqueQueue::new(1);
        queue.send(1).unwrap();
        queue.send(2).unwrap();
        queue.close();
        assert_eq!(queue.recv(), Ok(1));
        assert_eq!(queue.recv(), Ok(2));
        assert_eq!(queue.recv(), Err(RecvError {}));
    });
}

#[test]
fn mt_auto_release_readmits_after_recv() {
    model(|| {
        let queue = UniqueQueue::with_config(Config {
            capacity: 1,
            auto_release: true,
        });
        queue.send(1).unwrap();
        assert_eq!(queue.recv(), Ok(1));
        queue.send(1).unwrap();
        queue.close();
        assert_eq!(queue.recv(), Ok(1));
        assert_eq!(queue.recv(), Err(RecvError {}));
    });
}

#[test]
fn mt_dropping_queue_stops_workers() {
    model(|| {
        let queue = UniqueQueue::new(1);
        queue.send(1).unwrap();
        drop(queue);
    });
}
}
