use crate::channel::{self, Receiver, RecvError, RecvHook, SendError, Sender};
use crate::error::AlreadyConstrained;
use crate::sync::atomic::{AtomicBool, Ordering::{Acquire, Release}};
use crate::sync::Arc;
use crate::thread;
use log::{debug, trace, warn};
use std::hash::Hash;

mod constraint;
use constraint::ConstraintTable;

mod stage;

/// Construction options for a [`UniqueQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Capacity of the input and of the internal buffer.
    ///
    /// Zero turns both into rendezvous hand-offs.
    pub capacity: usize,
    /// Release a value's constraint as soon as a consumer takes it.
    ///
    /// When `false`, the constraint stays until
    /// [`remove_constraint`](UniqueQueue::remove_constraint) is called.
    pub auto_release: bool,
}

/// A FIFO queue that drops values which are already pending.
///
/// Values sent to the [`back`](UniqueQueue::back) come out of the
/// [`front`](UniqueQueue::front) in order. While a value is *constrained*
/// (admitted and not yet released) further arrivals of an equal value are
/// dropped silently.
///
/// Two worker threads move values from the input to the output: one decides
/// admission, the other delivers. Closing the input (with
/// [`close`](UniqueQueue::close), or by dropping the queue together with
/// every clone of [`back`](UniqueQueue::back)) drains the pipeline and then
/// ends the output stream.
///
/// Constraint operations may be called from any thread. They are atomic on
/// their own, but their ordering relative to values still travelling through
/// the input is not.
pub struct UniqueQueue<T> {
    back: Sender<T>,
    front: Receiver<T>,
    constraints: Arc<ConstraintTable<T>>,
    auto_release: Arc<AtomicBool>,
    capacity: usize,
}

impl<T> UniqueQueue<T>
where
    T: Eq + Hash + Clone + Send + 'static,
{
    /// Creates a queue whose input and internal buffer hold `capacity` values,
    /// with auto-release off.
    ///
    /// # Panics
    ///
    /// Panics if the worker threads can't be spawned.
    pub fn new(capacity: usize) -> Self {
        Self::with_config(Config {
            capacity,
            ..Config::default()
        })
    }

    /// Creates a queue from a [`Config`].
    ///
    /// # Panics
    ///
    /// Panics if the worker threads can't be spawned.
    pub fn with_config(config: Config) -> Self {
        let (back, input) = channel::channel(config.capacity);
        let (buffer_tx, buffer_rx) = channel::channel(config.capacity);

        let constraints = Arc::new(ConstraintTable::new());
        let auto_release = Arc::new(AtomicBool::new(config.auto_release));

        // a rendezvous output makes "delivered" mean "taken by a consumer".
        let (output, front) = channel::channel_with_recv_hook(
            0,
            release_on_delivery(constraints.clone(), auto_release.clone()),
        );

        let table = constraints.clone();
        thread::spawn_named("uniqueue-admission", move || {
            stage::admission(input, buffer_tx, table)
        });
        let table = constraints.clone();
        thread::spawn_named("uniqueue-delivery", move || {
            stage::delivery(buffer_rx, output, table)
        });
        debug!(
            "unique queue started (capacity {}, auto-release {})",
            config.capacity, config.auto_release
        );

        Self {
            back,
            front,
            constraints,
            auto_release,
            capacity: config.capacity,
        }
    }

    /// The input of the queue. Clone it to hand it to producer threads.
    #[inline]
    pub fn back(&self) -> &Sender<T> {
        &self.back
    }

    /// The output of the queue. Clone it to hand it to consumer threads.
    #[inline]
    pub fn front(&self) -> &Receiver<T> {
        &self.front
    }

    /// Enqueues `value`, blocking while the input is full.
    ///
    /// A duplicate of a constrained value is accepted here and dropped later,
    /// so `Ok` doesn't mean the value will be delivered. Fails only once the
    /// input is closed.
    #[inline]
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.back.send(value)
    }

    /// Dequeues the next value, blocking until one is delivered.
    ///
    /// Returns [`RecvError`] at end-of-stream.
    #[inline]
    pub fn recv(&self) -> Result<T, RecvError> {
        self.front.recv()
    }

    /// Closes the input. Values already sent are still delivered, then the
    /// output reports end-of-stream.
    ///
    /// Closing more than once has no further effect.
    pub fn close(&self) {
        if self.back.close() {
            debug!("unique queue input closed, draining");
        } else {
            warn!("unique queue input was already closed");
        }
    }

    /// Lets the next arrival of `value` through even if it is constrained.
    /// That arrival re-arms the constraint, so later ones are dropped again.
    pub fn ignore_once(&self, value: T) {
        self.constraints.ignore_once(value);
    }

    /// Constrains `value` without sending it, so arrivals of it are dropped
    /// until it is removed.
    ///
    /// Fails if `value` is already constrained and not ignored.
    pub fn add_constraint(&self, value: T) -> Result<(), AlreadyConstrained<T>> {
        self.constraints.force_add(value)
    }

    /// Drops one hold on `value`'s constraint. Once none is left, `value` can
    /// be admitted again.
    ///
    /// Does nothing if `value` isn't constrained.
    pub fn remove_constraint(&self, value: &T) {
        self.constraints.release(value);
    }

    /// Same as [`remove_constraint`](UniqueQueue::remove_constraint); reads
    /// better in workers that release a value after processing it.
    #[inline]
    pub fn release(&self, value: &T) {
        self.remove_constraint(value)
    }

    /// Checks if an arrival of `value` would be dropped right now.
    pub fn is_constrained(&self, value: &T) -> bool {
        self.constraints.is_constrained(value)
    }

    /// Number of values with a constraint entry, ignored ones included.
    pub fn constrained_len(&self) -> usize {
        self.constraints.len()
    }

    /// Checks if constraints are released on delivery.
    pub fn auto_release(&self) -> bool {
        self.auto_release.load(Acquire)
    }

    /// Switches auto-release on or off.
    ///
    /// The setting is checked when a consumer takes a value, so it applies to
    /// every value received after this call, including ones already queued.
    pub fn set_auto_release(&self, enabled: bool) {
        self.auto_release.store(enabled, Release);
    }

    /// The capacity the queue was created with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Releases a value as it is taken from the output, while auto-release is on.
///
/// The flag is read at hand-off time, so switching it affects values that are
/// already waiting in the delivery worker.
fn release_on_delivery<T>(
    constraints: Arc<ConstraintTable<T>>,
    auto_release: Arc<AtomicBool>,
) -> RecvHook<T>
where
    T: Eq + Hash + Clone + Send + 'static,
{
    Box::new(move |value: &T| {
        if auto_release.load(Acquire) && constraints.release(value) {
            trace!("constraint released on delivery");
        }
    })
}

#[cfg(test)]
mod tests;
