//! The two workers between the input and the output of a [`UniqueQueue`](super::UniqueQueue).
//!
//! Shutdown travels downstream: the admission stage closes the internal
//! buffer once the input is exhausted, and the delivery stage closes the
//! output once the buffer is exhausted.
//!
//! Auto-release isn't done here: the output's receive hook releases a value
//! on the consumer's thread before `recv` hands it over.

use super::constraint::{Admission, ConstraintTable};
use crate::channel::{Receiver, SendError, Sender};
use crate::sync::Arc;
use log::{debug, trace};
use std::hash::Hash;

pub(super) fn admission<T>(
    input: Receiver<T>,
    buffer: Sender<T>,
    constraints: Arc<ConstraintTable<T>>,
) where
    T: Eq + Hash + Clone,
{
    debug!("admission stage started");
    let (mut admitted, mut suppressed) = (0usize, 0usize);

    for value in &input {
        if constraints.try_admit(&value) == Admission::Rejected {
            suppressed += 1;
            trace!("suppressed duplicate arrival");
            continue;
        }
        // blocks while the buffer is full, which in turn backs up the input.
        if let Err(SendError(value)) = buffer.send(value) {
            constraints.release(&value);
            debug!("delivery stage is gone, admission stage stopping early");
            break;
        }
        admitted += 1;
        trace!("admitted value #{admitted}");
    }

    buffer.close();
    debug!("admission stage finished: {admitted} admitted, {suppressed} suppressed");
}

pub(super) fn delivery<T>(
    buffer: Receiver<T>,
    output: Sender<T>,
    constraints: Arc<ConstraintTable<T>>,
) where
    T: Eq + Hash + Clone,
{
    debug!("delivery stage started");
    let mut delivered = 0usize;

    for value in &buffer {
        // returns once a consumer has taken the value.
        match output.send(value) {
            Ok(()) => {
                delivered += 1;
                trace!("delivered value #{delivered}");
            }
            Err(SendError(value)) => {
                constraints.release(&value);
                debug!("every consumer is gone, delivery stage stopping early");
                while let Ok(value) = buffer.try_recv() {
                    constraints.release(&value);
                }
                break;
            }
        }
    }

    // Dropping `buffer` on an early stop disconnects the admission stage.
    output.close();
    debug!("delivery stage finished: {delivered} delivered");
}
