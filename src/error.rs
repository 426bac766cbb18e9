use std::error::Error;
use std::fmt;

/// An enumeration listing the failure modes of the [`try_send`](crate::channel::Sender::try_send) method.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum TrySendError<T> {
    /// The data couldn't be sent on the [`channel`](crate::channel::channel)
    /// because the internal buffer was already full, or because no receiver
    /// was waiting on a rendezvous channel.
    ///
    /// Contains the data that failed to send.
    Full(T),
    /// The [`channel`](crate::channel::channel) was closed, or every
    /// [`Receiver`](crate::channel::Receiver) disconnected, so any further
    /// sends will not succeed.
    ///
    /// Contains the data that failed to send.
    Disconnected(T),
}

/// An enumeration listing the failure modes of the [`try_recv`](crate::channel::Receiver::try_recv) method.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TryRecvError {
    /// No data was received from the [`channel`](crate::channel::channel)
    /// because the internal buffer was empty.
    Empty,
    /// The [`channel`](crate::channel::channel) was closed or every
    /// [`Sender`](crate::channel::Sender) disconnected, and all previously
    /// sent data was already received.
    Disconnected,
}

/// Error for the [`send`](crate::channel::Sender::send) method.
///
/// This error is returned when the [`channel`](crate::channel::channel) is
/// closed or has no [`Receiver`](crate::channel::Receiver) left. Contains
/// the data that failed to send.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct SendError<T>(pub T);

/// Error for the [`recv`](crate::channel::Receiver::recv) method.
///
/// This is the end-of-stream signal: the [`channel`](crate::channel::channel)
/// was closed or every [`Sender`](crate::channel::Sender) disconnected, and
/// everything sent before that was already received.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RecvError {}

/// Error for [`UniqueQueue::add_constraint`](crate::UniqueQueue::add_constraint).
///
/// The value already holds an active (not ignored) constraint. Contains the
/// value that was rejected.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct AlreadyConstrained<T>(pub T);

impl<T> Error for TrySendError<T> {}
impl Error for TryRecvError {}
impl<T> Error for SendError<T> {}
impl Error for RecvError {}
impl<T> Error for AlreadyConstrained<T> {}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            TrySendError::Full(_) => f.write_str("writing to a full queue"),
            TrySendError::Disconnected(_) => f.write_str("writing to a disconnected queue"),
        }
    }
}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TryRecvError::Empty => f.write_str("reading from an empty queue"),
            TryRecvError::Disconnected => f.write_str("reading from a disconnected queue"),
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("writing to a disconnected queue")
    }
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("reading from a disconnected queue")
    }
}

impl<T> fmt::Display for AlreadyConstrained<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value is already constrained")
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TrySendError::Full(_) => f.write_str("Full(..)"),
            TrySendError::Disconnected(_) => f.write_str("Disconnected(..)"),
        }
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<T> fmt::Debug for AlreadyConstrained<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AlreadyConstrained(..)")
    }
}
