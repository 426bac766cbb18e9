use crate::sync::Arc;

#[doc(inline)]
pub use crate::error::{RecvError, SendError, TryRecvError, TrySendError};

mod inner;
use inner::Inner;
pub(crate) use inner::RecvHook;

/// Creates a channel that buffers up to `capacity` values.
///
/// With a `capacity` of zero the channel is a rendezvous channel: every
/// [`send`](Sender::send) blocks until a [`Receiver`] has taken the value.
///
/// Both endpoints can be cloned and shared between threads. The channel stays
/// open until [`Sender::close`] is called or every [`Sender`] is dropped;
/// values buffered at that point are still handed to receivers.
pub fn channel<T>(capacity: usize) -> (Sender<T>, Receiver<T>) {
    endpoints(Inner::new(capacity, None))
}

/// Like [`channel`], but every value taken by a [`Receiver`] is first passed
/// to `on_recv`, on the receiving thread and before `recv` returns.
pub(crate) fn channel_with_recv_hook<T>(
    capacity: usize,
    on_recv: RecvHook<T>,
) -> (Sender<T>, Receiver<T>) {
    endpoints(Inner::new(capacity, Some(on_recv)))
}

fn endpoints<T>(inner: Inner<T>) -> (Sender<T>, Receiver<T>) {
    let inner = Arc::new(inner);
    (
        Sender {
            inner: inner.clone(),
        },
        Receiver { inner },
    )
}

/// The sending endpoint of a [`channel`].
pub struct Sender<T> {
    inner: Arc<Inner<T>>,
}

/// The receiving endpoint of a [`channel`].
///
/// Reading until end-of-stream is most easily done with a `for` loop over
/// `&Receiver`.
pub struct Receiver<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Sender<T> {
    /// Sends a value through this [`channel`].
    ///
    /// Blocks while the buffer is full and, on a rendezvous channel, until a
    /// [`Receiver`] picks the value up. Returns a [`SendError`] holding the
    /// value if the channel is closed or every [`Receiver`] is gone.
    #[inline]
    pub fn send(&self, item: T) -> Result<(), SendError<T>> {
        self.inner.send(item)
    }

    /// Tries to send a value through this [`channel`] without blocking.
    #[inline]
    pub fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
        self.inner.try_send(item)
    }

    /// Closes the [`channel`] for every endpoint.
    ///
    /// Pending values stay readable; once they are drained receivers observe
    /// end-of-stream. Blocked and later sends fail. Returns `false` if the
    /// channel was already closed.
    #[inline]
    pub fn close(&self) -> bool {
        self.inner.close()
    }

    /// Checks if [`close`](Sender::close) was called on this [`channel`].
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Checks if sends can still succeed, i.e. the [`channel`] isn't closed
    /// and at least one [`Receiver`] is connected.
    #[inline]
    pub fn receiver_connected(&self) -> bool {
        self.inner.receiver_connected()
    }

    /// The capacity the [`channel`] was created with.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

impl<T> Receiver<T> {
    /// Reads a value from the [`channel`].
    ///
    /// If the [`channel`] is empty, blocks and waits for a [`Sender`].
    /// Returns a [`RecvError`] once the channel is closed (or every [`Sender`]
    /// disconnected) and all previously sent values were received.
    #[inline]
    pub fn recv(&self) -> Result<T, RecvError> {
        self.inner.recv()
    }

    /// Tries to return a pending value without blocking.
    #[inline]
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.inner.try_recv()
    }

    /// Returns a blocking iterator that ends at end-of-stream.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { receiver: self }
    }

    /// Checks if the [`channel`] is still open on the sending side.
    ///
    /// # Note
    ///
    /// [`try_recv`](Receiver::try_recv) returns [`TryRecvError::Disconnected`]
    /// only after consuming all previously sent data. This method, on the
    /// other hand, doesn't take pending data into account.
    #[inline]
    pub fn sender_connected(&self) -> bool {
        self.inner.sender_connected()
    }

    /// Number of values currently buffered.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks if no values are currently buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.inner.add_sender();
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        self.inner.add_receiver();
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        self.inner.drop_sender();
        // Arc frees inner after the last endpoint.
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        self.inner.drop_receiver();
    }
}

/// A blocking iterator over a borrowed [`Receiver`], created by [`Receiver::iter`].
pub struct Iter<'a, T> {
    receiver: &'a Receiver<T>,
}

/// A blocking iterator that owns its [`Receiver`].
pub struct IntoIter<T> {
    receiver: Receiver<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.receiver.recv().ok()
    }
}

impl<'a, T> IntoIterator for &'a Receiver<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for Receiver<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { receiver: self }
    }
}
