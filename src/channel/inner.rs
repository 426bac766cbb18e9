use crate::error::{RecvError, SendError, TryRecvError, TrySendError};
use crate::sync::{Condvar, Mutex, MutexGuard};
use std::collections::VecDeque;

/// Runs in the receiving thread on every value it takes, before `recv` returns it.
pub(crate) type RecvHook<T> = Box<dyn Fn(&T) + Send + Sync>;

pub(super) struct Inner<T> {
    state: Mutex<State<T>>,
    on_recv: Option<RecvHook<T>>,
    /// Receivers wait here for data or disconnection.
    readable: Condvar,
    /// Senders wait here for space, for a rendezvous pickup, or for disconnection.
    writable: Condvar,
}

struct State<T> {
    buffer: VecDeque<T>,
    capacity: usize,
    senders: usize,
    receivers: usize,
    /// receivers currently blocked in `recv`
    waiting: usize,
    closed: bool,
    /// values ever pushed / popped, used as rendezvous tickets
    sent: u64,
    received: u64,
}

impl<T> State<T> {
    /// A rendezvous channel still holds one in-flight value while its sender waits for pickup.
    #[inline]
    fn slots(&self) -> usize {
        self.capacity.max(1)
    }

    #[inline]
    fn send_closed(&self) -> bool {
        self.closed || self.receivers == 0
    }

    #[inline]
    fn recv_closed(&self) -> bool {
        self.closed || self.senders == 0
    }
}

impl<T> Inner<T> {
    pub(super) fn new(capacity: usize, on_recv: Option<RecvHook<T>>) -> Self {
        Self {
            on_recv,
            state: Mutex::new(State {
                buffer: VecDeque::with_capacity(capacity.max(1)),
                capacity,
                senders: 1,
                receivers: 1,
                waiting: 0,
                closed: false,
                sent: 0,
                received: 0,
            }),
            readable: Condvar::new(),
            writable: Condvar::new(),
        }
    }

    pub(super) fn send(&self, item: T) -> Result<(), SendError<T>> {
        let mut state = self.lock();
        loop {
            if state.send_closed() {
                return Err(SendError(item));
            }
            if state.buffer.len() < state.slots() {
                break;
            }
            state = self.wait(&self.writable, state);
        }

        let ticket = state.sent;
        state.buffer.push_back(item);
        state.sent += 1;
        self.readable.notify_one();

        if state.capacity != 0 {
            return Ok(());
        }
        // rendezvous: hold the sender until a receiver has taken the value.
        while state.received <= ticket {
            if state.receivers == 0 {
                // slots() == 1, so the only buffered value is ours.
                return match state.buffer.pop_back() {
                    Some(item) => Err(SendError(item)),
                    None => Ok(()),
                };
            }
            state = self.wait(&self.writable, state);
        }
        Ok(())
    }

    pub(super) fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
        let mut state = self.lock();
        if state.send_closed() {
            return Err(TrySendError::Disconnected(item));
        }
        let has_room = if state.capacity == 0 {
            // a rendezvous channel never buffers more than the one in-flight value.
            state.buffer.is_empty() && state.waiting > 0
        } else {
            state.buffer.len() < state.capacity
        };
        if !has_room {
            return Err(TrySendError::Full(item));
        }
        state.buffer.push_back(item);
        state.sent += 1;
        self.readable.notify_one();
        Ok(())
    }

    pub(super) fn recv(&self) -> Result<T, RecvError> {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.buffer.pop_front() {
                state.received += 1;
                drop(state);
                self.writable.notify_all();
                self.taken(&item);
                return Ok(item);
            }
            if state.recv_closed() {
                return Err(RecvError {});
            }
            state.waiting += 1;
            state = self.wait(&self.readable, state);
            state.waiting -= 1;
        }
    }

    pub(super) fn try_recv(&self) -> Result<T, TryRecvError> {
        let mut state = self.lock();
        match state.buffer.pop_front() {
            Some(item) => {
                state.received += 1;
                drop(state);
                self.writable.notify_all();
                self.taken(&item);
                Ok(item)
            }
            // Let the receivers consume everything sent before the close.
            None if state.recv_closed() => Err(TryRecvError::Disconnected),
            None => Err(TryRecvError::Empty),
        }
    }

    /// Returns `true` if this call is the one that closed the channel.
    pub(super) fn close(&self) -> bool {
        let mut state = self.lock();
        if state.closed {
            return false;
        }
        state.closed = true;
        drop(state);
        self.readable.notify_all();
        self.writable.notify_all();
        true
    }

    pub(super) fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub(super) fn receiver_connected(&self) -> bool {
        !self.lock().send_closed()
    }

    pub(super) fn sender_connected(&self) -> bool {
        !self.lock().recv_closed()
    }

    pub(super) fn len(&self) -> usize {
        self.lock().buffer.len()
    }

    pub(super) fn capacity(&self) -> usize {
        self.lock().capacity
    }

    pub(super) fn add_sender(&self) {
        self.lock().senders += 1;
    }

    pub(super) fn add_receiver(&self) {
        self.lock().receivers += 1;
    }

    pub(super) fn drop_sender(&self) {
        let mut state = self.lock();
        state.senders -= 1;
        if state.senders == 0 {
            drop(state);
            //wake every receiver so it can observe the disconnect.
            self.readable.notify_all();
        }
    }

    pub(super) fn drop_receiver(&self) {
        let mut state = self.lock();
        state.receivers -= 1;
        if state.receivers == 0 {
            drop(state);
            self.writable.notify_all();
        }
    }

    #[inline]
    fn taken(&self, item: &T) {
        if let Some(hook) = &self.on_recv {
            hook(item);
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        //a panicking peer doesn't leave the state half-updated, so we ignore poison.
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        guard: MutexGuard<'a, State<T>>,
    ) -> MutexGuard<'a, State<T>> {
        match condvar.wait(guard) {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
