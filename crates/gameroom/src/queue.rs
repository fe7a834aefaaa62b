use parking_lot::Condvar;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use std::time::Instant;

/// Bounded blocking FIFO.
///
/// Producers wait on `room` while the buffer is full, consumers wait on
/// `items` while it is empty. Each push or pop wakes exactly one waiter on
/// the opposite side. Closing wakes everyone: producers get their item
/// back, consumers drain what is left and then get `None`.
#[derive(Debug)]
pub struct Queue<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
    room: Condvar,
    items: Condvar,
}

#[derive(Debug)]
struct Inner<T> {
    buffer: VecDeque<T>,
    closed: bool,
}

impl<T> Queue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                buffer: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            room: Condvar::new(),
            items: Condvar::new(),
        }
    }
    /// Appends `item`, blocking while the queue is full.
    /// Hands the item back if the queue is closed.
    pub fn submit(&self, item: T) -> Result<(), T> {
        let mut inner = self.inner.lock();
        while inner.buffer.len() >= self.capacity && !inner.closed {
            self.room.wait(&mut inner);
        }
        if inner.closed {
            return Err(item);
        }
        inner.buffer.push_back(item);
        self.items.notify_one();
        Ok(())
    }
    /// Removes the oldest item, blocking while the queue is empty.
    /// Returns `None` once the queue is closed and drained.
    pub fn take(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        while inner.buffer.is_empty() && !inner.closed {
            self.items.wait(&mut inner);
        }
        self.pop(&mut inner.buffer)
    }
    /// Like [`Queue::take`], but gives up after `timeout`.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        while inner.buffer.is_empty() && !inner.closed {
            if self.items.wait_until(&mut inner, deadline).timed_out() {
                break;
            }
        }
        self.pop(&mut inner.buffer)
    }
    /// Removes every pending item, oldest first.
    pub fn drain(&self) -> Vec<T> {
        let drained = self.inner.lock().buffer.drain(..).collect::<Vec<_>>();
        self.room.notify_all();
        drained
    }
    /// Refuses further submissions and releases every blocked caller.
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.room.notify_all();
        self.items.notify_all();
    }
    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
    pub fn len(&self) -> usize {
        self.inner.lock().buffer.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.lock().buffer.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    fn pop(&self, buffer: &mut VecDeque<T>) -> Option<T> {
        let item = buffer.pop_front();
        if item.is_some() {
            self.room.notify_one();
        }
        item
    }
}
