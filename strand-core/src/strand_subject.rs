// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Hot, multi-subscriber subject used as the per-group multicast channel.
//!
//! A [`StrandSubject`] fans each [`StreamItem<T>`] out to every subscriber
//! attached at the time of the send.
//!
//! ## Characteristics
//!
//! - **Hot**: Late subscribers do not receive past items, only items sent after subscribing.
//! - **Unbounded**: Each subscription is an unbounded mpsc receiver (no backpressure).
//! - **Thread-safe**: Cheap to clone; all clones share the same internal state.
//! - **Single terminal**: `close()` or `error()` is delivered once; afterwards every
//!   `send`, `error` and `subscribe` returns [`SubjectError::Closed`].
//!
//! ## Example
//!
//! ```
//! use strand_core::{StrandSubject, StreamItem};
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let subject = StrandSubject::<i32>::new();
//!
//! // Subscribe before sending
//! let mut stream = subject.subscribe().unwrap();
//!
//! subject.send(StreamItem::Value(1)).unwrap();
//! subject.send(StreamItem::Value(2)).unwrap();
//! subject.close();
//!
//! assert_eq!(stream.next().await, Some(StreamItem::Value(1)));
//! assert_eq!(stream.next().await, Some(StreamItem::Value(2)));
//! assert_eq!(stream.next().await, None); // Subject closed
//! # }
//! ```

use crate::strand_mutex::Mutex;
use crate::{StrandError, StreamItem, SubjectError};
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Boxed subscription stream handed out by [`StrandSubject::subscribe`].
pub type SubjectBoxStream<T> = Pin<Box<dyn Stream<Item = StreamItem<T>> + Send + Sync + 'static>>;

struct SubjectState<T> {
    closed: bool,
    senders: Vec<UnboundedSender<StreamItem<T>>>,
}

// UnboundedReceiver is not Sync; the mutex makes the boxed subscription Sync.
struct SubjectStream<T> {
    inner: Mutex<UnboundedReceiver<StreamItem<T>>>,
}

impl<T: Send + 'static> SubjectStream<T> {
    fn boxed(rx: UnboundedReceiver<StreamItem<T>>) -> SubjectBoxStream<T> {
        Box::pin(Self {
            inner: Mutex::new(rx),
        })
    }
}

impl<T> Stream for SubjectStream<T> {
    type Item = StreamItem<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut guard = self.inner.lock();
        Pin::new(&mut *guard).poll_next(cx)
    }
}

/// A hot, unbounded subject that broadcasts items to all current subscribers.
///
/// See the [module documentation](self) for examples and more details.
pub struct StrandSubject<T: Clone + Send + 'static> {
    state: Arc<Mutex<SubjectState<T>>>,
}

impl<T: Clone + Send + 'static> StrandSubject<T> {
    /// Creates a new open subject with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                closed: false,
                senders: Vec::new(),
            })),
        }
    }

    /// Subscribe to this subject and receive a stream of `StreamItem<T>`.
    /// Late subscribers do not receive previously sent items.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn subscribe(&self) -> Result<SubjectBoxStream<T>, SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        let (tx, rx) = mpsc::unbounded();
        state.senders.push(tx);
        Ok(SubjectStream::boxed(rx))
    }

    /// Send an item to all active subscribers.
    ///
    /// Subscribers whose receiving end was dropped are pruned here.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn send(&self, item: StreamItem<T>) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        state
            .senders
            .retain(|tx| tx.unbounded_send(item.clone()).is_ok());
        Ok(())
    }

    /// Send a value to all active subscribers.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject has already terminated.
    pub fn next(&self, value: T) -> Result<(), SubjectError> {
        self.send(StreamItem::Value(value))
    }

    /// Sends `err` to every subscriber and terminates the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the subject had already terminated; in
    /// that case nothing is delivered.
    pub fn error(&self, err: StrandError) -> Result<(), SubjectError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SubjectError::Closed);
        }

        for tx in state.senders.drain(..) {
            let _ = tx.unbounded_send(StreamItem::Error(err.clone()));
        }
        state.closed = true;
        Ok(())
    }

    /// Closes the subject, completing all subscriber streams.
    ///
    /// Existing subscribers drain what was already sent and then end.
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.senders.clear();
    }

    /// Returns `true` once the subject has completed or errored.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the number of attached subscribers.
    ///
    /// Dropped subscribers are only pruned on the next `send()`.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().senders.len()
    }

    /// Returns `true` if the subject is open and at least one receiver is still attached.
    #[must_use]
    pub fn has_live_subscribers(&self) -> bool {
        let state = self.state.lock();
        !state.closed && state.senders.iter().any(|tx| !tx.is_closed())
    }
}

impl<T: Clone + Send + 'static> Default for StrandSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Clone for StrandSubject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for StrandSubject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("StrandSubject")
            .field("closed", &state.closed)
            .field("subscribers", &state.senders.len())
            .finish()
    }
}
