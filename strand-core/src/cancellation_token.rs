// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic cancellation token.
//!
//! Works the same on Tokio and smol: the flag is an atomic, waiters park on an
//! `event_listener::Event`.

use event_listener::{Event, EventListener};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Runtime-agnostic cancellation token.
///
/// Clones share the same state. When `cancel()` is called on any clone, every
/// waiter on `cancelled()` is woken.
///
/// # Example
///
/// ```
/// use strand_core::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let token = CancellationToken::new();
/// let token_clone = token.clone();
///
/// let waiter = tokio::spawn(async move {
///     token_clone.cancelled().await;
/// });
///
/// token.cancel();
/// waiter.await.unwrap();
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    event: Event,
}

impl CancellationToken {
    /// Create a new, not yet cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                event: Event::new(),
            }),
        }
    }

    /// Cancel the token, waking all listeners. Idempotent.
    pub fn cancel(&self) {
        // Flag first so woken waiters observe it
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.event.notify(usize::MAX);
    }

    /// Check if the token has been cancelled (non-blocking).
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait asynchronously until the token is cancelled.
    ///
    /// Resolves immediately if the token is already cancelled.
    pub fn cancelled(&self) -> Cancelled<'_> {
        Cancelled {
            token: self,
            listener: None,
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Future returned by [`CancellationToken::cancelled()`].
pub struct Cancelled<'a> {
    token: &'a CancellationToken,
    listener: Option<EventListener>,
}

impl Future for Cancelled<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        loop {
            if self.token.is_cancelled() {
                return Poll::Ready(());
            }

            match self.listener.as_mut() {
                Some(listener) => {
                    if Pin::new(listener).poll(cx).is_pending() {
                        return Poll::Pending;
                    }
                    // Woken: re-check the flag with a fresh listener
                    self.listener = None;
                }
                None => {
                    // Re-checked at the top of the loop, so a cancel() racing
                    // with listen() is never missed
                    self.listener = Some(self.token.inner.event.listen());
                }
            }
        }
    }
}
