// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Shared teardown for subscriptions.
//!
//! A [`Lifetime`] owns a list of cleanup callbacks that run exactly once, when the
//! lifetime is disposed. An [`InterestCount`] ties a lifetime to a number of
//! interested parties: every [`InterestGuard`] keeps the lifetime alive, and
//! releasing the last guard disposes it.
//!
//! ```
//! use strand_core::{InterestCount, Lifetime};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let cancelled = Arc::new(AtomicUsize::new(0));
//! let source = Lifetime::new();
//! let counter = cancelled.clone();
//! source.add(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! let interest = InterestCount::new(source.clone());
//! let consumer = interest.acquire();
//! let group = interest.acquire();
//!
//! drop(consumer);
//! assert!(!source.is_disposed());
//!
//! drop(group);
//! assert!(source.is_disposed());
//! assert_eq!(cancelled.load(Ordering::SeqCst), 1);
//! ```

use crate::strand_mutex::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[cfg(feature = "tracing")]
macro_rules! debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

type Teardown = Box<dyn FnOnce() + Send + 'static>;

/// A disposable scope holding cleanup callbacks.
///
/// Clones share the same scope. Disposing is idempotent; callbacks added after
/// disposal run immediately.
#[derive(Clone)]
pub struct Lifetime {
    inner: Arc<LifetimeInner>,
}

struct LifetimeInner {
    disposed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

impl Lifetime {
    /// Creates a live lifetime with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LifetimeInner {
                disposed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers a callback to run when this lifetime is disposed.
    pub fn add<F>(&self, teardown: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut teardowns = self.inner.teardowns.lock();
        if self.inner.disposed.load(Ordering::Acquire) {
            drop(teardowns);
            teardown();
            return;
        }
        teardowns.push(Box::new(teardown));
    }

    /// Disposes the lifetime, running every registered callback once.
    pub fn dispose(&self) {
        let teardowns = {
            let mut teardowns = self.inner.teardowns.lock();
            if self.inner.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut *teardowns)
        };

        // Callbacks run outside the lock so they may touch this lifetime again
        for teardown in teardowns {
            teardown();
        }
    }

    /// Returns `true` once [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Returns `true` while the lifetime has not been disposed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        !self.is_disposed()
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifetime")
            .field("disposed", &self.is_disposed())
            .field("teardowns", &self.inner.teardowns.lock().len())
            .finish()
    }
}

/// Reference count of the parties keeping a source [`Lifetime`] alive.
///
/// Clones share the same counter.
#[derive(Clone)]
pub struct InterestCount {
    inner: Arc<InterestInner>,
}

struct InterestInner {
    observers: AtomicUsize,
    source: Lifetime,
}

impl InterestCount {
    /// Creates a counter with no interested parties guarding `source`.
    #[must_use]
    pub fn new(source: Lifetime) -> Self {
        Self {
            inner: Arc::new(InterestInner {
                observers: AtomicUsize::new(0),
                source,
            }),
        }
    }

    /// Registers one more interested party.
    ///
    /// The returned guard releases the interest when dropped.
    #[must_use]
    pub fn acquire(&self) -> InterestGuard {
        self.inner.observers.fetch_add(1, Ordering::AcqRel);
        InterestGuard {
            inner: Some(Arc::clone(&self.inner)),
        }
    }

    /// Number of parties currently holding a guard.
    #[must_use]
    pub fn count(&self) -> usize {
        self.inner.observers.load(Ordering::Acquire)
    }

    /// The lifetime torn down when the count reaches zero.
    #[must_use]
    pub fn source(&self) -> &Lifetime {
        &self.inner.source
    }
}

impl fmt::Debug for InterestCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterestCount")
            .field("observers", &self.count())
            .field("source", &self.inner.source)
            .finish()
    }
}

/// One unit of interest in an [`InterestCount`].
///
/// Releasing the last guard disposes the source lifetime.
pub struct InterestGuard {
    inner: Option<Arc<InterestInner>>,
}

impl InterestGuard {
    /// Releases this interest now instead of on drop. Idempotent.
    pub fn release(&mut self) {
        let Some(inner) = self.inner.take() else {
            return;
        };

        if inner.source.is_disposed() {
            return;
        }

        if inner.observers.fetch_sub(1, Ordering::AcqRel) == 1 {
            debug!("last interest released, disposing source lifetime");
            inner.source.dispose();
        }
    }

    /// Returns `true` until the guard has been released.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.inner.is_some()
    }
}

impl Drop for InterestGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for InterestGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterestGuard")
            .field("held", &self.is_held())
            .finish()
    }
}
