// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! An [`Observer`] that records every notification for later inspection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use strand_core::strand_mutex::Mutex;
use strand_core::{Observer, StrandError};

/// One recorded notification.
#[derive(Debug, Clone)]
pub enum Notification<T> {
    Next(T),
    Error(StrandError),
    Completed,
}

/// Records notifications pushed into it.
///
/// Clones share the same log, so a test can hand one clone to an operator and
/// inspect the other.
pub struct RecordingObserver<T> {
    log: Arc<Mutex<Vec<Notification<T>>>>,
    subscribed: Arc<AtomicBool>,
}

impl<T> RecordingObserver<T> {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            subscribed: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Simulates the consumer losing interest.
    pub fn unsubscribe(&self) {
        self.subscribed.store(false, Ordering::SeqCst);
    }

    /// Takes every notification recorded so far.
    pub fn take(&self) -> Vec<Notification<T>> {
        std::mem::take(&mut *self.log.lock())
    }

    pub fn len(&self) -> usize {
        self.log.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Completed))
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Error(_)))
            .count()
    }
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingObserver<T> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            subscribed: Arc::clone(&self.subscribed),
        }
    }
}

impl<T> Observer<T> for RecordingObserver<T> {
    fn on_next(&mut self, value: T) {
        self.log.lock().push(Notification::Next(value));
    }

    fn on_error(&mut self, error: StrandError) {
        self.log.lock().push(Notification::Error(error));
    }

    fn on_completed(&mut self) {
        self.log.lock().push(Notification::Completed);
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }
}
