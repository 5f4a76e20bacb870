// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Push-based sink abstraction.
//!
//! An [`Observer`] receives zero or more `on_next` calls followed by at most one
//! terminal call (`on_error` or `on_completed`). Operators are written against this
//! trait so they can be driven by any push-based source, not only by polling a
//! `futures::Stream`.

use crate::{StrandError, StrandSubject, StreamItem};
use futures::channel::mpsc::UnboundedSender;

/// Receiver of push-based notifications.
pub trait Observer<T> {
    /// Delivers the next value.
    fn on_next(&mut self, value: T);

    /// Delivers a terminal error.
    fn on_error(&mut self, error: StrandError);

    /// Delivers terminal completion.
    fn on_completed(&mut self);

    /// Returns `false` once the observer has lost interest in further values.
    fn is_subscribed(&self) -> bool {
        true
    }
}

/// Forwards notifications into an unbounded channel; the receiver is the consumer.
///
/// Terminal signals close the channel, so the receiving stream ends after them.
impl<T> Observer<T> for UnboundedSender<StreamItem<T>> {
    fn on_next(&mut self, value: T) {
        let _ = self.unbounded_send(StreamItem::Value(value));
    }

    fn on_error(&mut self, error: StrandError) {
        let _ = self.unbounded_send(StreamItem::Error(error));
        self.close_channel();
    }

    fn on_completed(&mut self) {
        self.close_channel();
    }

    fn is_subscribed(&self) -> bool {
        !self.is_closed()
    }
}

impl<T: Clone + Send + 'static> Observer<T> for StrandSubject<T> {
    fn on_next(&mut self, value: T) {
        let _ = self.next(value);
    }

    fn on_error(&mut self, error: StrandError) {
        let _ = self.error(error);
    }

    fn on_completed(&mut self) {
        self.close();
    }

    fn is_subscribed(&self) -> bool {
        !self.is_closed()
    }
}
