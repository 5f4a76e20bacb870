// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::channel::mpsc as futures_mpsc;
use futures::{Stream, StreamExt};
use strand_core::StreamItem;
use tokio::sync::mpsc as tokio_mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Turns the receiving half of an unbounded channel into a stream of `StreamItem`s.
pub trait UnboundedReceiverExt<T> {
    /// Wraps every received value in [`StreamItem::Value`].
    ///
    /// The stream ends when every sender has been dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strand_rx::prelude::*;
    /// use futures::StreamExt;
    /// use tokio::sync::mpsc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let (tx, rx) = mpsc::unbounded_channel::<u32>();
    /// let mut groups = rx.into_item_stream().chunk_by(|v: &u32| v / 100);
    ///
    /// tx.send(101).unwrap();
    /// tx.send(250).unwrap();
    /// drop(tx);
    ///
    /// let first = groups.next().await.unwrap().unwrap();
    /// assert_eq!(*first.key(), 1);
    /// # }
    /// ```
    fn into_item_stream(self) -> impl Stream<Item = StreamItem<T>> + Send + Unpin + 'static;
}

impl<T: Send + 'static> UnboundedReceiverExt<T> for tokio_mpsc::UnboundedReceiver<T> {
    fn into_item_stream(self) -> impl Stream<Item = StreamItem<T>> + Send + Unpin + 'static {
        UnboundedReceiverStream::new(self).map(StreamItem::Value)
    }
}

impl<T: Send + 'static> UnboundedReceiverExt<T> for futures_mpsc::UnboundedReceiver<T> {
    fn into_item_stream(self) -> impl Stream<Item = StreamItem<T>> + Send + Unpin + 'static {
        self.map(StreamItem::Value)
    }
}
