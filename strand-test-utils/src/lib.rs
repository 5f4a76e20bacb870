// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Strand crates.
//!
//! This crate is designed for use in development and testing only, not for
//! production code.
//!
//! # Architecture
//!
//! Operators consume their source (`self`), while tests need to keep pushing into
//! it. The channels here split the two: tests keep the sender, the operator gets
//! the stream.
//!
//! ```rust
//! use strand_test_utils::{test_channel, unwrap_stream, unwrap_value};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, mut stream) = test_channel();
//! tx.send(42).unwrap();
//!
//! let item = unwrap_stream(&mut stream, 500).await;
//! assert_eq!(unwrap_value(Some(item)), 42);
//! # }
//! ```
//!
//! # Module Organization
//!
//! - `helpers` - Assertion and collection helpers with timeouts
//! - `recording_observer` - [`RecordingObserver`] for driving push-based operators
//! - `test_data` - Reference marbles and small domain fixtures

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod helpers;
pub mod recording_observer;
pub mod test_data;

use futures::{Stream, StreamExt};
use strand_core::StreamItem;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub use helpers::{
    assert_no_element_emitted, assert_stream_ended, collect_values, unwrap_stream, unwrap_value,
};
pub use recording_observer::{Notification, RecordingObserver};
pub use test_data::Reading;

/// Creates a test channel that automatically wraps values in `StreamItem::Value`.
///
/// Tests send plain values while the stream yields `StreamItem<T>`.
pub fn test_channel<T: Send + 'static>() -> (
    mpsc::UnboundedSender<T>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx).map(StreamItem::Value);
    (tx, stream)
}

/// Creates a test channel that accepts `StreamItem<T>` for testing error propagation.
///
/// ```rust
/// use strand_test_utils::test_channel_with_errors;
/// use strand_core::{StrandError, StreamItem};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut stream) = test_channel_with_errors();
///
/// tx.send(StreamItem::Value(42)).unwrap();
/// tx.send(StreamItem::Error(StrandError::stream_error("test error"))).unwrap();
///
/// assert!(stream.next().await.unwrap().is_value());
/// assert!(stream.next().await.unwrap().is_error());
/// # }
/// ```
pub fn test_channel_with_errors<T: Send + 'static>() -> (
    mpsc::UnboundedSender<StreamItem<T>>,
    impl Stream<Item = StreamItem<T>> + Send,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let stream = UnboundedReceiverStream::new(rx);
    (tx, stream)
}
