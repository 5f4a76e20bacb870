// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Contiguous-run grouping for async streams.
//!
//! This crate provides the [`chunk_by`](ChunkByExt::chunk_by) family of operators.
//! Each operator turns a `Stream<Item = StreamItem<T>>` into a stream of
//! [`GroupedStream`] handles, one per maximal run of consecutive items whose keys
//! are equivalent.
//!
//! # Architecture
//!
//! - **[`ChunkByOperator`]**: the push-based state machine, written against
//!   [`Observer`](strand_core::Observer)
//! - **[`ChunkByExt`]**: extension trait that drives the operator from a spawned task
//! - **[`GroupedStream`]**: keyed handle backed by a hot multicast subject
//! - **[`KeyEquivalence`]**: decides whether an item continues the open run
//!
//! # Lifetime
//!
//! The source is kept alive by reference counting: the [`ChunkedStream`] and every
//! [`GroupSubscription`] hold one unit of interest. When the last one is dropped, or
//! runs to its end, the source is cancelled exactly once.
//!
//! # Example
//!
//! ```
//! use strand_core::StreamItem;
//! use strand_stream::ChunkByExt;
//! use futures::{stream, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let readings = stream::iter([20, 20, 21, 21, 21, 20].map(StreamItem::Value));
//! let mut groups = readings.chunk_runs();
//!
//! let mut sizes = Vec::new();
//! while let Some(StreamItem::Value(group)) = groups.next().await {
//!     let run: Vec<_> = group.subscribe().unwrap().collect().await;
//!     sizes.push((*group.key(), run.len()));
//! }
//!
//! assert_eq!(sizes, vec![(20, 2), (21, 3), (20, 1)]);
//! # }
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]

mod logging;
pub mod chunk_by;

pub use chunk_by::{
    equivalent_under, ChunkByExt, ChunkByOperator, ChunkedStream, EquivalentBy, GroupSubscription,
    Grouped, GroupedStream, KeyEquivalence, NaturalOrder, OrderedBy,
};
