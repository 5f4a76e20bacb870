// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Strand
//!
//! Split async streams into contiguous runs of equivalent keys.
//!
//! ## Overview
//!
//! Strand groups consecutive items that share a key and hands out one
//! subscribable [`GroupedStream`] per run. Unlike a hash-based group-by, a key that
//! comes back after a different key starts a new group, so grouping never needs to
//! buffer the whole source.
//!
//! - [`ChunkByExt`] adds the operators to every `Stream<Item = StreamItem<T>>`
//! - [`UnboundedReceiverExt`] turns tokio or futures channels into such streams
//! - The source is cancelled once the group stream and every group subscription
//!   have been released
//!
//! ## Quick Start
//!
//! ```rust
//! use strand_rx::prelude::*;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<&str>();
//! let mut sessions = rx
//!     .into_item_stream()
//!     .chunk_by(|line: &&str| line.split(':').next().map(str::to_string));
//!
//! for line in ["alice:login", "alice:click", "bob:login"] {
//!     tx.send(line).unwrap();
//! }
//! drop(tx);
//!
//! while let Some(StreamItem::Value(session)) = sessions.next().await {
//!     let events: Vec<_> = session.subscribe().unwrap().collect().await;
//!     println!("{:?}: {} event(s)", session.key(), events.len());
//! }
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): drive grouping on Tokio
//! - `runtime-smol`: drive grouping on smol
//! - `tracing`: emit `tracing` events from the operators

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
mod receiver_ext;

pub use receiver_ext::UnboundedReceiverExt;

// Re-export core types
pub use strand_core::{
    InterestCount, InterestGuard, Lifetime, Observer, Result, StrandError, StrandSubject,
    StreamItem, SubjectError,
};

// Re-export the operator and its handles
pub use strand_stream::{
    equivalent_under, ChunkByExt, ChunkByOperator, ChunkedStream, EquivalentBy, GroupSubscription,
    Grouped, GroupedStream, KeyEquivalence, NaturalOrder, OrderedBy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::UnboundedReceiverExt;
    pub use strand_core::{StrandError, StreamItem};
    pub use strand_stream::{ChunkByExt, Grouped, GroupedStream, KeyEquivalence};
}
