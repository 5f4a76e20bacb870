// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Chunk-by operator that splits a stream into contiguous runs of equivalent keys.
//!
//! The [`chunk_by`](ChunkByExt::chunk_by) family derives a key from every item and
//! emits one [`GroupedStream`] per maximal run of consecutive items whose keys are
//! equivalent. Unlike a hash-based group-by, a key that comes back after a
//! different key opens a new group.
//!
//! ## Characteristics
//!
//! - **Contiguous**: Only the open run's key is compared with the incoming key
//! - **Spawns task**: Grouping runs in a background task on the configured runtime
//! - **Hot groups**: Each group is a multicast subject; the first subscriber sees the
//!   whole run, later subscribers only what is pushed after they subscribe
//! - **Error propagation**: Errors and selector failures reach every group and the
//!   group stream, then everything ends
//! - **Completion**: Every group completes when the source completes
//! - **Reference-counted**: The source is cancelled once the group stream and every
//!   group subscription have been dropped or have ended
//! - **Unbounded buffers**: Items are buffered in memory until consumed
//!
//! ## Example
//!
//! ```rust
//! use strand_core::StreamItem;
//! use strand_stream::chunk_by::ChunkByExt;
//! use futures::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, rx) = futures::channel::mpsc::unbounded();
//!
//! // Group words by their first letter
//! let mut groups = rx.chunk_by(|word: &&str| word.chars().next());
//!
//! for word in ["apple", "avocado", "banana", "apricot"] {
//!     tx.unbounded_send(StreamItem::Value(word)).unwrap();
//! }
//! drop(tx);
//!
//! let mut keys = Vec::new();
//! while let Some(StreamItem::Value(group)) = groups.next().await {
//!     keys.push(*group.key());
//! }
//!
//! // "a" appears twice: runs are contiguous
//! assert_eq!(keys, vec![Some('a'), Some('b'), Some('a')]);
//! # }
//! ```
//!
//! ## Use Cases
//!
//! - **Sessionizing**: Split an event log into per-user sessions
//! - **Run-length views**: Collapse repeated readings into one group per run
//! - **Sorted input**: Group an already sorted feed by key without buffering it

mod chunked_stream;
mod grouped_stream;
mod key_equivalence;
mod operator;

pub use chunked_stream::ChunkedStream;
pub use grouped_stream::{GroupSubscription, Grouped, GroupedStream};
pub use key_equivalence::{
    equivalent_under, EquivalentBy, KeyEquivalence, NaturalOrder, OrderedBy,
};
pub use operator::ChunkByOperator;

use chunked_stream::chunk_by_impl;
use futures::Stream;
use strand_core::{Result, StreamItem};

/// Extension trait providing the `chunk_by` family of operators.
///
/// Every method returns a [`ChunkedStream`] of [`GroupedStream`] handles, one per
/// contiguous run.
pub trait ChunkByExt<T>: Stream<Item = StreamItem<T>> + Sized
where
    T: Send + 'static,
{
    /// Groups runs of equal items, using each item as its own key.
    ///
    /// ```rust
    /// use strand_core::StreamItem;
    /// use strand_stream::chunk_by::ChunkByExt;
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let source = stream::iter([1, 1, 2, 2, 2, 1].map(StreamItem::Value));
    /// let groups: Vec<_> = source.chunk_runs().collect().await;
    ///
    /// let keys: Vec<i32> = groups.into_iter().map(|g| *g.unwrap().key()).collect();
    /// assert_eq!(keys, vec![1, 2, 1]);
    /// # }
    /// ```
    fn chunk_runs(self) -> ChunkedStream<T, T>
    where
        Self: Send + 'static,
        T: Clone + PartialOrd;

    /// Groups runs of items whose keys are equivalent under `PartialOrd`.
    ///
    /// # Arguments
    ///
    /// * `key_selector` - Derives the grouping key from each item
    fn chunk_by<K, KS>(self, key_selector: KS) -> ChunkedStream<K, T>
    where
        Self: Send + 'static,
        T: Clone,
        K: Clone + PartialOrd + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static;

    /// Like [`chunk_by`](Self::chunk_by), projecting every item with `element_selector`
    /// before it is pushed into its group.
    fn chunk_by_with<K, M, KS, MS>(
        self,
        key_selector: KS,
        element_selector: MS,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + PartialOrd + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static;

    /// Groups by key, comparing keys with a caller-supplied strict "less than".
    ///
    /// Two keys belong to the same run when neither is less than the other.
    ///
    /// ```rust
    /// use strand_core::StreamItem;
    /// use strand_stream::chunk_by::ChunkByExt;
    /// use futures::{stream, StreamExt};
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let source = stream::iter(["Foo", "FOO", "bar"].map(|s| StreamItem::Value(s.to_string())));
    /// let mut groups = source.chunk_by_ordered(
    ///     |s: &String| s.clone(),
    ///     |s: String| s,
    ///     |a: &String, b: &String| a.to_lowercase() < b.to_lowercase(),
    /// );
    ///
    /// let first = groups.next().await.unwrap().unwrap();
    /// assert_eq!(first.key(), "Foo");
    /// let second = groups.next().await.unwrap().unwrap();
    /// assert_eq!(second.key(), "bar");
    /// # }
    /// ```
    fn chunk_by_ordered<K, M, KS, MS, L>(
        self,
        key_selector: KS,
        element_selector: MS,
        less: L,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static,
        L: Fn(&K, &K) -> bool + Send + 'static;

    /// Groups by key, comparing keys with a caller-supplied equality predicate.
    fn chunk_by_equivalent<K, M, KS, MS, E>(
        self,
        key_selector: KS,
        element_selector: MS,
        equivalent: E,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static,
        E: Fn(&K, &K) -> bool + Send + 'static;

    /// The general form: fallible selectors and any [`KeyEquivalence`].
    ///
    /// # Errors
    ///
    /// A selector returning `Err` ends the pipeline: the error, tagged as a
    /// [`SelectorError`](strand_core::StrandError::SelectorError), is delivered to
    /// every group and to the returned stream.
    fn try_chunk_by<K, M, KS, MS, EQ>(
        self,
        key_selector: KS,
        element_selector: MS,
        equivalence: EQ,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> Result<K> + Send + 'static,
        MS: FnMut(T) -> Result<M> + Send + 'static,
        EQ: KeyEquivalence<K> + Send + 'static;
}

impl<S, T> ChunkByExt<T> for S
where
    S: Stream<Item = StreamItem<T>>,
    T: Send + 'static,
{
    fn chunk_runs(self) -> ChunkedStream<T, T>
    where
        Self: Send + 'static,
        T: Clone + PartialOrd,
    {
        chunk_by_impl(self, |v: &T| Ok(v.clone()), Ok, NaturalOrder)
    }

    fn chunk_by<K, KS>(self, mut key_selector: KS) -> ChunkedStream<K, T>
    where
        Self: Send + 'static,
        T: Clone,
        K: Clone + PartialOrd + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
    {
        chunk_by_impl(self, move |v: &T| Ok(key_selector(v)), Ok, NaturalOrder)
    }

    fn chunk_by_with<K, M, KS, MS>(
        self,
        mut key_selector: KS,
        mut element_selector: MS,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + PartialOrd + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static,
    {
        chunk_by_impl(
            self,
            move |v: &T| Ok(key_selector(v)),
            move |v: T| Ok(element_selector(v)),
            NaturalOrder,
        )
    }

    fn chunk_by_ordered<K, M, KS, MS, L>(
        self,
        mut key_selector: KS,
        mut element_selector: MS,
        less: L,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static,
        L: Fn(&K, &K) -> bool + Send + 'static,
    {
        chunk_by_impl(
            self,
            move |v: &T| Ok(key_selector(v)),
            move |v: T| Ok(element_selector(v)),
            OrderedBy(less),
        )
    }

    fn chunk_by_equivalent<K, M, KS, MS, E>(
        self,
        mut key_selector: KS,
        mut element_selector: MS,
        equivalent: E,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> K + Send + 'static,
        MS: FnMut(T) -> M + Send + 'static,
        E: Fn(&K, &K) -> bool + Send + 'static,
    {
        chunk_by_impl(
            self,
            move |v: &T| Ok(key_selector(v)),
            move |v: T| Ok(element_selector(v)),
            EquivalentBy(equivalent),
        )
    }

    fn try_chunk_by<K, M, KS, MS, EQ>(
        self,
        key_selector: KS,
        element_selector: MS,
        equivalence: EQ,
    ) -> ChunkedStream<K, M>
    where
        Self: Send + 'static,
        K: Clone + Send + 'static,
        M: Clone + Send + 'static,
        KS: FnMut(&T) -> Result<K> + Send + 'static,
        MS: FnMut(T) -> Result<M> + Send + 'static,
        EQ: KeyEquivalence<K> + Send + 'static,
    {
        chunk_by_impl(self, key_selector, element_selector, equivalence)
    }
}
