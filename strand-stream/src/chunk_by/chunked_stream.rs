// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use super::grouped_stream::GroupedStream;
use super::key_equivalence::KeyEquivalence;
use super::operator::ChunkByOperator;
use crate::logging::debug;
use core::fmt::{self, Debug};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::{FutureExt, Stream, StreamExt};
use strand_core::{
    InterestCount, InterestGuard, Lifetime, Observer, Result, StrandTask, StreamItem,
};

/// Stream of the groups produced by [`ChunkByExt`](crate::chunk_by::ChunkByExt).
///
/// Holds the downstream unit of interest in the source. The source keeps running
/// while this stream or any group subscription is alive; once all of them are
/// gone, the source is cancelled.
pub struct ChunkedStream<K, M: Clone + Send + 'static> {
    rx: UnboundedReceiver<StreamItem<GroupedStream<K, M>>>,
    interest: InterestGuard,
}

impl<K, M> Stream for ChunkedStream<K, M>
where
    M: Clone + Send + 'static,
{
    type Item = StreamItem<GroupedStream<K, M>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = self.rx.poll_next_unpin(cx);
        if matches!(polled, Poll::Ready(None | Some(StreamItem::Error(_)))) {
            self.interest.release();
        }
        polled
    }
}

impl<K, M> Debug for ChunkedStream<K, M>
where
    M: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedStream")
            .field("rx", &"<receiver>")
            .field("interest", &self.interest)
            .finish()
    }
}

pub(crate) fn chunk_by_impl<S, T, K, M, KS, MS, EQ>(
    source: S,
    key_selector: KS,
    element_selector: MS,
    equivalence: EQ,
) -> ChunkedStream<K, M>
where
    S: Stream<Item = StreamItem<T>> + Send + 'static,
    T: Send + 'static,
    K: Clone + Send + 'static,
    M: Clone + Send + 'static,
    KS: FnMut(&T) -> Result<K> + Send + 'static,
    MS: FnMut(T) -> Result<M> + Send + 'static,
    EQ: KeyEquivalence<K> + Send + 'static,
{
    let source_lifetime = Lifetime::new();
    let interest = InterestCount::new(source_lifetime.clone());
    let downstream_interest = interest.acquire();

    let (tx, rx) = mpsc::unbounded();
    let mut operator =
        ChunkByOperator::new(key_selector, element_selector, equivalence, tx, interest);

    let task = StrandTask::spawn(|cancel| async move {
        let mut stream = Box::pin(source);
        loop {
            futures::select! {
                _ = cancel.cancelled().fuse() => {
                    debug!("chunk_by: source cancelled");
                    break;
                }

                item = stream.next().fuse() => {
                    match item {
                        Some(StreamItem::Value(value)) => {
                            operator.on_next(value);
                            if operator.is_stopped() {
                                break;
                            }
                        }
                        Some(StreamItem::Error(e)) => {
                            operator.on_error(e);
                            break;
                        }
                        None => {
                            operator.on_completed();
                            break;
                        }
                    }
                }
            }
        }
        // Close every group and the downstream on exit
        operator.shutdown();
    });

    source_lifetime.add(move || task.cancel());

    ChunkedStream {
        rx,
        interest: downstream_interest,
    }
}
