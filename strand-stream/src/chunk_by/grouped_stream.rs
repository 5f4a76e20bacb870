// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Handles emitted by `chunk_by`, one per contiguous run.

use core::fmt::{self, Debug};
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::Stream;
use strand_core::strand_mutex::Mutex;
use strand_core::{
    InterestCount, InterestGuard, StrandSubject, StreamItem, SubjectBoxStream, SubjectError,
};

/// A keyed, subscribable sub-sequence.
pub trait Grouped {
    /// Key shared by every element of the group.
    type Key;
    /// Element type carried by the group.
    type Item;

    /// The group's key; available without subscribing.
    fn key(&self) -> &Self::Key;

    /// Attaches a new subscriber to the group.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the group already terminated and its
    /// buffered subscription was already taken.
    fn subscribe(&self) -> Result<GroupSubscription<Self::Item>, SubjectError>;
}

/// One contiguous run of the source, keyed by the key of its first element.
///
/// The first call to [`subscribe`](Grouped::subscribe) receives every element of
/// the run, including the ones pushed before the call; the handle keeps a
/// receiver attached from the moment the group was opened. Later subscriptions
/// attach live and only see what is pushed after they subscribe.
///
/// Every subscription keeps the upstream source alive until it is dropped or ends.
pub struct GroupedStream<K, M: Clone + Send + 'static> {
    key: K,
    subject: StrandSubject<M>,
    primary: Mutex<Option<SubjectBoxStream<M>>>,
    interest: InterestCount,
}

impl<K, M> GroupedStream<K, M>
where
    M: Clone + Send + 'static,
{
    pub(crate) fn new(
        key: K,
        subject: StrandSubject<M>,
        primary: SubjectBoxStream<M>,
        interest: InterestCount,
    ) -> Self {
        Self {
            key,
            subject,
            primary: Mutex::new(Some(primary)),
            interest,
        }
    }

    /// The group's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Consumes the handle, returning its key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Subscribes to the group's elements.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::Closed` if the group already terminated and its
    /// buffered subscription was already taken.
    pub fn subscribe(&self) -> Result<GroupSubscription<M>, SubjectError> {
        let primary = self.primary.lock().take();

        let inner = match primary {
            Some(stream) => stream,
            None => self.subject.subscribe()?,
        };

        Ok(GroupSubscription {
            inner,
            interest: self.interest.acquire(),
        })
    }

    /// Returns `true` once the group has received its terminal signal.
    pub fn is_terminated(&self) -> bool {
        self.subject.is_closed()
    }
}

impl<K, M> Grouped for GroupedStream<K, M>
where
    M: Clone + Send + 'static,
{
    type Key = K;
    type Item = M;

    fn key(&self) -> &K {
        GroupedStream::key(self)
    }

    fn subscribe(&self) -> Result<GroupSubscription<M>, SubjectError> {
        GroupedStream::subscribe(self)
    }
}

impl<K: Debug, M: Clone + Send + 'static> Debug for GroupedStream<K, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedStream")
            .field("key", &self.key)
            .field("terminated", &self.subject.is_closed())
            .finish()
    }
}

/// A subscription to one group's elements.
///
/// Holds one unit of interest in the upstream source, released when the
/// subscription ends (completion or error) or is dropped.
pub struct GroupSubscription<M> {
    inner: SubjectBoxStream<M>,
    interest: InterestGuard,
}

impl<M> Stream for GroupSubscription<M> {
    type Item = StreamItem<M>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let polled = self.inner.as_mut().poll_next(cx);
        if matches!(polled, Poll::Ready(None | Some(StreamItem::Error(_)))) {
            self.interest.release();
        }
        polled
    }
}

impl<M> Debug for GroupSubscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSubscription")
            .field("inner", &"<stream>")
            .field("interest", &self.interest)
            .finish()
    }
}
