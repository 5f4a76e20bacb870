// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The push-based `chunk_by` state machine.

use super::grouped_stream::GroupedStream;
use super::key_equivalence::KeyEquivalence;
use crate::logging::{debug, trace, warn};
use core::fmt::{self, Debug};
use core::marker::PhantomData;
use strand_core::{InterestCount, Observer, Result, StrandError, StrandSubject};

struct OpenGroup<K, M: Clone + Send + 'static> {
    key: K,
    subject: StrandSubject<M>,
}

/// Splits a push-based sequence into contiguous runs of equivalent keys.
///
/// Every time the key of an incoming value stops being equivalent to the key of
/// the open run, a new [`GroupedStream`] is emitted to `downstream` and becomes
/// the open run. The previous run is not closed at that point: every group ends
/// together with the source, on completion or on the first error.
///
/// `ChunkByOperator` is what [`ChunkByExt`](crate::chunk_by::ChunkByExt) drives
/// from a spawned task; it can also be fed directly from any push-based source.
///
/// ```
/// use futures::channel::mpsc;
/// use strand_core::{InterestCount, Lifetime, Observer, StreamItem};
/// use strand_stream::chunk_by::{ChunkByOperator, GroupedStream, NaturalOrder};
///
/// let (tx, mut rx) = mpsc::unbounded::<StreamItem<GroupedStream<i32, i32>>>();
/// let interest = InterestCount::new(Lifetime::new());
/// let mut operator = ChunkByOperator::new(
///     |v: &i32| Ok(v / 10),
///     |v: i32| Ok(v),
///     NaturalOrder,
///     tx,
///     interest,
/// );
///
/// operator.on_next(11);
/// operator.on_next(12);
/// operator.on_next(21);
/// operator.on_completed();
///
/// let keys: Vec<i32> = std::iter::from_fn(|| rx.try_next().ok().flatten())
///     .map(|item| match item {
///         StreamItem::Value(group) => *group.key(),
///         StreamItem::Error(e) => panic!("{e}"),
///     })
///     .collect();
/// assert_eq!(keys, vec![1, 2]);
/// ```
pub struct ChunkByOperator<T, K, M, KS, MS, EQ, O>
where
    M: Clone + Send + 'static,
{
    key_selector: KS,
    element_selector: MS,
    equivalence: EQ,
    downstream: O,
    interest: InterestCount,
    open: Option<OpenGroup<K, M>>,
    groups: Vec<StrandSubject<M>>,
    stopped: bool,
    _source: PhantomData<fn(T)>,
}

impl<T, K, M, KS, MS, EQ, O> ChunkByOperator<T, K, M, KS, MS, EQ, O>
where
    K: Clone + Send + 'static,
    M: Clone + Send + 'static,
    O: Observer<GroupedStream<K, M>>,
{
    /// Creates an operator emitting its groups to `downstream`.
    ///
    /// `interest` is handed to every emitted group so that subscribing to a group
    /// keeps the source alive.
    pub fn new(
        key_selector: KS,
        element_selector: MS,
        equivalence: EQ,
        downstream: O,
        interest: InterestCount,
    ) -> Self
    where
        KS: FnMut(&T) -> Result<K>,
        MS: FnMut(T) -> Result<M>,
        EQ: KeyEquivalence<K>,
    {
        Self {
            key_selector,
            element_selector,
            equivalence,
            downstream,
            interest,
            open: None,
            groups: Vec::new(),
            stopped: false,
            _source: PhantomData,
        }
    }

    /// Returns `true` once a terminal signal was delivered or the operator was shut down.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Number of groups that can still be observed.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Ends every group and the downstream without an error.
    ///
    /// Used when the source goes away without a terminal signal, e.g. after
    /// cancellation. Does nothing if the operator already stopped.
    pub fn shutdown(&mut self) {
        if self.stopped {
            return;
        }
        debug!("chunk_by: shutting down {} group(s)", self.groups.len());
        self.finish(|group| group.close(), |downstream| downstream.on_completed());
    }

    fn open_group(&mut self, key: K) {
        let subject = StrandSubject::<M>::new();

        // Subscribe before emitting so the first subscriber sees every element
        let primary = subject
            .subscribe()
            .unwrap_or_else(|_| unreachable!("fresh subject should allow subscription"));

        // Groups nobody can observe anymore are closed and forgotten
        self.groups.retain(|group| {
            if group.has_live_subscribers() {
                true
            } else {
                group.close();
                false
            }
        });
        self.groups.push(subject.clone());

        trace!("chunk_by: opening group #{}", self.groups.len());
        self.open = Some(OpenGroup {
            key: key.clone(),
            subject: subject.clone(),
        });

        self.downstream.on_next(GroupedStream::new(
            key,
            subject,
            primary,
            self.interest.clone(),
        ));
    }

    fn fail(&mut self, error: StrandError) {
        let for_groups = error.clone();
        self.finish(
            move |group| {
                let _ = group.error(for_groups.clone());
            },
            move |downstream| downstream.on_error(error),
        );
    }

    fn finish<G, D>(&mut self, mut on_group: G, on_downstream: D)
    where
        G: FnMut(&StrandSubject<M>),
        D: FnOnce(&mut O),
    {
        self.stopped = true;
        self.open = None;
        for group in self.groups.drain(..) {
            on_group(&group);
        }
        on_downstream(&mut self.downstream);
    }
}

// Errors raised by user selectors are tagged with the selector that failed
fn as_selector_error(
    error: StrandError,
    wrap: impl FnOnce(StrandError) -> StrandError,
) -> StrandError {
    if error.is_selector_error() {
        error
    } else {
        wrap(error)
    }
}

impl<T, K, M, KS, MS, EQ, O> Observer<T> for ChunkByOperator<T, K, M, KS, MS, EQ, O>
where
    K: Clone + Send + 'static,
    M: Clone + Send + 'static,
    KS: FnMut(&T) -> Result<K>,
    MS: FnMut(T) -> Result<M>,
    EQ: KeyEquivalence<K>,
    O: Observer<GroupedStream<K, M>>,
{
    fn on_next(&mut self, value: T) {
        if self.stopped {
            return;
        }

        let key = match (self.key_selector)(&value) {
            Ok(key) => key,
            Err(error) => {
                warn!("chunk_by: key selector failed: {}", error);
                self.fail(as_selector_error(error, StrandError::key_selector_error));
                return;
            }
        };

        let continues_run = self
            .open
            .as_ref()
            .is_some_and(|open| self.equivalence.equivalent(&open.key, &key));

        if !continues_run {
            if !self.downstream.is_subscribed() {
                trace!("chunk_by: downstream released, dropping element");
                return;
            }
            self.open_group(key);
        }

        let element = match (self.element_selector)(value) {
            Ok(element) => element,
            Err(error) => {
                warn!("chunk_by: element selector failed: {}", error);
                self.fail(as_selector_error(error, StrandError::element_selector_error));
                return;
            }
        };

        if let Some(open) = &self.open {
            let _ = open.subject.next(element);
        }
    }

    fn on_error(&mut self, error: StrandError) {
        if self.stopped {
            return;
        }
        debug!("chunk_by: source failed: {}", error);
        self.fail(error);
    }

    fn on_completed(&mut self) {
        if self.stopped {
            return;
        }
        debug!("chunk_by: source completed, closing {} group(s)", self.groups.len());
        self.finish(|group| group.close(), |downstream| downstream.on_completed());
    }

    fn is_subscribed(&self) -> bool {
        !self.stopped
    }
}

impl<T, K: Debug, M, KS, MS, EQ, O> Debug for ChunkByOperator<T, K, M, KS, MS, EQ, O>
where
    M: Clone + Send + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkByOperator")
            .field("open_key", &self.open.as_ref().map(|open| &open.key))
            .field("groups", &self.groups.len())
            .field("stopped", &self.stopped)
            .finish()
    }
}
