// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Key comparison used to decide whether an item continues the open run.
//!
//! Only the key of the currently open group is compared against the key of the
//! incoming item, never older keys.

/// Decides whether two keys belong to the same run.
pub trait KeyEquivalence<K> {
    /// Returns `true` if `candidate` continues the run keyed by `current`.
    fn equivalent(&self, current: &K, candidate: &K) -> bool;
}

/// Derives equivalence from a strict weak order: two keys are equivalent when
/// neither is ordered before the other.
///
/// ```
/// use strand_stream::chunk_by::equivalent_under;
///
/// let less = |a: &i32, b: &i32| a / 10 < b / 10;
/// assert!(equivalent_under(&less, &11, &19));
/// assert!(!equivalent_under(&less, &11, &21));
/// ```
pub fn equivalent_under<K, F>(less: &F, a: &K, b: &K) -> bool
where
    F: Fn(&K, &K) -> bool + ?Sized,
{
    !less(a, b) && !less(b, a)
}

/// The default: the key type's own `PartialOrd`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<K: PartialOrd> KeyEquivalence<K> for NaturalOrder {
    fn equivalent(&self, current: &K, candidate: &K) -> bool {
        equivalent_under(&|a: &K, b: &K| a < b, current, candidate)
    }
}

/// Equivalence derived from a caller-supplied "less than" predicate.
#[derive(Debug, Clone, Copy)]
pub struct OrderedBy<F>(pub F);

impl<K, F> KeyEquivalence<K> for OrderedBy<F>
where
    F: Fn(&K, &K) -> bool,
{
    fn equivalent(&self, current: &K, candidate: &K) -> bool {
        equivalent_under(&self.0, current, candidate)
    }
}

/// Equivalence given directly by a caller-supplied equality predicate.
#[derive(Debug, Clone, Copy)]
pub struct EquivalentBy<F>(pub F);

impl<K, F> KeyEquivalence<K> for EquivalentBy<F>
where
    F: Fn(&K, &K) -> bool,
{
    fn equivalent(&self, current: &K, candidate: &K) -> bool {
        (self.0)(current, candidate)
    }
}
