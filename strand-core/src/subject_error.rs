// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Lifecycle errors of a [`StrandSubject`](crate::StrandSubject).
///
/// Distinct from stream processing errors; converts into
/// [`StrandError`](crate::StrandError) when it has to travel through a stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubjectError {
    /// The subject already delivered its terminal signal.
    #[error("Subject is closed")]
    Closed,
}
