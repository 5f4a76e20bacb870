// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime-agnostic task spawning with cooperative cancellation.

use crate::CancellationToken;
use std::future::Future;

/// Runtime-agnostic task handle with automatic cancellation on drop.
///
/// `StrandTask` spawns a background task on the configured runtime and hands it a
/// [`CancellationToken`]. Dropping the handle, or calling [`cancel`](Self::cancel),
/// signals the token; the task is expected to observe it and exit.
///
/// # Runtime Support
///
/// - **Tokio**: `tokio::spawn` (default, `runtime-tokio`)
/// - **smol**: `smol::spawn(..).detach()` (`runtime-smol`)
///
/// # Example
///
/// ```rust
/// use strand_core::StrandTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = StrandTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
///
/// // Task is cancelled on drop
/// drop(task);
/// # }
/// ```
#[derive(Debug)]
pub struct StrandTask {
    cancel: CancellationToken,
}

impl StrandTask {
    /// Spawn a background task with cancellation support.
    ///
    /// `f` receives the token that is triggered when the handle is dropped or
    /// cancelled, and returns the future to run.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let future = f(cancel.clone());

        #[cfg(feature = "runtime-tokio")]
        tokio::spawn(future);

        #[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
        smol::spawn(future).detach();

        #[cfg(not(any(feature = "runtime-tokio", feature = "runtime-smol")))]
        compile_error!("StrandTask requires the `runtime-tokio` or `runtime-smol` feature");

        Self { cancel }
    }

    /// Signals the task to stop. Does not wait for it to finish.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A clone of the token observed by the task.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for StrandTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
