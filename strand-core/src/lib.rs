// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Core types shared by the Strand crates.
//!
//! - [`StreamItem`] and [`StrandError`]: the item and error model of every stream.
//! - [`StrandSubject`]: hot multicast channel, one per emitted group.
//! - [`Observer`]: push-based sink the operators are written against.
//! - [`Lifetime`], [`InterestCount`], [`InterestGuard`]: reference-counted teardown
//!   of an upstream subscription.
//! - [`CancellationToken`], [`StrandTask`]: runtime-agnostic background tasks.

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod cancellation_token;
pub mod error;
pub mod lifetime;
pub mod observer;
pub mod strand_mutex;
pub mod strand_subject;
pub mod strand_task;
pub mod stream_item;
pub mod subject_error;

pub use self::cancellation_token::CancellationToken;
pub use self::error::{IntoStrandError, Result, ResultExt, StrandError};
pub use self::lifetime::{InterestCount, InterestGuard, Lifetime};
pub use self::observer::Observer;
pub use self::strand_subject::{StrandSubject, SubjectBoxStream};
pub use self::strand_task::StrandTask;
pub use self::stream_item::StreamItem;
pub use self::subject_error::SubjectError;
