// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for Strand stream grouping
//!
//! This module provides the error handling system shared by every Strand crate.
//! It defines a root [`StrandError`] type with specific variants for the failure
//! modes a grouping pipeline can observe: upstream failures, selector failures
//! and wrapped user errors.
//!
//! Errors are fanned out to every group of a pipeline, so [`StrandError`]
//! implements `Clone` (boxed user errors are flattened into their message).
//!
//! # Examples
//!
//! ```
//! use strand_core::{StrandError, Result};
//!
//! fn process_data() -> Result<()> {
//!     // Operation that might fail
//!     Err(StrandError::stream_error("Stream not ready"))
//! }
//! ```

use crate::SubjectError;

/// Root error type for all Strand operations
#[derive(Debug, thiserror::Error)]
pub enum StrandError {
    /// Stream processing encountered an error
    ///
    /// This is the general error for upstream failures that don't fit
    /// other specific categories.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// A key or element selector failed while processing an item
    #[error("{selector} selector failed: {context}")]
    SelectorError {
        /// Which selector failed (`"key"` or `"element"`)
        selector: &'static str,
        /// Message of the underlying failure
        context: String,
    },

    /// Custom error from user code
    ///
    /// This wraps errors produced by user-provided functions and callbacks,
    /// allowing them to be propagated through the Strand error system.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StrandError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a key selector error from any displayable failure
    pub fn key_selector_error(failure: impl std::fmt::Display) -> Self {
        Self::SelectorError {
            selector: "key",
            context: failure.to_string(),
        }
    }

    /// Create an element selector error from any displayable failure
    pub fn element_selector_error(failure: impl std::fmt::Display) -> Self {
        Self::SelectorError {
            selector: "element",
            context: failure.to_string(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Returns `true` if this error was raised by a key or element selector.
    #[must_use]
    pub const fn is_selector_error(&self) -> bool {
        matches!(self, Self::SelectorError { .. })
    }

    /// Check if this is a recoverable error
    ///
    /// Grouping never retries: every error terminates the pipeline.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

impl From<SubjectError> for StrandError {
    fn from(error: SubjectError) -> Self {
        Self::stream_error(error.to_string())
    }
}

/// Specialized Result type for Strand operations
///
/// # Examples
///
/// ```
/// use strand_core::Result;
///
/// fn process() -> Result<String> {
///     Ok("processed".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StrandError>;

/// Extension trait for converting errors into `StrandError`
///
/// Automatically implemented for all types that implement
/// `std::error::Error + Send + Sync + 'static`.
pub trait IntoStrandError {
    /// Convert this error into a `StrandError` with additional context
    fn into_strand_error(self, context: &str) -> StrandError;

    /// Convert this error into a `StrandError` without additional context
    fn into_strand(self) -> StrandError
    where
        Self: Sized,
    {
        self.into_strand_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoStrandError for E {
    fn into_strand_error(self, context: &str) -> StrandError {
        if context.is_empty() {
            StrandError::user_error(self)
        } else {
            StrandError::StreamProcessingError {
                context: format!("{context}: {self}"),
            }
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(StrandError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(StrandError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StrandError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            StrandError::UserError(inner) => StrandError::StreamProcessingError {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}

impl Clone for StrandError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::SelectorError { selector, context } => Self::SelectorError {
                selector: *selector,
                context: context.clone(),
            },
            // Boxed errors can't be cloned, keep their message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
        }
    }
}

impl PartialEq for StrandError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
