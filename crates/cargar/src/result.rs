//! Result and error types for Cargar.

use thiserror::Error;

/// Result type for Cargar operations
pub type CargarResult<T> = Result<T, CargarError>;

/// Errors that can occur in Cargar
#[derive(Debug, Error)]
pub enum CargarError {
    /// No element matched a selector at the instant it was resolved.
    ///
    /// Recoverable: wait loops, `exists()` and readiness text checks catch
    /// this internally and keep polling or report a `false` verdict.
    #[error("No element found for {selector}")]
    ElementNotFound {
        /// Rendered selector that matched nothing
        selector: String,
    },

    /// A wait operation reached its deadline without success
    #[error("Timed out after {ms}ms waiting for an element to satisfy the condition")]
    WaitTimeout {
        /// Timeout in milliseconds
        ms: u64,
        /// The last `ElementNotFound` observed while polling, if any
        #[source]
        cause: Option<Box<CargarError>>,
    },

    /// Unexpected driver-level failure (malformed locator, transport error).
    ///
    /// Never swallowed by polling or readiness evaluation.
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// A page's metadata is incomplete (e.g. no host declared anywhere)
    #[error("Page metadata error: {message}")]
    PageMetadata {
        /// Error message
        message: String,
    },
}

impl CargarError {
    /// Create a driver-level error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// True for the recoverable "zero elements matched" condition
    #[must_use]
    pub const fn is_element_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}
