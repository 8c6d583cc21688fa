//! Error types for netlink encoding and decoding.

use std::io;

use winnow::error::{ContextError, ErrMode};

/// Result type for netlink codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding or encoding netlink messages.
///
/// Decoders report truncation and malformation separately, but a caller that
/// only checks `is_err()` sees the plain "no result" outcome.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not enough bytes remain for a declared-size read.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes the read needed.
        expected: usize,
        /// Bytes that were available.
        actual: usize,
    },

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format or content.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// A required attribute was not present.
    #[error("missing required attribute {0}")]
    MissingAttribute(&'static str),

    /// Kernel returned an error code in an NLMSG_ERROR message.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Parse error from the underlying parser combinators.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a kernel error from the (negative) errno carried by NLMSG_ERROR.
    pub fn from_errno(errno: i32) -> Self {
        let errno = errno.saturating_abs();
        let message = io::Error::from_raw_os_error(errno).to_string();
        Self::Kernel { errno, message }
    }

    /// Shorthand for a truncation error.
    pub(crate) fn truncated(expected: usize, actual: usize) -> Self {
        Self::Truncated { expected, actual }
    }

    /// Check if this error means the input ran out of bytes.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Check if this error means the input was present but malformed.
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            Self::InvalidMessage(_)
                | Self::InvalidAttribute(_)
                | Self::MissingAttribute(_)
                | Self::Parse(_)
        )
    }

    /// Check if this is a "not found" kernel error (ENOENT, ENODEV).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Kernel { errno, .. } if matches!(*errno, 2 | 19))
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Kernel { errno, .. } if matches!(*errno, 1 | 13))
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}

impl From<ErrMode<ContextError>> for Error {
    fn from(err: ErrMode<ContextError>) -> Self {
        Self::Parse(format!("{err:?}"))
    }
}
