//! Error types for simdvec operations.
//!
//! The vector types themselves are infallible value types; these errors are
//! reported by the surfaces built around them (aligned buffers, checked
//! gathers and slice kernels).

use std::fmt;

/// Errors that can occur during simdvec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimdVecError {
    /// Memory allocation failed.
    AllocationError {
        /// The size that was requested to be allocated.
        requested_size: usize,
        /// The alignment that was requested.
        requested_alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Invalid layout parameters were provided.
    LayoutError {
        /// The size parameter that caused the error.
        size: usize,
        /// The alignment parameter that caused the error.
        alignment: usize,
        /// Human-readable error message.
        message: String,
    },
    /// Input validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
    /// A gather offset fell outside the base slice.
    IndexOutOfBounds {
        /// Element offset (`index * scale`) that was requested.
        index: i64,
        /// Length of the slice being indexed.
        len: usize,
    },
}

impl fmt::Display for SimdVecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdVecError::AllocationError {
                requested_size,
                requested_alignment,
                message,
            } => write!(
                f,
                "aligned buffer allocation failed: {message} \
                 ({requested_size} bytes at {requested_alignment}-byte alignment)"
            ),
            SimdVecError::LayoutError {
                size,
                alignment,
                message,
            } => write!(
                f,
                "invalid buffer layout: {message} ({size} bytes at {alignment}-byte alignment)"
            ),
            SimdVecError::ValidationError { message } => f.write_str(message),
            SimdVecError::IndexOutOfBounds { index, len } => {
                write!(f, "gather offset {index} out of bounds for length {len}")
            }
        }
    }
}

impl std::error::Error for SimdVecError {}

/// Result type alias for simdvec operations.
pub type Result<T> = std::result::Result<T, SimdVecError>;

/// Creates an allocation error.
pub fn allocation_error(size: usize, alignment: usize, message: impl Into<String>) -> SimdVecError {
    SimdVecError::AllocationError {
        requested_size: size,
        requested_alignment: alignment,
        message: message.into(),
    }
}

/// Creates a layout error.
pub fn layout_error(size: usize, alignment: usize, message: impl Into<String>) -> SimdVecError {
    SimdVecError::LayoutError {
        size,
        alignment,
        message: message.into(),
    }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> SimdVecError {
    SimdVecError::ValidationError {
        message: message.into(),
    }
}

/// Creates an out-of-bounds gather error.
pub fn index_out_of_bounds(index: i64, len: usize) -> SimdVecError {
    SimdVecError::IndexOutOfBounds { index, len }
}
