//! Error types for validation failures.
//!
//! This module provides the path-aware [`ValidationError`] produced when a
//! value does not conform to its declared type, and the [`ErrorKind`]
//! taxonomy consumers match on.

mod validation_error;

pub use validation_error::{ErrorKind, ValidationError};
