//! Core types for provgen
//!
//! This module holds the error taxonomy shared by every stage of the
//! generator and the user-facing error reporting used by the CLI.
//!
//! - [`ProvgenError`] - enumerated failures (structural, template, conversion, input)
//! - [`ErrorContext`] - error plus details and suggestion, printed with colors
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for display

pub mod error;

pub use error::{ErrorContext, ProvgenError, user_friendly_error};

/// Result alias for library operations that fail with [`ProvgenError`].
pub type Result<T, E = ProvgenError> = std::result::Result<T, E>;
