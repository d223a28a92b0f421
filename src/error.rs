//! # Error Types
//!
//! This module defines error types used throughout the recibo library.
//!
//! Errors fall into four groups:
//!
//! | Group | Variants | Raised by |
//! |-------|----------|-----------|
//! | Argument / range | `InvalidCommand`, `Bitmap`, `Encoding` | command codec |
//! | Structural | `Template`, `Structure` | template context, compiler |
//! | Validation | `Validation`, `Xml` | markup reader, schema |
//! | Boundary | `Transport`, `Unsupported`, `Io` | transports, file access |

use thiserror::Error;

use crate::protocol::bmp::BitmapError;

/// Main error type for recibo operations
#[derive(Debug, Error)]
pub enum ReciboError {
    /// Out-of-range or malformed command parameter
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Source bitmap rejected by the transcoder
    #[error("Bitmap error: {0}")]
    Bitmap(#[from] BitmapError),

    /// Unknown or unsupported text encoding name
    #[error("Unsupported encoding: {0}")]
    Encoding(String),

    /// Template context misuse (missing context, unbalanced scopes)
    #[error("Template error: {0}")]
    Template(String),

    /// Structural failure discovered while walking a document
    #[error("Structure error: {0}")]
    Structure(String),

    /// Every schema violation found in a document
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Malformed markup
    #[error("XML error: {0}")]
    Xml(String),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Operation the transport cannot perform
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ReciboError>;

impl ReciboError {
    /// Shorthand for a parameter that falls outside its accepted range.
    pub(crate) fn out_of_range(name: &str, value: impl std::fmt::Display, range: &str) -> Self {
        ReciboError::InvalidCommand(format!("{} = {} is outside {}", name, value, range))
    }
}
