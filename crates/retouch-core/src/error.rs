// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Retouch.

use thiserror::Error;

/// Top-level error type for all Retouch operations.
///
/// Every transform either succeeds with one buffer or fails with exactly one
/// of these reasons.
#[derive(Debug, Error)]
pub enum RetouchError {
    // -- Request errors --
    #[error("{0} is required")]
    MissingParameter(String),

    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    // -- Session errors --
    #[error("image expired or not found")]
    HandleNotFound,

    // -- Pixel errors --
    #[error("invalid image encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid pixel data: {0}")]
    InvalidPixelData(String),

    #[error("{operation} requires {expected}-channel input, got {actual}")]
    UnsupportedChannelCount {
        operation: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("image encoding failed: {0}")]
    EncodeFailed(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RetouchError {
    /// Shorthand for [`RetouchError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RetouchError>;
