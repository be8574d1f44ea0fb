// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for FileTransfer.

use thiserror::Error;

use crate::types::HttpResponse;

/// Top-level error type for all FileTransfer operations.
///
/// The first three variants are the ones a caller sees through the
/// completion handback. The rest are internal and get folded into
/// [`UploadError::Unhandled`] by [`UploadError::into_reported`].
#[derive(Debug, Error)]
pub enum UploadError {
    // -- Reported through the handback --
    #[error("FILE NOT FOUND")]
    FileNotFound,

    #[error("unexpected response: {0}")]
    Http(HttpResponse),

    #[error("upload failed: {0}")]
    Unhandled(String),

    #[error("invalid upload options: {0}")]
    InvalidOptions(String),

    // -- HTTP client --
    #[error("HTTP transport error: {0}")]
    Transport(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Local I/O / parsing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl UploadError {
    /// Collapse internal failures into the shape the host runtime receives.
    ///
    /// `FileNotFound`, `Http` and `InvalidOptions` pass through untouched;
    /// everything else becomes `Unhandled` carrying the rendered message.
    pub fn into_reported(self) -> Self {
        match self {
            e @ (UploadError::FileNotFound
            | UploadError::Http(_)
            | UploadError::Unhandled(_)
            | UploadError::InvalidOptions(_)) => e,
            other => UploadError::Unhandled(other.to_string()),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, UploadError>;
