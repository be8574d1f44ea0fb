// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the bridge boundary.

use filetransfer_core::error::{Result, UploadError};
use serde_json::Value;

/// Identity the module registers under. Must match the iOS module.
pub const MODULE_NAME: &str = "FileTransfer";

/// Completion callback handed in by the host: `(error, result)`.
///
/// Exactly one of the two arguments is `Some`. Being `FnOnce`, it cannot be
/// invoked twice.
pub type Handback = Box<dyn FnOnce(Option<UploadError>, Option<String>) + Send>;

/// What the host runtime's module registry sees.
pub trait NativeModule: Send + Sync {
    /// Registry identity string.
    fn name(&self) -> &str;

    /// Run one upload described by `options` and report through `complete`.
    ///
    /// Blocks the calling thread until the handback has been invoked.
    fn upload(&self, options: &Value, complete: Handback);
}

/// Maps an opaque `content://` media reference to a real filesystem path.
pub trait ContentResolver: Send + Sync {
    fn resolve_media_path(&self, uri: &str) -> Result<String>;
}

impl<F> ContentResolver for F
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn resolve_media_path(&self, uri: &str) -> Result<String> {
        self(uri)
    }
}
