// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for desktop/CI builds where no media content index exists.
//
// Resolution always fails with `PlatformUnavailable`; plain filesystem paths
// never reach the resolver, so uploads of local files still work.

use filetransfer_core::error::{Result, UploadError};

use crate::traits::ContentResolver;

/// No-op resolver returned on non-Android platforms.
pub struct StubContentResolver;

impl ContentResolver for StubContentResolver {
    fn resolve_media_path(&self, uri: &str) -> Result<String> {
        tracing::warn!(uri, "ContentResolver::resolve_media_path called on stub bridge");
        Err(UploadError::PlatformUnavailable)
    }
}
