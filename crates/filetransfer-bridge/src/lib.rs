// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FileTransfer: native platform bridge abstractions.
//
// Defines the narrow surface the host runtime sees (`NativeModule`) and the
// platform content index the upload path consumes (`ContentResolver`), plus
// per-OS dispatch for the latter.

pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

pub use traits::{ContentResolver, Handback, MODULE_NAME, NativeModule};

/// Returns the content resolver for the target operating system.
///
/// Android resolves `content://` references through the JNI
/// `ContentResolver`; everywhere else there is no media index, so the stub
/// reports `PlatformUnavailable`.
pub fn platform_resolver() -> Box<dyn ContentResolver> {
    #[cfg(target_os = "android")]
    {
        Box::new(android::AndroidContentResolver::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        Box::new(stub::StubContentResolver)
    }
}
