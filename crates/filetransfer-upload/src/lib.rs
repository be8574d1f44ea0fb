// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FileTransfer Upload: multipart form assembly, the blocking HTTP transport,
// and the `FileTransfer` native module that ties them to the host's
// `(error, result)` completion callback.

pub mod module;
pub mod multipart;
pub mod transport;

pub use module::FileTransferModule;
pub use multipart::{FilePart, MultipartBody, Part, build_body};
pub use transport::{HttpTransport, ReqwestTransport};
