// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `FileTransfer` native module.
//
// One call: parse options → build the multipart body → POST → hand the
// outcome back. Every step returns a `Result`; `upload` is the single place
// that turns it into a handback call, so the host gets exactly one answer
// per call whatever fails.

use serde_json::Value;
use tracing::{info, warn};

use filetransfer_bridge::{ContentResolver, Handback, MODULE_NAME, NativeModule};
use filetransfer_core::error::{Result, UploadError};
use filetransfer_core::{UploadConfig, UploadRequest};

use crate::multipart::build_body;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Multipart upload bridge module.
pub struct FileTransferModule {
    config: UploadConfig,
    resolver: Box<dyn ContentResolver>,
    transport: Box<dyn HttpTransport>,
}

impl FileTransferModule {
    /// Module wired to the platform content index and a reqwest client.
    pub fn new(config: UploadConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_parts(
            config,
            filetransfer_bridge::platform_resolver(),
            Box::new(transport),
        ))
    }

    /// Module with caller-supplied collaborators.
    pub fn with_parts(
        config: UploadConfig,
        resolver: Box<dyn ContentResolver>,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        Self {
            config,
            resolver,
            transport,
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Run an upload from the host's raw options map.
    pub fn upload_options(&self, options: &Value) -> Result<String> {
        let request = UploadRequest::from_options(options)?;
        self.upload_request(&request)
    }

    /// Run an already parsed upload and return the response body on 2xx.
    pub fn upload_request(&self, request: &UploadRequest) -> Result<String> {
        info!(
            target: "filetransfer",
            url = %request.url,
            files = request.files.len(),
            "starting upload"
        );

        let body = build_body(request, self.resolver.as_ref(), &self.config.default_mime_type)?;
        let response = self
            .transport
            .post_multipart(&request.url, &self.config.accept, body)?;

        if !response.is_success() {
            return Err(UploadError::Http(response));
        }

        info!(
            target: "filetransfer",
            url = %request.url,
            bytes = response.body.len(),
            "upload complete"
        );
        Ok(response.body)
    }
}

impl NativeModule for FileTransferModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn upload(&self, options: &Value, complete: Handback) {
        match self.upload_options(options) {
            Ok(body) => complete(None, Some(body)),
            Err(e) => {
                let reported = e.into_reported();
                match &reported {
                    UploadError::Http(response) => {
                        warn!(target: "filetransfer", %response, "Unexpected code")
                    }
                    other => warn!(target: "filetransfer", error = %other, "upload failed"),
                }
                complete(Some(reported), None);
            }
        }
    }
}
