// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP transport for multipart uploads.
//
// The production transport is a shared `reqwest::blocking::Client`; one POST
// per call, no retries, client-default timeouts. The trait exists so the
// upload path can be exercised without a network.

use reqwest::blocking::{Client, multipart};
use reqwest::header::ACCEPT;
use tracing::debug;

use filetransfer_core::error::{Result, UploadError};
use filetransfer_core::{HttpResponse, UploadConfig};

use crate::multipart::{MultipartBody, Part};

/// Sends a finished multipart body somewhere and returns what came back.
///
/// Implementations must be safe to call from several threads at once.
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` with the given `Accept` header, blocking until
    /// the whole response body has been read.
    ///
    /// Non-2xx statuses are *not* errors here; only failures to complete
    /// the exchange are.
    fn post_multipart(&self, url: &str, accept: &str, body: MultipartBody)
    -> Result<HttpResponse>;
}

/// Blocking reqwest transport.
///
/// Must not be called from inside a Tokio runtime.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| UploadError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_multipart(
        &self,
        url: &str,
        accept: &str,
        body: MultipartBody,
    ) -> Result<HttpResponse> {
        let form = into_form(body)?;

        let response = self
            .client
            .post(url)
            .header(ACCEPT, accept)
            .multipart(form)
            .send()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(target: "filetransfer", url, status = status.as_u16(), "upload response received");

        let reason = status.canonical_reason().map(str::to_owned);
        let body = response
            .text()
            .map_err(|e| UploadError::Transport(format!("reading response body: {e}")))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}

/// Convert the ordered part list into a reqwest form.
///
/// Names and filenames go out verbatim as `name="…"`/`filename="…"` (no
/// RFC 5987 `name*=`), with only `"`, CR and LF escaped.
fn into_form(body: MultipartBody) -> Result<multipart::Form> {
    body.into_parts()
        .into_iter()
        .try_fold(multipart::Form::new().percent_encode_noop(), |form, part| match part {
            Part::Text { name, value } => Ok(form.text(escape_quoted(&name), value)),
            Part::File(file) => {
                let part =
                    multipart::Part::bytes(file.bytes).file_name(escape_quoted(&file.filename));
                let part = match file.mime_type {
                    Some(mime) => part.mime_str(&mime).map_err(|e| {
                        UploadError::Transport(format!("invalid MIME type {mime:?}: {e}"))
                    })?,
                    None => part,
                };
                Ok(form.part(escape_quoted(&file.field_name), part))
            }
        })
}

/// Escape the characters that would break out of a quoted
/// `Content-Disposition` parameter.
fn escape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            other => out.push(other),
        }
    }
    out
}
