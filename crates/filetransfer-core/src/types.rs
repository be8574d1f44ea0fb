// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Domain types for an upload call: the request parsed out of the host's
// options map, its file entries, and the HTTP response handed back.

use serde_json::{Map, Value};

use crate::error::{Result, UploadError};

/// Scheme marker for paths that must go through the platform content index.
pub const CONTENT_SCHEME: &str = "content://";

/// Number of leading bytes compared against [`CONTENT_SCHEME`].
pub const CONTENT_PREFIX_LEN: usize = 10;

/// Whether `filepath` is a content reference.
///
/// Compares exactly the first [`CONTENT_PREFIX_LEN`] bytes. Strings shorter
/// than that are never content references.
pub fn is_content_reference(filepath: &str) -> bool {
    filepath.as_bytes().get(..CONTENT_PREFIX_LEN) == Some(CONTENT_SCHEME.as_bytes())
}

/// One upload call, as received from the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Target URL. Not validated beyond being a string.
    pub url: String,
    /// Extra form fields in caller order. Values keep their raw JSON type;
    /// only strings make it onto the wire.
    pub fields: Option<Map<String, Value>>,
    /// Files to attach, in order.
    pub files: Vec<FileEntry>,
}

impl UploadRequest {
    /// Parse the host's options map:
    /// `{ url, files: [{filepath, filename, filetype?, name?}], params? }`.
    pub fn from_options(options: &Value) -> Result<Self> {
        let obj = options
            .as_object()
            .ok_or_else(|| invalid("options must be an object"))?;

        let url = obj
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| invalid("`url` must be a non-empty string"))?
            .to_owned();

        let files = obj
            .get("files")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("`files` must be an array"))?
            .iter()
            .enumerate()
            .map(|(index, entry)| FileEntry::from_value(index, entry))
            .collect::<Result<Vec<_>>>()?;

        let fields = match obj.get("params") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => return Err(invalid("`params` must be an object")),
        };

        Ok(Self { url, fields, files })
    }

    /// String-valued fields in caller order. Non-string values are skipped.
    pub fn text_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|map| map.iter())
            .filter_map(|(key, value)| value.as_str().map(|v| (key.as_str(), v)))
    }
}

/// A single file to attach to the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Filesystem path, `file://` URI or `content://` reference.
    pub filepath: String,
    /// Filename sent in the part's `Content-Disposition`.
    pub filename: String,
    /// Form field name (`name` on the wire). Defaults to `filename`.
    pub field_name: Option<String>,
    /// MIME type (`filetype` on the wire). Defaults to the configured type.
    pub mime_type: Option<String>,
}

impl FileEntry {
    fn from_value(index: usize, value: &Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid(format!("files[{index}] must be an object")))?;
        let required = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| invalid(format!("files[{index}].{key} must be a string")))
        };
        let optional = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_owned);

        Ok(Self {
            filepath: required("filepath")?,
            filename: required("filename")?,
            field_name: optional("name"),
            mime_type: optional("filetype"),
        })
    }

    /// Field name for the multipart part.
    pub fn form_field_name(&self) -> &str {
        self.field_name.as_deref().unwrap_or(&self.filename)
    }

    /// MIME type for the multipart part, falling back to `default`.
    pub fn content_type<'a>(&'a self, default: &'a str) -> &'a str {
        self.mime_type.as_deref().unwrap_or(default)
    }

    /// Whether `filepath` must go through the platform content index.
    pub fn is_content_reference(&self) -> bool {
        is_content_reference(&self.filepath)
    }
}

/// The parts of an HTTP response the caller gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase for `status` (e.g. "Not Found"), not the
    /// phrase the server put on its status line.
    pub reason: Option<String>,
    pub body: String,
}

impl HttpResponse {
    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl std::fmt::Display for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Response{{code={}, message={}}}",
            self.status,
            self.reason.as_deref().unwrap_or("")
        )
    }
}

fn invalid(msg: impl Into<String>) -> UploadError {
    UploadError::InvalidOptions(msg.into())
}
