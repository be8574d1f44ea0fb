// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multipart form assembly.
//
// Turns an `UploadRequest` into an ordered list of parts: string params
// first (caller order), then one file part per entry (array order). File
// contents are read here through a handle scoped to the read, so the network
// layer never holds open files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::debug;

use filetransfer_bridge::ContentResolver;
use filetransfer_core::error::{Result, UploadError};
use filetransfer_core::{FileEntry, UploadRequest};

/// A file attachment, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field_name: String,
    pub filename: String,
    /// `None` when the requested type doesn't parse; the part then goes out
    /// without a `Content-Type` header.
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text { name: String, value: String },
    File(FilePart),
}

/// An ordered multipart form, ready to hand to a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn file(&mut self, part: FilePart) {
        self.parts.push(Part::File(part));
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// File parts only, in order.
    pub fn files(&self) -> impl Iterator<Item = &FilePart> {
        self.parts.iter().filter_map(|part| match part {
            Part::File(file) => Some(file),
            Part::Text { .. } => None,
        })
    }
}

/// Build the form body for `request`.
///
/// Stops at the first file that can't be opened and returns
/// [`UploadError::FileNotFound`]; later entries are never looked at.
pub fn build_body(
    request: &UploadRequest,
    resolver: &dyn ContentResolver,
    default_mime_type: &str,
) -> Result<MultipartBody> {
    let mut body = MultipartBody::new();

    for (name, value) in request.text_fields() {
        debug!(target: "filetransfer", field = name, "appending form field");
        body.text(name, value);
    }

    for entry in &request.files {
        let path = local_path(entry, resolver)?;
        let bytes = read_file(&path)?;
        let part = FilePart {
            field_name: entry.form_field_name().to_owned(),
            filename: entry.filename.clone(),
            mime_type: valid_mime(entry.content_type(default_mime_type)),
            bytes,
        };
        debug!(
            target: "filetransfer",
            field = %part.field_name,
            filename = %part.filename,
            mime = part.mime_type.as_deref().unwrap_or("-"),
            bytes = part.bytes.len(),
            "appending file part"
        );
        body.file(part);
    }

    Ok(body)
}

/// `Some(mime)` if it parses as a media type, else `None`.
fn valid_mime(mime_type: &str) -> Option<String> {
    match mime_type.parse::<mime::Mime>() {
        Ok(_) => Some(mime_type.to_owned()),
        Err(e) => {
            debug!(target: "filetransfer", mime = mime_type, error = %e, "unparseable MIME type, sending part untyped");
            None
        }
    }
}

/// Where the entry's bytes live on disk.
///
/// `content://` references go through the platform content index first.
pub fn local_path(entry: &FileEntry, resolver: &dyn ContentResolver) -> Result<PathBuf> {
    if entry.is_content_reference() {
        let resolved = resolver.resolve_media_path(&entry.filepath)?;
        Ok(filesystem_path(&resolved))
    } else {
        Ok(filesystem_path(&entry.filepath))
    }
}

/// Strip a `file://` scheme; anything else is taken as a path already.
fn filesystem_path(raw: &str) -> PathBuf {
    Url::parse(raw)
        .ok()
        .filter(|url| url.scheme() == "file")
        .and_then(|url| url.to_file_path().ok())
        .unwrap_or_else(|| PathBuf::from(raw))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| {
        debug!(target: "filetransfer", path = %path.display(), error = %e, "cannot open file");
        UploadError::FileNotFound
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn no_content_index(_: &str) -> Result<String> {
        panic!("content index should not be consulted")
    }

    fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> String {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn files_keep_input_order_and_defaults() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"AAA");
        let b = write_file(&dir, "b.bin", b"BB");
        let c = write_file(&dir, "c.png", b"C");

        let request = UploadRequest::from_options(&json!({
            "url": "http://example.test",
            "files": [
                { "filepath": a, "filename": "a.jpg", "filetype": "image/jpeg", "name": "photo" },
                { "filepath": b, "filename": "b.bin", "filetype": "application/octet-stream" },
                { "filepath": c, "filename": "c.png" }
            ]
        }))
        .unwrap();

        let body = build_body(&request, &no_content_index, "image/png").unwrap();
        let files: Vec<_> = body.files().collect();
        assert_eq!(files.len(), 3);

        assert_eq!(files[0].field_name, "photo");
        assert_eq!(files[0].filename, "a.jpg");
        assert_eq!(files[0].mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(files[0].bytes, b"AAA");

        assert_eq!(files[1].field_name, "b.bin");
        assert_eq!(files[1].mime_type.as_deref(), Some("application/octet-stream"));

        assert_eq!(files[2].field_name, "c.png");
        assert_eq!(files[2].mime_type.as_deref(), Some("image/png"));
        assert_eq!(files[2].bytes, b"C");
    }

    #[test]
    fn unparseable_mime_type_is_dropped() {
        assert_eq!(valid_mime("image/jpeg").as_deref(), Some("image/jpeg"));
        assert_eq!(
            valid_mime("text/plain; charset=utf-8").as_deref(),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(valid_mime("not a mime type"), None);
        assert_eq!(valid_mime(""), None);
    }

    #[test]
    fn text_fields_precede_files() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.png", b"x");
        let request = UploadRequest::from_options(&json!({
            "url": "http://example.test",
            "params": { "album": "holiday", "count": 2 },
            "files": [{ "filepath": a, "filename": "a.png" }]
        }))
        .unwrap();

        let body = build_body(&request, &no_content_index, "image/png").unwrap();
        assert_eq!(body.parts().len(), 2);
        assert_eq!(
            body.parts()[0],
            Part::Text {
                name: "album".into(),
                value: "holiday".into()
            }
        );
        assert!(matches!(body.parts()[1], Part::File(_)));
    }

    #[test]
    fn missing_file_stops_processing() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.png", b"x");
        let missing = dir.path().join("gone.png").to_string_lossy().into_owned();

        let lookups = AtomicUsize::new(0);
        let counting = |uri: &str| -> Result<String> {
            lookups.fetch_add(1, Ordering::SeqCst);
            Ok(uri.to_owned())
        };

        let request = UploadRequest::from_options(&json!({
            "url": "http://example.test",
            "files": [
                { "filepath": a, "filename": "a.png" },
                { "filepath": missing, "filename": "gone.png" },
                { "filepath": "content://media/external/images/media/9", "filename": "late.png" }
            ]
        }))
        .unwrap();

        let err = build_body(&request, &counting, "image/png").unwrap_err();
        assert!(matches!(err, UploadError::FileNotFound));
        assert_eq!(
            lookups.load(Ordering::SeqCst),
            0,
            "entries after the missing file were processed"
        );
    }

    #[test]
    fn content_references_are_resolved() {
        let dir = TempDir::new().unwrap();
        let real = write_file(&dir, "IMG_0001.jpg", b"jpeg");
        let resolved = real.clone();
        let index = move |uri: &str| -> Result<String> {
            assert_eq!(uri, "content://media/external/images/media/1");
            Ok(resolved.clone())
        };

        let request = UploadRequest::from_options(&json!({
            "url": "http://example.test",
            "files": [{ "filepath": "content://media/external/images/media/1", "filename": "IMG_0001.jpg" }]
        }))
        .unwrap();

        let body = build_body(&request, &index, "image/png").unwrap();
        assert_eq!(body.files().next().unwrap().bytes, b"jpeg");
    }

    #[test]
    fn resolver_failure_propagates() {
        let failing = |_: &str| -> Result<String> { Err(UploadError::PlatformUnavailable) };
        let entry = FileEntry {
            filepath: "content://media/external/images/media/1".into(),
            filename: "x.png".into(),
            field_name: None,
            mime_type: None,
        };
        assert!(matches!(
            local_path(&entry, &failing),
            Err(UploadError::PlatformUnavailable)
        ));
    }

    #[test]
    fn file_uris_become_paths() {
        assert_eq!(
            filesystem_path("file:///sdcard/DCIM/a%20b.png"),
            PathBuf::from("/sdcard/DCIM/a b.png")
        );
        assert_eq!(filesystem_path("/sdcard/DCIM/a.png"), PathBuf::from("/sdcard/DCIM/a.png"));
        assert_eq!(filesystem_path("a.png"), PathBuf::from("a.png"));
    }

    #[test]
    fn short_paths_are_not_content_references() {
        let entry = FileEntry {
            filepath: "x.png".into(),
            filename: "x.png".into(),
            field_name: None,
            mime_type: None,
        };
        assert_eq!(
            local_path(&entry, &no_content_index).unwrap(),
            PathBuf::from("x.png")
        );
    }
}
