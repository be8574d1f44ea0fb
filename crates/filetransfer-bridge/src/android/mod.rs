// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android content index via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The host runtime must have initialised
// `ndk_context` before the first upload that carries a `content://` path.
//
// ## Architecture notes
//
// `MediaStore` exposes the on-disk location of a media item through the
// `_data` column. Resolution is one `ContentResolver.query` projecting that
// column, reading the first row and closing the cursor. The cursor is closed
// on every path, including failures after the query succeeded.

#![cfg(target_os = "android")]

use jni::objects::{JObject, JString, JValue};
use jni::{JNIEnv, JavaVM};

use filetransfer_core::error::{Result, UploadError};

use crate::traits::ContentResolver;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// `MediaStore.MediaColumns.DATA`.
const MEDIA_DATA_COLUMN: &str = "_data";

/// Attach the current thread to the JVM and run `f` with an env handle and
/// the hosting `Context`.
///
/// Calls `ndk_context::android_context()` to retrieve the `JavaVM*` and the
/// context `jobject` registered by the host. The attach guard detaches the
/// thread again when `f` returns if this call attached it.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the host glue code.
    // The pointer is valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| UploadError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| UploadError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(UploadError::Bridge(
            "Android context is null; host has not initialised ndk_context".into(),
        ));
    }
    // SAFETY: the host registers a global reference to its application
    // context; it outlives this call.
    let context = unsafe { JObject::from_raw(ptr.cast()) };

    let result = f(&mut *env, &context);
    clear_pending_exception(&mut env);
    result
}

/// Convenience: map any `jni::errors::Error` into `UploadError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> UploadError {
    UploadError::Bridge(format!("{context}: {e}"))
}

/// A thrown Java exception stays pending until cleared, and every further
/// JNI call on this thread fails while it is.
fn clear_pending_exception(env: &mut JNIEnv<'_>) {
    if env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Android implementation of [`ContentResolver`].
///
/// Zero-sized; all state lives on the Java side.
#[derive(Debug, Default)]
pub struct AndroidContentResolver;

impl AndroidContentResolver {
    /// Create a new resolver.
    ///
    /// This does **not** touch JNI; the first JNI call happens lazily on
    /// the first resolution.
    pub fn new() -> Self {
        Self
    }
}

impl ContentResolver for AndroidContentResolver {
    /// Resolve a `content://` media reference to its `_data` path.
    fn resolve_media_path(&self, uri_string: &str) -> Result<String> {
        tracing::debug!(uri = uri_string, "Android: querying MediaStore for content URI");

        with_env(|env, context| {
            // Uri.parse(uriString)
            let j_uri_str: JString = env
                .new_string(uri_string)
                .map_err(|e| jni_err("new_string(uri)", e))?;
            let uri_obj: JObject = env
                .call_static_method(
                    "android/net/Uri",
                    "parse",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&j_uri_str)],
                )
                .map_err(|e| jni_err("Uri.parse", e))?
                .l()
                .map_err(|e| jni_err("Uri.parse->l", e))?;

            // ContentResolver resolver = context.getContentResolver()
            let resolver: JObject = env
                .call_method(
                    context,
                    "getContentResolver",
                    "()Landroid/content/ContentResolver;",
                    &[],
                )
                .map_err(|e| jni_err("getContentResolver", e))?
                .l()
                .map_err(|e| jni_err("getContentResolver->l", e))?;

            // String[] projection = { "_data" }
            let j_column: JString = env
                .new_string(MEDIA_DATA_COLUMN)
                .map_err(|e| jni_err("new_string(_data)", e))?;
            let projection = env
                .new_object_array(1, "java/lang/String", &j_column)
                .map_err(|e| jni_err("new_object_array(projection)", e))?;

            // Cursor cursor = resolver.query(uri, projection, null, null, null)
            let cursor: JObject = env
                .call_method(
                    &resolver,
                    "query",
                    "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
                    &[
                        JValue::Object(&uri_obj),
                        JValue::Object(&projection),
                        JValue::Object(&JObject::null()),
                        JValue::Object(&JObject::null()),
                        JValue::Object(&JObject::null()),
                    ],
                )
                .map_err(|e| jni_err("ContentResolver.query", e))?
                .l()
                .map_err(|e| jni_err("ContentResolver.query->l", e))?;

            if cursor.is_null() {
                return Err(UploadError::Bridge(format!(
                    "ContentResolver returned null cursor for URI: {uri_string}"
                )));
            }

            let path = read_data_column(env, &cursor, &j_column, uri_string);

            // Close before propagating; an exception from the read must be
            // cleared or close() fails too.
            clear_pending_exception(env);
            if let Err(e) = env.call_method(&cursor, "close", "()V", &[]) {
                tracing::warn!(error = %e, "Android: Cursor.close failed");
            }

            path
        })
    }
}

/// Read the `_data` column of the cursor's first row.
fn read_data_column(
    env: &mut JNIEnv<'_>,
    cursor: &JObject<'_>,
    j_column: &JString<'_>,
    uri_string: &str,
) -> Result<String> {
    let column_index = env
        .call_method(
            cursor,
            "getColumnIndexOrThrow",
            "(Ljava/lang/String;)I",
            &[JValue::Object(j_column)],
        )
        .map_err(|e| jni_err("getColumnIndexOrThrow", e))?
        .i()
        .map_err(|e| jni_err("getColumnIndexOrThrow->i", e))?;

    let has_row = env
        .call_method(cursor, "moveToFirst", "()Z", &[])
        .map_err(|e| jni_err("moveToFirst", e))?
        .z()
        .map_err(|e| jni_err("moveToFirst->z", e))?;
    if !has_row {
        return Err(UploadError::Bridge(format!(
            "no MediaStore row for URI: {uri_string}"
        )));
    }

    let j_path: JObject = env
        .call_method(
            cursor,
            "getString",
            "(I)Ljava/lang/String;",
            &[JValue::Int(column_index)],
        )
        .map_err(|e| jni_err("getString", e))?
        .l()
        .map_err(|e| jni_err("getString->l", e))?;
    if j_path.is_null() {
        return Err(UploadError::Bridge(format!(
            "MediaStore row has no _data path for URI: {uri_string}"
        )));
    }

    let path: String = env
        .get_string(&JString::from(j_path))
        .map_err(|e| jni_err("get_string(_data)", e))?
        .into();

    tracing::debug!(uri = uri_string, path = %path, "Android: content URI resolved");
    Ok(path)
}
