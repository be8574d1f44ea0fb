// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Module configuration, supplied when the host constructs the bridge.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// MIME type used for file parts that don't declare a `filetype`.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Value of the `Accept` header sent with every upload.
pub const DEFAULT_ACCEPT: &str = "application/json";

/// Settings for a `FileTransfer` module instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Public site the app belongs to (informational, exposed to the host).
    pub site_url: String,
    /// API root the app talks to (informational, exposed to the host).
    pub api_url: String,
    /// API port (default 80).
    pub port: u16,
    /// `Accept` header for upload requests.
    pub accept: String,
    /// MIME type applied to file parts without an explicit `filetype`.
    pub default_mime_type: String,
    /// `User-Agent` header for the HTTP client.
    pub user_agent: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            site_url: "http://joinbevy.com".into(),
            api_url: "http://api.joinbevy.com".into(),
            port: 80,
            accept: DEFAULT_ACCEPT.into(),
            default_mime_type: DEFAULT_MIME_TYPE.into(),
            user_agent: concat!("filetransfer/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl UploadConfig {
    /// Load a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
