// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FileTransfer: desktop host harness.
//
// Plays the part of the mobile runtime: builds the module, feeds it one
// options map read from a JSON file, and prints whatever comes back through
// the completion callback.
//
//     filetransfer <options.json> [config.json]

use std::process::ExitCode;
use std::sync::mpsc;

use filetransfer_bridge::NativeModule;
use filetransfer_core::{UploadConfig, UploadError};
use filetransfer_upload::FileTransferModule;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "filetransfer failed");
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode, UploadError> {
    let mut args = std::env::args().skip(1);
    let options_path = args.next().ok_or_else(|| {
        UploadError::InvalidOptions("usage: filetransfer <options.json> [config.json]".into())
    })?;

    let config = match args.next() {
        Some(path) => UploadConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => UploadConfig::default(),
    };
    let options: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(options_path)?)?;

    let module = FileTransferModule::new(config)?;
    tracing::info!(module = module.name(), "module ready");

    let (tx, rx) = mpsc::channel();
    module.upload(
        &options,
        Box::new(move |err, result| {
            let _ = tx.send((err, result));
        }),
    );

    // `upload` has returned, so the handback has already fired.
    match rx.recv() {
        Ok((None, Some(body))) => {
            println!("{body}");
            Ok(ExitCode::SUCCESS)
        }
        Ok((Some(err), _)) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
        Ok((None, None)) | Err(_) => Err(UploadError::Unhandled(
            "module returned without a result".into(),
        )),
    }
}
