// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for the capture pipeline.
//!
//! Only conditions that change control flow (exit code, skipped capture)
//! get their own variant; everything else travels through `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// No camera index could be opened after exhausting the probe list.
    #[error("no camera device could be opened after {attempts} attempt(s)")]
    DeviceUnavailable { attempts: usize },

    /// Malformed or missing command-line arguments.
    #[error("{0}")]
    ArgumentError(String),

    /// An image or index write failed during a capture.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
