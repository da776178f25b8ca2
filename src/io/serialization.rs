// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration file import.
//!
//! This module loads session configuration from YAML or JSON files,
//! dispatching on the file extension. Partial files are allowed; missing
//! fields keep their defaults.

use crate::models::config::CaptureConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Import configuration from YAML format.
pub fn import_yaml(path: &Path) -> Result<CaptureConfig> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&yaml).with_context(|| format!("invalid YAML in {}", path.display()))
}

/// Import configuration from JSON format.
pub fn import_json(path: &Path) -> Result<CaptureConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Import configuration, picking the format from the file extension.
pub fn load_config(path: &Path) -> Result<CaptureConfig> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => anyhow::bail!("unsupported config extension: {:?}", other),
    }
}
