// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Capture session configuration.
//!
//! This module defines the configurable parameters of a session: the ROI
//! size, the key-to-label bindings, the quit key, and the device/loop
//! timings. Defaults reproduce the canonical session; a partial YAML or
//! JSON file overrides individual fields.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Width of the captured region in pixels.
    pub roi_width: i32,
    /// Height of the captured region in pixels.
    pub roi_height: i32,
    /// Key-to-label bindings consulted once per loop iteration.
    pub bindings: BTreeMap<char, String>,
    /// Label active at session start.
    pub default_label: String,
    /// Reserved key that ends the session.
    pub quit_key: char,
    /// Number of device indices probed when no explicit index opens.
    pub probe_attempts: i32,
    /// Settle delay after a device opens, in milliseconds.
    pub settle_ms: u64,
    /// Bounded input-poll wait, in milliseconds.
    pub poll_ms: i32,
    /// Idle delay at the end of each loop iteration, in milliseconds.
    pub idle_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert('w', "Forward".to_string());
        bindings.insert('a', "Turn LF".to_string());
        bindings.insert('d', "Turn RT".to_string());
        bindings.insert('2', "Two".to_string());
        bindings.insert('3', "Three".to_string());
        bindings.insert('4', "Four".to_string());

        Self {
            roi_width: 200,
            roi_height: 200,
            bindings,
            default_label: "Forward".to_string(),
            quit_key: 'q',
            probe_attempts: 3,
            settle_ms: 1000,
            poll_ms: 1,
            idle_ms: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let config = CaptureConfig::default();
        assert_eq!(config.bindings.get(&'w').map(String::as_str), Some("Forward"));
        assert_eq!(config.bindings.get(&'a').map(String::as_str), Some("Turn LF"));
        assert_eq!(config.bindings.len(), 6);
        assert_eq!(config.default_label, "Forward");
        assert_eq!(config.quit_key, 'q');
        assert_eq!((config.roi_width, config.roi_height), (200, 200));
    }

    #[test]
    fn test_partial_override_from_yaml() {
        let yaml = "roi_width: 64\nroi_height: 48\n";
        let config: CaptureConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!((config.roi_width, config.roi_height), (64, 48));
        // Untouched fields keep their defaults.
        assert_eq!(config.quit_key, 'q');
        assert_eq!(config.bindings.len(), 6);
    }

    #[test]
    fn test_partial_override_from_json() {
        let json = r#"{"bindings": {"x": "Stop"}, "default_label": "Stop"}"#;
        let config: CaptureConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bindings.get(&'x').map(String::as_str), Some("Stop"));
        assert_eq!(config.default_label, "Stop");
        assert_eq!(config.roi_width, 200);
    }
}
