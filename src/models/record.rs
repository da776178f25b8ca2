// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dataset record structure.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One immutable capture: a saved image and its metadata.
///
/// Records are created once at a successful click and never updated or
/// deleted. `instance_id` is unique and strictly increasing within the
/// session lifetime of the dataset index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub instance_id: u64,
    pub label: String,
    pub image_path: PathBuf,
}

impl DatasetRecord {
    /// Deterministic image file name for a (label, id) pair.
    pub fn image_file_name(label: &str, instance_id: u64) -> String {
        // Path separators in a label would escape the output directory.
        let safe: String = label
            .chars()
            .map(|c| if c == '/' || c == '\\' { '-' } else { c })
            .collect();
        format!("{}_{}.png", safe, instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_file_name() {
        assert_eq!(DatasetRecord::image_file_name("Forward", 0), "Forward_0.png");
        assert_eq!(DatasetRecord::image_file_name("Turn LF", 12), "Turn LF_12.png");
    }

    #[test]
    fn test_image_file_name_strips_separators() {
        assert_eq!(DatasetRecord::image_file_name("a/b\\c", 1), "a-b-c_1.png");
    }
}
