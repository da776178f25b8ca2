// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Append-only dataset index.
//!
//! The index file is plain delimited UTF-8 text: a fixed header row followed
//! by one immutable row per capture. Rows are never rewritten or reordered.
//! Instance ids come from an in-memory counter that is strictly increasing
//! for the lifetime of the index and resumes past the highest recorded id
//! when an existing file is reopened.
//!
//! Ordering invariant: the image file is written and synced before its row
//! is appended, so the index never references a missing image. An orphan
//! image with no row is the accepted residue of a crash between the two
//! writes.

use crate::error::CaptureError;
use crate::models::record::DatasetRecord;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const INDEX_FILE_NAME: &str = "index.csv";
const INDEX_HEADER: &str = "ID,Label,Image_Path";

/// The persisted record store for one output directory.
pub struct DatasetIndex {
    root: PathBuf,
    index_path: PathBuf,
    index: File,
    next_id: u64,
}

impl DatasetIndex {
    /// Open (or create) the index under `root`.
    ///
    /// A missing file is created with the header row and the counter seeded
    /// at 0; an existing file seeds the counter past its last recorded id.
    pub fn open(root: &Path) -> Result<Self, CaptureError> {
        fs::create_dir_all(root).map_err(|e| CaptureError::FileWrite {
            path: root.to_path_buf(),
            source: e,
        })?;

        let index_path = root.join(INDEX_FILE_NAME);
        let next_id = if index_path.exists() {
            let id = Self::resume_id(&index_path).map_err(|e| CaptureError::FileWrite {
                path: index_path.clone(),
                source: e,
            })?;
            log::info!("Resuming dataset index at id {}", id);
            id
        } else {
            fs::write(&index_path, format!("{}\n", INDEX_HEADER)).map_err(|e| {
                CaptureError::FileWrite {
                    path: index_path.clone(),
                    source: e,
                }
            })?;
            0
        };

        let index = OpenOptions::new()
            .append(true)
            .open(&index_path)
            .map_err(|e| CaptureError::FileWrite {
                path: index_path.clone(),
                source: e,
            })?;

        Ok(Self {
            root: root.to_path_buf(),
            index_path,
            index,
            next_id,
        })
    }

    /// Highest recorded id plus one, skipping malformed rows.
    fn resume_id(index_path: &Path) -> std::io::Result<u64> {
        let reader = BufReader::new(File::open(index_path)?);
        let mut next_id = 0u64;
        for line in reader.lines().skip(1) {
            let line = line?;
            match line.split(',').next().and_then(|f| f.parse::<u64>().ok()) {
                Some(id) => next_id = next_id.max(id + 1),
                None if line.trim().is_empty() => {}
                None => log::warn!("Skipping malformed index row: {:?}", line),
            }
        }
        Ok(next_id)
    }

    /// Persist one capture: image first, then its index row.
    ///
    /// The id counter advances even when the attempt fails, so ids may have
    /// gaps but never repeat. A failed image write aborts the capture and
    /// leaves the index untouched; the row is appended and flushed durably
    /// only after the image is on disk.
    pub fn record(&mut self, image: &[u8], label: &str) -> Result<DatasetRecord, CaptureError> {
        let instance_id = self.next_id;
        self.next_id += 1;

        let file_name = DatasetRecord::image_file_name(label, instance_id);
        let image_path = self.root.join(&file_name);
        write_durably(&image_path, image)?;

        let row = format!("{},{},{}\n", instance_id, label, file_name);
        self.index
            .write_all(row.as_bytes())
            .and_then(|_| self.index.sync_data())
            .map_err(|e| CaptureError::FileWrite {
                path: self.index_path.clone(),
                source: e,
            })?;

        Ok(DatasetRecord {
            instance_id,
            label: label.to_string(),
            image_path,
        })
    }

    /// Path of the index file.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }
}

fn write_durably(path: &Path, bytes: &[u8]) -> Result<(), CaptureError> {
    let to_err = |e: std::io::Error| CaptureError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = File::create(path).map_err(to_err)?;
    file.write_all(bytes).map_err(to_err)?;
    file.sync_all().map_err(to_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_root(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("roicap-{}-{}-{}", tag, std::process::id(), nanos))
    }

    fn read_rows(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_fresh_index_has_header() {
        let root = temp_root("fresh");
        let index = DatasetIndex::open(&root).unwrap();
        assert_eq!(read_rows(index.index_path()), vec![INDEX_HEADER.to_string()]);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_single_capture_scenario() {
        let root = temp_root("single");
        let mut index = DatasetIndex::open(&root).unwrap();

        let record = index.record(b"not-really-a-png", "Forward").unwrap();
        assert_eq!(record.instance_id, 0);
        assert_eq!(record.label, "Forward");
        assert!(record.image_path.exists());

        let rows = read_rows(index.index_path());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], INDEX_HEADER);
        assert_eq!(rows[1], "0,Forward,Forward_0.png");
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_ids_strictly_increase() {
        let root = temp_root("increase");
        let mut index = DatasetIndex::open(&root).unwrap();
        let mut previous = None;
        for _ in 0..5 {
            let record = index.record(b"x", "Forward").unwrap();
            if let Some(previous) = previous {
                assert!(record.instance_id > previous);
            }
            previous = Some(record.instance_id);
        }
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_rapid_clicks_same_label() {
        let root = temp_root("rapid");
        let mut index = DatasetIndex::open(&root).unwrap();
        let first = index.record(b"a", "Turn LF").unwrap();
        let second = index.record(b"b", "Turn LF").unwrap();

        assert_eq!(second.instance_id, first.instance_id + 1);
        assert_eq!(first.label, second.label);
        assert_ne!(first.image_path, second.image_path);
        assert!(first.image_path.exists() && second.image_path.exists());
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_label_change_affects_only_later_records() {
        let root = temp_root("labels");
        let mut index = DatasetIndex::open(&root).unwrap();
        index.record(b"a", "Forward").unwrap();
        index.record(b"b", "Turn RT").unwrap();

        let rows = read_rows(index.index_path());
        assert_eq!(rows[1], "0,Forward,Forward_0.png");
        assert_eq!(rows[2], "1,Turn RT,Turn RT_1.png");
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_every_row_references_existing_image() {
        let root = temp_root("rows");
        let mut index = DatasetIndex::open(&root).unwrap();
        for label in ["Forward", "Two", "Three"] {
            index.record(b"img", label).unwrap();
            for row in read_rows(index.index_path()).iter().skip(1) {
                let file_name = row.rsplit(',').next().unwrap();
                assert!(root.join(file_name).exists(), "missing image for {row}");
            }
        }
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_reopen_resumes_counter() {
        let root = temp_root("resume");
        {
            let mut index = DatasetIndex::open(&root).unwrap();
            index.record(b"a", "Forward").unwrap();
            index.record(b"b", "Forward").unwrap();
        }
        let mut index = DatasetIndex::open(&root).unwrap();
        let record = index.record(b"c", "Forward").unwrap();
        assert_eq!(record.instance_id, 2);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_failed_image_write_leaves_index_untouched() {
        let root = temp_root("failure");
        let mut index = DatasetIndex::open(&root).unwrap();

        // A directory squatting on the image path makes File::create fail.
        fs::create_dir(root.join("Forward_0.png")).unwrap();
        let err = index.record(b"x", "Forward");
        assert!(matches!(err, Err(CaptureError::FileWrite { .. })));
        assert_eq!(read_rows(index.index_path()).len(), 1);

        // The counter advanced anyway: gaps are fine, repeats are not.
        let record = index.record(b"y", "Forward").unwrap();
        assert_eq!(record.instance_id, 1);
        fs::remove_dir_all(&root).ok();
    }
}
