// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera device acquisition and frame source.
//!
//! Opens a capture handle, trying an explicit index first and falling back
//! to a short ascending probe sequence. Each successful open is followed by
//! a fixed settle delay to compensate for driver warm-up. Once acquired,
//! the handle is the session's sole source of frames.

use crate::error::CaptureError;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use std::thread;
use std::time::Duration;

/// Outcome of one frame read.
pub enum FrameOutcome {
    /// A valid frame.
    Frame(Mat),
    /// The read succeeded but the frame has zero width or height; the
    /// caller should skip this iteration and keep going.
    Degenerate,
    /// The device stopped producing frames; the caller should shut down.
    EndOfStream,
}

/// An acquired camera device.
pub struct Camera {
    inner: VideoCapture,
    index: i32,
}

impl Camera {
    /// Open a camera, probing when the explicit index fails or is absent.
    ///
    /// Fails with [`CaptureError::DeviceUnavailable`] only after every
    /// attempt is exhausted. No output file is touched before this returns.
    pub fn acquire(
        requested: Option<i32>,
        probe_attempts: i32,
        settle: Duration,
    ) -> Result<Self, CaptureError> {
        let mut attempts = 0usize;

        if let Some(index) = requested {
            attempts += 1;
            if let Some(camera) = Self::try_open(index, settle) {
                return Ok(camera);
            }
            log::warn!("Explicit camera index {} failed, probing", index);
        }

        for index in 0..probe_attempts.max(0) {
            attempts += 1;
            if let Some(camera) = Self::try_open(index, settle) {
                return Ok(camera);
            }
        }

        Err(CaptureError::DeviceUnavailable { attempts })
    }

    fn try_open(index: i32, settle: Duration) -> Option<Self> {
        log::info!("Attempting to open camera at index {}", index);
        let capture = match VideoCapture::new(index, videoio::CAP_ANY) {
            Ok(capture) => capture,
            Err(e) => {
                log::debug!("Camera index {} failed: {}", index, e);
                return None;
            }
        };
        match capture.is_opened() {
            Ok(true) => {
                // Some drivers deliver garbage for the first moments.
                thread::sleep(settle);
                log::info!("Camera opened at index {}", index);
                Some(Self { inner: capture, index })
            }
            Ok(false) => {
                log::info!("Failed to open camera at index {}", index);
                None
            }
            Err(e) => {
                log::debug!("Camera index {} failed: {}", index, e);
                None
            }
        }
    }

    /// The device index this handle was opened with.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Pull one frame from the device.
    ///
    /// Read errors and end-of-stream both map to [`FrameOutcome::EndOfStream`];
    /// a disconnected device is a graceful shutdown, not a crash.
    pub fn read(&mut self) -> FrameOutcome {
        let mut frame = Mat::default();
        let grabbed = match self.inner.read(&mut frame) {
            Ok(grabbed) => grabbed,
            Err(e) => {
                log::warn!("Frame read error: {}", e);
                false
            }
        };
        if !grabbed {
            return FrameOutcome::EndOfStream;
        }
        if frame.rows() == 0 || frame.cols() == 0 {
            return FrameOutcome::Degenerate;
        }
        FrameOutcome::Frame(frame)
    }

    /// Release the device handle.
    pub fn release(&mut self) -> anyhow::Result<()> {
        self.inner.release()?;
        Ok(())
    }
}
