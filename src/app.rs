// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Capture session state and the render/dispatch loop.
//!
//! The session owns every mutable piece of the pipeline: the device handle,
//! the dataset index, the label state machine and the cursor. Events are
//! routed synchronously and in order within one loop iteration; pointer
//! events arrive through the window's mouse callback and are drained into
//! the loop as a queue, so no state hides in callback closures.

use crate::io::camera::{Camera, FrameOutcome};
use crate::io::dataset::DatasetIndex;
use crate::io::media;
use crate::markers::{DetectedMarker, MarkerDetector};
use crate::models::config::CaptureConfig;
use crate::models::label::LabelState;
use crate::ui::overlay;
use crate::util::geometry;
use anyhow::Result;
use opencv::highgui;
use opencv::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const WINDOW_NAME: &str = "roicap";

/// Dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    ShuttingDown,
}

/// One input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerMove { x: i32, y: i32 },
    PointerDown { x: i32, y: i32 },
    Key(i32),
}

/// What the dispatcher does with a routed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Capture { x: i32, y: i32 },
    Quit,
}

/// Route one event.
///
/// Pointer moves only update the cursor; the preview rectangle is recomputed
/// from it on the next render. Every pointer down commits exactly one
/// capture. The quit key is handled here; any other key goes to the label
/// state machine, which ignores unmapped codes.
pub fn route_event(
    event: InputEvent,
    quit_key: char,
    labels: &mut LabelState,
    cursor: &mut Option<(i32, i32)>,
) -> Action {
    match event {
        InputEvent::PointerMove { x, y } => {
            *cursor = Some((x, y));
            Action::None
        }
        InputEvent::PointerDown { x, y } => Action::Capture { x, y },
        InputEvent::Key(code) => {
            if u32::try_from(code).ok().and_then(char::from_u32) == Some(quit_key) {
                Action::Quit
            } else {
                labels.on_key(code);
                Action::None
            }
        }
    }
}

type PointerQueue = Arc<Mutex<VecDeque<InputEvent>>>;

fn drain(queue: &PointerQueue) -> Vec<InputEvent> {
    queue
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .drain(..)
        .collect()
}

fn install_pointer_callback(queue: &PointerQueue) -> opencv::Result<()> {
    let queue = Arc::clone(queue);
    highgui::set_mouse_callback(
        WINDOW_NAME,
        Some(Box::new(move |event, x, y, _flags| {
            let mapped = if event == highgui::EVENT_MOUSEMOVE {
                Some(InputEvent::PointerMove { x, y })
            } else if event == highgui::EVENT_LBUTTONDOWN {
                Some(InputEvent::PointerDown { x, y })
            } else {
                None
            };
            if let Some(event) = mapped {
                queue
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push_back(event);
            }
        })),
    )
}

/// One capture session: device, dataset, labels, cursor.
pub struct CaptureSession {
    camera: Camera,
    dataset: DatasetIndex,
    labels: LabelState,
    config: CaptureConfig,
    detector: Option<MarkerDetector>,
    cursor: Option<(i32, i32)>,
}

impl CaptureSession {
    pub fn new(
        camera: Camera,
        dataset: DatasetIndex,
        config: CaptureConfig,
        detector: Option<MarkerDetector>,
    ) -> Self {
        let labels = LabelState::new(config.bindings.clone(), config.default_label.clone());
        Self {
            camera,
            dataset,
            labels,
            config,
            detector,
            cursor: None,
        }
    }

    /// Run the dispatch loop until the quit key or end of stream.
    pub fn run(&mut self) -> Result<()> {
        highgui::named_window(WINDOW_NAME, highgui::WINDOW_NORMAL)?;
        let queue: PointerQueue = Arc::new(Mutex::new(VecDeque::new()));
        install_pointer_callback(&queue)?;

        let mut state = LoopState::Running;
        while state == LoopState::Running {
            let frame = match self.camera.read() {
                FrameOutcome::Frame(frame) => frame,
                FrameOutcome::Degenerate => {
                    log::warn!("Invalid frame dimensions, skipping iteration");
                    continue;
                }
                FrameOutcome::EndOfStream => {
                    log::info!("Frame source ended");
                    break;
                }
            };

            let markers = self.detect_markers(&frame);

            // Hover preview renders on a copy; `frame` stays pristine so a
            // click extracts unmodified pixels.
            let mut preview = frame.try_clone()?;
            overlay::draw_label_banner(&mut preview, self.labels.current())?;
            overlay::draw_markers(&mut preview, &markers)?;
            if let Some((x, y)) = self.cursor {
                overlay::draw_roi_outline(&mut preview, self.roi_at(&frame, x, y))?;
            }
            highgui::imshow(WINDOW_NAME, &preview)?;

            for event in self.poll_events(&queue)? {
                match route_event(event, self.config.quit_key, &mut self.labels, &mut self.cursor)
                {
                    Action::Capture { x, y } => self.handle_capture(&frame, &mut preview, x, y)?,
                    Action::Quit => state = LoopState::ShuttingDown,
                    Action::None => {}
                }
            }

            // Bound CPU usage between iterations.
            thread::sleep(Duration::from_millis(self.config.idle_ms));
        }

        self.camera.release()?;
        highgui::destroy_all_windows()?;
        log::info!("Session ended");
        Ok(())
    }

    /// One bounded input poll: pump the GUI, then drain pointer events and
    /// append the key press, if any.
    fn poll_events(&self, queue: &PointerQueue) -> Result<Vec<InputEvent>> {
        let key = highgui::wait_key(self.config.poll_ms)?;
        let mut events = drain(queue);
        if key > 0 {
            events.push(InputEvent::Key(key & 0xff));
        }
        Ok(events)
    }

    fn roi_at(&self, frame: &Mat, x: i32, y: i32) -> geometry::RoiRect {
        geometry::roi_rect(
            frame.cols(),
            frame.rows(),
            x,
            y,
            self.config.roi_width,
            self.config.roi_height,
        )
    }

    fn detect_markers(&self, frame: &Mat) -> Vec<DetectedMarker> {
        let Some(detector) = &self.detector else {
            return Vec::new();
        };
        match detector.detect(frame) {
            Ok(markers) => markers,
            Err(e) => {
                log::warn!("Marker detection failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Commit one capture at the given cursor position.
    ///
    /// A failed write aborts only this capture and is surfaced as a log
    /// line; prior records are untouched. The confirmation outline is drawn
    /// on the displayed frame strictly after extraction, so the saved image
    /// never contains an overlay.
    fn handle_capture(&mut self, frame: &Mat, preview: &mut Mat, x: i32, y: i32) -> Result<()> {
        let rect = self.roi_at(frame, x, y);
        let (right, bottom) = rect.bottom_right();
        log::debug!(
            "Extracting region ({}, {})..({}, {})",
            rect.x,
            rect.y,
            right,
            bottom
        );
        let region = media::extract_region(frame, rect)?;
        let encoded = media::encode_png(&region)?;

        match self.dataset.record(&encoded, self.labels.current()) {
            Ok(record) => {
                log::info!(
                    "Image saved as {} (id {})",
                    record.image_path.display(),
                    record.instance_id
                );
                overlay::draw_roi_outline(preview, rect)?;
                highgui::imshow(WINDOW_NAME, preview)?;
            }
            Err(e) => log::error!("Capture failed: {}", e),
        }
        Ok(())
    }
}
