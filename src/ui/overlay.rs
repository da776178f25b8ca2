// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview overlay rendering.
//!
//! Two render paths that must never be conflated: the hover preview draws on
//! a *copy* of the current frame so a click always extracts unmodified
//! pixels, while the post-capture confirmation draws on the displayed frame
//! strictly after the region has been extracted. Marker mode additionally
//! draws each detected marker's boundary polygon and id.

use crate::markers::DetectedMarker;
use crate::util::geometry::RoiRect;
use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

fn roi_color() -> Scalar {
    // Green, BGR.
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn marker_color() -> Scalar {
    // Red, BGR.
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// Draw the ROI outline.
pub fn draw_roi_outline(frame: &mut Mat, rect: RoiRect) -> Result<()> {
    imgproc::rectangle(
        frame,
        Rect::new(rect.x, rect.y, rect.width, rect.height),
        roi_color(),
        2,
        imgproc::LINE_8,
        0,
    )?;
    Ok(())
}

/// Draw the active label in the bottom-left corner.
pub fn draw_label_banner(frame: &mut Mat, label: &str) -> Result<()> {
    let origin = Point::new(10, frame.rows() - 10);
    imgproc::put_text(
        frame,
        &format!("Current label: {}", label),
        origin,
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.5,
        Scalar::all(255.0),
        1,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// Draw each marker's boundary polygon and its id next to the first corner.
pub fn draw_markers(frame: &mut Mat, markers: &[DetectedMarker]) -> Result<()> {
    for marker in markers {
        let count = marker.corners.len();
        for i in 0..count {
            let (x0, y0) = marker.corners[i];
            let (x1, y1) = marker.corners[(i + 1) % count];
            imgproc::line(
                frame,
                Point::new(x0 as i32, y0 as i32),
                Point::new(x1 as i32, y1 as i32),
                marker_color(),
                2,
                imgproc::LINE_8,
                0,
            )?;
        }
        if let Some(&(x, y)) = marker.corners.first() {
            imgproc::put_text(
                frame,
                &marker.id.to_string(),
                Point::new(x as i32, y as i32 - 5),
                imgproc::FONT_HERSHEY_SIMPLEX,
                0.6,
                marker_color(),
                2,
                imgproc::LINE_8,
                false,
            )?;
        }
    }
    Ok(())
}
