// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pixel extraction and encoding.
//!
//! This module copies the ROI pixels out of a camera frame and encodes them
//! as a lossless PNG, so the dataset store only ever sees encoded bytes.

use crate::util::geometry::RoiRect;
use anyhow::{Context, Result};
use image::RgbImage;
use opencv::core::{Mat, Rect};
use opencv::imgproc;
use opencv::prelude::*;
use std::io::Cursor;

/// Copy the rectangle out of the frame into an owned, contiguous buffer.
///
/// The caller guarantees the rectangle is inside the frame; the geometry
/// function clamps it there by construction.
pub fn extract_region(frame: &Mat, rect: RoiRect) -> Result<Mat> {
    let roi = Mat::roi(frame, Rect::new(rect.x, rect.y, rect.width, rect.height))?;
    Ok(roi.try_clone()?)
}

/// Encode a BGR region as PNG bytes.
pub fn encode_png(region: &Mat) -> Result<Vec<u8>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(region, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let pixels = rgb.data_bytes()?.to_vec();
    let image =
        RgbImage::from_raw(width, height, pixels).context("region buffer size mismatch")?;

    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
    Ok(buffer)
}
