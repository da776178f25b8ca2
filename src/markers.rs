// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fiducial-marker detection.
//!
//! Thin wrapper around the OpenCV ArUco detector. Detection runs per frame
//! in marker mode and feeds the overlay renderer; it is independent of
//! labeling and records nothing.

use anyhow::Result;
use opencv::core::{Point2f, Vector};
use opencv::objdetect::{
    self, ArucoDetector, DetectorParameters, PredefinedDictionaryType, RefineParameters,
};
use opencv::prelude::*;

/// One detected marker: its dictionary id and boundary corners in pixel
/// coordinates, in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedMarker {
    pub id: i32,
    pub corners: Vec<(f32, f32)>,
}

pub struct MarkerDetector {
    inner: ArucoDetector,
}

impl MarkerDetector {
    /// Build a detector for the 4x4/50 dictionary with default parameters.
    pub fn new() -> Result<Self> {
        let dictionary =
            objdetect::get_predefined_dictionary(PredefinedDictionaryType::DICT_4X4_50)?;
        let parameters = DetectorParameters::default()?;
        let refine = RefineParameters::new(10.0, 3.0, true)?;
        Ok(Self {
            inner: ArucoDetector::new(&dictionary, &parameters, refine)?,
        })
    }

    /// Detect all markers in the frame.
    pub fn detect(&self, frame: &Mat) -> Result<Vec<DetectedMarker>> {
        let mut corners = Vector::<Vector<Point2f>>::new();
        let mut ids = Vector::<i32>::new();
        let mut rejected = Vector::<Vector<Point2f>>::new();
        self.inner
            .detect_markers(frame, &mut corners, &mut ids, &mut rejected)?;

        let mut markers = Vec::with_capacity(ids.len());
        for (id, quad) in ids.iter().zip(corners.iter()) {
            markers.push(DetectedMarker {
                id,
                corners: quad.iter().map(|p| (p.x, p.y)).collect(),
            });
        }
        Ok(markers)
    }
}
