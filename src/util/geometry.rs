// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps a cursor position to the clamped region-of-interest
//! rectangle. The same function is used for the live preview outline and
//! for the final extraction, so the saved pixels always match the last
//! previewed outline.

/// An axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoiRect {
    pub fn bottom_right(&self) -> (i32, i32) {
        (self.x + self.width, self.y + self.height)
    }
}

/// Compute the ROI rectangle centered on the cursor, clamped to the frame.
///
/// The top-left corner is pushed inside the frame first, then the
/// bottom-right corner is clipped to the frame bounds. The result is always
/// fully contained in `[0, frame_width) x [0, frame_height)`; it is smaller
/// than the requested size only when clamped at an edge.
pub fn roi_rect(
    frame_width: i32,
    frame_height: i32,
    cursor_x: i32,
    cursor_y: i32,
    roi_width: i32,
    roi_height: i32,
) -> RoiRect {
    let top_left_x = (cursor_x - roi_width / 2).max(0);
    let top_left_y = (cursor_y - roi_height / 2).max(0);
    let bottom_right_x = (top_left_x + roi_width).min(frame_width);
    let bottom_right_y = (top_left_y + roi_height).min(frame_height);

    RoiRect {
        x: top_left_x,
        y: top_left_y,
        width: bottom_right_x - top_left_x,
        height: bottom_right_y - top_left_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_cursor() {
        // 640x480 frame, cursor at (150, 150), 200x200 ROI.
        let rect = roi_rect(640, 480, 150, 150, 200, 200);
        assert_eq!(rect, RoiRect { x: 50, y: 50, width: 200, height: 200 });
        assert_eq!(rect.bottom_right(), (250, 250));
    }

    #[test]
    fn test_clamped_at_origin() {
        let rect = roi_rect(640, 480, 10, 5, 200, 200);
        assert_eq!((rect.x, rect.y), (0, 0));
        assert_eq!(rect.bottom_right(), (200, 200));
    }

    #[test]
    fn test_clamped_at_far_edge() {
        // Top-left is inside, bottom-right is clipped; the rectangle shrinks.
        let rect = roi_rect(640, 480, 639, 479, 200, 200);
        assert_eq!((rect.x, rect.y), (539, 379));
        assert_eq!(rect.bottom_right(), (640, 480));
        assert_eq!((rect.width, rect.height), (101, 101));
    }

    #[test]
    fn test_always_inside_frame() {
        let (w, h) = (321, 241);
        for &(cx, cy) in &[(0, 0), (1, 240), (320, 0), (160, 120), (320, 240)] {
            let rect = roi_rect(w, h, cx, cy, 100, 60);
            assert!(rect.x >= 0 && rect.y >= 0);
            let (brx, bry) = rect.bottom_right();
            assert!(brx <= w && bry <= h);
            assert!(rect.width > 0 && rect.height > 0);
            assert!(rect.width <= 100 && rect.height <= 60);
        }
    }

    #[test]
    fn test_roi_larger_than_frame() {
        let rect = roi_rect(100, 80, 50, 40, 200, 200);
        assert_eq!(rect, RoiRect { x: 0, y: 0, width: 100, height: 80 });
    }

    #[test]
    fn test_deterministic() {
        let a = roi_rect(1920, 1080, 777, 333, 128, 128);
        let b = roi_rect(1920, 1080, 777, 333, 128, 128);
        assert_eq!(a, b);
    }
}
