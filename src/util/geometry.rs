// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides utilities for mapping between screen coordinates
//! on the canvas and pixel coordinates in the cropped frame.

/// A pixel position. Signed so positions left of or above the frame can
/// be represented and rejected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: i64,
    pub y: i64,
}

impl Pixel {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Largest `(width, height)` with the image's aspect ratio that fits in
/// `available`.
pub fn fit_size(available: (f32, f32), img_width: u32, img_height: u32) -> (f32, f32) {
    let img_aspect = img_width as f32 / img_height as f32;
    let available_aspect = available.0 / available.1;

    if img_aspect > available_aspect {
        // Image is wider - fit to width
        let width = available.0;
        (width, width / img_aspect)
    } else {
        // Image is taller - fit to height
        let height = available.1;
        (height * img_aspect, height)
    }
}

/// Convert a position relative to the displayed image's top-left corner
/// into pixel coordinates.
pub fn screen_to_pixel(
    rel_x: f32,
    rel_y: f32,
    display_size: (f32, f32),
    width: u32,
    height: u32,
) -> Pixel {
    let px = rel_x / display_size.0 * width as f32;
    let py = rel_y / display_size.1 * height as f32;
    Pixel::new(px.floor() as i64, py.floor() as i64)
}

/// Points along the segment from `from` to `to`, spaced at most `spacing`
/// pixels apart, both ends included.
pub fn interpolate(from: Pixel, to: Pixel, spacing: u32) -> Vec<Pixel> {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let length = (dx * dx + dy * dy).sqrt();
    let steps = (length / spacing.max(1) as f64).ceil() as i64;
    if steps == 0 {
        return vec![from];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            Pixel::new(
                (from.x as f64 + dx * t).round() as i64,
                (from.y as f64 + dy * t).round() as i64,
            )
        })
        .collect()
}
