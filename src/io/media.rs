// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame image loading.
//!
//! This module decodes frame images, crops away the configured margins
//! and converts the result into a form egui can upload as a texture.

use crate::error::{AnnotateError, Result};
use crate::models::config::CropMargins;
use image::RgbImage;
use std::path::Path;

/// Decode an image file and crop it.
pub fn load_image(path: &Path, crop: &CropMargins) -> Result<RgbImage> {
    let decoded = image::open(path).map_err(|source| AnnotateError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = decoded.to_rgb8();
    let cropped = crop_image(&rgb, crop)?;
    log::info!(
        "Loaded {} ({}x{} -> {}x{})",
        path.display(),
        rgb.width(),
        rgb.height(),
        cropped.width(),
        cropped.height()
    );
    Ok(cropped)
}

/// Remove `crop` pixels from each edge. Fails if nothing would remain.
pub fn crop_image(image: &RgbImage, crop: &CropMargins) -> Result<RgbImage> {
    let (width, height) = image.dimensions();
    let horizontal = crop.left as u64 + crop.right as u64;
    let vertical = crop.top as u64 + crop.bottom as u64;
    if horizontal >= width as u64 || vertical >= height as u64 {
        return Err(AnnotateError::CropOutOfBounds { width, height });
    }
    let view = image::imageops::crop_imm(
        image,
        crop.left,
        crop.top,
        width - crop.left - crop.right,
        height - crop.top - crop.bottom,
    );
    Ok(view.to_image())
}

/// Convert to an egui image for texture upload.
pub fn to_color_image(image: &RgbImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgb(size, image.as_raw())
}
