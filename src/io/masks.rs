// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mask persistence.
//!
//! Masks are stored as `u8` NumPy arrays at `masks/frame_<ID>.npy`. The
//! first frame starts from an empty mask, every later frame is seeded
//! with the mask saved `step` frames earlier.

use crate::error::{AnnotateError, Result};
use crate::io::frames::MASKS_DIR;
use crate::models::frame::FrameId;
use crate::models::mask::Mask;
use image::RgbImage;
use ndarray::Array2;
use ndarray_npy::{ReadNpyExt, ReadableElement};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Where the mask for `id` lives below `root`.
pub fn mask_path(root: &Path, id: FrameId) -> PathBuf {
    root.join(MASKS_DIR).join(id.mask_file_name())
}

/// Starting mask for `current`, sized to `image`.
pub fn provide_mask(root: &Path, current: FrameId, step: u32, image: &RgbImage) -> Result<Mask> {
    let (height, width) = (image.height() as usize, image.width() as usize);
    if current.is_first() {
        log::info!("Frame {} starts from an empty {}x{} mask", current, width, height);
        return Ok(Mask::zeros(height, width));
    }

    let previous = current
        .previous(step)
        .ok_or(AnnotateError::NoPreviousFrame { current, step })?;
    let path = mask_path(root, previous);
    if !path.is_file() {
        return Err(AnnotateError::MissingSeedMask {
            frame: previous,
            path,
        });
    }
    let mask = load_mask(&path)?;
    mask.ensure_shape(height, width)?;
    log::info!("Frame {} seeded from mask of frame {}", current, previous);
    Ok(mask)
}

/// Read a mask array.
///
/// Masks are written as `u8`, but seeds produced by other tools often use
/// a wider integer dtype. Those are accepted as long as every label fits
/// in `0..=255`.
pub fn load_mask(path: &Path) -> Result<Mask> {
    let bytes = std::fs::read(path).map_err(|e| AnnotateError::io(path, e))?;

    let u8_error = match Array2::<u8>::read_npy(Cursor::new(bytes.as_slice())) {
        Ok(data) => return Ok(Mask::from_array(data)),
        Err(e) => e,
    };

    if let Some(data) = read_as::<i64>(&bytes) {
        return narrow(data, path);
    }
    if let Some(data) = read_as::<i32>(&bytes) {
        return narrow(data, path);
    }
    if let Some(data) = read_as::<u16>(&bytes) {
        return narrow(data, path);
    }
    if let Some(data) = read_as::<i16>(&bytes) {
        return narrow(data, path);
    }
    if let Some(data) = read_as::<u32>(&bytes) {
        return narrow(data, path);
    }
    if let Some(data) = read_as::<i8>(&bytes) {
        return narrow(data, path);
    }

    Err(AnnotateError::NpyRead {
        path: path.to_path_buf(),
        source: u8_error,
    })
}

fn read_as<T: ReadableElement>(bytes: &[u8]) -> Option<Array2<T>> {
    Array2::<T>::read_npy(Cursor::new(bytes)).ok()
}

/// Convert a wider integer array to `u8` labels.
fn narrow<T: Copy + Into<i64>>(data: Array2<T>, path: &Path) -> Result<Mask> {
    if let Some(&bad) = data.iter().find(|&&v| u8::try_from(Into::<i64>::into(v)).is_err()) {
        return Err(AnnotateError::LabelOutOfRange {
            path: path.to_path_buf(),
            value: bad.into(),
        });
    }
    log::debug!("Converted {} to u8 labels", path.display());
    Ok(Mask::from_array(data.mapv(|v| Into::<i64>::into(v) as u8)))
}

/// Write the mask for `id`, overwriting any previous file.
pub fn save_mask(root: &Path, id: FrameId, mask: &Mask) -> Result<PathBuf> {
    let dir = root.join(MASKS_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| AnnotateError::io(&dir, e))?;
    let path = mask_path(root, id);
    ndarray_npy::write_npy(&path, mask.as_array()).map_err(|source| AnnotateError::NpyWrite {
        path: path.clone(),
        source,
    })?;
    log::info!("Saved mask for frame {} to {}", id, path.display());
    Ok(path)
}
