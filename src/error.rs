// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the I/O and session layers.

use crate::models::frame::FrameId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning, loading, editing or saving frames.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file name '{0}' does not match <prefix>_<digits>.<ext>")]
    InvalidFrameName(String),

    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("failed to decode image {}: {source}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("crop margins remove the whole {width}x{height} image")]
    CropOutOfBounds { width: u32, height: u32 },

    #[error("seed mask for frame {frame} not found at {}", .path.display())]
    MissingSeedMask { frame: FrameId, path: PathBuf },

    #[error("frame {current} has no previous frame with step {step}")]
    NoPreviousFrame { current: FrameId, step: u32 },

    #[error("failed to read mask {}: {source}", .path.display())]
    NpyRead {
        path: PathBuf,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("failed to write mask {}: {source}", .path.display())]
    NpyWrite {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    #[error("mask {} holds label {value} outside 0..=255", .path.display())]
    LabelOutOfRange { path: PathBuf, value: i64 },

    #[error("mask shape {mask:?} does not match image shape {image:?}")]
    ShapeMismatch {
        mask: (usize, usize),
        image: (usize, usize),
    },

    #[error("no label layer open for frame {0}")]
    LayerNotFound(FrameId),

    #[error("session is closed")]
    SessionClosed,

    #[error("configuration error: {0}")]
    Config(String),
}

impl AnnotateError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnnotateError>;
