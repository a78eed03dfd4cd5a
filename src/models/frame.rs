// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame identifiers.
//!
//! Frames are named `<prefix>_<digits>.<ext>` on disk. The integer part
//! pairs an image with its mask and locates the frame whose mask seeds
//! the next one.

use crate::error::{AnnotateError, Result};
use std::fmt;
use std::path::Path;

/// Integer identifier of a frame, displayed zero-padded to four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u32);

impl FrameId {
    /// Extract the identifier from a path such as `frames/frame_0012.png`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AnnotateError::InvalidFrameName(path.display().to_string()))?;
        Self::from_file_name(name)
    }

    /// Parse the segment after the first `_` up to the first `.`.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let invalid = || AnnotateError::InvalidFrameName(name.to_string());
        let digits = name
            .split('_')
            .nth(1)
            .and_then(|rest| rest.split('.').next())
            .ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        digits.parse().map(FrameId).map_err(|_| invalid())
    }

    /// Is this the first frame of a sequence?
    pub fn is_first(self) -> bool {
        self.0 == 0
    }

    /// The frame `step` before this one, if any.
    pub fn previous(self, step: u32) -> Option<Self> {
        if step == 0 {
            return None;
        }
        self.0.checked_sub(step).map(FrameId)
    }

    /// File name of the mask saved for this frame.
    pub fn mask_file_name(self) -> String {
        format!("frame_{}.npy", self)
    }

    /// Display name of the image layer.
    pub fn image_layer_name(self) -> String {
        format!("image{}", self)
    }

    /// Display name of the label layer.
    pub fn labels_layer_name(self) -> String {
        format!("mask{}", self)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_frame_names() {
        assert_eq!(FrameId::from_file_name("frame_0012.png").unwrap(), FrameId(12));
        assert_eq!(FrameId::from_file_name("frame_0000.npy").unwrap(), FrameId(0));
        assert_eq!(
            FrameId::from_path(&PathBuf::from("data/frames/frame_0105.jpg")).unwrap(),
            FrameId(105)
        );
    }

    #[test]
    fn test_reject_malformed_names() {
        for name in ["frame.png", "frame_.png", "frame_ab.png", "frame_-3.png", "notes"] {
            assert!(
                matches!(
                    FrameId::from_file_name(name),
                    Err(AnnotateError::InvalidFrameName(_))
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_previous_frame() {
        assert_eq!(FrameId(10).previous(5), Some(FrameId(5)));
        assert_eq!(FrameId(5).previous(5), Some(FrameId(0)));
        assert_eq!(FrameId(3).previous(5), None);
        assert_eq!(FrameId(3).previous(0), None);
    }

    #[test]
    fn test_names_are_zero_padded() {
        let id = FrameId(7);
        assert_eq!(id.to_string(), "0007");
        assert_eq!(id.mask_file_name(), "frame_0007.npy");
        assert_eq!(id.image_layer_name(), "image0007");
        assert_eq!(id.labels_layer_name(), "mask0007");
    }
}
