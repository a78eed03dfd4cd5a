// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame and mask discovery.
//!
//! A data root holds `frames/` with the images and `masks/` with one
//! `.npy` per annotated frame. Frames without a mask still need work.

use crate::error::{AnnotateError, Result};
use crate::models::frame::FrameId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const FRAMES_DIR: &str = "frames";
pub const MASKS_DIR: &str = "masks";

/// Sorted file listings of a data root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FramePaths {
    pub images: Vec<PathBuf>,
    pub masks: Vec<PathBuf>,
}

impl FramePaths {
    /// Image file for a frame, if one was found.
    pub fn image_for(&self, id: FrameId) -> Option<&Path> {
        self.images
            .iter()
            .find(|p| FrameId::from_path(p).ok() == Some(id))
            .map(PathBuf::as_path)
    }

    /// Frames present in `frames/` but not in `masks/`.
    pub fn unlabeled(&self) -> Result<Vec<FrameId>> {
        unlabeled_ids(&self.images, &self.masks)
    }
}

/// List `frames/` and `masks/` below `root`, each sorted lexicographically.
/// A missing `masks/` counts as empty; it is created on the first save.
pub fn scan(root: &Path) -> Result<FramePaths> {
    let masks_dir = root.join(MASKS_DIR);
    let masks = if masks_dir.exists() {
        list_files(&masks_dir)?
    } else {
        Vec::new()
    };
    let paths = FramePaths {
        images: list_files(&root.join(FRAMES_DIR))?,
        masks,
    };
    log::info!(
        "Found {} frames and {} masks in {}",
        paths.images.len(),
        paths.masks.len(),
        root.display()
    );
    Ok(paths)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AnnotateError::MissingDirectory(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| AnnotateError::io(dir, e))? {
        let entry = entry.map_err(|e| AnnotateError::io(dir, e))?;
        let path = entry.path();
        // Dot-files such as .DS_Store are not frames
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// IDs of images with no mask, ascending and without duplicates.
pub fn unlabeled_ids(images: &[PathBuf], masks: &[PathBuf]) -> Result<Vec<FrameId>> {
    let image_ids = ids_of(images)?;
    let mask_ids = ids_of(masks)?;
    Ok(image_ids.difference(&mask_ids).copied().collect())
}

fn ids_of(paths: &[PathBuf]) -> Result<BTreeSet<FrameId>> {
    paths.iter().map(|p| FrameId::from_path(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::TempDir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_unlabeled_is_sorted_difference() {
        let images = paths(&[
            "frames/frame_0010.png",
            "frames/frame_0000.png",
            "frames/frame_0005.png",
            "frames/frame_0015.png",
        ]);
        let masks = paths(&["masks/frame_0005.npy", "masks/frame_0000.npy"]);

        let ids = unlabeled_ids(&images, &masks).unwrap();
        assert_eq!(ids, vec![FrameId(10), FrameId(15)]);
    }

    #[test]
    fn test_unlabeled_without_duplicates() {
        // Same ID under two extensions counts once
        let images = paths(&["frame_0003.png", "frame_0003.jpg", "frame_0001.png"]);
        let ids = unlabeled_ids(&images, &[]).unwrap();
        assert_eq!(ids, vec![FrameId(1), FrameId(3)]);
    }

    #[test]
    fn test_masks_for_missing_frames_are_ignored() {
        let images = paths(&["frame_0002.png"]);
        let masks = paths(&["frame_0002.npy", "frame_0099.npy"]);
        assert!(unlabeled_ids(&images, &masks).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_name_fails() {
        let images = paths(&["frame_0001.png", "thumbs.db"]);
        assert!(matches!(
            unlabeled_ids(&images, &[]),
            Err(AnnotateError::InvalidFrameName(_))
        ));
    }

    #[test]
    fn test_scan_sorts_listings() {
        let dir = TempDir::with_layout("scan_sorted");
        for name in ["frame_0002.png", "frame_0000.png", "frame_0001.png"] {
            std::fs::write(dir.path().join(FRAMES_DIR).join(name), b"").unwrap();
        }
        std::fs::write(dir.path().join(MASKS_DIR).join("frame_0001.npy"), b"").unwrap();

        let found = scan(dir.path()).unwrap();
        let names: Vec<_> = found
            .images
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["frame_0000.png", "frame_0001.png", "frame_0002.png"]);
        assert_eq!(found.unlabeled().unwrap(), vec![FrameId(0), FrameId(2)]);
        assert_eq!(
            found.image_for(FrameId(2)),
            Some(dir.path().join(FRAMES_DIR).join("frame_0002.png").as_path())
        );
    }

    #[test]
    fn test_scan_skips_hidden_files() {
        let dir = TempDir::with_layout("scan_hidden");
        std::fs::write(dir.path().join(FRAMES_DIR).join("frame_0000.png"), b"").unwrap();
        std::fs::write(dir.path().join(FRAMES_DIR).join(".DS_Store"), b"").unwrap();
        std::fs::write(dir.path().join(MASKS_DIR).join(".DS_Store"), b"").unwrap();

        let found = scan(dir.path()).unwrap();
        assert_eq!(found.images.len(), 1);
        assert!(found.masks.is_empty());
        assert_eq!(found.unlabeled().unwrap(), vec![FrameId(0)]);
    }

    #[test]
    fn test_scan_without_masks_dir() {
        let dir = TempDir::new("scan_no_masks");
        std::fs::create_dir_all(dir.path().join(FRAMES_DIR)).unwrap();
        std::fs::write(dir.path().join(FRAMES_DIR).join("frame_0000.png"), b"").unwrap();

        let found = scan(dir.path()).unwrap();
        assert!(found.masks.is_empty());
        assert_eq!(found.unlabeled().unwrap(), vec![FrameId(0)]);
    }

    #[test]
    fn test_scan_requires_frames_dir() {
        let dir = TempDir::new("scan_missing");
        std::fs::create_dir_all(dir.path().join(MASKS_DIR)).unwrap();
        assert!(matches!(
            scan(dir.path()),
            Err(AnnotateError::MissingDirectory(_))
        ));
    }
}
