// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotator settings.
//!
//! Settings come from built-in defaults, an optional YAML/JSON file and
//! command-line overrides, in that order of precedence (lowest first).

use serde::{Deserialize, Serialize};

/// Pixels removed from each edge of a frame before annotation.
///
/// The defaults match the overlay regions of the camera rig the tool was
/// first used with; other sources will need their own values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropMargins {
    /// No cropping.
    pub const NONE: CropMargins = CropMargins {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };
}

impl Default for CropMargins {
    fn default() -> Self {
        Self {
            top: 70,
            bottom: 300,
            left: 320,
            right: 500,
        }
    }
}

/// Complete annotator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Gap between a frame and the frame whose mask seeds it
    pub step: u32,
    pub crop: CropMargins,
    /// Initial brush radius in pixels
    pub brush_radius: u32,
    /// Number of undo snapshots kept per session
    pub history_depth: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            step: 1,
            crop: CropMargins::default(),
            brush_radius: 5,
            history_depth: 20,
        }
    }
}
