// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Viewer session state.
//!
//! A session holds the layers shown for the frame being annotated: one
//! read-only image layer and one editable label layer. Layers are
//! addressed through typed handles recorded per frame, never by name.
//! The session is open until the mask is saved, after which every
//! operation that needs it is rejected.

use super::frame::FrameId;
use super::history::History;
use super::mask::Mask;
use crate::error::{AnnotateError, Result};
use crate::io::masks;
use crate::util::geometry::Pixel;
use image::RgbImage;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Interaction mode of a label layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    PanZoom,
    Paint,
    Fill,
    Erase,
    Pick,
}

impl EditMode {
    /// Next mode in the paint/fill cycle. Any other mode starts the
    /// cycle at `Paint`.
    pub fn toggled(self) -> Self {
        match self {
            EditMode::Paint => EditMode::Fill,
            EditMode::Fill => EditMode::Paint,
            _ => EditMode::Paint,
        }
    }

    pub fn all() -> &'static [EditMode] {
        &[
            EditMode::PanZoom,
            EditMode::Paint,
            EditMode::Fill,
            EditMode::Erase,
            EditMode::Pick,
        ]
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditMode::PanZoom => "pan_zoom",
            EditMode::Paint => "paint",
            EditMode::Fill => "fill",
            EditMode::Erase => "erase",
            EditMode::Pick => "pick",
        };
        f.write_str(name)
    }
}

/// Index of a layer within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(usize);

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two layers opened for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayers {
    pub image: LayerHandle,
    pub labels: LayerHandle,
}

/// Pointer input forwarded from the canvas, in mask pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintInput {
    Press(Pixel),
    Drag { from: Pixel, to: Pixel },
    Release,
}

/// An editable label layer.
#[derive(Debug, Clone)]
pub struct LabelsLayer {
    mask: Mask,
    pub mode: EditMode,
    pub selected_label: u8,
    pub brush_radius: u32,
    history: History<Mask>,
    /// Snapshot taken when the current stroke started
    stroke_start: Option<Mask>,
    /// Bumped on every change so the canvas knows to re-upload
    revision: u64,
}

impl LabelsLayer {
    pub fn new(mask: Mask, brush_radius: u32, history_depth: usize) -> Self {
        Self {
            mask,
            mode: EditMode::Paint,
            selected_label: 1,
            brush_radius,
            history: History::new(history_depth),
            stroke_start: None,
            revision: 0,
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Apply pointer input according to the current mode.
    pub fn apply(&mut self, input: PaintInput) -> bool {
        match (self.mode, input) {
            (EditMode::Paint | EditMode::Erase, PaintInput::Press(at)) => {
                self.stroke_start = Some(self.mask.clone());
                let label = self.stroke_label();
                let changed = self.mask.paint(at, self.brush_radius, label);
                if changed {
                    self.touch();
                }
                changed
            }
            (EditMode::Paint | EditMode::Erase, PaintInput::Drag { from, to }) => {
                if self.stroke_start.is_none() {
                    self.stroke_start = Some(self.mask.clone());
                }
                let label = self.stroke_label();
                let changed = self.mask.paint_stroke(from, to, self.brush_radius, label);
                if changed {
                    self.touch();
                }
                changed
            }
            (EditMode::Fill, PaintInput::Press(at)) => {
                let before = self.mask.clone();
                let changed = self.mask.flood_fill(at, self.selected_label);
                if changed {
                    self.history.push(before);
                    self.touch();
                    log::debug!("Filled region at ({}, {}) with {}", at.x, at.y, self.selected_label);
                }
                changed
            }
            (EditMode::Pick, PaintInput::Press(at)) => {
                if let Some(label) = self.mask.get(at) {
                    self.selected_label = label;
                    log::info!("Picked label {}", label);
                }
                false
            }
            (_, PaintInput::Release) => {
                if let Some(before) = self.stroke_start.take() {
                    if before != self.mask {
                        self.history.push(before);
                        log::debug!("Committed stroke");
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn stroke_label(&self) -> u8 {
        if self.mode == EditMode::Erase {
            0
        } else {
            self.selected_label
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.mask.clone()) {
            Some(previous) => {
                self.mask = previous;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.mask.clone()) {
            Some(next) => {
                self.mask = next;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

/// Contents of a layer.
#[derive(Debug, Clone)]
pub enum LayerData {
    Image(RgbImage),
    Labels(LabelsLayer),
}

/// A named layer.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub data: LayerData,
}

impl Layer {
    pub fn kind(&self) -> &'static str {
        match self.data {
            LayerData::Image(_) => "Image",
            LayerData::Labels(_) => "Labels",
        }
    }
}

/// Outcome of a label selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSelection {
    Selected(u8),
    LayerMissing(String),
    NotLabels(String),
}

impl LabelSelection {
    pub fn is_selected(&self) -> bool {
        matches!(self, LabelSelection::Selected(_))
    }
}

impl fmt::Display for LabelSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelSelection::Selected(label) => write!(f, "Switched to label: {}", label),
            LabelSelection::LayerMissing(name) => write!(f, "No layer named '{}' found.", name),
            LabelSelection::NotLabels(name) => {
                write!(f, "The layer '{}' is not a Labels layer.", name)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// The layers of an annotation window.
#[derive(Debug)]
pub struct Session {
    layers: Vec<Layer>,
    frames: BTreeMap<FrameId, FrameLayers>,
    state: SessionState,
    brush_radius: u32,
    history_depth: usize,
}

impl Session {
    pub fn new(brush_radius: u32, history_depth: usize) -> Self {
        Self {
            layers: Vec::new(),
            frames: BTreeMap::new(),
            state: SessionState::Open,
            brush_radius,
            history_depth,
        }
    }

    /// Open a session showing `image` with `mask` as its label layer.
    pub fn open(
        id: FrameId,
        image: RgbImage,
        mask: Mask,
        brush_radius: u32,
        history_depth: usize,
    ) -> Result<Self> {
        let mut session = Self::new(brush_radius, history_depth);
        session.add_frame(id, image, mask)?;
        Ok(session)
    }

    /// Add the image and label layers of a frame.
    pub fn add_frame(&mut self, id: FrameId, image: RgbImage, mask: Mask) -> Result<FrameLayers> {
        self.ensure_open()?;
        mask.ensure_shape(image.height() as usize, image.width() as usize)?;

        let image = self.push_layer(id.image_layer_name(), LayerData::Image(image));
        let labels = self.push_layer(
            id.labels_layer_name(),
            LayerData::Labels(LabelsLayer::new(mask, self.brush_radius, self.history_depth)),
        );
        let handles = FrameLayers { image, labels };
        self.frames.insert(id, handles);
        log::info!("Opened layers for frame {}", id);
        Ok(handles)
    }

    fn push_layer(&mut self, name: String, data: LayerData) -> LayerHandle {
        self.layers.push(Layer { name, data });
        LayerHandle(self.layers.len() - 1)
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Closed => Err(AnnotateError::SessionClosed),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn frame_layers(&self, id: FrameId) -> Option<FrameLayers> {
        self.frames.get(&id).copied()
    }

    pub fn layer(&self, handle: LayerHandle) -> Option<&Layer> {
        self.layers.get(handle.0)
    }

    pub fn image(&self, id: FrameId) -> Option<&RgbImage> {
        let handles = self.frame_layers(id)?;
        match &self.layer(handles.image)?.data {
            LayerData::Image(image) => Some(image),
            LayerData::Labels(_) => None,
        }
    }

    pub fn labels(&self, id: FrameId) -> Option<&LabelsLayer> {
        let handles = self.frame_layers(id)?;
        match &self.layer(handles.labels)?.data {
            LayerData::Labels(labels) => Some(labels),
            LayerData::Image(_) => None,
        }
    }

    pub fn labels_mut(&mut self, id: FrameId) -> Option<&mut LabelsLayer> {
        let handles = self.frame_layers(id)?;
        match &mut self.layers.get_mut(handles.labels.0)?.data {
            LayerData::Labels(labels) => Some(labels),
            LayerData::Image(_) => None,
        }
    }

    fn require_labels(&mut self, id: FrameId) -> Result<&mut LabelsLayer> {
        self.ensure_open()?;
        self.labels_mut(id).ok_or(AnnotateError::LayerNotFound(id))
    }

    /// Write the label layer of `id` to `root/masks/` and close the session.
    pub fn save(&mut self, root: &Path, id: FrameId) -> Result<PathBuf> {
        let labels = self.require_labels(id)?;
        let mask = labels.mask().clone();
        if let Some(image) = self.image(id) {
            mask.ensure_shape(image.height() as usize, image.width() as usize)?;
        }
        let path = masks::save_mask(root, id, &mask)?;
        self.state = SessionState::Closed;
        log::info!(
            "Closed session for frame {} ({} labelled pixels)",
            id,
            mask.as_array().len() - mask.count(0)
        );
        Ok(path)
    }

    /// Cycle the label layer of `id` between paint and fill.
    pub fn toggle_mode(&mut self, id: FrameId) -> Result<EditMode> {
        let labels = self.require_labels(id)?;
        labels.mode = labels.mode.toggled();
        log::info!("Switched to {} mode", labels.mode);
        Ok(labels.mode)
    }

    /// Put the label layer of `id` into `mode`.
    pub fn set_mode(&mut self, id: FrameId, mode: EditMode) -> Result<()> {
        let labels = self.require_labels(id)?;
        labels.mode = mode;
        log::info!("Switched to {} mode", mode);
        Ok(())
    }

    /// Set the active label on the label layer of `id`.
    pub fn select_label(&mut self, id: FrameId, value: u8) -> LabelSelection {
        match self.frame_layers(id) {
            Some(handles) => self.select_label_on(handles.labels, value),
            None => Self::report(LabelSelection::LayerMissing(id.labels_layer_name())),
        }
    }

    /// Set the active label on the layer behind `handle`.
    pub fn select_label_on(&mut self, handle: LayerHandle, value: u8) -> LabelSelection {
        let outcome = match self.layers.get_mut(handle.0) {
            None => LabelSelection::LayerMissing(handle.to_string()),
            Some(layer) => match &mut layer.data {
                LayerData::Labels(labels) => {
                    labels.selected_label = value;
                    LabelSelection::Selected(value)
                }
                LayerData::Image(_) => LabelSelection::NotLabels(layer.name.clone()),
            },
        };
        Self::report(outcome)
    }

    fn report(outcome: LabelSelection) -> LabelSelection {
        if outcome.is_selected() {
            log::info!("{}", outcome);
        } else {
            log::warn!("{}", outcome);
        }
        outcome
    }

    /// Forward canvas input to the label layer of `id`.
    pub fn paint(&mut self, id: FrameId, input: PaintInput) -> Result<bool> {
        Ok(self.require_labels(id)?.apply(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{gradient_image, TempDir};

    fn session_for(id: FrameId) -> Session {
        let image = gradient_image(8, 6);
        Session::open(id, image, Mask::zeros(6, 8), 1, 10).unwrap()
    }

    #[test]
    fn test_toggle_is_two_cycle() {
        assert_eq!(EditMode::Paint.toggled(), EditMode::Fill);
        assert_eq!(EditMode::Paint.toggled().toggled(), EditMode::Paint);
        for mode in [EditMode::PanZoom, EditMode::Erase, EditMode::Pick] {
            assert_eq!(mode.toggled(), EditMode::Paint);
        }
    }

    #[test]
    fn test_session_toggle_mode() {
        let id = FrameId(7);
        let mut session = session_for(id);
        session.set_mode(id, EditMode::Pick).unwrap();
        assert_eq!(session.toggle_mode(id).unwrap(), EditMode::Paint);
        assert_eq!(session.toggle_mode(id).unwrap(), EditMode::Fill);
        assert_eq!(session.toggle_mode(id).unwrap(), EditMode::Paint);
        assert!(matches!(
            session.toggle_mode(FrameId(8)),
            Err(AnnotateError::LayerNotFound(FrameId(8)))
        ));
    }

    #[test]
    fn test_layer_names() {
        let session = session_for(FrameId(7));
        let names: Vec<_> = session.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["image0007", "mask0007"]);
    }

    #[test]
    fn test_select_label_on_labels_layer() {
        let id = FrameId(7);
        let mut session = session_for(id);
        let outcome = session.select_label(id, 4);
        assert_eq!(outcome, LabelSelection::Selected(4));
        assert_eq!(outcome.to_string(), "Switched to label: 4");
        assert_eq!(session.labels(id).unwrap().selected_label, 4);
    }

    #[test]
    fn test_select_label_missing_layer() {
        let id = FrameId(7);
        let mut session = session_for(id);
        let outcome = session.select_label(FrameId(9), 4);
        assert_eq!(outcome, LabelSelection::LayerMissing("mask0009".to_string()));
        assert_eq!(outcome.to_string(), "No layer named 'mask0009' found.");
        assert_eq!(session.labels(id).unwrap().selected_label, 1);
    }

    #[test]
    fn test_select_label_wrong_kind() {
        let id = FrameId(7);
        let mut session = session_for(id);
        let handles = session.frame_layers(id).unwrap();
        let outcome = session.select_label_on(handles.image, 4);
        assert_eq!(outcome, LabelSelection::NotLabels("image0007".to_string()));
        assert_eq!(outcome.to_string(), "The layer 'image0007' is not a Labels layer.");
        assert_eq!(session.labels(id).unwrap().selected_label, 1);
    }

    #[test]
    fn test_open_rejects_mismatched_mask() {
        let result = Session::open(FrameId(0), gradient_image(8, 6), Mask::zeros(8, 6), 1, 10);
        assert!(matches!(result, Err(AnnotateError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_stroke_undo_redo() {
        let id = FrameId(0);
        let mut session = session_for(id);
        session.select_label(id, 2);
        session.paint(id, PaintInput::Press(Pixel::new(1, 1))).unwrap();
        session
            .paint(id, PaintInput::Drag { from: Pixel::new(1, 1), to: Pixel::new(5, 1) })
            .unwrap();
        session.paint(id, PaintInput::Release).unwrap();

        let painted = session.labels(id).unwrap().mask().clone();
        assert!(painted.count(2) > 0);

        let labels = session.labels_mut(id).unwrap();
        assert!(labels.undo());
        assert_eq!(labels.mask(), &Mask::zeros(6, 8));
        assert!(labels.redo());
        assert_eq!(labels.mask(), &painted);
    }

    #[test]
    fn test_fill_erase_and_pick() {
        let id = FrameId(0);
        let mut session = session_for(id);
        session.set_mode(id, EditMode::Fill).unwrap();
        session.select_label(id, 3);
        assert!(session.paint(id, PaintInput::Press(Pixel::new(0, 0))).unwrap());
        assert_eq!(session.labels(id).unwrap().mask().count(3), 48);

        session.set_mode(id, EditMode::Erase).unwrap();
        session.paint(id, PaintInput::Press(Pixel::new(4, 3))).unwrap();
        session.paint(id, PaintInput::Release).unwrap();
        assert_eq!(session.labels(id).unwrap().mask().get(Pixel::new(4, 3)), Some(0));

        session.select_label(id, 9);
        session.set_mode(id, EditMode::Pick).unwrap();
        session.paint(id, PaintInput::Press(Pixel::new(0, 0))).unwrap();
        assert_eq!(session.labels(id).unwrap().selected_label, 3);
    }

    #[test]
    fn test_pan_mode_does_not_paint() {
        let id = FrameId(0);
        let mut session = session_for(id);
        session.set_mode(id, EditMode::PanZoom).unwrap();
        assert!(!session.paint(id, PaintInput::Press(Pixel::new(2, 2))).unwrap());
        assert_eq!(session.labels(id).unwrap().mask().count(0), 48);
    }

    #[test]
    fn test_save_closes_session() {
        let dir = TempDir::with_layout("session_save");
        let id = FrameId(7);
        let mut session = session_for(id);

        assert!(matches!(
            session.save(dir.path(), FrameId(3)),
            Err(AnnotateError::LayerNotFound(FrameId(3)))
        ));
        assert!(session.is_open());

        let path = session.save(dir.path(), id).unwrap();
        assert!(path.ends_with("masks/frame_0007.npy"));
        assert!(!session.is_open());
        assert!(matches!(
            session.save(dir.path(), id),
            Err(AnnotateError::SessionClosed)
        ));
    }
}
