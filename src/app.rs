// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the queue of frames still needing a mask,
//! opens a session for one frame at a time and routes toolbar, canvas
//! and keyboard input to it. Saving a mask closes the session and moves
//! on to the next frame; the window closes once the queue is empty.

use crate::io::{frames, masks, media, serialization};
use crate::models::config::AnnotatorConfig;
use crate::models::frame::FrameId;
use crate::models::session::{EditMode, LabelSelection, PaintInput, Session};
use crate::ui::{canvas, properties, toolbar};
use crate::util::palette;
use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Message shown in the status bar.
struct Status {
    text: String,
    is_error: bool,
}

/// Textures for the open frame.
struct FrameTextures {
    image: egui::TextureHandle,
    overlay: egui::TextureHandle,
    /// Label-layer revision the overlay was built from
    overlay_revision: u64,
}

/// Main application state.
pub struct FramemaskApp {
    /// Data root holding `frames/` and `masks/`
    root: PathBuf,

    config: AnnotatorConfig,

    /// Unlabeled frames not yet opened
    queue: VecDeque<FrameId>,

    /// Frame shown in the open session
    current: Option<FrameId>,

    session: Option<Session>,

    textures: Option<FrameTextures>,

    canvas: canvas::CanvasState,

    status: Option<Status>,

    /// State changed after textures were synced this frame
    repaint_pending: bool,
}

impl FramemaskApp {
    /// Scan `root` and open the first frame that still needs a mask.
    pub fn new(root: PathBuf, config: AnnotatorConfig) -> Result<Self> {
        let mut app = Self {
            root,
            config,
            queue: VecDeque::new(),
            current: None,
            session: None,
            textures: None,
            canvas: canvas::CanvasState::default(),
            status: None,
            repaint_pending: false,
        };
        app.rescan()?;
        if let Some(id) = app.queue.pop_front() {
            app.open_frame(id)?;
        } else {
            app.set_status("All frames are annotated");
        }
        Ok(app)
    }

    fn rescan(&mut self) -> Result<()> {
        let paths = frames::scan(&self.root)
            .with_context(|| format!("Failed to scan {}", self.root.display()))?;
        let unlabeled = paths.unlabeled().context("Failed to list unlabeled frames")?;
        log::info!("{} frames need annotation", unlabeled.len());
        self.queue = unlabeled.into();
        Ok(())
    }

    /// Load a frame and its seed mask into a fresh session.
    fn open_frame(&mut self, id: FrameId) -> Result<()> {
        let session = build_session(&self.root, &self.config, id)?;
        self.session = Some(session);
        self.current = Some(id);
        self.textures = None;
        self.canvas.reset_view();
        self.set_status(format!("Annotating frame {}", id));
        Ok(())
    }

    /// Open the next queued frame, or close the window when none is left.
    fn advance(&mut self, ctx: &egui::Context) {
        self.session = None;
        self.current = None;
        self.textures = None;

        match self.queue.pop_front() {
            Some(id) => {
                if let Err(e) = self.open_frame(id) {
                    // Dropped from the queue; a rescan brings it back
                    self.set_error(e.context(format!("Skipped frame {}", id)));
                }
            }
            None => {
                log::info!("No frames left to annotate");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// Switch to another data root.
    fn open_root(&mut self, root: PathBuf, ctx: &egui::Context) {
        let previous = std::mem::replace(&mut self.root, root);
        match self.rescan() {
            Ok(()) => self.advance(ctx),
            Err(e) => {
                self.root = previous;
                self.set_error(e);
            }
        }
    }

    /// Persist the open mask and move on.
    fn save(&mut self, ctx: &egui::Context) {
        let (Some(session), Some(id)) = (self.session.as_mut(), self.current) else {
            return;
        };
        match session.save(&self.root, id) {
            Ok(path) => {
                self.set_status(format!("Saved {}", path.display()));
                self.advance(ctx);
            }
            Err(e) => self.set_error(anyhow::Error::new(e).context("Failed to save mask")),
        }
    }

    fn toggle_mode(&mut self) {
        let (Some(session), Some(id)) = (self.session.as_mut(), self.current) else {
            return;
        };
        match session.toggle_mode(id) {
            Ok(mode) => self.set_status(format!("Switched to {} mode", mode)),
            Err(e) => self.set_error(e.into()),
        }
    }

    fn set_mode(&mut self, mode: EditMode) {
        let (Some(session), Some(id)) = (self.session.as_mut(), self.current) else {
            return;
        };
        match session.set_mode(id, mode) {
            Ok(()) => self.set_status(format!("Switched to {} mode", mode)),
            Err(e) => self.set_error(e.into()),
        }
    }

    fn select_label(&mut self, value: u8) {
        let (Some(session), Some(id)) = (self.session.as_mut(), self.current) else {
            return;
        };
        let outcome = session.select_label(id, value);
        let is_error = !matches!(outcome, LabelSelection::Selected(_));
        self.status = Some(Status {
            text: outcome.to_string(),
            is_error,
        });
        self.repaint_pending = true;
    }

    fn paint(&mut self, input: PaintInput) {
        let (Some(session), Some(id)) = (self.session.as_mut(), self.current) else {
            return;
        };
        match session.paint(id, input) {
            Ok(changed) => self.repaint_pending |= changed,
            Err(e) => self.set_error(e.into()),
        }
    }

    fn adjust_brush(&mut self, delta: i64) {
        if let Some(labels) = self.labels_mut() {
            labels.brush_radius = (labels.brush_radius as i64 + delta).clamp(0, 50) as u32;
            self.repaint_pending = true;
        }
    }

    fn undo(&mut self) {
        if let Some(labels) = self.labels_mut() {
            if labels.undo() {
                log::info!("Undo");
                self.repaint_pending = true;
            }
        }
    }

    fn redo(&mut self) {
        if let Some(labels) = self.labels_mut() {
            if labels.redo() {
                log::info!("Redo");
                self.repaint_pending = true;
            }
        }
    }

    fn labels_mut(&mut self) -> Option<&mut crate::models::session::LabelsLayer> {
        let id = self.current?;
        self.session.as_mut()?.labels_mut(id)
    }

    fn export_settings(&mut self, path: PathBuf) {
        match serialization::save_config(&self.config, &path) {
            Ok(()) => self.set_status(format!("Exported settings to {}", path.display())),
            Err(e) => self.set_error(anyhow::Error::new(e).context("Failed to export settings")),
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
        self.repaint_pending = true;
    }

    fn set_error(&mut self, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.status = Some(Status {
            text: format!("{:#}", error),
            is_error: true,
        });
        self.repaint_pending = true;
    }

    /// Create or refresh the textures of the open frame.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let (Some(session), Some(id)) = (self.session.as_ref(), self.current) else {
            return;
        };
        let (Some(image), Some(labels)) = (session.image(id), session.labels(id)) else {
            return;
        };

        if let Some(textures) = self.textures.as_mut() {
            if textures.overlay_revision != labels.revision() {
                textures
                    .overlay
                    .set(palette::colorize(labels.mask()), egui::TextureOptions::NEAREST);
                textures.overlay_revision = labels.revision();
            }
            return;
        }

        let image_texture = ctx.load_texture(
            format!("image{}", id),
            media::to_color_image(image),
            egui::TextureOptions::LINEAR,
        );
        let overlay = ctx.load_texture(
            format!("mask{}", id),
            palette::colorize(labels.mask()),
            egui::TextureOptions::NEAREST,
        );
        self.textures = Some(FrameTextures {
            image: image_texture,
            overlay,
            overlay_revision: labels.revision(),
        });
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        const DIGITS: [egui::Key; 10] = [
            egui::Key::Num0,
            egui::Key::Num1,
            egui::Key::Num2,
            egui::Key::Num3,
            egui::Key::Num4,
            egui::Key::Num5,
            egui::Key::Num6,
            egui::Key::Num7,
            egui::Key::Num8,
            egui::Key::Num9,
        ];

        let (command, shift) = ctx.input(|i| (i.modifiers.command, i.modifiers.shift));
        let pressed = |key: egui::Key| ctx.input(|i| i.key_pressed(key));

        if command {
            if pressed(egui::Key::S) {
                self.save(ctx);
            } else if (pressed(egui::Key::Z) && shift) || pressed(egui::Key::Y) {
                self.redo();
            } else if pressed(egui::Key::Z) {
                self.undo();
            }
            return;
        }

        if pressed(egui::Key::T) {
            self.toggle_mode();
        }
        if pressed(egui::Key::E) {
            self.set_mode(EditMode::Erase);
        }
        if pressed(egui::Key::P) {
            self.set_mode(EditMode::Pick);
        }
        if pressed(egui::Key::Space) {
            self.set_mode(EditMode::PanZoom);
        }
        if pressed(egui::Key::OpenBracket) {
            self.adjust_brush(-1);
        }
        if pressed(egui::Key::CloseBracket) {
            self.adjust_brush(1);
        }
        for (value, key) in DIGITS.iter().enumerate() {
            if pressed(*key) {
                self.select_label(value as u8);
            }
        }
    }
}

/// Load the image for `id`, seed its mask and open a session.
fn build_session(root: &Path, config: &AnnotatorConfig, id: FrameId) -> Result<Session> {
    let paths = frames::scan(root)?;
    let image_path = paths
        .image_for(id)
        .with_context(|| format!("No image found for frame {}", id))?;
    let image = media::load_image(image_path, &config.crop)?;
    let mask = masks::provide_mask(root, id, config.step, &image)
        .with_context(|| format!("Failed to prepare mask for frame {}", id))?;
    let session = Session::open(id, image, mask, config.brush_radius, config.history_depth)?;
    Ok(session)
}

impl eframe::App for FramemaskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_textures(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Data Folder...").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.open_root(path, ctx);
                        }
                        ui.close_menu();
                    }
                    let can_open_next = self.session.is_none() && !self.queue.is_empty();
                    if ui
                        .add_enabled(can_open_next, egui::Button::new("Open Next Frame"))
                        .clicked()
                    {
                        self.advance(ctx);
                        ui.close_menu();
                    }
                    if ui
                        .add_enabled(
                            self.session.as_ref().is_some_and(Session::is_open),
                            egui::Button::new("Save Mask (Ctrl+S)"),
                        )
                        .clicked()
                    {
                        self.save(ctx);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export Settings...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Settings", &["yaml", "yml", "json"])
                            .set_file_name("framemask.yaml")
                            .save_file()
                        {
                            self.export_settings(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui.button("Zoom In").clicked() {
                        self.canvas.zoom_by(1.25);
                        ui.close_menu();
                    }
                    if ui.button("Zoom Out").clicked() {
                        self.canvas.zoom_by(0.8);
                        ui.close_menu();
                    }
                    if ui.button("Reset Zoom").clicked() {
                        self.canvas.reset_view();
                        ui.close_menu();
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let labels = self
                    .current
                    .and_then(|id| self.session.as_ref().and_then(|s| s.labels(id)));
                toolbar::show(ui, labels)
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::SetMode(mode) => self.set_mode(mode),
            toolbar::ToolbarAction::SelectLabel(value) => self.select_label(value),
            toolbar::ToolbarAction::SetBrushRadius(radius) => {
                if let Some(labels) = self.labels_mut() {
                    labels.brush_radius = radius;
                    self.repaint_pending = true;
                }
            }
            toolbar::ToolbarAction::Undo => self.undo(),
            toolbar::ToolbarAction::Redo => self.redo(),
            toolbar::ToolbarAction::Save => self.save(ctx),
            toolbar::ToolbarAction::None => {}
        }

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.current {
                    Some(id) => ui.label(format!("Frame {}", id)),
                    None => ui.label("No frame open"),
                };
                ui.separator();
                ui.label(self.root.display().to_string());
                if let Some(status) = &self.status {
                    ui.separator();
                    let color = if status.is_error {
                        egui::Color32::LIGHT_RED
                    } else {
                        ui.visuals().text_color()
                    };
                    ui.label(egui::RichText::new(&status.text).color(color));
                }
            });
        });

        // Layers panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| {
                let queue: Vec<FrameId> = self.queue.iter().copied().collect();
                properties::show(ui, self.session.as_ref(), self.current, &queue)
            })
            .inner;

        if let properties::PropertiesAction::SelectLabel(value) = properties_action {
            self.select_label(value);
        }

        self.handle_keys(ctx);

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let view = match (&self.textures, self.current) {
                    (Some(textures), Some(id)) => self
                        .session
                        .as_ref()
                        .and_then(|s| s.labels(id))
                        .map(|labels| canvas::FrameView {
                            image: &textures.image,
                            overlay: &textures.overlay,
                            size: (
                                textures.image.size()[0] as u32,
                                textures.image.size()[1] as u32,
                            ),
                            mode: labels.mode,
                            brush_radius: labels.brush_radius,
                        }),
                    _ => None,
                };
                canvas::show(ui, &mut self.canvas, view)
            })
            .inner;

        match canvas_action {
            canvas::CanvasAction::Click(at) => {
                self.paint(PaintInput::Press(at));
                self.paint(PaintInput::Release);
            }
            canvas::CanvasAction::Paint(input) => self.paint(input),
            canvas::CanvasAction::None => {}
        }

        // Textures were synced before this frame's input was applied
        if std::mem::take(&mut self.repaint_pending) {
            ctx.request_repaint();
        }
    }
}
