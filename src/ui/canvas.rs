// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for frame display and mask painting.
//!
//! This module provides the main canvas area where users view the cropped
//! frame with its label overlay and paint or fill the mask.

use crate::models::session::{EditMode, PaintInput};
use crate::util::geometry::{fit_size, screen_to_pixel, Pixel};

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// Press and release without movement
    Click(Pixel),
    Paint(PaintInput),
}

/// View state kept between frames.
pub struct CanvasState {
    zoom: f32,
    offset: egui::Vec2,
    /// Last pixel of the stroke in progress
    last_pixel: Option<Pixel>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: egui::Vec2::ZERO,
            last_pixel: None,
        }
    }
}

impl CanvasState {
    pub fn reset_view(&mut self) {
        *self = Self::default();
    }

    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(0.1, 20.0);
    }
}

/// Everything the canvas needs to draw the open frame.
pub struct FrameView<'a> {
    pub image: &'a egui::TextureHandle,
    pub overlay: &'a egui::TextureHandle,
    pub size: (u32, u32),
    pub mode: EditMode,
    pub brush_radius: u32,
}

/// Display the canvas and turn pointer input into paint actions.
pub fn show(ui: &mut egui::Ui, state: &mut CanvasState, view: Option<FrameView<'_>>) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(view) = view else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("No frame open")
                        .color(egui::Color32::from_gray(180)),
                );
            });
            return;
        };

        let canvas_rect = ui.max_rect();
        let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

        // Scroll to zoom
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                state.zoom_by((scroll / 200.0).exp());
            }
        }

        let (img_width, img_height) = view.size;
        let (fit_w, fit_h) = fit_size((canvas_rect.width(), canvas_rect.height()), img_width, img_height);
        let display = egui::vec2(fit_w, fit_h) * state.zoom;
        let image_rect = egui::Rect::from_center_size(canvas_rect.center() + state.offset, display);

        let to_pixel = |pos: egui::Pos2| {
            let rel = pos - image_rect.min;
            screen_to_pixel(rel.x, rel.y, (display.x, display.y), img_width, img_height)
        };

        if view.mode == EditMode::PanZoom {
            if response.dragged() {
                state.offset += response.drag_delta();
            }
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                action = CanvasAction::Click(to_pixel(pos));
                state.last_pixel = None;
            }
        } else if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pixel = to_pixel(pos);
                state.last_pixel = Some(pixel);
                action = CanvasAction::Paint(PaintInput::Press(pixel));
            }
        } else if response.drag_stopped() {
            state.last_pixel = None;
            action = CanvasAction::Paint(PaintInput::Release);
        } else if response.dragged() {
            if let (Some(from), Some(pos)) = (state.last_pixel, response.interact_pointer_pos()) {
                let to = to_pixel(pos);
                if to != from {
                    state.last_pixel = Some(to);
                    action = CanvasAction::Paint(PaintInput::Drag { from, to });
                }
            }
        }

        let painter = ui.painter_at(canvas_rect);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(view.image.id(), image_rect, uv, egui::Color32::WHITE);
        painter.image(view.overlay.id(), image_rect, uv, egui::Color32::WHITE);

        // Brush outline
        if matches!(view.mode, EditMode::Paint | EditMode::Erase) {
            if let Some(pos) = response.hover_pos() {
                let scale = display.x / img_width as f32;
                painter.circle_stroke(
                    pos,
                    (view.brush_radius as f32 + 0.5) * scale,
                    egui::Stroke::new(1.0, egui::Color32::WHITE),
                );
            }
        }
    });

    action
}
