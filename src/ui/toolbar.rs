// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar for choosing the label-layer mode,
//! the active label and brush size, and for saving the mask.

use crate::models::session::{EditMode, LabelsLayer};
use crate::util::palette::label_color;

/// Result of toolbar interaction.
pub enum ToolbarAction {
    None,
    SetMode(EditMode),
    SelectLabel(u8),
    SetBrushRadius(u32),
    Undo,
    Redo,
    Save,
}

/// Display the toolbar for the open label layer.
pub fn show(ui: &mut egui::Ui, labels: Option<&LabelsLayer>) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let Some(labels) = labels else {
            ui.label(egui::RichText::new("No frame open").italics().weak());
            return;
        };

        ui.label("Mode:");
        for &mode in EditMode::all() {
            if ui.selectable_label(labels.mode == mode, mode_caption(mode)).clicked() {
                action = ToolbarAction::SetMode(mode);
            }
        }

        ui.separator();

        ui.label("Label:");
        let mut label = labels.selected_label;
        if ui.add(egui::DragValue::new(&mut label).range(0..=255)).changed() {
            action = ToolbarAction::SelectLabel(label);
        }
        let (rect, _) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, label_color(label));
        ui.painter().rect_stroke(rect, 2.0, egui::Stroke::new(1.0, egui::Color32::GRAY));

        ui.separator();

        ui.label("Brush:");
        let mut radius = labels.brush_radius;
        if ui.add(egui::Slider::new(&mut radius, 0..=50)).changed() {
            action = ToolbarAction::SetBrushRadius(radius);
        }

        ui.separator();

        if ui.add_enabled(labels.can_undo(), egui::Button::new("Undo")).clicked() {
            action = ToolbarAction::Undo;
        }
        if ui.add_enabled(labels.can_redo(), egui::Button::new("Redo")).clicked() {
            action = ToolbarAction::Redo;
        }

        ui.separator();

        if ui.button("💾 Save").clicked() {
            action = ToolbarAction::Save;
        }

        ui.separator();

        let mode_text = match labels.mode {
            EditMode::PanZoom => "Drag to pan, scroll to zoom",
            EditMode::Paint => "Drag to paint the active label",
            EditMode::Fill => "Click to flood-fill a region",
            EditMode::Erase => "Drag to erase to background",
            EditMode::Pick => "Click to pick the label under the cursor",
        };
        ui.label(egui::RichText::new(mode_text).italics().weak());
    });

    action
}

fn mode_caption(mode: EditMode) -> &'static str {
    match mode {
        EditMode::PanZoom => "✋ Pan",
        EditMode::Paint => "🖌 Paint",
        EditMode::Fill => "🪣 Fill",
        EditMode::Erase => "⌫ Erase",
        EditMode::Pick => "💧 Pick",
    }
}
