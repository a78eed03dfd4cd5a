// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layers and frame queue panel.
//!
//! Lists the layers of the open session, the labels present in the mask
//! and the frames still waiting for annotation.

use crate::models::frame::FrameId;
use crate::models::session::{LayerData, Session};
use crate::util::palette::label_color;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    SelectLabel(u8),
}

/// Display the side panel.
pub fn show(
    ui: &mut egui::Ui,
    session: Option<&Session>,
    current: Option<FrameId>,
    queue: &[FrameId],
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Layers");
    ui.separator();

    match session {
        Some(session) => {
            for layer in session.layers().iter().rev() {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&layer.name).strong());
                    ui.label(egui::RichText::new(layer.kind()).weak());
                });

                if let LayerData::Labels(labels) = &layer.data {
                    let mut counts = [0usize; 256];
                    for &v in labels.mask().as_array() {
                        counts[v as usize] += 1;
                    }
                    ui.indent(layer.name.as_str(), |ui| {
                        for (label, &count) in counts.iter().enumerate().skip(1) {
                            if count == 0 {
                                continue;
                            }
                            let label = label as u8;
                            ui.horizontal(|ui| {
                                let (rect, _) = ui
                                    .allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                                ui.painter().rect_filled(rect, 2.0, label_color(label));
                                let text = format!("{:>3}: {} px", label, count);
                                if ui
                                    .selectable_label(labels.selected_label == label, text)
                                    .clicked()
                                {
                                    action = PropertiesAction::SelectLabel(label);
                                }
                            });
                        }
                    });
                }
            }
        }
        None => {
            ui.label(egui::RichText::new("No layers").weak());
        }
    }

    ui.add_space(12.0);
    ui.heading("Frames");
    ui.separator();

    if let Some(id) = current {
        ui.label(format!("Annotating frame {}", id));
    }
    ui.label(format!("{} remaining", queue.len()));
    egui::ScrollArea::vertical().show(ui, |ui| {
        for id in queue {
            ui.label(egui::RichText::new(format!("frame_{}", id)).monospace());
        }
    });

    action
}
