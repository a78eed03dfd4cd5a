// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Label colours for the mask overlay.

use crate::models::mask::Mask;

const BASE: [[u8; 3]; 10] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
    [240, 50, 230],
    [210, 245, 60],
    [250, 190, 212],
];

/// Overlay opacity of painted labels.
const ALPHA: u8 = 140;

/// Display colour of a label. Label 0 is fully transparent.
pub fn label_color(label: u8) -> egui::Color32 {
    if label == 0 {
        return egui::Color32::TRANSPARENT;
    }
    let idx = (label as usize - 1) % BASE.len();
    // Darken each time the palette wraps so labels 1 and 11 differ
    let shade = 1.0 - 0.3 * (((label as usize - 1) / BASE.len()) % 3) as f32;
    let [r, g, b] = BASE[idx].map(|c| (c as f32 * shade) as u8);
    egui::Color32::from_rgba_unmultiplied(r, g, b, ALPHA)
}

/// Render the mask as a translucent colour overlay.
pub fn colorize(mask: &Mask) -> egui::ColorImage {
    let (height, width) = mask.shape();
    let mut lut = [egui::Color32::TRANSPARENT; 256];
    for (label, color) in lut.iter_mut().enumerate() {
        *color = label_color(label as u8);
    }
    // Row-major iteration matches egui's pixel order
    let pixels = mask.as_array().iter().map(|&v| lut[v as usize]).collect();
    egui::ColorImage {
        size: [width, height],
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::geometry::Pixel;

    #[test]
    fn test_background_is_transparent() {
        assert_eq!(label_color(0), egui::Color32::TRANSPARENT);
        assert_ne!(label_color(1), egui::Color32::TRANSPARENT);
    }

    #[test]
    fn test_wrapped_labels_differ() {
        assert_ne!(label_color(1), label_color(11));
        assert_ne!(label_color(1), label_color(2));
    }

    #[test]
    fn test_colorize_layout() {
        let mut mask = Mask::zeros(2, 3);
        mask.paint(Pixel::new(2, 1), 0, 5);
        let image = colorize(&mask);
        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[5], label_color(5));
        assert_eq!(image.pixels[0], egui::Color32::TRANSPARENT);
    }
}
