// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! framemask - frame mask annotation helper
//!
//! A desktop tool for painting per-pixel label masks over a sequence of
//! image frames. Each frame's mask is seeded from the mask of the frame
//! `step` positions earlier and saved as a NumPy array.

mod app;
mod error;
mod io;
mod models;
mod ui;
mod util;

#[cfg(test)]
mod test_util;

use anyhow::{Context, Result};
use app::FramemaskApp;
use clap::Parser;
use models::config::{AnnotatorConfig, CropMargins};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Data root containing `frames/` and `masks/` (asks when omitted)
    root: Option<PathBuf>,

    /// Settings file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame gap between a frame and the frame seeding its mask
    #[arg(short, long)]
    step: Option<u32>,

    /// Keep frames uncropped (individual margins still apply)
    #[arg(long)]
    no_crop: bool,

    #[arg(long)]
    crop_top: Option<u32>,

    #[arg(long)]
    crop_bottom: Option<u32>,

    #[arg(long)]
    crop_left: Option<u32>,

    #[arg(long)]
    crop_right: Option<u32>,
}

impl Args {
    /// Defaults, then the settings file, then command-line overrides.
    fn resolve_config(&self) -> Result<AnnotatorConfig> {
        let mut config = match &self.config {
            Some(path) => io::serialization::load_config(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => AnnotatorConfig::default(),
        };
        if let Some(step) = self.step {
            config.step = step;
        }
        if self.no_crop {
            config.crop = CropMargins::NONE;
        }
        let crop = &mut config.crop;
        crop.top = self.crop_top.unwrap_or(crop.top);
        crop.bottom = self.crop_bottom.unwrap_or(crop.bottom);
        crop.left = self.crop_left.unwrap_or(crop.left);
        crop.right = self.crop_right.unwrap_or(crop.right);
        anyhow::ensure!(config.step > 0, "step must be at least 1");
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let root = match args.root.clone() {
        Some(root) => root,
        None => rfd::FileDialog::new()
            .set_title("Choose a data folder with frames/ and masks/")
            .pick_folder()
            .context("No data folder selected")?,
    };
    log::info!("Annotating {} with {:?}", root.display(), config);

    let app = FramemaskApp::new(root, config)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("framemask"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native("framemask", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let args = Args::parse_from(["framemask", "data", "--step", "5", "--crop-top", "0"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.step, 5);
        assert_eq!(config.crop.top, 0);
        assert_eq!(config.crop.bottom, 300);
        assert_eq!(args.root, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_no_crop_with_override() {
        let args = Args::parse_from(["framemask", "--no-crop", "--crop-left", "8"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.crop, CropMargins { left: 8, ..CropMargins::NONE });
    }

    #[test]
    fn test_zero_step_rejected() {
        let args = Args::parse_from(["framemask", "--step", "0"]);
        assert!(args.resolve_config().is_err());
    }
}
