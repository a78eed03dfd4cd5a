// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration file serialization and deserialization.
//!
//! This module handles reading and writing annotator settings in YAML
//! and JSON formats, chosen by file extension.

use crate::error::{AnnotateError, Result};
use crate::models::config::AnnotatorConfig;
use std::path::Path;

/// Load settings from a `.yaml`/`.yml` or `.json` file.
pub fn load_config(path: &Path) -> Result<AnnotatorConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| AnnotateError::io(path, e))?;
    let config = match extension(path) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&text).map_err(|e| AnnotateError::Config(e.to_string()))?
        }
        Some("json") => {
            serde_json::from_str(&text).map_err(|e| AnnotateError::Config(e.to_string()))?
        }
        other => return Err(unsupported(other)),
    };
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write settings to a `.yaml`/`.yml` or `.json` file.
pub fn save_config(config: &AnnotatorConfig, path: &Path) -> Result<()> {
    let text = match extension(path) {
        Some("yaml") | Some("yml") => {
            serde_yaml::to_string(config).map_err(|e| AnnotateError::Config(e.to_string()))?
        }
        Some("json") => serde_json::to_string_pretty(config)
            .map_err(|e| AnnotateError::Config(e.to_string()))?,
        other => return Err(unsupported(other)),
    };
    std::fs::write(path, text).map_err(|e| AnnotateError::io(path, e))?;
    Ok(())
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|s| s.to_str())
}

fn unsupported(extension: Option<&str>) -> AnnotateError {
    AnnotateError::Config(format!("unsupported config file extension: {:?}", extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::CropMargins;
    use crate::test_util::TempDir;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let dir = TempDir::new("config_yaml");
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "step: 5\ncrop:\n  top: 10\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.step, 5);
        assert_eq!(config.crop.top, 10);
        assert_eq!(config.crop.bottom, CropMargins::default().bottom);
        assert_eq!(config.brush_radius, AnnotatorConfig::default().brush_radius);
    }

    #[test]
    fn test_json_save_and_load() {
        let dir = TempDir::new("config_json");
        let path = dir.path().join("settings.json");
        let config = AnnotatorConfig {
            step: 3,
            crop: CropMargins::NONE,
            ..Default::default()
        };

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = TempDir::new("config_ext");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "step = 2").unwrap();
        assert!(matches!(load_config(&path), Err(AnnotateError::Config(_))));
    }
}
