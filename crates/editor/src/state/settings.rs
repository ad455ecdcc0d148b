//! Tool settings

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::preview::Rgb;

/// Fillet tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilletSettings {
    /// Radius text offered when a fillet session opens
    pub default_radius: String,
    /// Order candidates by distance of their tangent points to the picks
    pub sort_by_pick: bool,
}

impl Default for FilletSettings {
    fn default() -> Self {
        Self {
            default_radius: "1".to_string(),
            sort_by_pick: true,
        }
    }
}

/// Preview drawing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Candidates that are not highlighted
    pub candidate_color: Rgb,
    /// Highlighted candidate
    pub highlight_color: Rgb,
    /// Half-turn complement candidates
    pub complement_color: Rgb,
    pub tangent_point_color: Rgb,
    pub intersection_point_color: Rgb,
    pub candidate_thickness: f32,
    pub highlight_thickness: f32,
    /// Complements are drawn thinner so both half turns stay visible
    pub complement_thickness: f32,
    pub candidate_opacity: f32,
    pub highlight_opacity: f32,
    /// Marker diameter in pixels
    pub point_diameter: f32,
    /// Even number of arc subdivisions
    pub arc_samples: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            candidate_color: [120, 120, 130],
            highlight_color: [0, 220, 255],
            complement_color: [255, 170, 0],
            tangent_point_color: [255, 80, 80],
            intersection_point_color: [80, 255, 120],
            candidate_thickness: 1.5,
            highlight_thickness: 3.0,
            complement_thickness: 1.0,
            candidate_opacity: 0.5,
            highlight_opacity: 1.0,
            point_diameter: 7.0,
            arc_samples: 32,
        }
    }
}

/// All tool settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default)]
    pub fillet: FilletSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

impl ToolSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "lathe", "lathe-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the platform config dir, or return default if not found
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                tracing::debug!("settings not loaded from {}: {e}", path.display());
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the platform config dir
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
