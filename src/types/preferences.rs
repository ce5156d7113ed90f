use std::path::PathBuf;

use super::app_state::AppearanceMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
    PngIndexed,
}

impl ExportFormat {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG",
            ExportFormat::PngIndexed => "Indexed PNG",
        }
    }

    pub fn all() -> [ExportFormat; 2] {
        [ExportFormat::Png, ExportFormat::PngIndexed]
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UserPreferences {
    pub appearance_mode: AppearanceMode,
    pub show_original_image: bool,
    #[serde(default)]
    pub export_format: ExportFormat,
    #[serde(default)]
    pub last_image_dir: Option<PathBuf>,
    #[serde(default)]
    pub last_preset_dir: Option<PathBuf>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            appearance_mode: AppearanceMode::default(),
            show_original_image: true,
            export_format: ExportFormat::default(),
            last_image_dir: None,
            last_preset_dir: None,
        }
    }
}

impl UserPreferences {
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("RecolorGUI").join("preferences.json")
        } else {
            PathBuf::from("preferences.json")
        }
    }

    pub fn load() -> Self {
        let path = Self::config_path();
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(prefs) = serde_json::from_str(&content)
        {
            return prefs;
        }
        Self::default()
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
