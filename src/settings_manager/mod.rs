use crate::color_math::{hex_to_rgb, rgb_to_hex};
use crate::session::RecolorSession;
use crate::types::group::{AppliedGroupSettings, DEFAULT_TINT_COLOR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_tint_color() -> String {
    "#ffffff".to_string()
}

/// One group as persisted in a preset file. `brightness` is the lightness
/// delta under its historical name; missing tint fields fall back to an
/// untinted white.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetGroup {
    pub name: String,
    pub colors: Vec<String>,
    #[serde(default)]
    pub hue: f32,
    #[serde(default)]
    pub saturation: f32,
    #[serde(default)]
    pub brightness: f32,
    #[serde(default)]
    pub contrast: f32,
    #[serde(default = "default_tint_color")]
    pub tint_color: String,
    #[serde(default)]
    pub tint_strength: f32,
}

/// A saved set of color groups for one specific image. Loading replaces
/// the session's whole group list, and only applies when `imageName`
/// matches the currently loaded file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecolorPreset {
    pub image_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub groups: Vec<PresetGroup>,
}

impl RecolorPreset {
    pub fn from_session(image_name: &str, session: &RecolorSession) -> Self {
        let groups = session
            .groups()
            .iter()
            .map(|group| {
                let settings = session.settings_for(&group.key());
                PresetGroup {
                    name: group.name.clone(),
                    colors: group.hexes.to_vec(),
                    hue: settings.hue_delta,
                    saturation: settings.saturation_delta,
                    brightness: settings.lightness_delta,
                    contrast: settings.contrast_delta,
                    tint_color: rgb_to_hex(&settings.tint_color),
                    tint_strength: settings.tint_amount,
                }
            })
            .collect();

        Self {
            image_name: image_name.to_string(),
            group_name: None,
            author_name: None,
            groups,
        }
    }

    /// Installs the preset's groups into the session, replacing the
    /// current list. Rejected when it was saved for a different image.
    pub fn apply_to_session(
        &self,
        current_image_name: &str,
        session: &mut RecolorSession,
    ) -> Result<(), String> {
        if self.image_name != current_image_name {
            return Err(format!(
                "Preset was saved for '{}' and does not match the current image '{}'",
                self.image_name, current_image_name
            ));
        }

        let entries = self
            .groups
            .iter()
            .map(|group| {
                let tint_color = hex_to_rgb(&group.tint_color).unwrap_or(DEFAULT_TINT_COLOR);
                (
                    group.name.clone(),
                    group.colors.clone(),
                    AppliedGroupSettings {
                        hue_delta: group.hue,
                        saturation_delta: group.saturation,
                        lightness_delta: group.brightness,
                        contrast_delta: group.contrast,
                        alpha_delta: 0.0,
                        tint_color,
                        tint_amount: group.tint_strength,
                    },
                )
            })
            .collect();
        session.load_groups(entries);
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json_data = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json_data).map_err(|e| format!("Failed to write preset file: {}", e))?;

        log::info!("Preset saved to: {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let json_data =
            fs::read_to_string(&path).map_err(|e| format!("Failed to read preset file: {}", e))?;

        let preset = serde_json::from_str::<RecolorPreset>(&json_data)
            .map_err(|e| format!("Failed to parse preset file: {}", e))?;

        log::info!("Preset loaded from: {}", path.as_ref().display());
        Ok(preset)
    }

    pub fn get_default_settings_dir() -> Result<std::path::PathBuf, String> {
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("RecolorGUI");
            if !app_config_dir.exists() {
                fs::create_dir_all(&app_config_dir)
                    .map_err(|e| format!("Failed to create config directory: {}", e))?;
            }
            Ok(app_config_dir)
        } else {
            Err("Could not determine config directory".to_string())
        }
    }

    pub fn default_file_name(image_name: &str) -> String {
        format!("{}_groups.json", image_name)
    }

    pub fn get_preset_file_extension() -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::color::Rgba;
    use crate::types::group::GroupKey;

    fn session_with_reds() -> RecolorSession {
        let data: Vec<u8> = [
            [255u8, 0, 0, 255],
            [200, 0, 0, 255],
            [255, 255, 255, 255],
            [0, 0, 0, 0],
        ]
        .concat();
        RecolorSession::from_rgba(4, 1, data).unwrap()
    }

    #[test]
    fn test_preset_serialization() {
        let preset = RecolorPreset {
            image_name: "sprite.png".to_string(),
            group_name: Some("night palette".to_string()),
            author_name: None,
            groups: vec![PresetGroup {
                name: "Reds".to_string(),
                colors: vec!["#ff0000".to_string()],
                hue: 12.0,
                saturation: -5.0,
                brightness: 3.0,
                contrast: 0.0,
                tint_color: "#0000ff".to_string(),
                tint_strength: 100.0,
            }],
        };

        let json = serde_json::to_string(&preset).unwrap();
        assert!(json.contains("\"imageName\""));
        assert!(json.contains("\"tintStrength\""));
        assert!(!json.contains("authorName"));

        let deserialized: RecolorPreset = serde_json::from_str(&json).unwrap();
        assert_eq!(preset, deserialized);
    }

    #[test]
    fn missing_tint_fields_fall_back_to_untinted_white() {
        let json = r##"{
            "imageName": "sprite.png",
            "groups": [
                { "name": "Reds", "colors": ["#ff0000"], "hue": 10 }
            ]
        }"##;
        let preset: RecolorPreset = serde_json::from_str(json).unwrap();
        let group = &preset.groups[0];
        assert_eq!(group.tint_color, "#ffffff");
        assert_eq!(group.tint_strength, 0.0);
        assert_eq!(group.brightness, 0.0);
        assert_eq!(group.hue, 10.0);
    }

    #[test]
    fn apply_rejects_mismatched_image_name() {
        let mut session = session_with_reds();
        let preset = RecolorPreset {
            image_name: "other.png".to_string(),
            group_name: None,
            author_name: None,
            groups: Vec::new(),
        };
        let err = preset
            .apply_to_session("sprite.png", &mut session)
            .unwrap_err();
        assert!(err.contains("does not match"), "{err}");
        // The session's groups were left alone.
        assert!(!session.groups().is_empty());
    }

    #[test]
    fn save_then_apply_round_trips_groups_and_settings() {
        let mut session = session_with_reds();
        let id = session
            .create_group("Warm", ["#ff0000", "#c80000"].into_iter().collect())
            .unwrap();
        let mut settings = session.settings_for(&GroupKey::named(&id));
        settings.hue_delta = -30.0;
        settings.tint_color = Rgba::opaque(0, 0, 255);
        settings.tint_amount = 80.0;
        session.set_settings(GroupKey::named(&id), settings.clone());

        let preset = RecolorPreset::from_session("sprite.png", &session);

        let mut restored = session_with_reds();
        preset
            .apply_to_session("sprite.png", &mut restored)
            .unwrap();

        let names: Vec<&str> = restored.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Warm", "Whites", "Reds"]);

        let warm = &restored.groups()[0];
        assert_eq!(warm.hexes.to_vec(), vec!["#ff0000", "#c80000"]);
        let applied = restored.settings_for(&warm.key());
        assert_eq!(applied.hue_delta, -30.0);
        assert_eq!(applied.tint_color, Rgba::opaque(0, 0, 255));
        assert_eq!(applied.tint_amount, 80.0);
    }
}
