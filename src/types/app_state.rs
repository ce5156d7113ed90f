use egui::Vec2;

use super::group::{AppliedGroupSettings, GroupKey, HexSet};
use super::image::ImageData;
use super::preferences::UserPreferences;
use crate::session::RecolorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AppearanceMode {
    System,
    Light,
    Dark,
}

impl Default for AppearanceMode {
    fn default() -> Self {
        AppearanceMode::System
    }
}

// File I/O request types, drained once per frame
#[derive(Debug, Clone)]
pub enum AppStateRequest {
    LoadImage { path: String },
    ExportRecoloredPng { output_path: String },
    ExportIndexedPng { output_path: String },
    SavePreset { path: String },
    LoadPreset { path: String },
}

#[derive(Debug, Clone)]
pub struct RecolorRequest {
    pub time: std::time::Instant,
}

/// State for cycling the active group through the groups containing a
/// clicked pixel. The matching ids are snapshotted at the first click;
/// `cycle_index` is -1 once the cycle has wrapped to the sentinel.
#[derive(Debug, Clone)]
pub struct PixelClickCycle {
    pub hex: String,
    pub matching_group_ids: Vec<String>,
    pub cycle_index: isize,
}

pub struct AppState {
    // Image and model
    pub input_path: Option<String>,
    pub input_image: Option<ImageData>,
    pub output_image: Option<ImageData>,
    pub isolation_image: Option<ImageData>,
    pub session: Option<RecolorSession>,

    // Group focus and interaction modes
    pub active_group: GroupKey,
    pub quick_recolor_mode: bool,
    pub editing_group_id: Option<String>,
    pub staged_hexes: Option<HexSet>,
    pub staging_selection: HexSet,
    pub isolation_active: bool,
    pub isolation_selection: HexSet,
    pub last_clicked_pixel: Option<PixelClickCycle>,

    // Sliders bind to the active group's settings; writes flow back to
    // the session when a change is detected.
    pub active_settings: AppliedGroupSettings,
    last_active_settings: AppliedGroupSettings,
    pub tint_hex_input: String,

    // Panel input buffers
    pub new_group_name: String,
    pub rename_group: Option<(String, String)>,
    pub save_as_new_name: Option<String>,
    pub selected_member_hex: Option<String>,
    pub override_color_input: [u8; 3],
    pub status_message: Option<String>,

    // View settings
    pub zoom: f32,
    pub pan_offset: Vec2,
    pub preferences: UserPreferences,
    last_preferences: UserPreferences,

    // Recompute debounce
    pub request_update_recolored_image: Option<RecolorRequest>,
    pub debounce_delay: std::time::Duration,

    // File I/O requests
    pub pending_app_state_request: Option<AppStateRequest>,
}

impl Default for AppState {
    fn default() -> Self {
        let preferences = UserPreferences::load();
        Self {
            input_path: None,
            input_image: None,
            output_image: None,
            isolation_image: None,
            session: None,

            active_group: GroupKey::AllColors,
            quick_recolor_mode: false,
            editing_group_id: None,
            staged_hexes: None,
            staging_selection: HexSet::new(),
            isolation_active: false,
            isolation_selection: HexSet::new(),
            last_clicked_pixel: None,

            active_settings: AppliedGroupSettings::default(),
            last_active_settings: AppliedGroupSettings::default(),
            tint_hex_input: "#ffffff".to_string(),

            new_group_name: String::new(),
            rename_group: None,
            save_as_new_name: None,
            selected_member_hex: None,
            override_color_input: [255, 255, 255],
            status_message: None,

            zoom: 1.0,
            pan_offset: Vec2::ZERO,
            preferences: preferences.clone(),
            last_preferences: preferences,

            request_update_recolored_image: None,
            debounce_delay: std::time::Duration::from_millis(100),

            pending_app_state_request: None,
        }
    }
}

impl AppState {
    pub fn check_and_save_preferences(&mut self) {
        if self.preferences != self.last_preferences {
            self.last_preferences = self.preferences.clone();
            if let Err(e) = self.preferences.save() {
                log::error!("Failed to save preferences: {}", e);
            }
        }
    }

    /// Check if the active group's sliders have moved since last frame
    pub fn active_settings_changed(&self) -> bool {
        self.active_settings != self.last_active_settings
    }

    /// Update the tracked slider state
    pub fn update_active_settings_tracking(&mut self) {
        self.last_active_settings = self.active_settings.clone();
    }

    /// Arms the debounce; the recompute starts once no further change
    /// lands within the delay.
    pub fn request_recolor(&mut self) {
        self.request_update_recolored_image = Some(RecolorRequest {
            time: std::time::Instant::now(),
        });
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Pulls the active group's stored settings into the slider state.
    /// Called after switching groups or mutating the session.
    pub fn sync_active_settings(&mut self) {
        let settings = match &self.session {
            Some(session) => session.settings_for(&self.active_group),
            None => AppliedGroupSettings::default(),
        };
        self.tint_hex_input = crate::color_math::rgb_to_hex(&settings.tint_color);
        self.active_settings = settings.clone();
        self.last_active_settings = settings;
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan_offset = Vec2::ZERO;
    }

    pub fn cancel_group_edit(&mut self) {
        self.editing_group_id = None;
        self.staged_hexes = None;
        self.save_as_new_name = None;
    }

    pub fn stop_isolation(&mut self) {
        self.isolation_active = false;
        self.isolation_selection = HexSet::new();
        self.isolation_image = None;
    }

    /// Clears everything tied to the previous image. Called right before a
    /// newly loaded session is installed.
    pub fn reset_for_new_image(&mut self) {
        self.output_image = None;
        self.active_group = GroupKey::AllColors;
        self.quick_recolor_mode = false;
        self.cancel_group_edit();
        self.staging_selection = HexSet::new();
        self.stop_isolation();
        self.last_clicked_pixel = None;
        self.new_group_name = String::new();
        self.rename_group = None;
        self.selected_member_hex = None;
        self.status_message = None;
        self.reset_view();
    }

    /// File name of the loaded image, used for preset matching and the
    /// header label.
    pub fn input_file_name(&self) -> Option<String> {
        self.input_path.as_ref().and_then(|path| {
            std::path::Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }
}
