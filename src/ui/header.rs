use crate::settings_manager::RecolorPreset;
use crate::types::{AppState, AppStateRequest, AppearanceMode};
use rfd::FileDialog;

pub fn draw_header(ui: &mut egui::Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
            draw_file_selection(ui, state);
            ui.separator();
            draw_preset_buttons(ui, state);
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            draw_appearance_selector(ui, state);
            ui.separator();
            ui.checkbox(&mut state.preferences.show_original_image, "Original Image");
            ui.label("View:");
        });
    });
}

fn draw_file_selection(ui: &mut egui::Ui, state: &mut AppState) {
    if ui.button("📁 Open Image…").clicked() {
        let mut dialog = FileDialog::new().add_filter("Image files", &["png", "jpg", "jpeg", "bmp", "gif"]);
        if let Some(dir) = &state.preferences.last_image_dir {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            if let Some(parent) = path.parent() {
                state.preferences.last_image_dir = Some(parent.to_path_buf());
            }
            state.pending_app_state_request = Some(AppStateRequest::LoadImage {
                path: path.display().to_string(),
            });
        }
    }

    if let Some(name) = state.input_file_name() {
        ui.label(format!("📄 {name}"));
    }
}

fn draw_preset_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    let has_session = state.session.is_some();

    if ui
        .add_enabled(has_session, egui::Button::new("💾 Save Preset"))
        .on_hover_text("Save the current groups and their settings as a JSON preset")
        .clicked()
        && let Some(image_name) = state.input_file_name()
    {
        let mut dialog = FileDialog::new()
            .add_filter("Preset files", &[RecolorPreset::get_preset_file_extension()])
            .set_file_name(RecolorPreset::default_file_name(&image_name));
        if let Some(dir) = &state.preferences.last_preset_dir {
            dialog = dialog.set_directory(dir);
        } else if let Ok(dir) = RecolorPreset::get_default_settings_dir() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.save_file() {
            if let Some(parent) = path.parent() {
                state.preferences.last_preset_dir = Some(parent.to_path_buf());
            }
            state.pending_app_state_request = Some(AppStateRequest::SavePreset {
                path: path.display().to_string(),
            });
        }
    }

    if ui
        .add_enabled(has_session, egui::Button::new("📂 Load Preset"))
        .on_hover_text("Replace all groups with the contents of a saved preset")
        .clicked()
    {
        let mut dialog = FileDialog::new()
            .add_filter("Preset files", &[RecolorPreset::get_preset_file_extension()]);
        if let Some(dir) = &state.preferences.last_preset_dir {
            dialog = dialog.set_directory(dir);
        } else if let Ok(dir) = RecolorPreset::get_default_settings_dir() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            if let Some(parent) = path.parent() {
                state.preferences.last_preset_dir = Some(parent.to_path_buf());
            }
            state.pending_app_state_request = Some(AppStateRequest::LoadPreset {
                path: path.display().to_string(),
            });
        }
    }
}

fn draw_appearance_selector(ui: &mut egui::Ui, state: &mut AppState) {
    egui::ComboBox::from_id_salt("appearance_mode")
        .selected_text(appearance_label(state.preferences.appearance_mode))
        .width(72.0)
        .show_ui(ui, |ui| {
            for mode in [
                AppearanceMode::System,
                AppearanceMode::Light,
                AppearanceMode::Dark,
            ] {
                ui.selectable_value(
                    &mut state.preferences.appearance_mode,
                    mode,
                    appearance_label(mode),
                );
            }
        });
}

fn appearance_label(mode: AppearanceMode) -> &'static str {
    match mode {
        AppearanceMode::System => "System",
        AppearanceMode::Light => "Light",
        AppearanceMode::Dark => "Dark",
    }
}
