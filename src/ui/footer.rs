use super::styles;
use crate::types::{AppState, AppStateRequest, ExportFormat};
use egui::{Color32, RichText};

pub fn draw_footer(ui: &mut egui::Ui, state: &mut AppState) {
    let width = ui.available_width();

    ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
        draw_view_controls(ui, state);

        if width > 560.0 {
            ui.separator();
            ui.label("🖱 Drag to pan, scroll to zoom");
        }

        if let Some(message) = state.status_message.clone() {
            ui.separator();
            ui.label(RichText::new(message).color(styles::COLOR_WARNING).small());
        }

        ui.separator();
        draw_export_controls(ui, state);
    });
}

fn draw_view_controls(ui: &mut egui::Ui, state: &mut AppState) {
    if ui.button("🔄 Reset Zoom").clicked() {
        state.reset_view();
    }
    ui.label(format!("🔍 Zoom: {:.1}x", state.zoom));
}

fn draw_export_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ui.scope(|ui| {
            apply_export_button_style(ui);
            let can_export = state.output_image.is_some() || state.input_image.is_some();
            let response = ui.add_enabled(can_export, egui::Button::new("💾 Export Image"));
            if response.clicked() {
                request_export(state);
            }
        });

        egui::ComboBox::from_id_salt("export_format_footer")
            .selected_text(state.preferences.export_format.display_name())
            .width(96.0)
            .show_ui(ui, |ui| {
                for format in ExportFormat::all() {
                    ui.selectable_value(
                        &mut state.preferences.export_format,
                        format,
                        format.display_name(),
                    );
                }
            });
    });
}

fn request_export(state: &mut AppState) {
    let default_name = state
        .input_file_name()
        .and_then(|name| {
            std::path::Path::new(&name)
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "image".to_string());

    let mut dialog = rfd::FileDialog::new()
        .add_filter("PNG Image", &["png"])
        .set_file_name(format!("{default_name}_recolored.png"));
    if let Some(dir) = &state.preferences.last_image_dir {
        dialog = dialog.set_directory(dir);
    }
    if let Some(path) = dialog.save_file() {
        if let Some(parent) = path.parent() {
            state.preferences.last_image_dir = Some(parent.to_path_buf());
        }
        let output_path = path.display().to_string();
        state.pending_app_state_request = Some(match state.preferences.export_format {
            ExportFormat::Png => AppStateRequest::ExportRecoloredPng { output_path },
            ExportFormat::PngIndexed => AppStateRequest::ExportIndexedPng { output_path },
        });
    }
}

fn apply_export_button_style(ui: &mut egui::Ui) {
    ui.style_mut().spacing.button_padding = egui::vec2(10.0, 4.0);
    let style = ui.style_mut();

    style.visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, Color32::WHITE);
    style.visuals.widgets.inactive.weak_bg_fill = styles::COLOR_ACCENT;

    style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, styles::COLOR_ACCENT_ACTIVE);
    style.visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, Color32::WHITE);
    style.visuals.widgets.hovered.weak_bg_fill = styles::COLOR_ACCENT;

    style.visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, styles::COLOR_ACCENT_ACTIVE);
    style.visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, Color32::WHITE);
    style.visuals.widgets.active.weak_bg_fill = styles::COLOR_ACCENT;
}
