mod footer;
mod group_panel;
mod header;
mod image_viewer;
mod palette_panel;
pub mod styles;

use crate::types::AppState;

pub struct UI;

impl UI {
    /// Side panel: group controls on top, the palette below. Returns
    /// `(settings_changed, overlay_changed)`.
    pub fn draw_settings_panel(ui: &mut egui::Ui, state: &mut AppState) -> (bool, bool) {
        let (mut settings_changed, mut overlay_changed) =
            group_panel::draw_group_section(ui, state);
        ui.separator();
        let (palette_settings, palette_overlay) = palette_panel::draw_palette_section(ui, state);
        settings_changed |= palette_settings;
        overlay_changed |= palette_overlay;
        (settings_changed, overlay_changed)
    }

    pub fn draw_image_view(
        ui: &mut egui::Ui,
        state: &mut AppState,
        image_processing: bool,
    ) -> (bool, bool) {
        image_viewer::draw_image_view(ui, state, image_processing)
    }

    pub fn draw_main_content(ui: &mut egui::Ui) {
        image_viewer::draw_main_content(ui)
    }

    pub fn draw_header(ui: &mut egui::Ui, state: &mut AppState) {
        header::draw_header(ui, state)
    }

    pub fn draw_footer(ui: &mut egui::Ui, state: &mut AppState) {
        footer::draw_footer(ui, state)
    }
}
