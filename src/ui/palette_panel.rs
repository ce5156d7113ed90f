use super::styles::{self, UiMarginExt};
use crate::types::{AppState, GroupKey, HexSet, PaletteColor};
use egui::{Color32, Stroke, StrokeKind, Vec2};

/// Draws the extracted palette with the staging selection, the pixel
/// selection (isolation) controls, and the new-group form. Returns
/// (settings_changed, overlay_changed).
pub fn draw_palette_section(ui: &mut egui::Ui, state: &mut AppState) -> (bool, bool) {
    let mut settings_changed = false;
    let mut overlay_changed = false;

    let palette: Vec<PaletteColor> = match &state.session {
        Some(session) => session.palette().to_vec(),
        None => Vec::new(),
    };

    ui.heading_with_margin("Palette");
    if palette.is_empty() {
        ui.label("Load an image to see its palette.");
        return (settings_changed, overlay_changed);
    }

    ui.horizontal(|ui| {
        ui.label(format!("{} colors", palette.len()));
        if !state.staging_selection.is_empty() {
            ui.label(
                egui::RichText::new(format!("{} staged", state.staging_selection.len()))
                    .color(styles::COLOR_ACCENT),
            );
        }
    });
    ui.label(egui::RichText::new("Click colors to stage them for a new group.").weak());

    draw_palette_grid(ui, state, &palette);

    ui.separator();
    overlay_changed |= draw_isolation_controls(ui, state);

    ui.separator();
    settings_changed |= draw_new_group_form(ui, state);

    (settings_changed, overlay_changed)
}

fn draw_palette_grid(ui: &mut egui::Ui, state: &mut AppState, palette: &[PaletteColor]) {
    let mut toggled: Option<String> = None;

    ui.horizontal_wrapped(|ui| {
        ui.style_mut().spacing.item_spacing = egui::vec2(3.0, 3.0);
        for color in palette {
            let rgba = &color.original;
            let selected = state.staging_selection.contains(&color.hex);
            let overridden = state
                .session
                .as_ref()
                .is_some_and(|s| s.override_for(&color.hex).is_some());

            let response = color_swatch(
                ui,
                18.0,
                Color32::from_rgba_unmultiplied(rgba.r, rgba.g, rgba.b, rgba.a),
                selected,
                overridden,
            )
            .on_hover_text(format!("{} (alpha {})", color.hex, rgba.a));

            if response.clicked() {
                toggled = Some(color.hex.clone());
            }
        }
    });

    if let Some(hex) = toggled && !state.staging_selection.remove(&hex) {
        state.staging_selection.insert(hex);
    }
}

fn draw_isolation_controls(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut overlay_changed = false;

    ui.subheading_with_margin("Pixel Selection");

    let can_toggle = state.output_image.is_some();
    let label = if state.isolation_active {
        "🔍 Pixel Selection: ON"
    } else {
        "🔍 Pixel Selection: OFF"
    };
    if ui
        .add_enabled(can_toggle, egui::Button::new(label))
        .on_hover_text(
            "Click pixels on the image to select their original colors.\nUnselected colors are shown at 10% of their alpha.",
        )
        .clicked()
    {
        if state.isolation_active {
            state.stop_isolation();
        } else {
            // Editing and isolation clicks both go to the image; only one
            // mode can own them at a time.
            state.cancel_group_edit();
            state.isolation_active = true;
        }
        overlay_changed = true;
    }

    if state.isolation_active {
        ui.horizontal(|ui| {
            let count = state.isolation_selection.len();
            if ui
                .add_enabled(
                    count > 0,
                    egui::Button::new(format!("➕ Add Selection to Staging ({count})")),
                )
                .clicked()
            {
                let picked: Vec<String> = state.isolation_selection.to_vec();
                for hex in picked {
                    state.staging_selection.insert(hex);
                }
                state.isolation_selection = HexSet::new();
                overlay_changed = true;
            }
            if ui
                .add_enabled(count > 0, egui::Button::new("Clear"))
                .clicked()
            {
                state.isolation_selection = HexSet::new();
                overlay_changed = true;
            }
        });
    }

    overlay_changed
}

fn draw_new_group_form(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut settings_changed = false;

    ui.subheading_with_margin("New Group");
    let editing = state.staged_hexes.is_some();

    ui.add_enabled_ui(!editing, |ui| {
        ui.label(format!(
            "Name ({} colors staged)",
            state.staging_selection.len()
        ));
        ui.text_edit_singleline(&mut state.new_group_name);

        ui.horizontal(|ui| {
            let can_create =
                !state.new_group_name.trim().is_empty() && !state.staging_selection.is_empty();
            if ui
                .add_enabled(can_create, egui::Button::new("Create Group"))
                .clicked()
                && let Some(session) = &mut state.session
            {
                let name = state.new_group_name.clone();
                match session.create_group(&name, state.staging_selection.clone()) {
                    Ok(id) => {
                        state.active_group = GroupKey::named(id);
                        state.staging_selection = HexSet::new();
                        state.new_group_name = String::new();
                        state.selected_member_hex = None;
                        state.sync_active_settings();
                        settings_changed = true;
                    }
                    Err(e) => state.set_status(e),
                }
            }

            if ui
                .add_enabled(
                    !state.staging_selection.is_empty(),
                    egui::Button::new("Clear Staging"),
                )
                .clicked()
            {
                state.staging_selection = HexSet::new();
            }
        });
    });

    if editing {
        ui.label(
            egui::RichText::new("Finish editing the group's colors first.")
                .color(styles::COLOR_WARNING)
                .small(),
        );
    }

    settings_changed
}

pub(super) fn color_swatch(
    ui: &mut egui::Ui,
    size: f32,
    color: Color32,
    selected: bool,
    overridden: bool,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(size), egui::Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, 2.0, color);
    if selected {
        painter.rect_stroke(
            rect,
            2.0,
            Stroke::new(2.0, styles::COLOR_ACCENT),
            StrokeKind::Outside,
        );
    } else {
        painter.rect_stroke(
            rect,
            2.0,
            Stroke::new(1.0, Color32::from_gray(48)),
            StrokeKind::Middle,
        );
    }
    if overridden {
        painter.circle_filled(
            rect.right_top() + egui::vec2(-3.0, 3.0),
            2.5,
            styles::COLOR_WARNING,
        );
    }
    response
}
