//! Group controls: the active-group selector, adjustment sliders, quick
//! recolor tint rows and the member list with primary/override actions.

use super::palette_panel::color_swatch;
use super::styles::{self, UiMarginExt};
use crate::color_math::{hex_to_rgb, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
use crate::session::RecolorSession;
use crate::tint::{apply_pixel_tint, calculate_tinted_color_for_group_member};
use crate::types::group::{
    ALPHA_DELTA_RANGE, CONTRAST_DELTA_RANGE, HUE_DELTA_RANGE, LIGHTNESS_DELTA_RANGE,
    SATURATION_DELTA_RANGE, TINT_AMOUNT_RANGE,
};
use crate::types::{AppState, AppliedGroupSettings, GroupKey, HexSet, Hsl, Rgba};
use egui::{Color32, ComboBox, Grid, RichText, Slider, Stroke, StrokeKind, TextEdit};
use regex::Regex;

const SLIDER_WIDTH: f32 = 110.0;
const SWATCH_SIZE: f32 = 18.0;

/// Display snapshot of one named group, taken before the widgets below
/// hand mutable access back to the session.
struct GroupRow {
    id: String,
    name: String,
    len: usize,
    modified: bool,
    tint: Rgba,
}

/// Returns `(settings_changed, overlay_changed)`. The first requests a
/// debounced recolor, the second a rebuild of the dimming overlay.
pub fn draw_group_section(ui: &mut egui::Ui, state: &mut AppState) -> (bool, bool) {
    let mut settings_changed = false;
    let mut overlay_changed = false;

    ui.heading_with_margin("Color Groups");

    let Some((rows, palette_len, sentinel_modified)) = snapshot_groups(state) else {
        ui.label("Load an image to create color groups.");
        return (false, false);
    };

    let editing = state.editing_group_id.is_some();
    ui.add_enabled_ui(!editing, |ui| {
        settings_changed |= draw_group_selector(ui, state, &rows, palette_len, sentinel_modified);
        settings_changed |= draw_copy_and_quick_controls(ui, state, &rows);
        settings_changed |= draw_group_management(ui, state, &rows);
    });

    ui.add_space(8.0);
    if state.quick_recolor_mode && !editing {
        settings_changed |= draw_quick_tint_rows(ui, state, &rows);
    } else {
        settings_changed |= draw_adjustments(ui, state);
        if let GroupKey::Named(active_id) = state.active_group.clone() {
            ui.add_space(8.0);
            let (s, o) = draw_group_details(ui, state, &active_id);
            settings_changed |= s;
            overlay_changed |= o;
        }
    }

    (settings_changed, overlay_changed)
}

fn snapshot_groups(state: &AppState) -> Option<(Vec<GroupRow>, usize, bool)> {
    let session = state.session.as_ref()?;
    let rows = session
        .groups()
        .iter()
        .map(|group| GroupRow {
            id: group.id.clone(),
            name: group.name.clone(),
            len: group.hexes.len(),
            modified: session.is_group_modified(&group.key()),
            tint: session.settings_for(&group.key()).tint_color,
        })
        .collect();
    let sentinel_modified = session.is_group_modified(&GroupKey::AllColors);
    Some((rows, session.palette().len(), sentinel_modified))
}

fn group_label(name: &str, len: usize, modified: bool) -> String {
    let star = if modified { "*" } else { "" };
    format!("{star}{name} ({len} colors)")
}

fn draw_group_selector(
    ui: &mut egui::Ui,
    state: &mut AppState,
    rows: &[GroupRow],
    palette_len: usize,
    sentinel_modified: bool,
) -> bool {
    let mut changed = false;
    let mut new_active: Option<GroupKey> = None;

    let selected_text = match &state.active_group {
        GroupKey::AllColors => group_label("All Colors", palette_len, sentinel_modified),
        GroupKey::Named(id) => rows
            .iter()
            .find(|row| row.id == *id)
            .map(|row| group_label(&row.name, row.len, row.modified))
            .unwrap_or_else(|| group_label("All Colors", palette_len, sentinel_modified)),
    };

    ui.horizontal(|ui| {
        ui.label("Active group:");
        ComboBox::from_id_salt("active_group")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                let all = group_label("All Colors", palette_len, sentinel_modified);
                if ui
                    .selectable_label(state.active_group.is_all_colors(), all)
                    .clicked()
                {
                    new_active = Some(GroupKey::AllColors);
                }
                for row in rows {
                    let checked = state.active_group == GroupKey::named(&row.id);
                    let text = group_label(&row.name, row.len, row.modified);
                    if ui.selectable_label(checked, text).clicked() {
                        new_active = Some(GroupKey::named(&row.id));
                    }
                }
            });
    });

    if let Some(key) = new_active
        && key != state.active_group
    {
        state.active_group = key;
        state.selected_member_hex = None;
        state.sync_active_settings();
        changed = true;
    }
    changed
}

fn draw_copy_and_quick_controls(ui: &mut egui::Ui, state: &mut AppState, rows: &[GroupRow]) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        let has_named = !rows.is_empty();
        let quick_label = if state.quick_recolor_mode {
            "Quick Recolor: ON"
        } else {
            "Quick Recolor: OFF"
        };
        let quick = ui
            .add_enabled(has_named, egui::Button::new(quick_label))
            .on_hover_text("One tint picker per group instead of the full adjustment sliders");
        if quick.clicked() {
            state.quick_recolor_mode = !state.quick_recolor_mode;
            if !state.quick_recolor_mode {
                // Back to sliders: reload them from the stored settings.
                state.sync_active_settings();
            }
            changed = true;
        }

        let sources: Vec<&GroupRow> = rows
            .iter()
            .filter(|row| GroupKey::named(&row.id) != state.active_group)
            .collect();
        let can_copy = matches!(state.active_group, GroupKey::Named(_)) && !sources.is_empty();
        ui.add_enabled_ui(can_copy, |ui| {
            ComboBox::from_id_salt("copy_settings_from")
                .selected_text("Copy from…")
                .show_ui(ui, |ui| {
                    for row in &sources {
                        if ui.selectable_label(false, &row.name).clicked() {
                            let GroupKey::Named(target) = state.active_group.clone() else {
                                return;
                            };
                            if let Some(session) = &mut state.session {
                                match session.copy_settings_from(&row.id, &target) {
                                    Ok(()) => {
                                        state.sync_active_settings();
                                        changed = true;
                                    }
                                    Err(err) => state.set_status(err),
                                }
                            }
                        }
                    }
                });
        });
    });
    changed
}

/// Rename and delete controls for the active named group. Hidden for the
/// whole-palette entry, which is not a stored group.
fn draw_group_management(ui: &mut egui::Ui, state: &mut AppState, rows: &[GroupRow]) -> bool {
    let GroupKey::Named(active_id) = state.active_group.clone() else {
        return false;
    };
    let Some(row) = rows.iter().find(|row| row.id == active_id) else {
        return false;
    };
    let mut changed = false;

    let renaming = state
        .rename_group
        .as_ref()
        .is_some_and(|(id, _)| *id == active_id);
    if state.rename_group.is_some() && !renaming {
        // Buffer left over from a previously active group.
        state.rename_group = None;
    }

    ui.horizontal(|ui| {
        if renaming {
            let mut confirm = false;
            let mut cancel = false;
            if let Some((_, buffer)) = &mut state.rename_group {
                ui.add(TextEdit::singleline(buffer).desired_width(140.0));
                confirm = ui.small_button("✔").clicked();
                cancel = ui.small_button("✖").clicked();
            }
            if confirm {
                let name = state
                    .rename_group
                    .take()
                    .map(|(_, buffer)| buffer)
                    .unwrap_or_default();
                let name = name.trim().to_string();
                if name.is_empty() {
                    state.set_status("Group name cannot be empty");
                } else if let Some(session) = &mut state.session
                    && let Err(err) = session.rename_group(&active_id, &name)
                {
                    state.set_status(err);
                }
            } else if cancel {
                state.rename_group = None;
            }
        } else {
            if ui.small_button("Rename").clicked() {
                state.rename_group = Some((active_id.clone(), row.name.clone()));
            }
            let delete = ui
                .small_button("🗑 Delete")
                .on_hover_text("Delete this group. Its colors return to the ungrouped palette.");
            if delete.clicked()
                && let Some(session) = &mut state.session
            {
                match session.delete_group(&active_id) {
                    Ok(()) => {
                        state.active_group = GroupKey::AllColors;
                        state.selected_member_hex = None;
                        state.sync_active_settings();
                        changed = true;
                    }
                    Err(err) => state.set_status(err),
                }
            }
        }
    });
    changed
}

fn draw_quick_tint_rows(ui: &mut egui::Ui, state: &mut AppState, rows: &[GroupRow]) -> bool {
    let mut changed = false;

    ui.subheading_with_margin("Quick Recolor");
    ui.label(
        RichText::new("Pick a tint color for each group.")
            .small()
            .weak(),
    );

    for row in rows {
        ui.horizontal(|ui| {
            let reset = ui
                .add_enabled(row.modified, egui::Button::new("R").small())
                .on_hover_text("Reset this group to its initial settings");
            if reset.clicked()
                && let Some(session) = &mut state.session
            {
                match session.reset_group_to_initial(&row.id) {
                    Ok(()) => {
                        if state.active_group == GroupKey::named(&row.id) {
                            state.sync_active_settings();
                        }
                        changed = true;
                    }
                    Err(err) => state.set_status(err),
                }
            }
            ui.label(format!("{} ({})", row.name, row.len));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(rgb_to_hex(&row.tint).to_uppercase())
                        .monospace()
                        .small(),
                );
                let mut rgb = [row.tint.r, row.tint.g, row.tint.b];
                if ui.color_edit_button_srgb(&mut rgb).changed()
                    && let Some(session) = &mut state.session
                {
                    session.set_quick_tint(
                        GroupKey::named(&row.id),
                        Rgba::opaque(rgb[0], rgb[1], rgb[2]),
                    );
                    if state.active_group == GroupKey::named(&row.id) {
                        state.sync_active_settings();
                    }
                    changed = true;
                }
            });
        });
    }
    changed
}

fn draw_adjustments(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.subheading_with_margin("Adjustments");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let reset = ui
                .small_button("Reset")
                .on_hover_text("Reset the active group's adjustments to defaults");
            if reset.clicked()
                && let Some(session) = &mut state.session
            {
                session.set_settings(state.active_group.clone(), AppliedGroupSettings::default());
                state.sync_active_settings();
                changed = true;
            }
        });
    });

    Grid::new("adjustment_sliders")
        .num_columns(3)
        .spacing([4.0, 6.0])
        .show(ui, |ui| {
            changed |= slider_row(
                ui,
                "Hue",
                &mut state.active_settings.hue_delta,
                HUE_DELTA_RANGE,
                "°",
            );
            changed |= slider_row(
                ui,
                "Saturation",
                &mut state.active_settings.saturation_delta,
                SATURATION_DELTA_RANGE,
                "%",
            );
            changed |= slider_row(
                ui,
                "Lightness",
                &mut state.active_settings.lightness_delta,
                LIGHTNESS_DELTA_RANGE,
                "%",
            );
            changed |= slider_row(
                ui,
                "Contrast",
                &mut state.active_settings.contrast_delta,
                CONTRAST_DELTA_RANGE,
                "%",
            );
            changed |= slider_row(
                ui,
                "Alpha",
                &mut state.active_settings.alpha_delta,
                ALPHA_DELTA_RANGE,
                "%",
            );
        });

    ui.horizontal(|ui| {
        ui.label(RichText::new("Alpha:").small().weak());
        for preset in [-100.0_f32, -50.0, 0.0] {
            if ui.small_button(format!("{preset:.0}%")).clicked() {
                state.active_settings.alpha_delta = preset;
                changed = true;
            }
        }
    });

    ui.add_space(6.0);
    ui.subheading_with_margin("Tint");
    changed |= draw_tint_controls(ui, state);
    changed
}

/// One grid row: right-aligned label, unlabelled slider, then a drag
/// value carrying the unit suffix.
fn slider_row(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    suffix: &str,
) -> bool {
    let mut changed = false;
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ui.label(label);
    });
    changed |= ui
        .add_sized(
            [SLIDER_WIDTH, 24.0],
            Slider::new(value, range.clone()).show_value(false),
        )
        .changed();
    changed |= ui
        .add(
            egui::DragValue::new(value)
                .range(range)
                .speed(0.5)
                .fixed_decimals(0)
                .suffix(suffix),
        )
        .changed();
    ui.end_row();
    changed
}

fn draw_tint_controls(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Color:");
        let tint = state.active_settings.tint_color;
        let mut rgb = [tint.r, tint.g, tint.b];
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            state.active_settings.tint_color = Rgba::opaque(rgb[0], rgb[1], rgb[2]);
            state.tint_hex_input = rgb_to_hex(&state.active_settings.tint_color);
            changed = true;
        }
        changed |= draw_tint_hex_field(ui, state);
    });

    Grid::new("tint_amount_row")
        .num_columns(3)
        .spacing([4.0, 6.0])
        .show(ui, |ui| {
            changed |= slider_row(
                ui,
                "Amount",
                &mut state.active_settings.tint_amount,
                TINT_AMOUNT_RANGE,
                "%",
            );
        });

    ui.horizontal(|ui| {
        for preset in [0.0_f32, 25.0, 50.0, 75.0, 100.0] {
            if ui.small_button(format!("{preset:.0}%")).clicked() {
                state.active_settings.tint_amount = preset;
                changed = true;
            }
        }
    });
    changed
}

fn is_valid_hex_color(value: &str) -> bool {
    Regex::new(r"^#?[0-9a-fA-F]{6}$").unwrap().is_match(value.trim())
}

fn draw_tint_hex_field(ui: &mut egui::Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    let response = ui.add(
        TextEdit::singleline(&mut state.tint_hex_input)
            .desired_width(64.0)
            .font(egui::TextStyle::Monospace),
    );
    let valid = is_valid_hex_color(&state.tint_hex_input);

    if response.changed()
        && valid
        && let Some(rgb) = hex_to_rgb(state.tint_hex_input.trim())
    {
        state.active_settings.tint_color = rgb;
        changed = true;
    }

    if !valid {
        let response = response.highlight();
        ui.painter().rect_stroke(
            response.rect,
            2.0,
            Stroke::new(1.0, styles::COLOR_INVALID),
            StrokeKind::Outside,
        );
        ui.label(RichText::new("⚠").color(styles::COLOR_WARNING))
            .on_hover_text("Enter a hex color like #22aa66");
    }
    changed
}

fn draw_group_details(ui: &mut egui::Ui, state: &mut AppState, active_id: &str) -> (bool, bool) {
    let mut settings_changed = false;
    let mut overlay_changed = false;

    let editing = state.editing_group_id.as_deref() == Some(active_id);

    // Owned snapshots so the widgets below can borrow the session mutably.
    let Some(snapshot) = state.session.as_ref().and_then(|session| {
        let group = session.group(active_id)?;
        let members = if editing {
            state
                .staged_hexes
                .clone()
                .unwrap_or_else(|| group.hexes.clone())
        } else {
            group.hexes.clone()
        };
        let primary = session.current_primary_hex(active_id).map(str::to_string);
        let settings = session.settings_for(&GroupKey::named(active_id));
        let key = GroupKey::named(active_id);
        let display: Vec<(String, Rgba, bool)> =
            sorted_member_hexes(session, &members, primary.as_deref())
                .into_iter()
                .map(|hex| {
                    let shown = member_display_color(session, &key, &settings, &hex);
                    let overridden = session.override_for(&hex).is_some();
                    (hex, shown, overridden)
                })
                .collect();
        Some((group.name.clone(), members, primary, display))
    }) else {
        return (false, false);
    };
    let (group_name, members, primary, display) = snapshot;

    ui.subheading_with_margin(&format!("{group_name} ({} colors)", display.len()));

    if editing {
        ui.label(
            RichText::new("Editing: click image pixels or the swatches below to change membership.")
                .small()
                .color(styles::COLOR_WARNING),
        );
        ui.horizontal(|ui| {
            if ui
                .button("Save Changes")
                .on_hover_text("Apply the staged colors as the group's new membership")
                .clicked()
                && let Some(staged) = state.staged_hexes.clone()
                && let Some(session) = &mut state.session
            {
                match session.commit_group_edit(active_id, &staged) {
                    Ok(()) => {
                        state.cancel_group_edit();
                        state.sync_active_settings();
                        settings_changed = true;
                        overlay_changed = true;
                    }
                    Err(err) => state.set_status(err),
                }
            }
            if state.save_as_new_name.is_none() && ui.button("Save As New…").clicked() {
                state.save_as_new_name = Some(format!("Copy of {group_name}"));
            }
            if ui.button("Cancel").clicked() {
                state.cancel_group_edit();
                settings_changed = true;
                overlay_changed = true;
            }
        });
        if state.save_as_new_name.is_some() {
            ui.horizontal(|ui| {
                let mut create = false;
                if let Some(name) = &mut state.save_as_new_name {
                    ui.label("Name:");
                    ui.add(TextEdit::singleline(name).desired_width(120.0));
                    create = ui.button("Create").clicked();
                }
                if create {
                    let name = state.save_as_new_name.take().unwrap_or_default();
                    let staged = state.staged_hexes.clone().unwrap_or_default();
                    if let Some(session) = &mut state.session {
                        match session.create_group(name.trim(), staged) {
                            Ok(new_id) => {
                                state.active_group = GroupKey::named(new_id);
                                state.cancel_group_edit();
                                state.selected_member_hex = None;
                                state.sync_active_settings();
                                settings_changed = true;
                                overlay_changed = true;
                            }
                            Err(err) => {
                                state.set_status(err);
                                state.save_as_new_name = Some(name);
                            }
                        }
                    }
                }
            });
        }
    } else {
        ui.horizontal(|ui| {
            if ui
                .button("✏ Edit Colors")
                .on_hover_text(
                    "Stage this group's colors, then add or remove members by clicking image pixels",
                )
                .clicked()
            {
                state.editing_group_id = Some(active_id.to_string());
                state.staged_hexes = Some(members.clone());
                state.stop_isolation();
                state.selected_member_hex = None;
                overlay_changed = true;
            }
            if !state.staging_selection.is_empty() {
                let label = format!("➕ Add Staged ({})", state.staging_selection.len());
                if ui
                    .button(label)
                    .on_hover_text("Add the staged palette colors to this group")
                    .clicked()
                    && let Some(session) = &mut state.session
                {
                    let mut failed = None;
                    for hex in state.staging_selection.to_vec() {
                        if let Err(err) = session.add_color(active_id, &hex) {
                            failed = Some(err);
                        }
                    }
                    state.staging_selection = HexSet::new();
                    if let Some(err) = failed {
                        state.set_status(err);
                    }
                    state.sync_active_settings();
                    settings_changed = true;
                }
            }
        });
    }

    ui.add_space(4.0);
    let mut clicked_hex: Option<String> = None;
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(3.0, 3.0);
        for (hex, shown, overridden) in &display {
            let selected =
                !editing && state.selected_member_hex.as_deref() == Some(hex.as_str());
            let is_primary = primary.as_deref() == Some(hex.as_str());
            let fill = Color32::from_rgba_unmultiplied(shown.r, shown.g, shown.b, shown.a);
            let hover = if is_primary {
                format!("{hex} (primary)")
            } else {
                hex.clone()
            };
            let response =
                color_swatch(ui, SWATCH_SIZE, fill, selected, *overridden).on_hover_text(hover);
            if is_primary {
                ui.painter().circle_filled(
                    response.rect.left_top() + egui::vec2(3.0, 3.0),
                    2.5,
                    styles::COLOR_ACCENT,
                );
            }
            if response.clicked() {
                clicked_hex = Some(hex.clone());
            }
        }
    });

    if let Some(hex) = clicked_hex {
        if editing {
            if let Some(staged) = &mut state.staged_hexes
                && !staged.remove(&hex)
            {
                staged.insert(hex);
            }
            settings_changed = true;
            overlay_changed = true;
        } else if state.selected_member_hex.as_deref() == Some(hex.as_str()) {
            state.selected_member_hex = None;
        } else {
            // Seed the override picker from the stored override, else from
            // the color as currently shown.
            let seed = state
                .session
                .as_ref()
                .and_then(|session| session.override_for(&hex))
                .or_else(|| {
                    display
                        .iter()
                        .find(|(h, _, _)| *h == hex)
                        .map(|(_, shown, _)| *shown)
                });
            if let Some(color) = seed {
                state.override_color_input = [color.r, color.g, color.b];
            }
            state.selected_member_hex = Some(hex);
        }
    }

    if !editing
        && let Some(selected_hex) = state.selected_member_hex.clone()
    {
        if members.contains(&selected_hex) {
            ui.add_space(4.0);
            settings_changed |=
                draw_member_actions(ui, state, active_id, &selected_hex, primary.as_deref());
        } else {
            state.selected_member_hex = None;
        }
    }

    (settings_changed, overlay_changed)
}

fn draw_member_actions(
    ui: &mut egui::Ui,
    state: &mut AppState,
    active_id: &str,
    hex: &str,
    primary: Option<&str>,
) -> bool {
    let mut changed = false;
    let overridden = state
        .session
        .as_ref()
        .is_some_and(|session| session.override_for(hex).is_some());

    ui.horizontal(|ui| {
        ui.label(RichText::new(hex.to_uppercase()).monospace());
        let is_primary = primary == Some(hex);
        let make_primary = ui
            .add_enabled(!is_primary, egui::Button::new("Make Primary").small())
            .on_hover_text("Tinting moves the other members relative to the primary color");
        if make_primary.clicked()
            && let Some(session) = &mut state.session
        {
            match session.set_primary(active_id, hex) {
                Ok(()) => {
                    state.sync_active_settings();
                    changed = true;
                }
                Err(err) => state.set_status(err),
            }
        }
        if ui
            .small_button("Remove")
            .on_hover_text("Remove this color from the group")
            .clicked()
            && let Some(session) = &mut state.session
        {
            match session.remove_color(active_id, hex) {
                Ok(()) => {
                    state.selected_member_hex = None;
                    state.sync_active_settings();
                    changed = true;
                }
                Err(err) => state.set_status(err),
            }
        }
    });

    ui.horizontal(|ui| {
        ui.label("Override:");
        ui.color_edit_button_srgb(&mut state.override_color_input);
        let apply = ui
            .small_button("Apply")
            .on_hover_text("Pin this palette color to the picked value, bypassing all adjustments");
        if apply.clicked()
            && let Some(session) = &mut state.session
        {
            let picked = Rgba::opaque(
                state.override_color_input[0],
                state.override_color_input[1],
                state.override_color_input[2],
            );
            match session.set_override(hex, &rgb_to_hex(&picked)) {
                Ok(()) => changed = true,
                Err(err) => state.set_status(err),
            }
        }
        if overridden
            && ui.small_button("Clear").clicked()
            && let Some(session) = &mut state.session
        {
            session.clear_override(hex);
            changed = true;
        }
    });
    changed
}

/// Primary first, then the rest ordered by lightness, saturation and hue.
fn sorted_member_hexes(
    session: &RecolorSession,
    members: &HexSet,
    primary: Option<&str>,
) -> Vec<String> {
    let mut rest: Vec<String> = members
        .iter()
        .filter(|hex| Some(*hex) != primary)
        .map(str::to_string)
        .collect();
    rest.sort_by(|a, b| {
        sort_key(session, a)
            .partial_cmp(&sort_key(session, b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = Vec::with_capacity(rest.len() + 1);
    if let Some(primary) = primary
        && members.contains(primary)
    {
        out.push(primary.to_string());
    }
    out.extend(rest);
    out
}

fn sort_key(session: &RecolorSession, hex: &str) -> (f32, f32, f32) {
    session
        .palette()
        .iter()
        .find(|entry| entry.hex == hex)
        .map(|entry| {
            let hsl = rgb_to_hsl(&entry.original);
            (hsl.l, hsl.s, hsl.h)
        })
        .unwrap_or((f32::INFINITY, 0.0, 0.0))
}

/// The color a member swatch should show: the same override, alpha, tint,
/// HSL and contrast chain the recolor pass applies to its pixels.
fn member_display_color(
    session: &RecolorSession,
    key: &GroupKey,
    settings: &AppliedGroupSettings,
    hex: &str,
) -> Rgba {
    if let Some(value) = session.override_for(hex) {
        return value;
    }
    let Some(entry) = session.palette().iter().find(|entry| entry.hex == hex) else {
        return Rgba::opaque(0, 0, 0);
    };
    let source = entry.original;
    if settings.is_passthrough() {
        return source;
    }

    let mut alpha = f32::from(source.a);
    if settings.alpha_delta != 0.0 {
        alpha *= 1.0 + settings.alpha_delta / 100.0;
    }
    let alpha = alpha.clamp(0.0, 255.0).round() as u8;

    let mut working = Rgba::new(source.r, source.g, source.b, alpha);
    let tint_strength = settings.tint_amount / 100.0;
    if tint_strength > 0.0 {
        working = match key {
            GroupKey::AllColors => apply_pixel_tint(&working, &settings.tint_color, tint_strength),
            GroupKey::Named(id) => match session.group(id).and_then(|g| session.tint_anchor_for(g))
            {
                Some(primary) => calculate_tinted_color_for_group_member(
                    &working,
                    &primary,
                    &settings.tint_color,
                    tint_strength,
                ),
                None => working,
            },
        };
    }

    let hsl = rgb_to_hsl(&working);
    let hue = (hsl.h + settings.hue_delta).rem_euclid(360.0);
    let saturation = (hsl.s + settings.saturation_delta / 100.0).clamp(0.0, 1.0);
    let mut lightness = hsl.l + settings.lightness_delta / 100.0;
    if settings.contrast_delta != 0.0 {
        lightness = 0.5 + (lightness - 0.5) * (1.0 + settings.contrast_delta / 100.0);
    }
    let lightness = lightness.clamp(0.0, 1.0);
    hsl_to_rgb(&Hsl::new(hue, saturation, lightness), working.a)
}
