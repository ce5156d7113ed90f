use crate::color_math::rgb_to_hex;
use crate::types::{AppState, GroupKey, ImageData, PixelClickCycle, Rgba};
use egui::{Color32, FontId, Pos2, Rect, Vec2};

const MAGNIFICATION_PIXEL_SIZE: f32 = 24.0;

/// Returns `(settings_changed, overlay_changed)` from pixel clicks routed
/// through `handle_pixel_click`.
pub fn draw_image_view(ui: &mut egui::Ui, state: &mut AppState, processing: bool) -> (bool, bool) {
    const HORIZONTAL_MARGIN: f32 = 4.0;
    let mut available_size = ui.available_size();
    available_size.y -= 34.0; // footer size

    let zoom = state.zoom;
    let pan_offset = state.pan_offset;
    let mut pan_changed = Vec2::ZERO;
    let mut clicked_pixel: Option<(u32, u32)> = None;

    let show_original = state.preferences.show_original_image;
    let split_x = if show_original {
        (available_size.x - HORIZONTAL_MARGIN) / 2.0
    } else {
        available_size.x
    };

    ui.horizontal(|ui| {
        ui.style_mut().spacing.item_spacing = egui::vec2(HORIZONTAL_MARGIN, 0.0);
        if show_original {
            draw_image_panel(
                ui,
                split_x,
                available_size.y,
                state.input_image.as_ref(),
                zoom,
                pan_offset,
                &mut pan_changed,
                &mut clicked_pixel,
                false,
                "Original",
            );
        }
        let (preview, title) = preview_image_and_title(state);
        draw_image_panel(
            ui,
            split_x,
            available_size.y,
            preview,
            zoom,
            pan_offset,
            &mut pan_changed,
            &mut clicked_pixel,
            processing,
            title,
        );
    });

    if pan_changed != Vec2::ZERO {
        state.pan_offset += pan_changed;
    }

    if ui.ui_contains_pointer() {
        let scroll_delta = ui.ctx().input(|i| i.raw_scroll_delta.y);
        if scroll_delta != 0.0 {
            let zoom_factor = 1.0 + scroll_delta * 0.001;
            state.zoom = (state.zoom * zoom_factor).clamp(0.1, 20.0);
        }
    }

    match clicked_pixel {
        Some((x, y)) => handle_pixel_click(state, x, y),
        None => (false, false),
    }
}

pub fn draw_main_content(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.heading("📁 Drop an image file here or use 'Open Image…'");
    });
}

/// The right panel shows the dimmed selection preview while a pixel
/// selection or a membership edit is underway, else the recolored image,
/// else the untouched input until the first recolor lands.
fn preview_image_and_title(state: &AppState) -> (Option<&ImageData>, &'static str) {
    let overlay_active = state.isolation_active || state.editing_group_id.is_some();
    if overlay_active && state.isolation_image.is_some() {
        return (state.isolation_image.as_ref(), "Selection");
    }
    if state.output_image.is_some() {
        return (state.output_image.as_ref(), "Recolored");
    }
    (state.input_image.as_ref(), "Recolored")
}

fn draw_image_panel(
    ui: &mut egui::Ui,
    width: f32,
    height: f32,
    image: Option<&ImageData>,
    zoom: f32,
    pan_offset: Vec2,
    pan_changed: &mut Vec2,
    clicked_pixel: &mut Option<(u32, u32)>,
    has_spinner: bool,
    title: &str,
) {
    ui.allocate_ui_with_layout(
        Vec2::new(width, height),
        egui::Layout::top_down(egui::Align::Center),
        |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(width, height), egui::Sense::click_and_drag());
            let canvas = response.rect;

            let base_color = Color32::from_gray(64);
            painter.rect_filled(canvas, 0.0, base_color);
            draw_dot_grid(&painter, &canvas, base_color);

            let mut image_rect = None;
            if let Some(image) = image {
                let original_size = egui::vec2(image.width as f32, image.height as f32);
                let rect = calculate_image_rect(&canvas, original_size, zoom, pan_offset);
                painter.image(
                    image.texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
                image_rect = Some(rect);
            }

            draw_title_overlay(ui, &painter, &canvas, title);

            if has_spinner {
                draw_spinner(ui, &painter, canvas.center());
            }

            if response.dragged() {
                *pan_changed += response.drag_delta();
            }
            if response.clicked()
                && let (Some(rect), Some(image), Some(pos)) =
                    (image_rect, image, response.interact_pointer_pos())
            {
                let rel = (pos - rect.min) / zoom;
                let x = rel.x.floor();
                let y = rel.y.floor();
                if x >= 0.0 && y >= 0.0 && (x as u32) < image.width && (y as u32) < image.height {
                    *clicked_pixel = Some((x as u32, y as u32));
                }
            }
        },
    );
}

/// Dot grid anchored to the screen, not the image, so panning reads as
/// the image moving over a fixed desk.
fn draw_dot_grid(painter: &egui::Painter, canvas: &Rect, base: Color32) {
    let dot_color = Color32::from_rgba_unmultiplied(
        (f32::from(base.r()) * 1.5) as u8,
        (f32::from(base.g()) * 1.5) as u8,
        (f32::from(base.b()) * 1.5) as u8,
        base.a(),
    );
    let origin = canvas.min
        - egui::vec2(
            canvas.min.x % MAGNIFICATION_PIXEL_SIZE,
            canvas.min.y % MAGNIFICATION_PIXEL_SIZE,
        );
    let cols = (canvas.width() / MAGNIFICATION_PIXEL_SIZE) as i32 + 2;
    let rows = (canvas.height() / MAGNIFICATION_PIXEL_SIZE) as i32 + 2;
    for yi in 0..rows {
        for xi in 0..cols {
            let center = origin
                + egui::vec2(
                    (xi as f32 + 0.5) * MAGNIFICATION_PIXEL_SIZE,
                    (yi as f32 + 0.5) * MAGNIFICATION_PIXEL_SIZE,
                );
            painter.circle_filled(center, 1.25, dot_color);
        }
    }
}

fn draw_title_overlay(ui: &egui::Ui, painter: &egui::Painter, canvas: &Rect, title: &str) {
    if title.is_empty() {
        return;
    }
    let visuals = &ui.ctx().style().visuals;
    let window_color = visuals.window_fill();
    let bg_color = Color32::from_rgba_unmultiplied(
        window_color.r(),
        window_color.g(),
        window_color.b(),
        178,
    );
    let text_color = visuals.override_text_color.unwrap_or(visuals.text_color());

    let galley = ui.fonts(|f| f.layout_no_wrap(title.to_string(), FontId::default(), text_color));
    let pos = canvas.left_bottom() + Vec2::new(4.0, -20.0);
    let rect = Rect::from_min_size(
        pos - egui::vec2(2.0, 1.0),
        galley.size() + egui::vec2(4.0, 2.0),
    );
    painter.rect_filled(rect, 0.0, bg_color);
    painter.galley(pos, galley, text_color);
}

fn draw_spinner(ui: &egui::Ui, painter: &egui::Painter, center: Pos2) {
    let radius = 16.0;
    let num_lines = 12;
    let time = ui.ctx().input(|i| i.time) as f32;
    for i in 0..num_lines {
        let angle = i as f32 / num_lines as f32 * std::f32::consts::TAU + time;
        let dir = egui::vec2(angle.cos(), angle.sin());
        painter.line_segment(
            [center + dir * radius * 0.5, center + dir * radius],
            (2.5, Color32::LIGHT_GRAY),
        );
    }
    ui.ctx().request_repaint();
}

fn calculate_image_rect(
    available_rect: &Rect,
    original_size: Vec2,
    zoom: f32,
    pan_offset: Vec2,
) -> Rect {
    let display_size = original_size * zoom;
    let view_center = available_rect.center() + pan_offset;
    Rect::from_center_size(view_center, display_size)
}

/// Click routing: membership staging while editing, selection toggling in
/// pixel-selection mode, and otherwise the group cycle where repeated
/// clicks on one color step through its groups and wrap back to the whole
/// palette. Clicks always sample the original image; groups are keyed by
/// original colors.
fn handle_pixel_click(state: &mut AppState, x: u32, y: u32) -> (bool, bool) {
    let Some(pixel) = state
        .input_image
        .as_ref()
        .and_then(|image| image.pixel_at(x, y))
    else {
        return (false, false);
    };
    let [r, g, b, a] = pixel;
    let hex = rgb_to_hex(&Rgba::opaque(r, g, b));
    let in_palette = state
        .session
        .as_ref()
        .is_some_and(|session| session.palette_contains(&hex));

    if state.editing_group_id.is_some() {
        if in_palette
            && let Some(staged) = &mut state.staged_hexes
        {
            if !staged.remove(&hex) {
                staged.insert(hex);
            }
            return (true, true);
        }
        return (false, false);
    }

    if state.isolation_active {
        if in_palette {
            if !state.isolation_selection.remove(&hex) {
                state.isolation_selection.insert(hex);
            }
            return (false, true);
        }
        return (false, false);
    }

    if a == 0 {
        state.last_clicked_pixel = None;
        return (false, false);
    }

    if !in_palette {
        state.last_clicked_pixel = None;
        if !state.active_group.is_all_colors() {
            state.active_group = GroupKey::AllColors;
            state.sync_active_settings();
            return (true, false);
        }
        return (false, false);
    }

    if let Some(last) = &state.last_clicked_pixel
        && last.hex == hex
    {
        let ids = last.matching_group_ids.clone();
        let (next_key, next_index) = if ids.is_empty() {
            (GroupKey::AllColors, 0)
        } else if state.active_group.is_all_colors() {
            (GroupKey::named(&ids[0]), 0)
        } else {
            let next = last.cycle_index + 1;
            if (next as usize) < ids.len() {
                (GroupKey::named(&ids[next as usize]), next)
            } else {
                (GroupKey::AllColors, -1)
            }
        };
        if let Some(last) = &mut state.last_clicked_pixel {
            last.cycle_index = next_index;
        }
        state.active_group = next_key;
        state.selected_member_hex = None;
        state.sync_active_settings();
        return (true, false);
    }

    let ids: Vec<String> = state
        .session
        .as_ref()
        .map(|session| {
            session
                .groups_containing(&hex)
                .iter()
                .map(|group| group.id.clone())
                .collect()
        })
        .unwrap_or_default();
    state.active_group = match ids.first() {
        Some(id) => GroupKey::named(id),
        None => GroupKey::AllColors,
    };
    state.last_clicked_pixel = Some(PixelClickCycle {
        hex,
        matching_group_ids: ids,
        cycle_index: 0,
    });
    state.selected_member_hex = None;
    state.sync_active_settings();
    (true, false)
}
