use crate::exporter::{save_indexed_png, save_rgba_png};
use crate::recolor::{RecolorScope, blend_isolation_preview};
use crate::recolor_processor::RecolorProcessor;
use crate::session::RecolorSession;
use crate::settings_manager::RecolorPreset;
use crate::types::app_state::{AppStateRequest, AppearanceMode};
use crate::types::{AppState, GroupKey, HexSet, ImageData};
use crate::ui::UI;
use eframe::egui;
use egui::Margin;

pub struct RecolorApp {
    state: AppState,
    recolor_processor: RecolorProcessor,
}

impl Default for RecolorApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
            recolor_processor: RecolorProcessor::new(),
        }
    }
}

impl RecolorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        crate::ui::styles::init_styles(&cc.egui_ctx);
        Self::default()
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped_files.is_empty()
            && let Some(dropped_file) = dropped_files.first()
            && let Some(path) = &dropped_file.path
        {
            self.state.pending_app_state_request = Some(AppStateRequest::LoadImage {
                path: path.display().to_string(),
            });
        }
    }

    fn load_image_file(&mut self, path: String, ctx: &egui::Context) {
        // Cancel any existing processing
        if self.recolor_processor.is_processing() {
            self.recolor_processor.cancel_current_processing();
            self.recolor_processor = RecolorProcessor::new();
        }

        // Build both the texture and the session before touching state, so
        // a rejected image (unreadable, oversized palette) leaves the
        // currently loaded one alone.
        let loaded = ImageData::load(&path, ctx).and_then(|image| {
            let session =
                RecolorSession::from_rgba(image.width, image.height, image.rgba_data.clone())?;
            Ok((image, session))
        });
        match loaded {
            Ok((image, session)) => {
                log::info!(
                    "Loaded '{path}': {}x{}, {} palette colors, {} auto groups",
                    image.width,
                    image.height,
                    session.palette().len(),
                    session.groups().len()
                );
                self.state.reset_for_new_image();
                self.state.input_path = Some(path);
                self.state.input_image = Some(image);
                self.state.session = Some(session);
                self.state.sync_active_settings();
                self.state.request_recolor();
            }
            Err(e) => {
                log::error!("File load error: {e}");
                self.state.set_status(e);
            }
        }
    }

    /// Debounce: start the recolor once the last settings change is old
    /// enough and no other recolor is in flight.
    fn handle_settings_changes(&mut self) {
        let Some(request) = &self.state.request_update_recolored_image else {
            return;
        };
        if request.time.elapsed() < self.state.debounce_delay {
            return;
        }
        if self.recolor_processor.is_processing() {
            return;
        }

        self.state.request_update_recolored_image = None;
        self.start_recolor();
    }

    fn start_recolor(&mut self) {
        let Some(session) = &self.state.session else {
            return;
        };
        let scope = scope_for(&self.state);
        self.recolor_processor.start_recolor(session, &scope);
    }

    fn check_preview_completion(&mut self, ctx: &egui::Context) {
        if let Some(result) = self.recolor_processor.check_preview_complete(ctx) {
            match result {
                Ok(image_data) => {
                    self.state.output_image = Some(image_data);
                    // Keep the dimmed selection preview in step with the
                    // fresh output.
                    self.refresh_isolation_overlay(ctx);
                }
                Err(e) => {
                    log::error!("Failed to generate recolored preview: {e}");
                    self.state.set_status(e);
                }
            }
        }
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.state.preferences.appearance_mode {
            AppearanceMode::Dark => egui::Visuals::dark(),
            AppearanceMode::Light => egui::Visuals::light(),
            AppearanceMode::System => match ctx.system_theme() {
                Some(egui::Theme::Dark) => egui::Visuals::dark(),
                Some(egui::Theme::Light) => egui::Visuals::light(),
                None => egui::Visuals::dark(),
            },
        };
        if ctx.style().visuals != visuals {
            ctx.set_visuals(visuals);
        }
    }

    /// Rebuilds the dimmed preview isolating the current selection: the
    /// staged membership while editing, else the pixel selection. Cleared
    /// when neither applies.
    fn refresh_isolation_overlay(&mut self, ctx: &egui::Context) {
        let selection = if self.state.editing_group_id.is_some() {
            self.state.staged_hexes.clone()
        } else if self.state.isolation_active {
            Some(self.state.isolation_selection.clone())
        } else {
            None
        };
        let Some(selection) = selection else {
            self.state.isolation_image = None;
            return;
        };
        let Some(input) = &self.state.input_image else {
            self.state.isolation_image = None;
            return;
        };

        let base = self.state.output_image.as_ref().unwrap_or(input);
        let blended = blend_isolation_preview(&input.rgba_data, &base.rgba_data, &selection);
        match ImageData::from_rgba("selection", blended, input.width, input.height, ctx) {
            Ok(image) => self.state.isolation_image = Some(image),
            Err(e) => {
                log::error!("Failed to build selection preview: {e}");
                self.state.isolation_image = None;
            }
        }
    }

    /// The image the export writes: exactly what the right panel shows.
    fn display_image_for_export(&self) -> Option<&ImageData> {
        let overlay_active =
            self.state.isolation_active || self.state.editing_group_id.is_some();
        if overlay_active && self.state.isolation_image.is_some() {
            return self.state.isolation_image.as_ref();
        }
        self.state
            .output_image
            .as_ref()
            .or(self.state.input_image.as_ref())
    }

    fn handle_requests(&mut self, ctx: &egui::Context) {
        let Some(request) = self.state.pending_app_state_request.take() else {
            return;
        };
        match request {
            AppStateRequest::LoadImage { path } => {
                self.load_image_file(path, ctx);
            }
            AppStateRequest::ExportRecoloredPng { output_path } => {
                let Some(image) = self.display_image_for_export() else {
                    log::error!("Export failed: no image loaded");
                    return;
                };
                let rgba_data = image.rgba_data.clone();
                let (width, height) = (image.width, image.height);
                std::thread::spawn(move || {
                    let path = std::path::PathBuf::from(output_path);
                    match save_rgba_png(&path, &rgba_data, width, height) {
                        Ok(()) => log::info!("PNG export completed: {}", path.display()),
                        Err(e) => log::error!("PNG export failed: {e}"),
                    }
                });
            }
            AppStateRequest::ExportIndexedPng { output_path } => {
                let Some(image) = self.display_image_for_export() else {
                    log::error!("Export failed: no image loaded");
                    return;
                };
                let rgba_data = image.rgba_data.clone();
                let (width, height) = (image.width, image.height);
                std::thread::spawn(move || {
                    let path = std::path::PathBuf::from(output_path);
                    match save_indexed_png(&path, &rgba_data, width, height) {
                        Ok(()) => {
                            log::info!("Indexed PNG export completed: {}", path.display());
                        }
                        Err(e) => {
                            // More than 256 colors lands here; write the
                            // image out as plain RGBA instead of dropping it.
                            log::warn!("Indexed export failed ({e}), saving plain RGBA instead");
                            match save_rgba_png(&path, &rgba_data, width, height) {
                                Ok(()) => {
                                    log::info!("PNG export completed: {}", path.display());
                                }
                                Err(e) => log::error!("PNG export failed: {e}"),
                            }
                        }
                    }
                });
            }
            AppStateRequest::SavePreset { path } => {
                if let (Some(name), Some(session)) =
                    (self.state.input_file_name(), &self.state.session)
                {
                    let preset = RecolorPreset::from_session(&name, session);
                    match preset.save_to_file(&path) {
                        Ok(()) => {
                            log::info!("Preset saved to: {path}");
                            self.state.set_status(format!("Preset saved to {path}"));
                        }
                        Err(e) => {
                            log::error!("Failed to save preset: {e}");
                            self.state.set_status(e);
                        }
                    }
                }
            }
            AppStateRequest::LoadPreset { path } => match RecolorPreset::load_from_file(&path) {
                Ok(preset) => {
                    let name = self.state.input_file_name().unwrap_or_default();
                    let applied = match &mut self.state.session {
                        Some(session) => preset.apply_to_session(&name, session),
                        None => Err("Load an image before applying a preset".to_string()),
                    };
                    match applied {
                        Ok(()) => {
                            self.state.active_group = GroupKey::AllColors;
                            self.state.cancel_group_edit();
                            self.state.staging_selection = HexSet::new();
                            self.state.stop_isolation();
                            self.state.last_clicked_pixel = None;
                            self.state.selected_member_hex = None;
                            self.state.sync_active_settings();
                            self.state.request_recolor();
                            log::info!("Preset loaded from: {path}");
                        }
                        Err(e) => {
                            log::warn!("Failed to apply preset: {e}");
                            self.state.set_status(e);
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to load preset: {e}");
                    self.state.set_status(e);
                }
            },
        }
    }

    /// Slider edits live in the panel buffer; push them into the session
    /// before the next recolor picks up its passes.
    fn write_back_active_settings(&mut self) {
        if !self.state.active_settings_changed() {
            return;
        }
        if let Some(session) = &mut self.state.session {
            session.set_settings(
                self.state.active_group.clone(),
                self.state.active_settings.clone(),
            );
        }
        self.state.update_active_settings_tracking();
    }
}

impl Drop for RecolorApp {
    fn drop(&mut self) {
        // Cancel any ongoing processing
        self.recolor_processor.cancel_current_processing();
        log::debug!("RecolorApp dropped, resources cleaned up");
    }
}

impl eframe::App for RecolorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let image_processing = self.recolor_processor.is_processing();

        // apply theme
        self.apply_theme(ctx);

        // Handle drag and drop first
        self.handle_dropped_files(ctx);

        // Check preview completion
        self.check_preview_completion(ctx);

        // Handle settings changes after checking completion
        self.handle_settings_changes();

        // Handle load/export requests
        self.handle_requests(ctx);

        // Save preferences
        self.state.check_and_save_preferences();

        let mut settings_changed = false;
        let mut overlay_changed = false;

        // Top（Menu）
        egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
            egui::Frame::NONE
                .inner_margin(Margin::symmetric(0, 4))
                .show(ui, |ui| {
                    UI::draw_header(ui, &mut self.state);
                });
        });

        // Side（Groups and palette）
        egui::SidePanel::left("settings_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let (s, o) = UI::draw_settings_panel(ui, &mut self.state);
                    settings_changed |= s;
                    overlay_changed |= o;
                });
            });

        // Main（Images）
        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .inner_margin(0.0)
                    .fill(ctx.style().visuals.window_fill()),
            )
            .show(ctx, |ui| {
                // Main
                if self.state.input_path.is_none() {
                    UI::draw_main_content(ui);
                } else {
                    let (s, o) = UI::draw_image_view(ui, &mut self.state, image_processing);
                    settings_changed |= s;
                    overlay_changed |= o;
                }

                // Footer
                if self.state.input_image.is_some() {
                    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                        egui::Frame::NONE
                            .inner_margin(Margin::symmetric(0, 4))
                            .show(ui, |ui| {
                                UI::draw_footer(ui, &mut self.state);
                            });
                    });
                }
            });

        if settings_changed {
            self.write_back_active_settings();
            self.state.request_recolor();
        }
        if overlay_changed {
            self.refresh_isolation_overlay(ctx);
        }

        // Repaint while a recolor is running or queued
        if self.recolor_processor.is_processing()
            || self.state.request_update_recolored_image.is_some()
        {
            ctx.request_repaint();
        }
    }
}

/// Which pixels the next recolor touches. Quick recolor composites every
/// group; a membership edit previews the staged set for the edited group;
/// otherwise the active group alone.
fn scope_for(state: &AppState) -> RecolorScope<'_> {
    if let Some(group_id) = &state.editing_group_id {
        return RecolorScope::Single {
            key: GroupKey::named(group_id),
            staged_members: state.staged_hexes.as_ref(),
        };
    }
    if state.quick_recolor_mode {
        return RecolorScope::AllGroups;
    }
    RecolorScope::Single {
        key: state.active_group.clone(),
        staged_members: None,
    }
}
