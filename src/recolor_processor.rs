use crate::recolor::{self, GroupPass, RecolorScope};
use crate::session::RecolorSession;
use crate::types::color::Rgba;
use crate::types::image::ImageData;
use egui::Context;
use std::collections::BTreeMap;
use std::sync::mpsc;

#[derive(Debug)]
pub struct RecolorResult {
    pub rgba_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub generation_id: u64,
}

pub struct RecolorProcessor {
    preview_thread: Option<std::thread::JoinHandle<()>>,
    preview_receiver: Option<mpsc::Receiver<Result<RecolorResult, String>>>,
    cancel_sender: Option<mpsc::Sender<()>>,
    current_generation_id: u64,
    active_threads: Vec<std::thread::JoinHandle<()>>,
}

impl Default for RecolorProcessor {
    fn default() -> Self {
        Self {
            preview_thread: None,
            preview_receiver: None,
            cancel_sender: None,
            current_generation_id: 0,
            active_threads: Vec::new(),
        }
    }
}

impl RecolorProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the session and recomputes the preview on a worker
    /// thread. Any run still in flight is cancelled first.
    pub fn start_recolor(&mut self, session: &RecolorSession, scope: &RecolorScope<'_>) {
        self.cancel_current_processing();

        let original = session.original_rgba().to_vec();
        let width = session.width();
        let height = session.height();
        let passes = session.passes_for(scope);
        let overrides = session.overrides().clone();

        let (result_sender, result_receiver) = mpsc::channel();
        let (cancel_sender, cancel_receiver) = mpsc::channel();
        let generation_id = self.current_generation_id;

        self.preview_receiver = Some(result_receiver);
        self.cancel_sender = Some(cancel_sender);

        let thread = std::thread::spawn(move || {
            let result = Self::generate_preview(
                original,
                width,
                height,
                passes,
                overrides,
                cancel_receiver,
                generation_id,
            );
            let _ = result_sender.send(result);
        });
        self.preview_thread = Some(thread);
    }

    pub fn check_preview_complete(&mut self, ctx: &Context) -> Option<Result<ImageData, String>> {
        self.cleanup_finished_threads();

        if let Some(receiver) = &mut self.preview_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.preview_thread = None;
            self.preview_receiver = None;

            return Some(match result {
                Ok(recolor_result) => {
                    if recolor_result.generation_id == self.current_generation_id {
                        log::debug!(
                            "Accepting result from generation {}",
                            recolor_result.generation_id
                        );
                        Self::create_texture_from_result(recolor_result, ctx)
                    } else {
                        log::debug!(
                            "Ignoring outdated result from generation {} (current: {})",
                            recolor_result.generation_id,
                            self.current_generation_id
                        );
                        return None;
                    }
                }
                Err(e) => {
                    if e.contains("Processing cancelled") {
                        return None;
                    } else {
                        Err(e)
                    }
                }
            });
        }
        None
    }

    pub fn is_processing(&self) -> bool {
        self.preview_thread.is_some()
    }

    pub fn cancel_current_processing(&mut self) {
        if let Some(cancel_sender) = &self.cancel_sender {
            let _ = cancel_sender.send(());
        }

        // The old thread keeps running detached; its result is ignored
        // by the generation check.
        if let Some(old_thread) = self.preview_thread.take() {
            self.active_threads.push(old_thread);
        }

        self.preview_thread = None;
        self.preview_receiver = None;
        self.cancel_sender = None;

        self.current_generation_id += 1;

        self.cleanup_finished_threads();
    }

    fn cleanup_finished_threads(&mut self) {
        self.active_threads.retain(|thread| !thread.is_finished());
    }

    fn create_texture_from_result(
        result: RecolorResult,
        ctx: &Context,
    ) -> Result<ImageData, String> {
        let RecolorResult {
            rgba_data,
            width,
            height,
            generation_id: _,
        } = result;
        ImageData::from_rgba("recolored", rgba_data, width, height, ctx)
    }

    fn generate_preview(
        original: Vec<u8>,
        width: u32,
        height: u32,
        passes: Vec<GroupPass>,
        overrides: BTreeMap<String, Rgba>,
        cancel_receiver: mpsc::Receiver<()>,
        generation_id: u64,
    ) -> Result<RecolorResult, String> {
        log::info!(
            "Starting recolor of {}x{} image across {} group passes (generation {})",
            width,
            height,
            passes.len(),
            generation_id
        );

        if cancel_receiver.try_recv().is_ok() {
            log::info!("Processing cancelled for generation {}", generation_id);
            return Err("Processing cancelled".to_string());
        }

        let rgba_data = recolor::recolor(&original, &passes, &overrides);

        Ok(RecolorResult {
            rgba_data,
            width,
            height,
            generation_id,
        })
    }
}
