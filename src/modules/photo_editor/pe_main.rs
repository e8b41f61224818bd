use eframe::egui;
use image::{DynamicImage, imageops::FilterType};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

use super::pe_presets::PRESETS;
use super::pe_remote::RemoteDispatcher;
use super::pe_state::{EditorSession, UndoPolicy};
use crate::error::{EditorError, ExportError, IngestError};
use crate::i18n::{self, Label, Language};
use crate::modules::helpers::css_filter::{self, FilterFn};
use crate::modules::helpers::encoded_image::{EncodedImage, OPEN_EXTENSIONS};
use crate::modules::helpers::image_export::ExportTier;
use crate::remote::{EditRequest, ModelTier, RemoteEditError, RemoteEditor};
use crate::settings::AppSettings;
use crate::style::ThemeMode;

pub(super) const PREVIEW_MAX_SIDE: u32 = 1600;
pub(super) const THUMB_SIDE: u32 = 96;
pub(super) const STATUS_TTL: Duration = Duration::from_secs(5);

pub const QUICK_PROMPTS: [&str; 4] = [
    "Neural Expansion 4K",
    "Gen-AI Studio Background",
    "Remaster Masterpiece",
    "Ray Tracing Light",
];
pub const MAGIC_ERASER_PROMPT: &str = "Eraser Pro High Precision";
pub const RELIGHT_PROMPT: &str = "Portrait Pro Lighting Suite";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPanel { None, Adjust, Filter, Ai, Transform, More }

impl ToolPanel {
    pub(super) fn nav_label(&self) -> Label {
        match self {
            ToolPanel::Adjust => Label::ToolAdjust,
            ToolPanel::Filter => Label::ToolFilter,
            ToolPanel::Ai | ToolPanel::None => Label::ToolAi,
            ToolPanel::Transform => Label::ToolTransform,
            ToolPanel::More => Label::ToolMore,
        }
    }

    pub(super) fn title(&self) -> Label {
        match self {
            ToolPanel::Adjust => Label::PanelAdjust,
            ToolPanel::Filter => Label::PanelFilter,
            ToolPanel::Ai | ToolPanel::None => Label::PanelAi,
            ToolPanel::Transform => Label::PanelTransform,
            ToolPanel::More => Label::PanelMore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind { Info, Error }

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub(super) shown_at: Instant,
}

/// View/controller for the loaded photo: owns the editing session, the preview
/// textures and the remote edit dispatcher.
pub struct PhotoEditor {
    pub(super) session: EditorSession,
    pub(super) preview_base: Option<DynamicImage>,
    pub(super) texture: Option<egui::TextureId>,
    pub(super) texture_dirty: bool,
    pub(super) rendered_filter: Vec<FilterFn>,
    pub(super) thumbnails: Vec<egui::TextureHandle>,
    pub(super) thumbnails_dirty: bool,
    pub(super) tool: ToolPanel,
    pub(super) prompt: String,
    pub(super) model_tier: ModelTier,
    pub(super) high_precision: bool,
    pub(super) remote: RemoteDispatcher,
    pub(super) status: Option<StatusMessage>,
}

impl PhotoEditor {
    pub fn new(handle: Handle, backend: Arc<dyn RemoteEditor>, settings: &AppSettings) -> Self {
        Self {
            session: EditorSession::new(settings.history_cap, UndoPolicy::from_flag(settings.reset_tools_on_undo)),
            preview_base: None,
            texture: None,
            texture_dirty: false,
            rendered_filter: Vec::new(),
            thumbnails: Vec::new(),
            thumbnails_dirty: false,
            tool: ToolPanel::None,
            prompt: String::new(),
            model_tier: settings.model_tier,
            high_precision: settings.high_precision,
            remote: RemoteDispatcher::new(handle, backend),
            status: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &AppSettings) {
        self.session.set_undo_policy(UndoPolicy::from_flag(settings.reset_tools_on_undo));
        self.session.set_history_cap(settings.history_cap);
        self.model_tier = settings.model_tier;
        self.high_precision = settings.high_precision;
    }

    pub fn set_backend(&mut self, backend: Arc<dyn RemoteEditor>) { self.remote.set_backend(backend); }

    pub fn session(&self) -> &EditorSession { &self.session }
    pub fn has_image(&self) -> bool { self.session.has_image() }
    pub fn can_undo(&self) -> bool { self.session.can_undo() }
    pub fn is_processing(&self) -> bool { self.remote.is_processing() }
    pub fn tool(&self) -> ToolPanel { self.tool }
    pub fn prompt(&self) -> &str { &self.prompt }
    pub fn model_tier(&self) -> ModelTier { self.model_tier }
    pub fn status(&self) -> Option<&StatusMessage> { self.status.as_ref() }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage { kind, text: text.into(), shown_at: Instant::now() });
    }

    pub fn report_error(&mut self, err: &EditorError) {
        log::warn!("{}", err);
        self.set_status(StatusKind::Error, err.to_string());
    }

    pub fn open_path(&mut self, path: &Path) -> Result<(), EditorError> {
        let image = EncodedImage::from_file(path)?;
        self.open_image(image)?;
        Ok(())
    }

    /// Native file picker; a cancelled dialog is not an error.
    pub fn pick_and_open(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &OPEN_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            if let Err(e) = self.open_path(&path) { self.report_error(&e); }
        }
    }

    /// Replaces history and tool state and cancels any remote edit of the old
    /// image. A bitmap that does not decode is rejected and leaves the current
    /// session untouched.
    pub fn open_image(&mut self, image: EncodedImage) -> Result<(), IngestError> {
        let decoded = image.decode()?;
        log::info!("Loaded {}x{} {}", decoded.width(), decoded.height(), image.mime_type());
        self.remote.invalidate();
        self.session.load_image(image);
        self.set_preview(decoded);
        self.tool = ToolPanel::None;
        self.status = None;
        Ok(())
    }

    /// An in-flight remote edit was made from the entry being undone, so it is cancelled.
    pub fn undo(&mut self) -> bool {
        let Some(restored) = self.session.undo() else { return false };
        self.remote.invalidate();
        match restored.decode() {
            Ok(decoded) => self.set_preview(decoded),
            Err(e) => self.report_error(&e.into()),
        }
        true
    }

    pub fn export(&mut self, tier: ExportTier, dir: &Path) -> Result<PathBuf, ExportError> {
        self.session.export(tier, self.high_precision, dir)
    }

    /// Sends the current image to the remote editor. Returns the request
    /// generation, or None when there is no image or the instruction is blank.
    pub fn submit_ai(&mut self, instruction: &str, repaint: Option<egui::Context>) -> Option<u64> {
        let instruction = instruction.trim();
        if instruction.is_empty() { return None; }
        let image = self.session.current()?.clone();
        let request = EditRequest { image, instruction: instruction.to_string(), tier: self.model_tier };
        Some(self.remote.submit(request, repaint))
    }

    pub fn submit_prompt(&mut self, repaint: Option<egui::Context>) -> Option<u64> {
        let prompt = self.prompt.clone();
        self.submit_ai(&prompt, repaint)
    }

    /// Commits the newest finished remote edit, if any. Returns true when the
    /// displayed image changed.
    pub fn poll_remote(&mut self, lang: Language) -> bool {
        let Some(outcome) = self.remote.poll() else { return false };
        let image = match outcome {
            Ok(image) => image,
            Err(e) => {
                self.report_remote_error(&e);
                return false;
            }
        };

        match image.decode() {
            Ok(decoded) => {
                log::info!("Remote edit committed ({}x{})", decoded.width(), decoded.height());
                self.session.commit(image);
                self.set_preview(decoded);
                self.prompt.clear();
                self.set_status(StatusKind::Info, i18n::tr(lang, Label::EditApplied));
                true
            }
            Err(e) => {
                self.report_remote_error(&RemoteEditError::InvalidResponse(e.to_string()));
                false
            }
        }
    }

    fn report_remote_error(&mut self, err: &RemoteEditError) {
        log::warn!("Remote edit failed: {}", err);
        let text = if err.is_retryable() { format!("{} (retry)", err) } else { err.to_string() };
        self.set_status(StatusKind::Error, text);
    }

    fn set_preview(&mut self, decoded: DynamicImage) {
        let base = if decoded.width() > PREVIEW_MAX_SIDE || decoded.height() > PREVIEW_MAX_SIDE {
            decoded.resize(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE, FilterType::Triangle)
        } else {
            decoded
        };
        self.preview_base = Some(base);
        self.texture_dirty = true;
        self.thumbnails_dirty = true;
    }

    pub(super) fn preview_size(&self) -> Option<egui::Vec2> {
        self.preview_base.as_ref().map(|b| egui::vec2(b.width() as f32, b.height() as f32))
    }

    pub(super) fn ensure_texture(&mut self, ctx: &egui::Context) {
        let filter = self.session.style().filter;
        if !self.texture_dirty && filter == self.rendered_filter { return; }
        let Some(base) = &self.preview_base else { return };

        let color_image = to_color_image(&css_filter::apply_chain(base, &filter));
        if let Some(texture_id) = self.texture {
            ctx.tex_manager().write().set(texture_id, egui::epaint::ImageDelta::full(color_image, egui::TextureOptions::LINEAR));
        } else {
            self.texture = Some(ctx.tex_manager().write().alloc("photo_editor_preview".into(), color_image.into(), egui::TextureOptions::LINEAR));
        }
        self.rendered_filter = filter;
        self.texture_dirty = false;
    }

    pub(super) fn ensure_thumbnails(&mut self, ctx: &egui::Context) {
        if !self.thumbnails_dirty { return; }
        let Some(base) = &self.preview_base else { return };

        let thumb = base.thumbnail(THUMB_SIDE, THUMB_SIDE);
        self.thumbnails = PRESETS
            .iter()
            .map(|preset| {
                let rendered = css_filter::apply_chain(&thumb, &preset.filters());
                ctx.load_texture(format!("preset_{}", preset.id), to_color_image(&rendered), egui::TextureOptions::LINEAR)
            })
            .collect();
        self.thumbnails_dirty = false;
    }

    pub(super) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (mut undo, mut open) = (false, false);
        ctx.input_mut(|i| {
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::Z) { undo = true; }
            if i.consume_key(egui::Modifiers::CTRL, egui::Key::O) { open = true; }
            if i.consume_key(egui::Modifiers::NONE, egui::Key::Escape) { self.tool = ToolPanel::None; }
        });
        if undo { self.undo(); }
        if open { self.pick_and_open(); }
    }

    pub(super) fn expire_status(&mut self) {
        if self.status.as_ref().is_some_and(|s| s.shown_at.elapsed() > STATUS_TTL) {
            self.status = None;
        }
    }

    /// Draws the nav bar, canvas and the open tool panel.
    pub fn show(&mut self, ctx: &egui::Context, theme: ThemeMode, lang: Language) {
        self.poll_remote(lang);
        self.handle_keyboard(ctx);
        self.expire_status();
        self.ensure_texture(ctx);
        self.ensure_thumbnails(ctx);

        if self.is_processing() { ctx.request_repaint_after(Duration::from_millis(100)); }
        if let Some(s) = &self.status {
            ctx.request_repaint_after(STATUS_TTL.saturating_sub(s.shown_at.elapsed()));
        }

        self.render_nav_bar(ctx, theme, lang);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui, theme, lang);
        });
        self.render_tool_panel(ctx, theme, lang);
    }
}

pub(super) fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    egui::ColorImage {
        size: [w, h],
        source_size: egui::vec2(w as f32, h as f32),
        pixels: rgba.pixels().map(|p| egui::Color32::from_rgba_unmultiplied(p.0[0], p.0[1], p.0[2], p.0[3])).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::photo_editor::pe_adjust::Adjustment;
    use crate::modules::photo_editor::pe_presets;

    /// Answers every instruction with a solid image whose red channel is the
    /// instruction length, or with the error named by the instruction.
    struct EchoEditor;

    #[async_trait::async_trait]
    impl RemoteEditor for EchoEditor {
        async fn edit(&self, request: EditRequest) -> crate::remote::Result<EncodedImage> {
            match request.instruction.as_str() {
                "decline" => Err(RemoteEditError::Declined("policy".into())),
                "busy" => Err(RemoteEditError::Status { code: 503, message: "overloaded".into() }),
                "slow" => {
                    tokio::time::sleep(Duration::from_millis(150)).await;
                    Ok(EncodedImage::solid(3, 3, [7, 0, 0, 255]))
                }
                "garbage" => EncodedImage::from_bytes(truncated_png())
                    .map_err(|e| RemoteEditError::InvalidResponse(e.to_string())),
                other => Ok(EncodedImage::solid(4, 3, [other.len() as u8, 0, 0, 255])),
            }
        }
    }

    fn truncated_png() -> Vec<u8> {
        let full = EncodedImage::solid(8, 8, [1, 2, 3, 255]);
        full.bytes()[..full.len() / 2].to_vec()
    }

    fn editor(handle: Handle) -> PhotoEditor {
        PhotoEditor::new(handle, Arc::new(EchoEditor), &AppSettings::default())
    }

    async fn wait_for_commit(ed: &mut PhotoEditor) -> bool {
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if ed.poll_remote(Language::En) || !ed.is_processing() { return true; }
        }
        false
    }

    #[test]
    fn test_open_rejects_non_image() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        assert!(EncodedImage::from_bytes(b"plain text".to_vec()).is_err());

        ed.open_image(EncodedImage::solid(10, 10, [9, 9, 9, 255])).unwrap();
        let truncated = EncodedImage::from_bytes(truncated_png()).unwrap();
        assert!(ed.open_image(truncated).is_err());
        assert_eq!(ed.session().current(), Some(&EncodedImage::solid(10, 10, [9, 9, 9, 255])));
    }

    #[test]
    fn test_open_resets_tools_and_builds_preview() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        ed.tool = ToolPanel::Adjust;
        ed.open_image(EncodedImage::solid(2000, 1000, [9, 9, 9, 255])).unwrap();

        assert_eq!(ed.tool(), ToolPanel::None);
        assert!(ed.has_image());
        assert!(!ed.can_undo());
        assert_eq!(ed.preview_size(), Some(egui::vec2(1600.0, 800.0)));
    }

    #[test]
    fn test_submit_needs_image_and_instruction() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        assert_eq!(ed.submit_ai("make it pop", None), None);

        ed.open_image(EncodedImage::solid(4, 4, [0, 0, 0, 255])).unwrap();
        assert_eq!(ed.submit_ai("   ", None), None);
        assert!(!ed.is_processing());
        assert_eq!(ed.submit_ai("make it pop", None), Some(1));
        assert!(ed.is_processing());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_successful_edit_commits_and_clears_prompt() {
        let mut ed = editor(Handle::current());
        ed.open_image(EncodedImage::solid(4, 4, [0, 0, 0, 255])).unwrap();
        ed.session.select_preset(pe_presets::by_id("cool").unwrap());
        ed.prompt = "abcde".into();

        assert!(ed.submit_prompt(None).is_some());
        assert!(wait_for_commit(&mut ed).await);

        assert_eq!(ed.session().history_len(), 2);
        assert_eq!(ed.session().current(), Some(&EncodedImage::solid(4, 3, [5, 0, 0, 255])));
        assert!(ed.prompt().is_empty());
        assert_eq!(ed.session().preset().id, "cool");
        assert!(ed.can_undo());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_declined_edit_leaves_history_alone() {
        let mut ed = editor(Handle::current());
        ed.open_image(EncodedImage::solid(4, 4, [0, 0, 0, 255])).unwrap();
        ed.prompt = "decline".into();

        ed.submit_prompt(None);
        assert!(wait_for_commit(&mut ed).await);

        assert_eq!(ed.session().history_len(), 1);
        assert_eq!(ed.prompt(), "decline");
        let status = ed.status().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(!status.text.contains("(retry)"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_transient_failure_is_marked_retryable() {
        let mut ed = editor(Handle::current());
        ed.open_image(EncodedImage::solid(4, 4, [0, 0, 0, 255])).unwrap();
        ed.submit_ai("busy", None);
        assert!(wait_for_commit(&mut ed).await);

        assert_eq!(ed.session().history_len(), 1);
        assert!(ed.status().unwrap().text.ends_with("(retry)"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_undecodable_result_is_rejected() {
        let mut ed = editor(Handle::current());
        ed.open_image(EncodedImage::solid(4, 4, [0, 0, 0, 255])).unwrap();
        ed.submit_ai("garbage", None);
        assert!(wait_for_commit(&mut ed).await);

        assert_eq!(ed.session().history_len(), 1);
        assert_eq!(ed.status().unwrap().kind, StatusKind::Error);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_loading_new_image_cancels_pending_edit() {
        let mut ed = editor(Handle::current());
        let photo_a = EncodedImage::solid(4, 4, [1, 0, 0, 255]);
        let photo_b = EncodedImage::solid(6, 6, [2, 0, 0, 255]);
        ed.open_image(photo_a).unwrap();
        ed.submit_ai("slow", None);
        assert!(ed.is_processing());

        ed.open_image(photo_b.clone()).unwrap();
        assert!(!ed.is_processing());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(!ed.poll_remote(Language::En));
        assert_eq!(ed.session().history_len(), 1);
        assert_eq!(ed.session().current(), Some(&photo_b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_undo_cancels_pending_edit() {
        let mut ed = editor(Handle::current());
        let first = EncodedImage::solid(4, 4, [1, 0, 0, 255]);
        ed.open_image(first.clone()).unwrap();
        ed.session.commit(EncodedImage::solid(4, 4, [2, 0, 0, 255]));
        ed.submit_ai("slow", None);

        assert!(ed.undo());
        assert!(!ed.is_processing());
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(!ed.poll_remote(Language::En));
        assert_eq!(ed.session().history_len(), 1);
        assert_eq!(ed.session().current(), Some(&first));
    }

    #[test]
    fn test_undo_restores_previous_image() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        ed.open_image(EncodedImage::solid(4, 4, [1, 0, 0, 255])).unwrap();
        ed.session.commit(EncodedImage::solid(8, 2, [2, 0, 0, 255]));
        ed.session.set_adjustment(Adjustment::Saturation, 10);

        assert!(ed.undo());
        assert_eq!(ed.preview_size(), Some(egui::vec2(4.0, 4.0)));
        assert!(ed.session().adjustments().is_default());
        assert!(!ed.undo());
    }

    #[test]
    fn test_settings_change_policy_and_tier() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        let settings = AppSettings { reset_tools_on_undo: false, model_tier: ModelTier::Ultra, ..AppSettings::default() };
        ed.apply_settings(&settings);
        assert_eq!(ed.model_tier(), ModelTier::Ultra);

        ed.open_image(EncodedImage::solid(4, 4, [1, 0, 0, 255])).unwrap();
        ed.session.commit(EncodedImage::solid(4, 4, [2, 0, 0, 255]));
        ed.session.set_adjustment(Adjustment::Brightness, 40);
        ed.undo();
        assert_eq!(ed.session().adjustments().get(Adjustment::Brightness), 40);
    }

    #[test]
    fn test_export_writes_current_tier() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut ed = editor(rt.handle().clone());
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(ed.export(ExportTier::Qhd, dir.path()), Err(ExportError::NoImage)));

        ed.open_image(EncodedImage::solid(100, 50, [1, 0, 0, 255])).unwrap();
        let path = ed.export(ExportTier::Qhd, dir.path()).unwrap();
        let written = image::open(path).unwrap();
        assert_eq!((written.width(), written.height()), (2560, 1280));
    }
}
