use eframe::egui;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::EditorError;
use crate::i18n::{Label, Language, tr};
use crate::modules::helpers::encoded_image::EncodedImage;
use crate::modules::helpers::image_export::ExportTier;
use crate::modules::photo_editor::{PhotoEditor, StatusKind};
use crate::remote::{GeminiClient, ModelTier, RemoteConfig};
use crate::settings::AppSettings;
use crate::style::{self, ColorPalette, ThemeMode};

const SPLASH: Duration = Duration::from_millis(2400);

pub struct ZEditorApp {
    /// Owns the workers that run remote edits; dropped with the app.
    _runtime: tokio::runtime::Runtime,
    settings: AppSettings,
    editor: PhotoEditor,
    active_remote: RemoteConfig,
    started: Instant,
    show_settings: bool,
    show_export_hub: bool,
}

impl ZEditorApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, EditorError> {
        let settings = AppSettings::load();
        style::apply_theme(&cc.egui_ctx, settings.theme);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("zeditor-remote")
            .enable_all()
            .build()
            .map_err(EditorError::Runtime)?;

        let active_remote = settings.remote_config();
        let backend = Arc::new(GeminiClient::new(active_remote.clone()));
        let editor = PhotoEditor::new(runtime.handle().clone(), backend, &settings);
        log::info!("ZEditor PRO started (tier {:?}, language {})", settings.model_tier, settings.language.code());

        Ok(Self {
            _runtime: runtime,
            settings,
            editor,
            active_remote,
            started: Instant::now(),
            show_settings: false,
            show_export_hub: false,
        })
    }

    fn lang(&self) -> Language { self.settings.language }
    fn theme(&self) -> ThemeMode { self.settings.theme }

    /// Persists settings and pushes them into the editor. The remote backend is
    /// rebuilt only when its configuration actually changed.
    fn settings_changed(&mut self) {
        self.settings.save();
        self.editor.apply_settings(&self.settings);

        let remote = self.settings.remote_config();
        if remote != self.active_remote {
            log::info!("Remote configuration changed, rebuilding client");
            self.editor.set_backend(Arc::new(GeminiClient::new(remote.clone())));
            self.active_remote = remote;
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else { return };

        let result = match (&file.path, &file.bytes) {
            (Some(path), _) => self.editor.open_path(path),
            (None, Some(bytes)) => EncodedImage::from_bytes(bytes.to_vec())
                .and_then(|image| self.editor.open_image(image))
                .map_err(EditorError::from),
            (None, None) => return,
        };
        if let Err(e) = result { self.editor.report_error(&e); }
    }

    fn export(&mut self, tier: ExportTier) {
        let dir = self.settings.export_dir();
        match self.editor.export(tier, &dir) {
            Ok(path) => {
                let text = format!("{} {}", tr(self.lang(), Label::Exported), path.display());
                self.editor.set_status(StatusKind::Info, text);
            }
            Err(e) => self.editor.report_error(&e.into()),
        }
    }

    fn render_splash(&self, ctx: &egui::Context) {
        let s = style::surface(self.theme());
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.max_rect();
            let painter = ui.painter();
            painter.text(rect.center() - egui::vec2(0.0, 16.0), egui::Align2::CENTER_CENTER, "ZEditor PRO",
                egui::FontId::proportional(42.0), s.text);
            painter.text(rect.center() + egui::vec2(0.0, 24.0), egui::Align2::CENTER_CENTER, "ZEditor PRO | NEURAL 2026",
                egui::FontId::proportional(12.0), ColorPalette::INDIGO_400);
        });
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        let lang = self.lang();
        let theme = self.theme();
        let s = style::surface(theme);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.add(egui::Button::new("⚙").corner_radius(10.0)).on_hover_text(tr(lang, Label::Settings)).clicked() {
                    self.show_settings = true;
                }
                ui.label(egui::RichText::new("ZEditor").size(18.0).strong().color(s.text));
                ui.label(egui::RichText::new("PRO").size(11.0).strong().color(ColorPalette::INDIGO_400));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let has_image = self.editor.has_image();
                    if style::primary_button(ui, tr(lang, Label::Save), has_image).clicked() {
                        self.show_export_hub = true;
                    }
                    let undo = egui::Button::new(format!("↶ {}", tr(lang, Label::Undo))).corner_radius(10.0);
                    if ui.add_enabled(self.editor.can_undo(), undo).clicked() {
                        self.editor.undo();
                    }
                    if style::secondary_button(ui, tr(lang, Label::OpenImage), theme).clicked() {
                        self.editor.pick_and_open();
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn modal_overlay(ctx: &egui::Context, id: &str, color: egui::Color32) {
        egui::Area::new(egui::Id::new(id))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                ui.painter().rect_filled(ctx.content_rect(), 0.0, color);
            });
    }

    fn closed_by_outside_click(ctx: &egui::Context, window: &egui::Response) -> bool {
        ctx.input(|i| {
            i.pointer.any_click()
                && i.pointer.interact_pos().is_some_and(|p| !window.rect.contains(p))
        })
    }

    fn render_export_hub(&mut self, ctx: &egui::Context) {
        if !self.show_export_hub { return; }
        let lang = self.lang();
        let s = style::surface(self.theme());
        Self::modal_overlay(ctx, "export_overlay", s.overlay);

        let mut open = self.show_export_hub;
        let mut chosen = None;
        let response = egui::Window::new(tr(lang, Label::ExportLab))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .min_width(360.0)
            .frame(egui::Frame::new().fill(s.bg).stroke(egui::Stroke::new(1.0, s.border)).corner_radius(10.0).inner_margin(28.0))
            .open(&mut open)
            .order(egui::Order::Tooltip)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(tr(lang, Label::ExportLab).to_uppercase()).size(11.0).color(s.muted));
                ui.add_space(12.0);
                for tier in ExportTier::all() {
                    let detail = match tier.target_width() {
                        Some(w) => format!("{} px", w),
                        None => "orig".to_string(),
                    };
                    let row = egui::Button::new(
                        egui::RichText::new(format!("{}   ·   {}", tier.as_str(), detail)).size(14.0).color(s.text),
                    )
                    .min_size(egui::vec2(ui.available_width(), 44.0))
                    .corner_radius(12.0);
                    if ui.add(row).clicked() { chosen = Some(tier); }
                    ui.add_space(6.0);
                }
            });

        if let Some(r) = response {
            if Self::closed_by_outside_click(ctx, &r.response) { open = false; }
        }
        if let Some(tier) = chosen {
            open = false;
            self.export(tier);
        }
        self.show_export_hub = open;
    }

    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings { return; }
        let lang = self.lang();
        let s = style::surface(self.theme());
        Self::modal_overlay(ctx, "settings_overlay", s.overlay);

        let section = |ui: &mut egui::Ui, label: Label| {
            ui.add_space(14.0);
            ui.label(egui::RichText::new(tr(lang, label).to_uppercase()).size(11.0).color(s.muted));
            ui.add_space(6.0);
        };

        let env_key = AppSettings::env_api_key().is_some();
        let mut theme_pick = None;
        let mut changed = false;
        let mut open = self.show_settings;

        let response = egui::Window::new(tr(lang, Label::Settings))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .min_width(400.0)
            .frame(egui::Frame::new().fill(s.bg).stroke(egui::Stroke::new(1.0, s.border)).corner_radius(10.0).inner_margin(28.0))
            .open(&mut open)
            .order(egui::Order::Tooltip)
            .show(ctx, |ui| {
                let settings = &mut self.settings;

                section(ui, Label::Appearance);
                ui.horizontal(|ui| {
                    for (mode, label) in [(ThemeMode::Dark, Label::Dark), (ThemeMode::Light, Label::Light)] {
                        if ui.selectable_label(settings.theme == mode, tr(lang, label)).clicked() { theme_pick = Some(mode); }
                    }
                });

                section(ui, Label::Language);
                ui.horizontal(|ui| {
                    for language in Language::all() {
                        if ui.selectable_label(settings.language == language, language.code()).clicked() && settings.language != language {
                            settings.language = language;
                            changed = true;
                        }
                    }
                });

                section(ui, Label::EditorSection);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(tr(lang, Label::HighPrecision)).size(14.0).color(s.text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.checkbox(&mut settings.high_precision, "").changed() { changed = true; }
                    });
                });
                ui.label(egui::RichText::new(tr(lang, Label::HighPrecisionHint)).size(11.0).color(s.muted));
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(tr(lang, Label::ResetToolsOnUndo)).size(14.0).color(s.text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.checkbox(&mut settings.reset_tools_on_undo, "").changed() { changed = true; }
                    });
                });
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(tr(lang, Label::HistoryLimit)).size(14.0).color(s.text));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if settings.history_cap == 0 {
                            ui.label(egui::RichText::new(tr(lang, Label::Unlimited)).size(11.0).color(s.muted));
                        }
                        if ui.add(egui::DragValue::new(&mut settings.history_cap).range(0..=500)).changed() { changed = true; }
                    });
                });

                section(ui, Label::AiSection);
                ui.horizontal_wrapped(|ui| {
                    for tier in ModelTier::all() {
                        if ui.selectable_label(settings.model_tier == tier, tier.as_str()).on_hover_text(tier.badge()).clicked()
                            && settings.model_tier != tier
                        {
                            settings.model_tier = tier;
                            changed = true;
                        }
                    }
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(tr(lang, Label::ApiKey)).size(14.0).color(s.text));
                    let edit = ui.add_enabled(
                        !env_key,
                        egui::TextEdit::singleline(&mut settings.remote.api_key).password(true).desired_width(220.0),
                    );
                    if edit.lost_focus() { changed = true; }
                });
                if env_key {
                    ui.label(egui::RichText::new(tr(lang, Label::ApiKeyFromEnv)).size(11.0).color(s.muted));
                }
            });

        if let Some(r) = response {
            if Self::closed_by_outside_click(ctx, &r.response) { open = false; }
        }
        self.show_settings = open;

        if let Some(mode) = theme_pick {
            if mode != self.settings.theme {
                self.settings.theme = mode;
                style::apply_theme(ctx, mode);
                changed = true;
            }
        }
        if changed { self.settings_changed(); }
    }

    /// The AI panel lets the user switch tiers; keep the stored preference in step.
    fn sync_model_tier(&mut self) {
        let tier = self.editor.model_tier();
        if tier != self.settings.model_tier {
            self.settings.model_tier = tier;
            self.settings.save();
        }
    }
}

impl eframe::App for ZEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let since_start = self.started.elapsed();
        if since_start < SPLASH {
            self.render_splash(ctx);
            ctx.request_repaint_after(SPLASH - since_start);
            return;
        }

        self.handle_dropped_files(ctx);
        self.render_settings_modal(ctx);
        self.render_export_hub(ctx);
        self.top_bar(ctx);
        self.editor.show(ctx, self.theme(), self.lang());
        self.sync_model_tier();
    }
}
