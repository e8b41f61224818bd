use eframe::egui;
use crate::i18n::{Label, Language, tr};
use crate::remote::ModelTier;
use crate::style::{self, ColorPalette, ThemeMode};
use super::pe_adjust::{Adjustment, AspectRatio};
use super::pe_compose::Fit;
use super::pe_main::{PhotoEditor, StatusKind, ToolPanel, MAGIC_ERASER_PROMPT, QUICK_PROMPTS, RELIGHT_PROMPT};
use super::pe_presets::PRESETS;

const CANVAS_MARGIN: f32 = 0.92;
const CHECKER: f32 = 16.0;

/// Screen rect and texture window for an image of `img` size shown in `canvas`.
/// `Cover` crops the texture to the requested ratio around its center.
pub(super) fn layout_image(canvas: egui::Rect, img: egui::Vec2, fit: Fit) -> (egui::Rect, egui::Rect) {
    let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if img.x <= 0.0 || img.y <= 0.0 { return (egui::Rect::NOTHING, full_uv); }

    let (shown, uv) = match fit {
        Fit::Contain => (img, full_uv),
        Fit::Cover(ratio) => {
            let img_ratio = img.x / img.y;
            if img_ratio > ratio {
                let w = ratio / img_ratio;
                (egui::vec2(img.y * ratio, img.y), egui::Rect::from_min_max(egui::pos2(0.5 - w / 2.0, 0.0), egui::pos2(0.5 + w / 2.0, 1.0)))
            } else {
                let h = img_ratio / ratio;
                (egui::vec2(img.x, img.x / ratio), egui::Rect::from_min_max(egui::pos2(0.0, 0.5 - h / 2.0), egui::pos2(1.0, 0.5 + h / 2.0)))
            }
        }
    };

    let scale = (canvas.width() / shown.x).min(canvas.height() / shown.y) * CANVAS_MARGIN;
    (egui::Rect::from_center_size(canvas.center(), shown * scale), uv)
}

/// Mirrors the texture window along each axis whose scale is negative.
pub(super) fn mirror_uv(uv: egui::Rect, scale_x: f32, scale_y: f32) -> egui::Rect {
    let (mut min, mut max) = (uv.min, uv.max);
    if scale_x < 0.0 { std::mem::swap(&mut min.x, &mut max.x); }
    if scale_y < 0.0 { std::mem::swap(&mut min.y, &mut max.y); }
    egui::Rect::from_min_max(min, max)
}

impl PhotoEditor {
    pub(super) fn render_nav_bar(&mut self, ctx: &egui::Context, theme: ThemeMode, lang: Language) {
        let enabled = self.has_image();
        egui::TopBottomPanel::bottom("nav_bar")
            .exact_height(64.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.columns(5, |cols| {
                        let tools = [ToolPanel::Adjust, ToolPanel::Filter, ToolPanel::Ai, ToolPanel::Transform, ToolPanel::More];
                        for (col, tool) in cols.iter_mut().zip(tools) {
                            col.vertical_centered(|ui| {
                                ui.add_space(12.0);
                                self.nav_btn(ui, tool, theme, lang);
                            });
                        }
                    });
                });
            });
    }

    fn nav_btn(&mut self, ui: &mut egui::Ui, tool: ToolPanel, theme: ThemeMode, lang: Language) {
        let active = self.tool == tool;
        let s = style::surface(theme);
        let (bg, hover, txt) = if active || tool == ToolPanel::Ai {
            (ColorPalette::INDIGO_600, ColorPalette::INDIGO_500, egui::Color32::WHITE)
        } else {
            (egui::Color32::TRANSPARENT, s.border, s.text)
        };

        let response = ui.scope(|ui| {
            let st = ui.style_mut();
            st.visuals.widgets.inactive.weak_bg_fill = bg;
            st.visuals.widgets.inactive.bg_stroke = egui::Stroke::NONE;
            st.visuals.widgets.hovered.weak_bg_fill = hover;
            st.visuals.widgets.hovered.bg_stroke = egui::Stroke::NONE;
            st.visuals.widgets.active.weak_bg_fill = hover;
            ui.add(
                egui::Button::new(egui::RichText::new(tr(lang, tool.nav_label())).size(13.0).strong().color(txt))
                    .min_size(egui::vec2(72.0, 34.0))
                    .corner_radius(12.0),
            )
        }).inner;

        if response.clicked() { self.tool = tool; }
    }

    pub(super) fn render_canvas(&mut self, ui: &mut egui::Ui, theme: ThemeMode, lang: Language) {
        let canvas_rect = ui.available_rect_before_wrap();
        let (rect, response) = ui.allocate_exact_size(canvas_rect.size(), egui::Sense::click());
        let painter = ui.painter_at(rect);
        let s = style::surface(theme);

        let (Some(tex), Some(size)) = (self.texture, self.preview_size()) else {
            let drop_zone = rect.shrink(rect.width().min(rect.height()) * 0.12);
            painter.rect_stroke(drop_zone, 32.0, egui::Stroke::new(1.5, s.border), egui::StrokeKind::Inside);
            painter.text(drop_zone.center() - egui::vec2(0.0, 18.0), egui::Align2::CENTER_CENTER, "ZEditor PRO",
                egui::FontId::proportional(30.0), s.text);
            painter.text(drop_zone.center() + egui::vec2(0.0, 20.0), egui::Align2::CENTER_CENTER, tr(lang, Label::OpenHint),
                egui::FontId::proportional(14.0), s.muted);
            if response.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() { self.pick_and_open(); }
            self.render_status(&painter, rect, theme);
            return;
        };

        let descriptor = self.session.style();
        let (img_rect, uv) = layout_image(rect, size, descriptor.fit);
        let t = descriptor.transform;

        let (c1, c2) = if ui.visuals().dark_mode {
            (egui::Color32::from_rgb(40, 40, 40), egui::Color32::from_rgb(55, 55, 55))
        } else {
            (egui::Color32::from_rgb(200, 200, 200), egui::Color32::from_rgb(220, 220, 220))
        };
        let checker = painter.with_clip_rect(img_rect);
        let mut cy = img_rect.min.y;
        while cy < img_rect.max.y {
            let mut cx = img_rect.min.x;
            let row = ((cy - img_rect.min.y) / CHECKER) as i32;
            while cx < img_rect.max.x {
                let col = ((cx - img_rect.min.x) / CHECKER) as i32;
                let color = if (row + col) % 2 == 0 { c1 } else { c2 };
                checker.rect_filled(egui::Rect::from_min_size(egui::pos2(cx, cy), egui::vec2(CHECKER, CHECKER)), 0.0, color);
                cx += CHECKER;
            }
            cy += CHECKER;
        }

        let mut mesh = egui::Mesh::with_texture(tex);
        mesh.add_rect_with_uv(img_rect, mirror_uv(uv, t.scale_x, t.scale_y), egui::Color32::WHITE);
        if t.rotation_degrees != 0.0 {
            mesh.rotate(egui::emath::Rot2::from_angle(t.rotation_degrees.to_radians()), img_rect.center());
        }
        painter.add(egui::Shape::mesh(mesh));

        if self.is_processing() {
            painter.rect_filled(rect, 0.0, s.overlay);
            let spinner = egui::Rect::from_center_size(rect.center() - egui::vec2(0.0, 16.0), egui::vec2(28.0, 28.0));
            ui.put(spinner, egui::Spinner::new().size(28.0).color(ColorPalette::INDIGO_400));
            painter.text(rect.center() + egui::vec2(0.0, 18.0), egui::Align2::CENTER_CENTER, tr(lang, Label::Processing),
                egui::FontId::proportional(15.0), egui::Color32::WHITE);
        }

        self.render_status(&painter, rect, theme);
    }

    fn render_status(&self, painter: &egui::Painter, rect: egui::Rect, theme: ThemeMode) {
        let Some(status) = &self.status else { return };
        let color = match status.kind {
            StatusKind::Info => ColorPalette::GREEN_500,
            StatusKind::Error => if matches!(theme, ThemeMode::Dark) { ColorPalette::RED_400 } else { ColorPalette::RED_600 },
        };
        painter.text(rect.center_bottom() - egui::vec2(0.0, 14.0), egui::Align2::CENTER_BOTTOM, &status.text,
            egui::FontId::proportional(13.0), color);
    }

    pub(super) fn render_tool_panel(&mut self, ctx: &egui::Context, theme: ThemeMode, lang: Language) {
        if self.tool == ToolPanel::None || !self.has_image() { return; }
        let s = style::surface(theme);

        egui::Window::new(tr(lang, self.tool.title()))
            .id(egui::Id::new("tool_panel"))
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -80.0))
            .fixed_size(egui::vec2(420.0, 0.0))
            .frame(egui::Frame::new().fill(s.bg).stroke(egui::Stroke::new(1.5, s.border)).corner_radius(16.0).inner_margin(20.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(tr(lang, self.tool.title()).to_uppercase()).size(13.0).strong().color(s.text));
                        ui.label(egui::RichText::new("Vision Hub v.26.0").size(9.0).color(s.muted));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(egui::Button::new("✔").corner_radius(10.0)).clicked() { self.tool = ToolPanel::None; }
                        if ui.add(egui::Button::new("✕").corner_radius(10.0)).on_hover_text(tr(lang, Label::Close)).clicked() {
                            self.tool = ToolPanel::None;
                        }
                    });
                });
                ui.add_space(12.0);

                match self.tool {
                    ToolPanel::Adjust => self.render_adjust(ui, theme, lang),
                    ToolPanel::Filter => self.render_presets(ui, theme),
                    ToolPanel::Ai => self.render_ai(ui, ctx, theme, lang),
                    ToolPanel::Transform => self.render_transform(ui, theme, lang),
                    ToolPanel::More => self.render_more(ui, ctx, theme, lang),
                    ToolPanel::None => {}
                }
            });
    }

    fn render_adjust(&mut self, ui: &mut egui::Ui, theme: ThemeMode, lang: Language) {
        let muted = style::surface(theme).muted;
        let sliders = [
            (Adjustment::Brightness, Label::Brightness),
            (Adjustment::Contrast, Label::Contrast),
            (Adjustment::Saturation, Label::Saturation),
        ];
        for (adj, label) in sliders {
            let mut value = self.session.adjustments().get(adj);
            ui.label(egui::RichText::new(tr(lang, label)).size(11.0).color(muted));
            if ui.add(egui::Slider::new(&mut value, adj.range()).suffix("%")).changed() {
                self.session.set_adjustment(adj, value);
            }
            ui.add_space(4.0);
        }
        if style::secondary_button(ui, tr(lang, Label::Reset), theme).clicked() {
            self.session.reset_adjustments();
        }
    }

    fn render_presets(&mut self, ui: &mut egui::Ui, theme: ThemeMode) {
        let s = style::surface(theme);
        egui::ScrollArea::horizontal()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (i, preset) in PRESETS.iter().enumerate() {
                        let selected = self.session.preset().id == preset.id;
                        ui.vertical(|ui| {
                            let clicked = match self.thumbnails.get(i) {
                                Some(thumb) => ui.add(
                                    egui::Button::image(egui::Image::new((thumb.id(), egui::vec2(72.0, 72.0))).corner_radius(12.0))
                                        .selected(selected)
                                        .corner_radius(14.0),
                                ).clicked(),
                                None => style::pill(ui, preset.name, selected, theme).clicked(),
                            };
                            let color = if selected { ColorPalette::INDIGO_400 } else { s.muted };
                            ui.label(egui::RichText::new(preset.name).size(11.0).color(color));
                            if clicked { self.session.select_preset(preset); }
                        });
                    }
                });
            });
    }

    fn render_ai(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, theme: ThemeMode, lang: Language) {
        let s = style::surface(theme);
        ui.horizontal_wrapped(|ui| {
            for tier in ModelTier::all() {
                let text = format!("{} · {}", tier.as_str(), tier.badge());
                if style::pill(ui, &text, self.model_tier == tier, theme).clicked() { self.model_tier = tier; }
            }
        });
        ui.add_space(10.0);

        ui.add(
            egui::TextEdit::multiline(&mut self.prompt)
                .hint_text(tr(lang, Label::PromptHint))
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);

        let can_send = !self.prompt.trim().is_empty() && !self.is_processing();
        ui.horizontal(|ui| {
            if style::primary_button(ui, tr(lang, Label::Send), can_send).clicked() {
                self.submit_prompt(Some(ctx.clone()));
            }
            if self.is_processing() {
                ui.add(egui::Spinner::new().color(ColorPalette::INDIGO_400));
                ui.label(egui::RichText::new(tr(lang, Label::Processing)).size(12.0).color(s.muted));
            }
        });
        ui.add_space(10.0);

        ui.horizontal_wrapped(|ui| {
            for quick in QUICK_PROMPTS {
                if style::secondary_button(ui, quick, theme).clicked() {
                    self.submit_ai(quick, Some(ctx.clone()));
                }
            }
        });
    }

    fn render_transform(&mut self, ui: &mut egui::Ui, theme: ThemeMode, lang: Language) {
        let muted = style::surface(theme).muted;
        let transform = *self.session.transform();

        ui.label(egui::RichText::new(tr(lang, Label::Rotation)).size(11.0).color(muted));
        let mut rotation = transform.rotation_degrees;
        if ui.add(egui::Slider::new(&mut rotation, -180.0..=180.0).suffix("°")).changed() {
            self.session.set_rotation(rotation);
        }
        ui.horizontal(|ui| {
            if style::secondary_button(ui, "⟲ 90°", theme).clicked() { self.session.rotate_by(-90.0); }
            if style::secondary_button(ui, "⟳ 90°", theme).clicked() { self.session.rotate_by(90.0); }
            if style::secondary_button(ui, tr(lang, Label::FlipHorizontal), theme).clicked() { self.session.flip_horizontal(); }
            if style::secondary_button(ui, tr(lang, Label::FlipVertical), theme).clicked() { self.session.flip_vertical(); }
        });
        ui.add_space(8.0);

        ui.label(egui::RichText::new(tr(lang, Label::Aspect)).size(11.0).color(muted));
        ui.horizontal_wrapped(|ui| {
            for aspect in AspectRatio::PRESETS {
                if style::pill(ui, &aspect.label(), transform.aspect == aspect, theme).clicked() {
                    self.session.set_aspect(aspect);
                }
            }
        });
        ui.add_space(8.0);
        if style::secondary_button(ui, tr(lang, Label::Reset), theme).clicked() { self.session.reset_transform(); }
    }

    fn render_more(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, theme: ThemeMode, lang: Language) {
        ui.columns(2, |cols| {
            let actions = [(Label::MagicEraser, MAGIC_ERASER_PROMPT), (Label::RelightPro, RELIGHT_PROMPT)];
            for (col, (label, prompt)) in cols.iter_mut().zip(actions) {
                col.vertical_centered_justified(|ui| {
                    let button = egui::Button::new(egui::RichText::new(tr(lang, label)).size(13.0).strong())
                        .min_size(egui::vec2(0.0, 72.0))
                        .corner_radius(20.0)
                        .stroke(egui::Stroke::new(1.0, style::surface(theme).border));
                    if ui.add(button).clicked() { self.submit_ai(prompt, Some(ctx.clone())); }
                });
            }
        });
    }
}
