//! egui renderer for the application UI.

/// Caption card rendering.
pub mod caption_card;
/// Circular gauge painting.
pub mod gauge;
/// Palette and status tones shared across UI pieces.
pub mod style;

use std::time::{Duration, Instant};

use eframe::egui::{
    self, Align, Button, CornerRadius, Frame, Margin, RichText, Stroke, TextEdit, TextureHandle,
    TextureOptions, Ui,
};

use crate::caption::TemplateId;
use crate::egui_app::controller::AppController;

/// Minimum window size the layout still works at.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::Vec2::new(360.0, 640.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: AppController,
    visuals_set: bool,
    template_texture: Option<(TemplateId, TextureHandle)>,
}

impl EguiApp {
    /// Create the app over the live collaborator; the initial caption
    /// request fires immediately.
    pub fn new() -> Self {
        Self {
            controller: AppController::from_settings(),
            visuals_set: false,
            template_texture: None,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::light();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    /// Keep frames coming while background work or a debounce window is
    /// pending; egui only repaints on input otherwise.
    fn schedule_repaint(&self, ctx: &egui::Context) {
        if self.controller.has_background_work() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if let Some(delay) = self.controller.time_until_caption_dispatch(Instant::now()) {
            ctx.request_repaint_after(delay.max(Duration::from_millis(16)));
        }
    }

    /// Upload the decoded template image as a texture when it changed.
    fn sync_template_texture(&mut self, ctx: &egui::Context) {
        let card = &self.controller.ui.caption;
        let Some(caption) = card.caption.as_ref() else {
            return;
        };
        let Some(image) = card.image.as_ref() else {
            return;
        };
        let template = caption.template_id;
        let current = self
            .template_texture
            .as_ref()
            .is_some_and(|(loaded, _)| *loaded == template);
        if current {
            return;
        }
        let texture = ctx.load_texture(
            format!("template-{}", template.as_str()),
            (**image).clone(),
            TextureOptions::LINEAR,
        );
        self.template_texture = Some((template, texture));
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("header")
            .frame(
                Frame::default()
                    .fill(palette.bg_panel)
                    .inner_margin(Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Bunkmate")
                                .size(17.0)
                                .strong()
                                .color(palette.text_primary),
                        );
                        ui.label(
                            RichText::new("SAVE YOURSELF FROM DETENTION")
                                .size(8.0)
                                .color(palette.text_muted),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Refresh roast").clicked() {
                            self.controller.refresh_caption_now();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::default()
                    .fill(palette.bg_panel)
                    .inner_margin(Margin::symmetric(10, 6)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(5.0, 8.0),
                        4.0,
                        style::status_badge_color(status.tone),
                    );
                    ui.add_space(14.0);
                    ui.label(
                        RichText::new(&status.text)
                            .size(11.0)
                            .color(palette.text_muted),
                    );
                });
            });
    }

    fn render_stats(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        Frame::default()
            .fill(palette.bg_panel)
            .stroke(style::outer_border())
            .corner_radius(CornerRadius::same(10))
            .inner_margin(Margin::same(14))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    gauge::paint(ui, self.controller.ui.gauge.percentage);
                    ui.add_space(10.0);
                    ui.vertical(|ui| {
                        let attended_text = self.controller.ui.inputs.attended.clone();
                        let total_text = self.controller.ui.inputs.total.clone();
                        ui.horizontal(|ui| {
                            if let Some(edited) = counter_field(ui, "ATTENDED", &attended_text) {
                                self.controller.edit_attended(&edited);
                            }
                            if let Some(edited) = counter_field(ui, "TOTAL", &total_text) {
                                self.controller.edit_total(&edited);
                            }
                        });
                        ui.add_space(8.0);
                        render_prediction_badge(ui, &self.controller);
                    });
                });
            });
    }

    fn render_simulation(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.horizontal(|ui| {
            let half = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
            let bunk = Button::new(
                RichText::new("BUNK +1")
                    .size(11.0)
                    .strong()
                    .color(palette.danger),
            );
            if ui.add_sized([half, 30.0], bunk).clicked() {
                self.controller.simulate_skip();
            }
            let attend = Button::new(
                RichText::new("ATTEND +1")
                    .size(11.0)
                    .strong()
                    .color(palette.safe),
            );
            if ui.add_sized([half, 30.0], attend).clicked() {
                self.controller.simulate_attend();
            }
        });
    }

    fn render_caption(&mut self, ui: &mut Ui) {
        let card = &self.controller.ui.caption;
        let texture = self
            .template_texture
            .as_ref()
            .filter(|(template, _)| {
                card.caption
                    .as_ref()
                    .is_some_and(|caption| caption.template_id == *template)
            })
            .map(|(_, texture)| texture);
        caption_card::render(ui, card, texture);
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick(Instant::now());
        self.sync_template_texture(ctx);
        self.schedule_repaint(ctx);
        self.render_header(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_stats(ui);
            ui.add_space(8.0);
            self.render_simulation(ui);
            ui.add_space(8.0);
            self.render_caption(ui);
        });
    }
}

/// One labeled counter field; returns the new text when the user edited it.
fn counter_field(ui: &mut Ui, label: &str, value: &str) -> Option<String> {
    let palette = style::palette();
    let mut text = value.to_string();
    let mut edited = None;
    ui.vertical(|ui| {
        ui.label(
            RichText::new(label)
                .size(8.0)
                .strong()
                .color(palette.text_muted),
        );
        let response = ui.add(
            TextEdit::singleline(&mut text)
                .desired_width(64.0)
                .horizontal_align(Align::Center)
                .hint_text("0"),
        );
        if response.changed() {
            edited = Some(text.clone());
        }
    });
    edited
}

fn render_prediction_badge(ui: &mut Ui, controller: &AppController) {
    let badge = &controller.ui.prediction;
    let colors = style::badge_colors(badge.category);
    Frame::default()
        .fill(colors.fill)
        .stroke(Stroke::new(1.0, colors.outline))
        .corner_radius(CornerRadius::same(6))
        .inner_margin(Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.label(
                RichText::new(&badge.text)
                    .size(12.0)
                    .strong()
                    .color(colors.text),
            );
        });
}
