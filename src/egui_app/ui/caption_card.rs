//! Caption card rendering: template image, meme text, and placeholders.

use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, RichText, TextureHandle, Ui, Vec2,
};

use crate::egui_app::ui::style;
use crate::egui_app::state::CaptionCardState;

const CARD_HEIGHT: f32 = 256.0;
const TEXT_INSET: f32 = 12.0;

/// Render the caption card.
///
/// `texture` is the uploaded template image for the current caption, when
/// one is ready; without it the card shows a textual stand-in, which is the
/// terminal path for image failures.
pub fn render(ui: &mut Ui, state: &CaptionCardState, texture: Option<&TextureHandle>) {
    if state.loading {
        render_loading(ui);
        return;
    }
    let Some(caption) = state.caption.as_ref() else {
        return;
    };

    let (rect, response) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), CARD_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, CornerRadius::same(10), Color32::from_rgb(15, 23, 42));

    match texture {
        Some(texture) => {
            let uv = image_uv(texture.aspect_ratio(), rect.aspect_ratio());
            painter.image(texture.id(), rect, uv, Color32::WHITE);
        }
        None => {
            let message = if state.image_failed {
                "TEMPLATE FAILED TO LOAD"
            } else {
                "FETCHING TEMPLATE..."
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                message,
                FontId::proportional(11.0),
                style::palette().text_muted,
            );
        }
    }

    draw_meme_line(&painter, rect, &caption.top_text, Align2::CENTER_TOP);
    draw_meme_line(&painter, rect, &caption.bottom_text, Align2::CENTER_BOTTOM);
    painter.text(
        rect.right_bottom() - Vec2::new(8.0, 5.0),
        Align2::RIGHT_BOTTOM,
        "BUNKMATE",
        FontId::proportional(8.0),
        Color32::from_rgba_unmultiplied(255, 255, 255, 150),
    );

    if !caption.advice.is_empty() {
        response.on_hover_text(caption.advice.as_str());
    }
}

fn render_loading(ui: &mut Ui) {
    let palette = style::palette();
    egui::Frame::default()
        .fill(palette.bg_panel)
        .stroke(style::outer_border())
        .corner_radius(CornerRadius::same(10))
        .show(ui, |ui| {
            ui.set_min_size(Vec2::new(ui.available_width(), CARD_HEIGHT));
            ui.vertical_centered(|ui| {
                ui.add_space(CARD_HEIGHT / 2.0 - 24.0);
                ui.spinner();
                ui.add_space(6.0);
                ui.label(
                    RichText::new("COOKING UP A ROAST...")
                        .size(10.0)
                        .color(palette.text_muted),
                );
            });
        });
}

/// Classic meme lettering: uppercase white with a black outline, drawn by
/// stamping offset copies before the face color.
fn draw_meme_line(painter: &egui::Painter, rect: Rect, text: &str, anchor: Align2) {
    if text.is_empty() {
        return;
    }
    let text = text.to_uppercase();
    let font = FontId::proportional(26.0);
    let pos = if anchor == Align2::CENTER_TOP {
        rect.center_top() + Vec2::new(0.0, TEXT_INSET)
    } else {
        rect.center_bottom() - Vec2::new(0.0, TEXT_INSET)
    };
    for offset in [
        Vec2::new(-1.5, -1.5),
        Vec2::new(1.5, -1.5),
        Vec2::new(-1.5, 1.5),
        Vec2::new(1.5, 1.5),
        Vec2::new(2.5, 2.5),
    ] {
        painter.text(pos + offset, anchor, &text, font.clone(), Color32::BLACK);
    }
    painter.text(pos, anchor, text, font, Color32::WHITE);
}

/// Center-crop UV so the template covers the card like `object-fit: cover`.
fn image_uv(image_aspect: f32, rect_aspect: f32) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    if image_aspect <= 0.0 || rect_aspect <= 0.0 {
        return full;
    }
    if image_aspect > rect_aspect {
        // Image is wider than the card: crop left and right.
        let width = rect_aspect / image_aspect;
        let margin = (1.0 - width) / 2.0;
        Rect::from_min_max(Pos2::new(margin, 0.0), Pos2::new(1.0 - margin, 1.0))
    } else {
        let height = image_aspect / rect_aspect;
        let margin = (1.0 - height) / 2.0;
        Rect::from_min_max(Pos2::new(0.0, margin), Pos2::new(1.0, 1.0 - margin))
    }
}
