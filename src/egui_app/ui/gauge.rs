//! Circular attendance gauge painting.
//!
//! Pure function of the percentage: the arc geometry clamps to [0, 100] so a
//! bad input can never corrupt the drawing, while the numeric label shows the
//! unclamped value.

use eframe::egui::{self, Align2, Color32, FontId, Stroke, Ui, Vec2};

use crate::attendance::THRESHOLD;
use crate::egui_app::ui::style;

const GAUGE_SIZE: f32 = 130.0;
const RING_RADIUS: f32 = 55.0;
const RING_STROKE: f32 = 5.0;
const ARC_SEGMENTS: usize = 96;

/// Paint the gauge into the next available space.
pub fn paint(ui: &mut Ui, percentage: f64) {
    let (rect, _response) =
        ui.allocate_exact_size(Vec2::splat(GAUGE_SIZE), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let palette = style::palette();
    let center = rect.center();

    painter.circle_stroke(
        center,
        RING_RADIUS,
        Stroke::new(RING_STROKE, palette.gauge_track),
    );

    let color = ring_color(percentage, &palette);
    let fraction = arc_fraction(percentage);
    if fraction > 0.0 {
        let start = -std::f32::consts::FRAC_PI_2;
        let sweep = fraction * std::f32::consts::TAU;
        let points: Vec<egui::Pos2> = (0..=ARC_SEGMENTS)
            .map(|segment| {
                let angle = start + sweep * segment as f32 / ARC_SEGMENTS as f32;
                center + RING_RADIUS * Vec2::angled(angle)
            })
            .collect();
        painter.add(egui::Shape::line(points, Stroke::new(RING_STROKE, color)));
    }

    painter.text(
        center - Vec2::new(0.0, 7.0),
        Align2::CENTER_CENTER,
        label_text(percentage),
        FontId::proportional(21.0),
        color,
    );
    painter.text(
        center + Vec2::new(0.0, 13.0),
        Align2::CENTER_CENTER,
        "ATTENDANCE",
        FontId::proportional(9.0),
        palette.text_muted,
    );
}

/// Fraction of the full circle the arc covers, clamped to [0, 1].
fn arc_fraction(percentage: f64) -> f32 {
    (percentage.clamp(0.0, 100.0) / 100.0) as f32
}

/// Label text, unclamped and rounded to two decimals.
fn label_text(percentage: f64) -> String {
    format!("{percentage:.2}%")
}

fn ring_color(percentage: f64, palette: &style::Palette) -> Color32 {
    if percentage > THRESHOLD {
        palette.safe
    } else {
        palette.danger
    }
}
