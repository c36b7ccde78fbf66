//! Palette and status tones shared across UI pieces.

use eframe::egui::{Color32, CornerRadius, Stroke, Visuals};

use crate::prediction::PredictionCategory;

/// Severity of a status-bar message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    /// Nothing noteworthy happened yet.
    Idle,
    /// Routine confirmation.
    Info,
    /// Degraded but recovered (fallback caption, placeholder image).
    Warning,
    /// Something the user may want to look into.
    Error,
}

/// Light palette loosely after slate/sky utility colors.
#[derive(Clone, Copy)]
pub struct Palette {
    /// Window background.
    pub bg_primary: Color32,
    /// Card background.
    pub bg_panel: Color32,
    /// Card and widget outlines.
    pub panel_outline: Color32,
    /// Text field background.
    pub field_fill: Color32,
    /// Primary text.
    pub text_primary: Color32,
    /// Secondary labels.
    pub text_muted: Color32,
    /// Safe accent (gauge, attend button).
    pub safe: Color32,
    /// Danger accent (gauge, bunk button).
    pub danger: Color32,
    /// Unfilled gauge ring.
    pub gauge_track: Color32,
}

/// The shared palette.
pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(241, 245, 249),
        bg_panel: Color32::WHITE,
        panel_outline: Color32::from_rgb(226, 232, 240),
        field_fill: Color32::from_rgb(248, 250, 252),
        text_primary: Color32::from_rgb(51, 65, 85),
        text_muted: Color32::from_rgb(148, 163, 184),
        safe: Color32::from_rgb(14, 165, 233),
        danger: Color32::from_rgb(239, 68, 68),
        gauge_track: Color32::from_rgb(241, 245, 249),
    }
}

/// Apply the palette to egui's light visuals.
pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_primary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.extreme_bg_color = palette.field_fill;
    visuals.faint_bg_color = palette.bg_panel;
    visuals.selection.stroke = Stroke::new(1.0, palette.safe);
    visuals.widgets.noninteractive.bg_fill = palette.bg_panel;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    visuals.widgets.inactive.bg_fill = palette.field_fill;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    visuals.widgets.hovered.bg_fill = palette.field_fill;
    visuals.widgets.active.bg_fill = palette.field_fill;
    visuals.window_corner_radius = CornerRadius::same(10);
}

/// Outline used around cards.
pub fn outer_border() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

/// Status badge color for the footer.
pub fn status_badge_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Idle => palette.text_muted,
        StatusTone::Info => palette.safe,
        StatusTone::Warning => Color32::from_rgb(217, 119, 6),
        StatusTone::Error => palette.danger,
    }
}

/// Fill, text, and outline colors for the prediction badge.
#[derive(Clone, Copy)]
pub struct BadgeColors {
    /// Badge background.
    pub fill: Color32,
    /// Badge text.
    pub text: Color32,
    /// Badge outline.
    pub outline: Color32,
}

/// Badge colors per prediction category.
pub fn badge_colors(category: PredictionCategory) -> BadgeColors {
    match category {
        PredictionCategory::Safe => BadgeColors {
            fill: Color32::from_rgb(236, 253, 245),
            text: Color32::from_rgb(5, 150, 105),
            outline: Color32::from_rgb(209, 250, 229),
        },
        PredictionCategory::Warning => BadgeColors {
            fill: Color32::from_rgb(255, 251, 235),
            text: Color32::from_rgb(217, 119, 6),
            outline: Color32::from_rgb(253, 230, 138),
        },
        PredictionCategory::Danger => BadgeColors {
            fill: Color32::from_rgb(254, 242, 242),
            text: Color32::from_rgb(220, 38, 38),
            outline: Color32::from_rgb(254, 226, 226),
        },
        PredictionCategory::Neutral => BadgeColors {
            fill: Color32::from_rgb(248, 250, 252),
            text: Color32::from_rgb(148, 163, 184),
            outline: Color32::from_rgb(241, 245, 249),
        },
    }
}
