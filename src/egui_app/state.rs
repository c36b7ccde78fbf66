//! Shared state types for the egui UI.

use std::sync::Arc;

use egui::ColorImage;

use crate::attendance::{DEFAULT_ATTENDED, DEFAULT_TOTAL};
use crate::caption::Caption;
use crate::egui_app::ui::style::StatusTone;
use crate::prediction::PredictionCategory;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    /// Status line shown in the footer.
    pub status: StatusBarState,
    /// Editable text mirrors of the two counters.
    pub inputs: CounterInputsState,
    /// Prediction badge next to the inputs.
    pub prediction: PredictionBadgeView,
    /// Circular gauge on the left of the stats card.
    pub gauge: GaugeView,
    /// Caption card below the stats.
    pub caption: CaptionCardState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            inputs: CounterInputsState::default(),
            prediction: PredictionBadgeView::default(),
            gauge: GaugeView::default(),
            caption: CaptionCardState::default(),
        }
    }
}

/// Status text plus severity shown in the footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBarState {
    /// Message text.
    pub text: String,
    /// Severity driving the badge color.
    pub tone: StatusTone,
}

impl StatusBarState {
    /// Initial status before anything happened.
    pub fn idle() -> Self {
        Self {
            text: "Edit your counts or simulate a class".into(),
            tone: StatusTone::Idle,
        }
    }
}

/// Text field contents for the attended/total inputs.
///
/// These echo what the user typed rather than the counters themselves, so
/// partial input ("", "0") renders faithfully; clamps rewrite them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterInputsState {
    /// Attended field text.
    pub attended: String,
    /// Total field text.
    pub total: String,
}

impl Default for CounterInputsState {
    fn default() -> Self {
        Self {
            attended: DEFAULT_ATTENDED.to_string(),
            total: DEFAULT_TOTAL.to_string(),
        }
    }
}

/// Prediction text plus category for badge coloring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionBadgeView {
    /// Badge message.
    pub text: String,
    /// Severity bucket.
    pub category: PredictionCategory,
}

impl Default for PredictionBadgeView {
    fn default() -> Self {
        Self {
            text: "Enter data".into(),
            category: PredictionCategory::Neutral,
        }
    }
}

/// Inputs for the circular gauge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GaugeView {
    /// Unclamped attendance percentage.
    pub percentage: f64,
}

/// Caption card contents and load progress.
#[derive(Clone, Debug, Default)]
pub struct CaptionCardState {
    /// Latest applied caption, if any.
    pub caption: Option<Caption>,
    /// True while a caption request is in flight.
    pub loading: bool,
    /// Decoded template image for the current caption, when available.
    pub image: Option<Arc<ColorImage>>,
    /// True when the current caption's template image failed to load;
    /// the card shows a textual placeholder instead.
    pub image_failed: bool,
}
