//! Maintains app state and bridges core logic to the egui UI.
//!
//! The controller owns the counters and the caption lifecycle; the renderer
//! only reads [`UiState`] and forwards user actions here. Derived views are
//! recomputed synchronously after every mutation, so a frame never observes
//! counters and prediction out of step.

mod captions;
mod jobs;

pub use captions::CAPTION_DEBOUNCE;

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::attendance::AttendanceTracker;
use crate::caption::generator::{CaptionSource, GeminiCaptionSource};
use crate::caption::settings;
use crate::egui_app::state::{StatusBarState, UiState};
use crate::egui_app::ui::style::StatusTone;
use crate::egui_app::view_model;
use crate::prediction;

/// Maintains app state and bridges core logic to the egui UI.
pub struct AppController {
    /// UI model rendered by the egui layer.
    pub ui: UiState,
    tracker: AttendanceTracker,
    source: Arc<dyn CaptionSource>,
    jobs: jobs::ControllerJobs,
    captions: captions::CaptionScheduler,
}

impl AppController {
    /// Create a controller over the given caption collaborator and fire the
    /// initial, non-debounced caption request.
    pub fn new(source: Arc<dyn CaptionSource>) -> Self {
        let mut controller = Self {
            ui: UiState::default(),
            tracker: AttendanceTracker::default(),
            source,
            jobs: jobs::ControllerJobs::new(),
            captions: captions::CaptionScheduler::new(),
        };
        controller.refresh_derived();
        controller.refresh_caption_now();
        controller
    }

    /// Create a controller wired to the live collaborator, resolving settings
    /// from the config file and environment. Settings problems degrade to
    /// defaults; nothing here is fatal.
    pub fn from_settings() -> Self {
        let resolved = settings::load_or_default().unwrap_or_else(|err| {
            tracing::warn!("Ignoring unusable settings file: {err}");
            settings::GeneratorSettings::default()
        });
        if resolved.api_key.is_none() {
            tracing::warn!("No caption API key configured; canned captions only");
        }
        Self::new(Arc::new(GeminiCaptionSource::new(resolved)))
    }

    /// Current counters, mainly for tests and the renderer.
    pub fn tracker(&self) -> &AttendanceTracker {
        &self.tracker
    }

    /// Per-frame pump: drain finished jobs and fire a due caption request.
    pub fn tick(&mut self, now: Instant) {
        self.poll_background_jobs();
        self.dispatch_due_caption(now);
    }

    /// True while any worker thread may still deliver a message.
    pub fn has_background_work(&self) -> bool {
        self.ui.caption.loading || self.jobs.images_inflight()
    }

    /// Delay until the pending debounced caption request becomes due.
    pub fn time_until_caption_dispatch(&self, now: Instant) -> Option<Duration> {
        self.captions.time_until_due(now)
    }

    /// Apply an edit of the attended text field.
    ///
    /// Empty input is allowed while typing and counts as zero. Values above
    /// the total clamp to it, rewriting the field text. Anything that does
    /// not parse as a non-negative integer is rejected with state unchanged.
    pub fn edit_attended(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.tracker.set_attended(0);
            self.ui.inputs.attended.clear();
            self.after_counters_changed();
            return;
        }
        let Ok(value) = trimmed.parse::<u32>() else {
            return;
        };
        if value > self.tracker.total() {
            self.tracker.set_attended(value);
            self.ui.inputs.attended = self.tracker.attended().to_string();
        } else {
            self.tracker.set_attended(value);
            self.ui.inputs.attended = trimmed.to_string();
        }
        self.after_counters_changed();
    }

    /// Apply an edit of the total text field.
    ///
    /// Emptying the field resets both counters to keep the pair consistent.
    /// Shrinking the total below the attended count drags attended down and
    /// rewrites its field text.
    pub fn edit_total(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.tracker.clear();
            self.ui.inputs.total.clear();
            self.ui.inputs.attended = "0".to_string();
            self.after_counters_changed();
            return;
        }
        let Ok(value) = trimmed.parse::<u32>() else {
            return;
        };
        let attended_before = self.tracker.attended();
        self.tracker.set_total(value);
        self.ui.inputs.total = trimmed.to_string();
        if value < attended_before {
            self.ui.inputs.attended = self.tracker.attended().to_string();
        }
        self.after_counters_changed();
    }

    /// One more class happened and the student attended it.
    pub fn simulate_attend(&mut self) {
        self.tracker.simulate_attend();
        self.ui.inputs = view_model::counter_inputs(&self.tracker);
        self.after_counters_changed();
    }

    /// One more class happened and the student skipped it.
    pub fn simulate_skip(&mut self) {
        self.tracker.simulate_skip();
        self.ui.inputs = view_model::counter_inputs(&self.tracker);
        self.after_counters_changed();
    }

    fn after_counters_changed(&mut self) {
        self.refresh_derived();
        self.captions.note_edit(Instant::now());
    }

    fn refresh_derived(&mut self) {
        self.ui.prediction = view_model::prediction_badge(&prediction::predict(&self.tracker));
        self.ui.gauge = view_model::gauge_view(&self.tracker);
    }

    fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => break,
            };
            match message {
                jobs::JobMessage::CaptionFetched(message) => {
                    self.handle_caption_fetched(message);
                }
                jobs::JobMessage::TemplateImageLoaded(message) => {
                    self.handle_image_loaded(message);
                }
            }
        }
    }

    fn set_status(&mut self, text: String, tone: StatusTone) {
        self.ui.status = StatusBarState { text, tone };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::generator::{CaptionError, CaptionSource};
    use crate::caption::{Caption, CaptionRequest};
    use crate::prediction::PredictionCategory;

    struct SilentSource;

    impl CaptionSource for SilentSource {
        fn generate(&self, _request: &CaptionRequest) -> Result<Caption, CaptionError> {
            Err(CaptionError::Http("stub offline".to_string()))
        }
    }

    fn controller() -> AppController {
        AppController::new(Arc::new(SilentSource))
    }

    #[test]
    fn starts_with_default_counters_and_safe_badge() {
        let controller = controller();
        assert_eq!(controller.tracker().attended(), 24);
        assert_eq!(controller.tracker().total(), 30);
        assert_eq!(controller.ui.prediction.category, PredictionCategory::Safe);
        assert!(controller.ui.caption.loading);
    }

    #[test]
    fn attended_edit_above_total_clamps_and_rewrites_text() {
        let mut controller = controller();
        controller.edit_attended("45");
        assert_eq!(controller.tracker().attended(), 30);
        assert_eq!(controller.ui.inputs.attended, "30");
    }

    #[test]
    fn attended_edit_below_total_echoes_text() {
        let mut controller = controller();
        controller.edit_attended("12");
        assert_eq!(controller.tracker().attended(), 12);
        assert_eq!(controller.ui.inputs.attended, "12");
    }

    #[test]
    fn non_numeric_attended_edit_is_rejected() {
        let mut controller = controller();
        controller.edit_attended("12x");
        controller.edit_attended("-3");
        assert_eq!(controller.tracker().attended(), 24);
        assert_eq!(controller.ui.inputs.attended, "24");
    }

    #[test]
    fn empty_attended_edit_counts_as_zero() {
        let mut controller = controller();
        controller.edit_attended("");
        assert_eq!(controller.tracker().attended(), 0);
        assert_eq!(controller.ui.inputs.attended, "");
    }

    #[test]
    fn shrinking_total_drags_attended_and_its_text() {
        let mut controller = controller();
        controller.edit_total("10");
        assert_eq!(controller.tracker().attended(), 10);
        assert_eq!(controller.tracker().total(), 10);
        assert_eq!(controller.ui.inputs.attended, "10");
        assert_eq!(controller.ui.inputs.total, "10");
    }

    #[test]
    fn emptying_total_resets_both_counters() {
        let mut controller = controller();
        controller.edit_total("");
        assert_eq!(controller.tracker().attended(), 0);
        assert_eq!(controller.tracker().total(), 0);
        assert_eq!(controller.ui.inputs.total, "");
        assert_eq!(controller.ui.inputs.attended, "0");
        assert_eq!(
            controller.ui.prediction.category,
            PredictionCategory::Neutral
        );
    }

    #[test]
    fn simulate_buttons_rewrite_both_fields() {
        let mut controller = controller();
        controller.simulate_skip();
        assert_eq!(controller.ui.inputs.total, "31");
        assert_eq!(controller.ui.inputs.attended, "24");
        controller.simulate_attend();
        assert_eq!(controller.ui.inputs.total, "32");
        assert_eq!(controller.ui.inputs.attended, "25");
    }

    #[test]
    fn edits_update_prediction_synchronously() {
        let mut controller = controller();
        controller.edit_attended("20");
        assert_eq!(
            controller.ui.prediction.category,
            PredictionCategory::Danger
        );
        assert_eq!(controller.ui.prediction.text, "Attend 11 more classes");
    }
}
