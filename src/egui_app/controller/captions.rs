//! Debounced caption refresh and background-result handling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::AppController;
use super::jobs::{CaptionFetchResult, ImageFetchResult};
use crate::caption::{Caption, CaptionRequest};
use crate::egui_app::ui::style::StatusTone;

/// Delay between the last counter edit and the caption request it triggers.
pub const CAPTION_DEBOUNCE: Duration = Duration::from_millis(1200);

/// Tracks the debounce window and the request sequence numbers.
///
/// Requests are tagged with a monotonic sequence; a result older than the
/// newest dispatched request is stale and must not overwrite the caption,
/// regardless of resolution order.
pub(super) struct CaptionScheduler {
    deadline: Option<Instant>,
    latest_dispatched: u64,
}

impl CaptionScheduler {
    pub(super) fn new() -> Self {
        Self {
            deadline: None,
            latest_dispatched: 0,
        }
    }

    /// Restart the delay window after a counter edit.
    pub(super) fn note_edit(&mut self, now: Instant) {
        self.deadline = Some(now + CAPTION_DEBOUNCE);
    }

    /// True when a window is pending and has elapsed.
    pub(super) fn due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Remaining wait for the pending window, if any.
    pub(super) fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume the pending window and hand out the next request sequence.
    pub(super) fn begin_request(&mut self) -> u64 {
        self.deadline = None;
        self.latest_dispatched += 1;
        self.latest_dispatched
    }

    /// True when `seq` belongs to the newest dispatched request.
    pub(super) fn is_current(&self, seq: u64) -> bool {
        seq == self.latest_dispatched
    }
}

impl AppController {
    /// Dispatch a caption request immediately, bypassing the debounce window.
    ///
    /// Used for the startup fetch and the manual refresh control.
    pub fn refresh_caption_now(&mut self) {
        let seq = self.captions.begin_request();
        let request = CaptionRequest {
            attended: self.tracker.attended(),
            total: self.tracker.total(),
        };
        self.ui.caption.loading = true;
        tracing::debug!(seq, request.attended, request.total, "Requesting caption");
        self.jobs
            .spawn_caption_fetch(seq, request, Arc::clone(&self.source));
    }

    /// Fire the pending debounced request once its window elapsed.
    pub(super) fn dispatch_due_caption(&mut self, now: Instant) {
        if self.captions.due(now) {
            self.refresh_caption_now();
        }
    }

    pub(super) fn handle_caption_fetched(&mut self, message: CaptionFetchResult) {
        if !self.captions.is_current(message.seq) {
            tracing::debug!(seq = message.seq, "Discarding stale caption result");
            return;
        }
        self.ui.caption.loading = false;
        let caption = match message.result {
            Ok(caption) => {
                self.set_status("Fresh roast served".to_string(), StatusTone::Info);
                caption
            }
            Err(err) => {
                tracing::warn!("Caption fetch failed: {err}; using fallback");
                self.set_status(
                    format!("Roast service unavailable: {err}"),
                    StatusTone::Warning,
                );
                Caption::fallback(message.request.is_safe())
            }
        };
        self.apply_caption(caption);
    }

    fn apply_caption(&mut self, caption: Caption) {
        self.ui.caption.image_failed = false;
        self.ui.caption.image = self.jobs.request_template_image(caption.template_id);
        self.ui.caption.caption = Some(caption);
    }

    pub(super) fn handle_image_loaded(&mut self, message: ImageFetchResult) {
        self.jobs.finish_image(message.template, &message.result);
        let current_template = self
            .ui
            .caption
            .caption
            .as_ref()
            .map(|caption| caption.template_id);
        if current_template != Some(message.template) {
            return;
        }
        match message.result {
            Ok(image) => {
                self.ui.caption.image = Some(image);
                self.ui.caption.image_failed = false;
            }
            Err(err) => {
                tracing::warn!(
                    template = message.template.as_str(),
                    "Template image failed to load: {err}"
                );
                self.ui.caption.image = None;
                self.ui.caption.image_failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::generator::{CaptionError, CaptionSource};
    use crate::caption::{Mood, TemplateId};

    struct SilentSource;

    impl CaptionSource for SilentSource {
        fn generate(&self, _request: &CaptionRequest) -> Result<Caption, CaptionError> {
            Err(CaptionError::Http("stub offline".to_string()))
        }
    }

    fn caption(top: &str) -> Caption {
        Caption {
            top_text: top.to_string(),
            bottom_text: "BOTTOM".to_string(),
            mood: Mood::Chill,
            template_id: TemplateId::Drake,
            advice: String::new(),
        }
    }

    #[test]
    fn window_restarts_on_every_edit() {
        let mut scheduler = CaptionScheduler::new();
        let t0 = Instant::now();
        scheduler.note_edit(t0);
        assert!(!scheduler.due(t0 + Duration::from_millis(1100)));
        scheduler.note_edit(t0 + Duration::from_millis(800));
        assert!(!scheduler.due(t0 + Duration::from_millis(1900)));
        assert!(scheduler.due(t0 + Duration::from_millis(2000)));
    }

    #[test]
    fn begin_request_consumes_the_window() {
        let mut scheduler = CaptionScheduler::new();
        let t0 = Instant::now();
        scheduler.note_edit(t0);
        let seq = scheduler.begin_request();
        assert_eq!(seq, 1);
        assert!(!scheduler.due(t0 + Duration::from_secs(60)));
        assert!(scheduler.time_until_due(t0).is_none());
    }

    #[test]
    fn sequences_are_monotonic_and_only_newest_is_current() {
        let mut scheduler = CaptionScheduler::new();
        let first = scheduler.begin_request();
        let second = scheduler.begin_request();
        assert!(second > first);
        assert!(!scheduler.is_current(first));
        assert!(scheduler.is_current(second));
    }

    #[test]
    fn stale_caption_result_is_discarded() {
        let mut controller = AppController::new(Arc::new(SilentSource));
        // Startup dispatched seq 1; a manual refresh moves the newest to 2.
        controller.refresh_caption_now();
        controller.handle_caption_fetched(CaptionFetchResult {
            seq: 2,
            request: CaptionRequest {
                attended: 24,
                total: 30,
            },
            result: Ok(caption("NEW")),
        });
        controller.handle_caption_fetched(CaptionFetchResult {
            seq: 1,
            request: CaptionRequest {
                attended: 24,
                total: 30,
            },
            result: Ok(caption("STALE")),
        });
        let applied = controller.ui.caption.caption.as_ref().unwrap();
        assert_eq!(applied.top_text, "NEW");
    }

    #[test]
    fn failed_fetch_applies_category_fallback() {
        let mut controller = AppController::new(Arc::new(SilentSource));
        controller.handle_caption_fetched(CaptionFetchResult {
            seq: 1,
            request: CaptionRequest {
                attended: 24,
                total: 30,
            },
            result: Err(CaptionError::Http("boom".to_string())),
        });
        let applied = controller.ui.caption.caption.as_ref().unwrap();
        assert_eq!(applied.top_text, "ATTENDANCE > 75%");
        assert_eq!(applied.bottom_text, "CALCULATED RISK");
        assert_eq!(applied.mood, Mood::Chill);
        assert_eq!(applied.template_id, TemplateId::Smart);
        assert_eq!(controller.ui.status.tone, StatusTone::Warning);
    }

    #[test]
    fn image_failure_for_current_template_shows_placeholder() {
        let mut controller = AppController::new(Arc::new(SilentSource));
        controller.handle_caption_fetched(CaptionFetchResult {
            seq: 1,
            request: CaptionRequest {
                attended: 20,
                total: 30,
            },
            result: Ok(caption("TOP")),
        });
        controller.handle_image_loaded(ImageFetchResult {
            template: TemplateId::Drake,
            result: Err("404".to_string()),
        });
        assert!(controller.ui.caption.image_failed);
        assert!(controller.ui.caption.image.is_none());
    }

    #[test]
    fn image_result_for_other_template_only_fills_cache() {
        let mut controller = AppController::new(Arc::new(SilentSource));
        controller.handle_caption_fetched(CaptionFetchResult {
            seq: 1,
            request: CaptionRequest {
                attended: 20,
                total: 30,
            },
            result: Ok(caption("TOP")),
        });
        controller.handle_image_loaded(ImageFetchResult {
            template: TemplateId::Grave,
            result: Err("404".to_string()),
        });
        assert!(!controller.ui.caption.image_failed);
    }
}
