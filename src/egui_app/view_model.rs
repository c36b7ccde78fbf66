//! Helpers to convert domain data into egui-facing view structs.

use crate::attendance::AttendanceTracker;
use crate::egui_app::state::{CounterInputsState, GaugeView, PredictionBadgeView};
use crate::prediction::Prediction;

/// Convert a prediction into the badge view shown next to the inputs.
pub fn prediction_badge(prediction: &Prediction) -> PredictionBadgeView {
    PredictionBadgeView {
        text: prediction.text.clone(),
        category: prediction.category,
    }
}

/// Gauge inputs for the current counters.
pub fn gauge_view(tracker: &AttendanceTracker) -> GaugeView {
    GaugeView {
        percentage: tracker.percentage(),
    }
}

/// Rewrite both input fields from the counters, used after simulate actions
/// where the text must follow the state rather than the other way around.
pub fn counter_inputs(tracker: &AttendanceTracker) -> CounterInputsState {
    CounterInputsState {
        attended: tracker.attended().to_string(),
        total: tracker.total().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{self, PredictionCategory};

    #[test]
    fn badge_mirrors_prediction() {
        let tracker = AttendanceTracker::new(24, 30);
        let badge = prediction_badge(&prediction::predict(&tracker));
        assert_eq!(badge.category, PredictionCategory::Safe);
        assert_eq!(badge.text, "You can bunk 1 class");
    }

    #[test]
    fn counter_inputs_follow_the_tracker() {
        let tracker = AttendanceTracker::new(7, 9);
        let inputs = counter_inputs(&tracker);
        assert_eq!(inputs.attended, "7");
        assert_eq!(inputs.total, "9");
    }
}
