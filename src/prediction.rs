//! Closed-form skip/attend forecasts over the attendance counters.
//!
//! Both branches are direct integer solutions of their inequality, not a
//! search. The safe branch subtracts a small epsilon before flooring because
//! it evaluates a strict `>` on a float quotient; the danger branch is exact
//! integer arithmetic and takes no epsilon. The asymmetry is load-bearing for
//! boundary values and must not be "normalized" away.

use crate::attendance::{AttendanceTracker, THRESHOLD};

const SAFE_RATIO: f64 = THRESHOLD / 100.0;
const BOUNDARY_EPSILON: f64 = 1e-4;

/// Severity bucket driving both message text and badge color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictionCategory {
    /// Comfortably above the threshold.
    Safe,
    /// Above the threshold with no slack left.
    Warning,
    /// At or below the threshold.
    Danger,
    /// No classes recorded yet.
    Neutral,
}

/// Human-readable forecast plus its severity bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    /// Message shown in the prediction badge.
    pub text: String,
    /// Severity bucket for the badge color.
    pub category: PredictionCategory,
}

/// Forecast how many further classes can be skipped while staying above the
/// threshold, or how many must be attended back-to-back to climb over it.
pub fn predict(tracker: &AttendanceTracker) -> Prediction {
    let attended = i64::from(tracker.attended());
    let total = i64::from(tracker.total());

    if total == 0 {
        return Prediction {
            text: "Enter data".to_string(),
            category: PredictionCategory::Neutral,
        };
    }

    if tracker.is_safe() {
        // Largest k with attended / (total + k) > 3/4: skipping k more
        // classes without attending any keeps the ratio safe.
        let max_skips = ((attended as f64 - SAFE_RATIO * total as f64) / SAFE_RATIO
            - BOUNDARY_EPSILON)
            .floor() as i64;
        if max_skips <= 0 {
            return Prediction {
                text: "On the edge! Don't miss.".to_string(),
                category: PredictionCategory::Warning,
            };
        }
        Prediction {
            text: format!("You can bunk {max_skips} {}", classes(max_skips)),
            category: PredictionCategory::Safe,
        }
    } else {
        // Smallest m with (attended + m) / (total + m) > 3/4: attending the
        // next m classes back-to-back crosses the threshold.
        let needed = 3 * total - 4 * attended + 1;
        if needed <= 0 {
            return Prediction {
                text: "Safe for now.".to_string(),
                category: PredictionCategory::Safe,
            };
        }
        Prediction {
            text: format!("Attend {needed} more {}", classes(needed)),
            category: PredictionCategory::Danger,
        }
    }
}

fn classes(count: i64) -> &'static str {
    if count == 1 { "class" } else { "classes" }
}
