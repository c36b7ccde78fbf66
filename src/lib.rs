//! Library exports for reuse in the binary and integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Attendance counters and clamp rules.
pub mod attendance;
/// Caption domain, collaborators, and settings.
pub mod caption;
/// Shared egui UI modules.
pub mod egui_app;
mod http_client;
/// Logging setup.
pub mod logging;
/// Skip/attend prediction formulas.
pub mod prediction;
