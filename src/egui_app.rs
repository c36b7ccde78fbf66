//! Shared egui application modules.

/// Controller bridging domain state to the egui UI.
pub mod controller;
/// Shared state types for the egui UI.
pub mod state;
/// egui renderer.
pub mod ui;
/// Helpers to convert domain data into egui-facing view structs.
pub mod view_model;
