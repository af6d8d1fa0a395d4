//! The `AppWindow` trait and the shared `AppState` view passed to each window.
//!
//! To add a new dialog:
//! 1. Create a new file in `ui/windows/`.
//! 2. Implement `AppWindow` for your struct.
//! 3. Register it in `App::new()`.

use eframe::egui;

use crate::theme::state::ThemeState;

/// Side effects a window asks the orchestrator to perform after all windows
/// have been drawn for the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Open the background color picker.
    OpenColorPicker,
    /// The theme changed and should be persisted.
    ThemeChanged,
    /// The transparency slider was just revealed.
    TransparencyEnabled,
}

/// Mutable view of application state shared with every window's `show` call.
pub struct AppState<'a> {
    pub theme: &'a mut ThemeState,
    pub events: &'a mut Vec<UiEvent>,
}

/// Trait implemented by every dialog.
///
/// Each window owns its own open/closed flag and any window-specific UI state.
/// The orchestrator (`App`) iterates over all registered windows and calls
/// `show` on each frame.
pub trait AppWindow {
    /// Display name, also used as the dialog title.
    fn name(&self) -> &str;

    fn is_open(&self) -> bool;

    /// Toggle the window's open/closed state.
    fn toggle(&mut self);

    /// Draw the window contents. Called every frame by `App::update`.
    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>);
}
