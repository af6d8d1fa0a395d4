//! Registered dialogs, each implementing `AppWindow`.

pub mod color_picker_view;
pub mod settings_view;
