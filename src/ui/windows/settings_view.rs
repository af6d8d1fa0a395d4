//! Settings dialog: one button per theme action, each closing the dialog.

use crate::ui::window::{AppState, AppWindow, UiEvent};
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    DefaultDark,
    ChangeBackground,
    Matte,
    Transparent,
    Light,
}

impl SettingsAction {
    pub const ALL: [SettingsAction; 5] = [
        SettingsAction::DefaultDark,
        SettingsAction::ChangeBackground,
        SettingsAction::Matte,
        SettingsAction::Transparent,
        SettingsAction::Light,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsAction::DefaultDark => "Default Dark Mode",
            SettingsAction::ChangeBackground => "Change Background Color",
            SettingsAction::Matte => "Matte Background",
            SettingsAction::Transparent => "Transparent Background",
            SettingsAction::Light => "Light Mode",
        }
    }

    pub fn apply(self, state: &mut AppState<'_>) {
        match self {
            SettingsAction::DefaultDark => state.theme.set_dark_mode(),
            SettingsAction::ChangeBackground => {
                // The picker applies the color itself once confirmed.
                state.events.push(UiEvent::OpenColorPicker);
                return;
            }
            SettingsAction::Matte => state.theme.set_matte_mode(),
            SettingsAction::Transparent => {
                if state.theme.show_transparency_slider() {
                    state.events.push(UiEvent::TransparencyEnabled);
                }
            }
            SettingsAction::Light => state.theme.set_light_mode(),
        }
        state.events.push(UiEvent::ThemeChanged);
    }
}

#[derive(Default)]
pub struct SettingsView {
    open: bool,
}

impl AppWindow for SettingsView {
    fn name(&self) -> &str {
        "Settings"
    }
    fn is_open(&self) -> bool {
        self.open
    }
    fn toggle(&mut self) {
        self.open = !self.open;
    }

    fn show(&mut self, ctx: &egui::Context, state: &mut AppState<'_>) {
        if !self.open {
            return;
        }
        let modal = egui::Modal::new(egui::Id::new("settings_dialog")).show(ctx, |ui| {
            ui.set_width(260.0);
            ui.heading(self.name());
            ui.add_space(8.0);

            let mut chosen = None;
            ui.vertical_centered_justified(|ui| {
                for action in SettingsAction::ALL {
                    if ui.button(action.label()).clicked() {
                        chosen = Some(action);
                    }
                }
            });
            chosen
        });

        if let Some(action) = modal.inner {
            log::info!("settings: {}", action.label());
            action.apply(state);
            self.open = false;
        } else if modal.should_close() {
            self.open = false;
        }
    }
}
