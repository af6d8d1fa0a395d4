//! Background color picker. Cancelling or dismissing it changes nothing.

use crate::ui::window::{AppState, AppWindow, UiEvent};
use eframe::egui::{self, Color32, color_picker::Alpha};

pub struct ColorPickerView {
    open: bool,
    color: Color32,
}

impl Default for ColorPickerView {
    fn default() -> Self {
        Self {
            open: false,
            color: Color32::WHITE,
        }
    }
}

impl ColorPickerView {
    /// Open the picker, starting from `initial`.
    pub fn open_with(&mut self, initial: Color32) {
        self.color = initial;
        self.open = true;
    }

    fn accept(&mut self, state: &mut AppState<'_>) {
        state.theme.set_background_color(self.color);
        state.events.push(UiEvent::ThemeChanged);
        self.open = false;
    }
}

impl AppWindow for ColorPickerView {
    fn name(&self) -> &str {
        "Select Color"
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
        let title = self.name().to_owned();
        let color = &mut self.color;
        let modal = egui::Modal::new(egui::Id::new("color_picker_dialog")).show(ctx, |ui| {
            ui.heading(title);
            ui.add_space(8.0);
            egui::color_picker::color_picker_color32(ui, color, Alpha::Opaque);
            ui.add_space(8.0);

            let mut accepted = None;
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    accepted = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    accepted = Some(false);
                }
            });
            accepted
        });

        match modal.inner {
            Some(true) => {
                log::info!("background color {:?}", self.color);
                self.accept(state);
            }
            Some(false) => self.open = false,
            None if modal.should_close() => self.open = false,
            None => {}
        }
    }
}
