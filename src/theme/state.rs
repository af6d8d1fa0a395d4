//! Mutable theme state driven by the settings dialog.

use eframe::egui::Color32;

use crate::theme::palette::{
    DARK_PALETTE, DARK_TREE, LIGHT_PALETTE, LIGHT_TREE, MATTE_BACKGROUND, Palette, TreeStyle,
};

/// Lowest opacity the window can be faded to. At zero the window (and the
/// slider that restores it) would be invisible.
pub const MIN_OPACITY: f32 = 0.10;

/// Slider value meaning "fully opaque".
pub const OPAQUE: u8 = 100;

/// Which preset produced the current palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
    /// Current palette with window and base replaced by this color.
    Custom(Color32),
}

/// Everything the renderer needs to paint the window in the current theme.
///
/// `revision` increments on every mutation; `App` compares it against the
/// revision it last applied to decide whether to rebuild `egui::Visuals`.
#[derive(Debug, Clone)]
pub struct ThemeState {
    mode: ThemeMode,
    palette: Palette,
    tree: TreeStyle,
    slider_visible: bool,
    transparency: u8,
    revision: u64,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Dark,
            palette: *DARK_PALETTE,
            tree: *DARK_TREE,
            slider_visible: false,
            transparency: OPAQUE,
            revision: 0,
        }
    }
}

impl ThemeState {
    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn tree(&self) -> &TreeStyle {
        &self.tree
    }

    pub fn slider_visible(&self) -> bool {
        self.slider_visible
    }

    pub fn transparency(&self) -> u8 {
        self.transparency
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Window opacity in `MIN_OPACITY..=1.0`, linear in the slider value.
    pub fn opacity(&self) -> f32 {
        (f32::from(self.transparency) / f32::from(OPAQUE)).max(MIN_OPACITY)
    }

    /// Color of the "Transparency" label above the slider.
    pub fn label_color(&self) -> Color32 {
        self.palette.window_text
    }

    // ── Mutations ──────────────────────────────────────────────────────────

    pub fn set_dark_mode(&mut self) {
        self.mode = ThemeMode::Dark;
        self.palette = *DARK_PALETTE;
        self.tree = *DARK_TREE;
        self.bump();
    }

    pub fn set_light_mode(&mut self) {
        self.mode = ThemeMode::Light;
        self.palette = *LIGHT_PALETTE;
        self.tree = *LIGHT_TREE;
        self.bump();
    }

    /// Keep the current palette but paint window and base with `color`.
    pub fn set_background_color(&mut self, color: Color32) {
        let color = color.to_opaque();
        self.mode = ThemeMode::Custom(color);
        self.palette.window = color;
        self.palette.base = color;
        self.tree = TreeStyle::for_background(color);
        self.bump();
    }

    pub fn set_matte_mode(&mut self) {
        self.set_background_color(MATTE_BACKGROUND);
    }

    /// Reveal the transparency slider. Returns `true` only on the call that
    /// actually made it visible.
    pub fn show_transparency_slider(&mut self) -> bool {
        if self.slider_visible {
            return false;
        }
        self.slider_visible = true;
        self.bump();
        true
    }

    pub fn set_transparency(&mut self, value: u8) {
        let value = value.min(OPAQUE);
        if value != self.transparency {
            self.transparency = value;
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
