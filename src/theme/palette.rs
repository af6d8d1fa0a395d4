//! Static color palettes for the main window and the tree view.

use eframe::egui::Color32;
use once_cell::sync::Lazy;

use crate::error::{AppError, Result};

/// Color roles applied to the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub window: Color32,
    pub window_text: Color32,
    pub base: Color32,
    pub alternate_base: Color32,
    pub text: Color32,
    pub button: Color32,
    pub button_text: Color32,
    pub bright_text: Color32,
    pub link: Color32,
    pub highlight: Color32,
    pub highlighted_text: Color32,
}

/// Colors used only by the tree table and its header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStyle {
    pub background: Color32,
    pub text: Color32,
    pub alternate_background: Color32,
    pub selection_background: Color32,
    pub header_background: Color32,
    pub header_text: Color32,
    pub header_border: Color32,
}

const LINK_BLUE: Color32 = Color32::from_rgb(42, 130, 218);
const HEADER_BORDER_DARK: Color32 = Color32::from_rgb(0x44, 0x44, 0x44);

/// Background used by the "Matte Background" preset.
pub const MATTE_BACKGROUND: Color32 = Color32::from_rgb(33, 33, 33);

pub static DARK_PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    window: Color32::from_rgb(53, 53, 53),
    window_text: Color32::WHITE,
    base: Color32::from_rgb(42, 42, 42),
    alternate_base: Color32::from_rgb(66, 66, 66),
    text: Color32::WHITE,
    button: Color32::from_rgb(53, 53, 53),
    button_text: Color32::WHITE,
    bright_text: Color32::from_rgb(255, 0, 0),
    link: LINK_BLUE,
    highlight: LINK_BLUE,
    highlighted_text: Color32::BLACK,
});

pub static LIGHT_PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
    window: Color32::WHITE,
    window_text: Color32::BLACK,
    base: Color32::from_rgb(242, 242, 242),
    alternate_base: Color32::WHITE,
    text: Color32::BLACK,
    button: Color32::WHITE,
    button_text: Color32::BLACK,
    bright_text: Color32::from_rgb(255, 0, 0),
    link: LINK_BLUE,
    highlight: LINK_BLUE,
    highlighted_text: Color32::WHITE,
});

pub static DARK_TREE: Lazy<TreeStyle> = Lazy::new(|| TreeStyle {
    background: Color32::from_rgb(0x2E, 0x2E, 0x2E),
    text: Color32::WHITE,
    alternate_background: Color32::from_rgb(0x35, 0x35, 0x35),
    selection_background: Color32::from_rgb(0x44, 0x44, 0x44),
    header_background: Color32::from_rgb(0x2E, 0x2E, 0x2E),
    header_text: Color32::WHITE,
    header_border: HEADER_BORDER_DARK,
});

pub static LIGHT_TREE: Lazy<TreeStyle> = Lazy::new(|| TreeStyle {
    background: Color32::WHITE,
    text: Color32::BLACK,
    alternate_background: Color32::from_rgb(0xF0, 0xF0, 0xF0),
    selection_background: Color32::from_rgb(0xD0, 0xD0, 0xD0),
    header_background: Color32::WHITE,
    header_text: Color32::BLACK,
    header_border: Color32::from_rgb(0xD0, 0xD0, 0xD0),
});

impl TreeStyle {
    /// Tree style derived from a single user-chosen background.
    ///
    /// Text stays white whatever the background brightness.
    pub fn for_background(color: Color32) -> Self {
        let shade = darker(color, 200);
        Self {
            background: color,
            text: Color32::WHITE,
            alternate_background: shade,
            selection_background: shade,
            header_background: color,
            header_text: Color32::WHITE,
            header_border: HEADER_BORDER_DARK,
        }
    }
}

/// Scale the HSV value of `color` by `100 / factor`.
///
/// Scaling every channel by the same ratio keeps hue and saturation fixed,
/// so `darker(c, 200)` halves the brightness. Factors below 100 lighten and
/// clamp at 255; a zero factor returns `color` unchanged.
pub fn darker(color: Color32, factor: u32) -> Color32 {
    if factor == 0 {
        return color;
    }
    let scale = |c: u8| -> u8 {
        let scaled = (u32::from(c) * 100 + factor / 2) / factor;
        scaled.min(255) as u8
    };
    Color32::from_rgb(scale(color.r()), scale(color.g()), scale(color.b()))
}

/// `#rrggbb` in lowercase.
pub fn hex_name(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Parse `#rrggbb` (leading `#` optional).
pub fn parse_hex(s: &str) -> Result<Color32> {
    let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AppError::InvalidColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| AppError::InvalidColor(s.to_string()))
    };
    Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
