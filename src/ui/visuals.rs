//! Translate the theme palette into `egui::Visuals`.

use eframe::egui::{Color32, Visuals};

use crate::theme::palette::darker;
use crate::theme::state::ThemeState;

/// Perceived brightness below mid-grey.
pub fn is_dark(color: Color32) -> bool {
    let luma = u32::from(color.r()) * 299 + u32::from(color.g()) * 587 + u32::from(color.b()) * 114;
    luma < 128 * 1000
}

/// Visuals for the whole context. Opacity is not baked in here; panel
/// frames fade their own fills.
pub fn build_visuals(theme: &ThemeState) -> Visuals {
    let p = theme.palette();
    let mut v = if is_dark(p.window) {
        Visuals::dark()
    } else {
        Visuals::light()
    };

    v.override_text_color = Some(p.text);
    v.panel_fill = p.window;
    v.window_fill = p.window;
    v.extreme_bg_color = p.base;
    v.faint_bg_color = p.alternate_base;
    v.code_bg_color = p.alternate_base;
    v.hyperlink_color = p.link;
    v.error_fg_color = p.bright_text;
    v.selection.bg_fill = p.highlight;
    v.selection.stroke.color = p.highlighted_text;

    v.widgets.noninteractive.bg_fill = p.window;
    v.widgets.noninteractive.fg_stroke.color = p.window_text;

    let shades = [
        (&mut v.widgets.inactive, p.button),
        (&mut v.widgets.hovered, darker(p.button, 115)),
        (&mut v.widgets.active, darker(p.button, 130)),
    ];
    for (widget, fill) in shades {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.fg_stroke.color = p.button_text;
    }

    v
}
