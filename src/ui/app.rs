//! Application orchestrator: owns the theme and tree state and drives the
//! panels and dialogs.

use std::path::PathBuf;
use std::sync::mpsc::{self as std_mpsc, Receiver as StdReceiver};

use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::fs::model::{FsEntry, FsTree};
use crate::fs::{FsMessage, FsRequest, loader};
use crate::theme::state::{OPAQUE, ThemeState};
use crate::ui::tree_view::{TreeAction, TreeView};
use crate::ui::visuals::build_visuals;
use crate::ui::window::{AppState, AppWindow, UiEvent};
use crate::ui::windows::{color_picker_view::ColorPickerView, settings_view::SettingsView};
use eframe::egui;
use egui::viewport::WindowLevel;
use tokio::sync::mpsc::UnboundedSender;

// ── App struct ─────────────────────────────────────────────────────────────────

/// The top-level application, implementing [`eframe::App`].
///
/// `App` only:
/// 1. Drains loader messages into the tree.
/// 2. Reapplies `egui::Visuals` when the theme revision changes.
/// 3. Renders the toolbar, tree and transparency panels, then the dialogs.
/// 4. Applies tree actions and window events collected while drawing.
pub struct App {
    settings: Settings,
    rx: StdReceiver<FsMessage>,
    request_tx: UnboundedSender<FsRequest>,

    theme: ThemeState,
    applied_revision: Option<u64>,
    tree: FsTree,

    // ── Views ──────────────────────────────────────────────────────────────
    tree_view: TreeView,
    settings_view: SettingsView,
    color_picker: ColorPickerView,
    events: Vec<UiEvent>,
}

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        roots: Vec<FsEntry>,
    ) -> std::io::Result<Self> {
        let (tx, rx) = std_mpsc::channel();
        let request_tx = loader::spawn(tx, cc.egui_ctx.clone(), settings.tree.show_hidden)?;
        let app = Self::from_parts(settings, rx, request_tx, roots);

        if app.theme.slider_visible() {
            cc.egui_ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
                WindowLevel::AlwaysOnTop,
            ));
        }
        Ok(app)
    }

    /// Build the app around an already running loader.
    fn from_parts(
        settings: Settings,
        rx: StdReceiver<FsMessage>,
        request_tx: UnboundedSender<FsRequest>,
        roots: Vec<FsEntry>,
    ) -> Self {
        let theme = settings.theme_state();
        let mut tree = FsTree::new(roots, settings.tree.sort_by, settings.tree.sort_order);

        // A single root is opened straight away, like a folder window.
        let only_root = match tree.visible_rows().as_slice() {
            [row] => Some(row.node.entry().path.clone()),
            _ => None,
        };
        let initial_listing = only_root.and_then(|root| tree.expand(&root));

        let app = Self {
            settings,
            rx,
            request_tx,
            theme,
            applied_revision: None,
            tree,
            tree_view: TreeView,
            settings_view: SettingsView::default(),
            color_picker: ColorPickerView::default(),
            events: Vec::new(),
        };
        if let Some(path) = initial_listing {
            app.request_listing(path);
        }
        app
    }

    fn request_listing(&self, path: PathBuf) {
        if let Err(e) = self.send(FsRequest::List(path)) {
            log::error!("{e}");
        }
    }

    fn send(&self, request: FsRequest) -> Result<()> {
        self.request_tx
            .send(request)
            .map_err(|_| AppError::ChannelClosed)
    }

    // ── Persistence ────────────────────────────────────────────────────────────

    fn persist(&mut self) {
        self.settings.store_theme(&self.theme);
        self.settings.tree.sort_by = self.tree.sort_column();
        self.settings.tree.sort_order = self.tree.sort_order();
        if let Err(e) = self.settings.save() {
            log::warn!("could not save settings: {e}");
        }
    }

    // ── Dispatch ───────────────────────────────────────────────────────────────

    fn on_fs_message(&mut self, msg: FsMessage) {
        match msg {
            // Made before the last filter change; its re-list is on the way.
            FsMessage::Listing { show_hidden, .. }
                if show_hidden != self.settings.tree.show_hidden => {}
            FsMessage::Listing { path, entries, .. } => self.tree.apply_listing(&path, entries),
            FsMessage::Failed { path, reason } => self.tree.apply_failure(&path, reason),
        }
    }

    fn on_tree_action(&mut self, action: TreeAction) {
        match action {
            TreeAction::Toggle(path) => {
                if let Some(path) = self.tree.toggle(&path) {
                    self.request_listing(path);
                }
            }
            TreeAction::Select(path) => self.tree.select(&path),
            TreeAction::Refresh(path) => {
                if let Some(path) = self.tree.refresh(&path) {
                    self.request_listing(path);
                }
            }
            TreeAction::Sort(column) => {
                self.tree.sort_by(column);
                self.persist();
            }
        }
    }

    fn set_show_hidden(&mut self, show_hidden: bool) {
        if let Err(e) = self.send(FsRequest::SetShowHidden(show_hidden)) {
            log::error!("{e}");
            return;
        }
        self.settings.tree.show_hidden = show_hidden;
        for path in self.tree.invalidate() {
            self.request_listing(path);
        }
        self.persist();
    }

    fn on_ui_event(&mut self, ctx: &egui::Context, event: UiEvent) {
        match event {
            UiEvent::OpenColorPicker => self.color_picker.open_with(egui::Color32::WHITE),
            UiEvent::TransparencyEnabled => {
                ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
                    WindowLevel::AlwaysOnTop,
                ));
            }
            UiEvent::ThemeChanged => self.persist(),
        }
    }

    // ── Panels ─────────────────────────────────────────────────────────────────

    fn panel_frame(&self, ctx: &egui::Context) -> egui::Frame {
        egui::Frame::side_top_panel(&ctx.style())
            .fill(self.theme.palette().window.gamma_multiply(self.theme.opacity()))
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        let frame = self.panel_frame(ctx);
        egui::TopBottomPanel::top("toolbar").frame(frame).show(ctx, |ui| {
            ui.set_opacity(self.theme.opacity());
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let settings = egui::Button::new("Settings").min_size(egui::vec2(96.0, 36.0));
                if ui.add(settings).clicked() {
                    self.settings_view.toggle();
                }
                let mut show_hidden = self.settings.tree.show_hidden;
                if ui.checkbox(&mut show_hidden, "Show hidden files").changed() {
                    self.set_show_hidden(show_hidden);
                }
            });
            ui.add_space(4.0);
        });
    }

    fn transparency_panel(&mut self, ctx: &egui::Context) {
        if !self.theme.slider_visible() {
            return;
        }
        let frame = self.panel_frame(ctx);
        egui::TopBottomPanel::bottom("transparency").frame(frame).show(ctx, |ui| {
            ui.set_opacity(self.theme.opacity());
            ui.label(egui::RichText::new("Transparency").color(self.theme.label_color()));
            let mut value = self.theme.transparency();
            let slider = egui::Slider::new(&mut value, 0..=OPAQUE).show_value(true);
            let response = ui.add_sized([ui.available_width(), 20.0], slider);
            if response.changed() {
                self.theme.set_transparency(value);
            }
            if response.drag_stopped() || (response.changed() && !response.dragged()) {
                self.persist();
            }
        });
    }

    fn tree_panel(&mut self, ctx: &egui::Context) -> Vec<TreeAction> {
        let frame = egui::Frame::central_panel(&ctx.style())
            .fill(self.theme.palette().window.gamma_multiply(self.theme.opacity()));
        egui::CentralPanel::default()
            .frame(frame)
            .show(ctx, |ui| {
                ui.set_opacity(self.theme.opacity());
                self.tree_view.render_inline(ui, &self.tree, self.theme.tree())
            })
            .inner
    }
}

// ── eframe::App ────────────────────────────────────────────────────────────────

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── 1. Drain loader messages ──────────────────────────────────────────
        while let Ok(msg) = self.rx.try_recv() {
            self.on_fs_message(msg);
        }

        // ── 2. Theme ──────────────────────────────────────────────────────────
        if self.applied_revision != Some(self.theme.revision()) {
            ctx.set_visuals(build_visuals(&self.theme));
            self.applied_revision = Some(self.theme.revision());
        }

        // ── 3. Panels ─────────────────────────────────────────────────────────
        self.toolbar(ctx);
        self.transparency_panel(ctx);
        let actions = self.tree_panel(ctx);

        // ── 4. Dialogs ────────────────────────────────────────────────────────
        let mut events = std::mem::take(&mut self.events);
        let mut state = AppState {
            theme: &mut self.theme,
            events: &mut events,
        };
        let windows: [&mut dyn AppWindow; 2] = [&mut self.settings_view, &mut self.color_picker];
        for w in windows {
            if w.is_open() {
                w.show(ctx, &mut state);
            }
        }

        // ── 5. Deferred effects ───────────────────────────────────────────────
        for action in actions {
            self.on_tree_action(action);
        }
        for event in events.drain(..) {
            self.on_ui_event(ctx, event);
        }
        self.events = events;
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::model::EntryKind;
    use crate::theme::palette::DARK_TREE;
    use std::path::Path;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn dir(path: &str) -> FsEntry {
        FsEntry {
            path: PathBuf::from(path),
            name: path.rsplit('/').next().unwrap_or(path).into(),
            kind: EntryKind::Dir,
            size: 0,
            modified: None,
        }
    }

    fn app() -> (App, UnboundedReceiver<FsRequest>) {
        let (_tx, rx) = std_mpsc::channel();
        let (request_tx, request_rx) = unbounded_channel();
        let app = App::from_parts(Settings::default(), rx, request_tx, vec![dir("/r")]);
        (app, request_rx)
    }

    fn rect_fills(output: &egui::FullOutput) -> Vec<egui::Color32> {
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                egui::Shape::Rect(rect) => Some(rect.fill),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn half_transparent_tree_is_faded_once() {
        let (mut app, _requests) = app();
        app.theme.show_transparency_slider();
        app.theme.set_transparency(50);

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            app.tree_panel(ctx);
        });
        let fills = rect_fills(&output);

        let tree_fill = DARK_TREE.background.gamma_multiply(0.5);
        assert_eq!(tree_fill, egui::Color32::from_rgba_premultiplied(0x17, 0x17, 0x17, 0x80));
        assert!(fills.contains(&tree_fill));
        assert!(!fills.contains(&DARK_TREE.background.gamma_multiply(0.25)));

        let panel_fill = app.theme.palette().window.gamma_multiply(0.5);
        assert!(fills.contains(&panel_fill));
        assert_eq!(tree_fill.a(), panel_fill.a());
    }

    #[test]
    fn initial_single_root_is_listed() {
        let (_app, mut requests) = app();
        assert!(matches!(
            requests.try_recv(),
            Ok(FsRequest::List(path)) if path == Path::new("/r")
        ));
    }

    #[test]
    fn listing_made_with_old_filter_is_dropped() {
        let (mut app, _requests) = app();
        assert!(!app.settings.tree.show_hidden);

        app.on_fs_message(FsMessage::Listing {
            path: PathBuf::from("/r"),
            entries: vec![dir("/r/.git")],
            show_hidden: true,
        });
        assert_eq!(app.tree.visible_rows().len(), 1);
        assert!(app.tree.visible_rows()[0].node.is_loading());

        app.on_fs_message(FsMessage::Listing {
            path: PathBuf::from("/r"),
            entries: vec![dir("/r/src")],
            show_hidden: false,
        });
        let rows = app.tree.visible_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].node.entry().name, "src");
    }

    #[test]
    fn hidden_filter_unchanged_when_loader_is_gone() {
        let (mut app, requests) = app();
        drop(requests);
        app.set_show_hidden(true);
        assert!(!app.settings.tree.show_hidden);
    }
}
