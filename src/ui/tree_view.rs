//! Inline filesystem tree: a four-column table drawn in the central panel.

use std::path::PathBuf;

use eframe::egui::{self, Align, Layout, RichText, Sense, Stroke, StrokeKind};
use egui_extras::{Column, TableBuilder};

use crate::fs::format::{format_modified, size_cell, type_name};
use crate::fs::model::{FsTree, SortColumn, SortOrder};
use crate::theme::palette::TreeStyle;

const INDENT: f32 = 16.0;
const COLUMNS: [SortColumn; 4] = [
    SortColumn::Name,
    SortColumn::Size,
    SortColumn::Type,
    SortColumn::Modified,
];

/// What the user did to the tree this frame. Applied by `App` after drawing
/// so the tree is only borrowed immutably while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    Toggle(PathBuf),
    Select(PathBuf),
    Refresh(PathBuf),
    Sort(SortColumn),
}

pub fn column_title(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Name => "Name",
        SortColumn::Size => "Size",
        SortColumn::Type => "Type",
        SortColumn::Modified => "Date Modified",
    }
}

fn header_label(column: SortColumn, tree: &FsTree) -> String {
    let title = column_title(column);
    if tree.sort_column() != column {
        return title.to_string();
    }
    match tree.sort_order() {
        SortOrder::Ascending => format!("{title} ⬆"),
        SortOrder::Descending => format!("{title} ⬇"),
    }
}

#[derive(Default)]
pub struct TreeView;

impl TreeView {
    pub fn render_inline(
        &mut self,
        ui: &mut egui::Ui,
        tree: &FsTree,
        style: &TreeStyle,
    ) -> Vec<TreeAction> {
        // Fading is left to the caller's `Ui::set_opacity`.
        let mut actions = Vec::new();

        egui::Frame::new()
            .fill(style.background)
            .show(ui, |ui| {
                let visuals = ui.visuals_mut();
                visuals.override_text_color = Some(style.text);
                visuals.faint_bg_color = style.alternate_background;
                visuals.selection.bg_fill = style.selection_background;
                visuals.selection.stroke = Stroke::new(1.0, style.text);

                let rows = tree.visible_rows();
                let row_height = ui
                    .text_style_height(&egui::TextStyle::Body)
                    .max(ui.spacing().interact_size.y);
                let available = ui.available_height();

                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .sense(Sense::click())
                    .cell_layout(Layout::left_to_right(Align::Center))
                    .min_scrolled_height(0.0)
                    .max_scroll_height(available)
                    .column(Column::remainder().at_least(220.0).clip(true))
                    .column(Column::initial(90.0).at_least(60.0))
                    .column(Column::initial(110.0).at_least(60.0))
                    .column(Column::initial(140.0).at_least(80.0))
                    .header(row_height + 8.0, |mut header| {
                        for column in COLUMNS {
                            header.col(|ui| {
                                let rect = ui.max_rect();
                                let painter = ui.painter();
                                painter.rect_filled(rect, 0.0, style.header_background);
                                painter.rect_stroke(
                                    rect,
                                    0.0,
                                    Stroke::new(1.0, style.header_border),
                                    StrokeKind::Inside,
                                );
                                ui.add_space(4.0);
                                let label = egui::Label::new(
                                    RichText::new(header_label(column, tree))
                                        .color(style.header_text)
                                        .strong(),
                                )
                                .sense(Sense::click());
                                if ui.add(label).clicked() {
                                    actions.push(TreeAction::Sort(column));
                                }
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(row_height, rows.len(), |mut row| {
                            let visible = &rows[row.index()];
                            let node = visible.node;
                            let entry = node.entry();
                            row.set_selected(tree.selected() == Some(entry.path.as_path()));

                            row.col(|ui| {
                                ui.add_space(visible.depth as f32 * INDENT);
                                if entry.is_dir() {
                                    let icon = if node.is_expanded() { "⏷" } else { "⏵" };
                                    if ui.add(egui::Button::new(icon).frame(false)).clicked() {
                                        actions.push(TreeAction::Toggle(entry.path.clone()));
                                    }
                                } else {
                                    ui.add_space(INDENT);
                                }
                                ui.label(&entry.name);
                                if node.is_loading() {
                                    ui.spinner();
                                }
                                if let Some(reason) = node.failure() {
                                    ui.label("⚠").on_hover_text(reason);
                                }
                            });
                            row.col(|ui| {
                                ui.label(size_cell(entry));
                            });
                            row.col(|ui| {
                                ui.label(type_name(entry));
                            });
                            row.col(|ui| {
                                ui.label(format_modified(entry.modified));
                            });

                            let response = row.response();
                            if response.double_clicked() && entry.is_dir() {
                                actions.push(TreeAction::Toggle(entry.path.clone()));
                            } else if response.clicked() {
                                actions.push(TreeAction::Select(entry.path.clone()));
                            }
                            response.context_menu(|ui| {
                                if entry.is_dir() && ui.button("Refresh").clicked() {
                                    actions.push(TreeAction::Refresh(entry.path.clone()));
                                    ui.close();
                                }
                                if ui.button("Copy Path").clicked() {
                                    ui.ctx().copy_text(entry.path.display().to_string());
                                    ui.close();
                                }
                            });
                        });
                    });
            });

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::model::{EntryKind, FsEntry};
    use crate::theme::palette::DARK_TREE;
    use std::path::Path;

    fn tree() -> FsTree {
        let root = FsEntry {
            path: PathBuf::from("/r"),
            name: "r".into(),
            kind: EntryKind::Dir,
            size: 0,
            modified: None,
        };
        let child = FsEntry {
            path: PathBuf::from("/r/a.txt"),
            name: "a.txt".into(),
            kind: EntryKind::File,
            size: 12,
            modified: None,
        };
        let mut tree = FsTree::new(vec![root], SortColumn::Name, SortOrder::Ascending);
        tree.toggle(Path::new("/r"));
        tree.apply_listing(Path::new("/r"), vec![child]);
        tree
    }

    #[test]
    fn header_marks_active_sort_column() {
        let mut tree = tree();
        assert_eq!(header_label(SortColumn::Name, &tree), "Name ⬆");
        assert_eq!(header_label(SortColumn::Modified, &tree), "Date Modified");
        tree.sort_by(SortColumn::Name);
        assert_eq!(header_label(SortColumn::Name, &tree), "Name ⬇");
    }

    #[test]
    fn renders_headless_without_actions() {
        let ctx = egui::Context::default();
        let tree = tree();
        let mut view = TreeView;
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                actions = view.render_inline(ui, &tree, &DARK_TREE);
            });
        });
        assert!(actions.is_empty());
    }
}
