#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod error;
mod fs;
mod theme;
mod ui;

use std::env;
use std::path::{Path, PathBuf};

use config::Settings;
use eframe::egui;
use fs::model::{FsEntry, filesystem_roots, root_entry};
use ui::app::App;

const TITLE: &str = "Custom File Explorer";

/// Tree roots for an optional requested directory; anything unusable falls
/// back to the whole filesystem.
fn resolve_roots(requested: Option<&Path>) -> Vec<FsEntry> {
    if let Some(path) = requested {
        match root_entry(path) {
            Ok(entry) if entry.is_dir() => return vec![entry],
            Ok(_) => log::warn!("{} is not a directory, showing all roots", path.display()),
            Err(e) => log::warn!("cannot open {}: {e}, showing all roots", path.display()),
        }
    }
    filesystem_roots()
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load();

    // Root directory from the command line, else the saved default.
    let requested = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.tree.root.as_ref().map(PathBuf::from));
    let roots = resolve_roots(requested.as_deref());
    log::info!("starting with {} root(s)", roots.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([800.0, 600.0])
            .with_position([100.0, 100.0])
            .with_transparent(true),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, settings, roots)?))),
    )
}
