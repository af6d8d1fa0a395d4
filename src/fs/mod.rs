//! Filesystem layer: the lazy tree model, column formatting, and the
//! background directory loader plus the messages it exchanges with the UI.

pub mod format;
pub mod loader;
pub mod model;

use std::path::PathBuf;

use crate::fs::model::FsEntry;

/// Messages sent from the background loader to the UI thread.
pub enum FsMessage {
    /// `show_hidden` is the dot-file filter the listing was made with.
    Listing {
        path: PathBuf,
        entries: Vec<FsEntry>,
        show_hidden: bool,
    },
    Failed { path: PathBuf, reason: String },
}

/// Requests sent from the UI thread to the background loader.
pub enum FsRequest {
    List(PathBuf),
    SetShowHidden(bool),
}
