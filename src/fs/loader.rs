//! Background directory loader.
//!
//! Runs on its own OS thread with a current-thread Tokio runtime so slow
//! mounts never stall the egui frame loop. Each request is listed in its own
//! task; results go back to the UI over a std channel followed by a repaint.

use std::path::Path;
use std::sync::mpsc::Sender as StdSender;
use std::thread;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::error::Result;
use crate::fs::model::FsEntry;
use crate::fs::{FsMessage, FsRequest};

/// Spawn the loader thread and return the request sender.
///
/// Dropping the sender shuts the loader down.
pub fn spawn(
    tx: StdSender<FsMessage>,
    ctx: egui::Context,
    show_hidden: bool,
) -> std::io::Result<UnboundedSender<FsRequest>> {
    let (request_tx, request_rx) = unbounded_channel();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("fs-loader".into())
        .spawn(move || {
            runtime.block_on(run_listing_loop(tx, ctx, request_rx, show_hidden));
        })?;
    Ok(request_tx)
}

/// Long-running loop: lists every requested directory and forwards the
/// result. Exits once the UI drops its request sender.
pub async fn run_listing_loop(
    tx: StdSender<FsMessage>,
    ctx: egui::Context,
    mut request_rx: UnboundedReceiver<FsRequest>,
    mut show_hidden: bool,
) {
    while let Some(request) = request_rx.recv().await {
        match request {
            FsRequest::SetShowHidden(value) => {
                log::info!("show hidden files: {value}");
                show_hidden = value;
            }
            FsRequest::List(path) => {
                let tx = tx.clone();
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    let message = match list_dir(&path, show_hidden).await {
                        Ok(entries) => {
                            log::debug!("listed {} ({} entries)", path.display(), entries.len());
                            FsMessage::Listing {
                                path,
                                entries,
                                show_hidden,
                            }
                        }
                        Err(e) => {
                            log::warn!("cannot list {}: {e}", path.display());
                            FsMessage::Failed {
                                path,
                                reason: e.to_string(),
                            }
                        }
                    };
                    if tx.send(message).is_ok() {
                        ctx.request_repaint();
                    }
                });
            }
        }
    }
    log::info!("fs loader shutting down");
}

/// Dot-files are hidden unless explicitly requested.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// List one directory. Metadata follows symlinks; a broken link is still
/// listed using the link's own metadata. Entries whose metadata cannot be
/// read at all are skipped.
pub async fn list_dir(path: &Path, show_hidden: bool) -> Result<Vec<FsEntry>> {
    let mut read_dir = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();

    while let Some(dir_entry) = read_dir.next_entry().await? {
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && is_hidden(&name) {
            continue;
        }
        let entry_path = dir_entry.path();
        let meta = match tokio::fs::metadata(&entry_path).await {
            Ok(meta) => meta,
            Err(_) => match tokio::fs::symlink_metadata(&entry_path).await {
                Ok(meta) => meta,
                Err(e) => {
                    log::debug!("skipping {}: {e}", entry_path.display());
                    continue;
                }
            },
        };
        entries.push(FsEntry::from_metadata(entry_path, name, &meta));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::model::EntryKind;
    use std::sync::mpsc;
    use std::time::Duration;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"x").unwrap();
        dir
    }

    fn sorted_names(entries: &[FsEntry]) -> Vec<String> {
        let mut names: Vec<_> = entries.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn lists_entries_and_hides_dotfiles() {
        let dir = fixture();
        let entries = list_dir(dir.path(), false).await.unwrap();
        assert_eq!(sorted_names(&entries), ["a.txt", "sub"]);

        let file = entries.iter().find(|e| e.name == "a.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.size, 5);
        assert_eq!(file.path, dir.path().join("a.txt"));
        assert!(file.modified.is_some());

        let sub = entries.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(sub.kind, EntryKind::Dir);
        assert_eq!(sub.size, 0);
    }

    #[tokio::test]
    async fn show_hidden_includes_dotfiles() {
        let dir = fixture();
        let entries = list_dir(dir.path(), true).await.unwrap();
        assert_eq!(sorted_names(&entries), [".hidden", "a.txt", "sub"]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = fixture();
        assert!(list_dir(&dir.path().join("nope"), false).await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn broken_symlink_is_listed_as_file() {
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();
        let entries = list_dir(dir.path(), false).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[test]
    fn spawned_loader_answers_requests() {
        let dir = fixture();
        let (tx, rx) = mpsc::channel();
        let requests = spawn(tx, egui::Context::default(), false).unwrap();

        requests.send(FsRequest::List(dir.path().to_path_buf())).unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FsMessage::Listing {
                path,
                entries,
                show_hidden,
            } => {
                assert_eq!(path, dir.path());
                assert_eq!(sorted_names(&entries), ["a.txt", "sub"]);
                assert!(!show_hidden);
            }
            FsMessage::Failed { reason, .. } => panic!("unexpected failure: {reason}"),
        }

        requests.send(FsRequest::SetShowHidden(true)).unwrap();
        requests.send(FsRequest::List(dir.path().to_path_buf())).unwrap();
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FsMessage::Listing {
                entries,
                show_hidden,
                ..
            } => {
                assert!(show_hidden);
                assert_eq!(sorted_names(&entries), [".hidden", "a.txt", "sub"]);
            }
            FsMessage::Failed { reason, .. } => panic!("unexpected failure: {reason}"),
        }

        requests.send(FsRequest::List(dir.path().join("nope"))).unwrap();
        assert!(matches!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            FsMessage::Failed { .. }
        ));
    }
}
