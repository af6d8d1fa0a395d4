//! Text for the Size, Type and Date Modified columns.

use chrono::{DateTime, Local};

use crate::fs::model::FsEntry;

const UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];

/// `"N bytes"` below 1 KiB, otherwise two decimals in the largest IEC unit
/// that keeps the value at or above 1.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Size cell text; directories have none.
pub fn size_cell(entry: &FsEntry) -> String {
    if entry.is_dir() {
        String::new()
    } else {
        format_size(entry.size)
    }
}

pub fn type_name(entry: &FsEntry) -> String {
    if entry.is_dir() {
        return "Folder".to_string();
    }
    match entry.extension() {
        Some(ext) => format!("{ext} File"),
        None => "File".to_string(),
    }
}

pub fn format_modified(modified: Option<DateTime<Local>>) -> String {
    modified
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
