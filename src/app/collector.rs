use crate::app::models::{FileEntry, FileResult};
use std::fs;

/// Reads every entry in order. A file that cannot be read becomes a failed
/// record; nothing here stops the run.
pub fn collect(entries: impl IntoIterator<Item = FileEntry>) -> Vec<FileResult> {
    entries.into_iter().map(read_entry).collect()
}

pub fn read_entry(entry: FileEntry) -> FileResult {
    match fs::read_to_string(&entry.abs_path) {
        Ok(content) => FileResult::read(entry.rel_path, content),
        Err(e) => {
            log::debug!("Failed to read {}: {}", entry.abs_path.display(), e);
            FileResult::failed(entry.rel_path, e.to_string())
        }
    }
}
