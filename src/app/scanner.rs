use crate::app::exclude::Exclusions;
use crate::app::models::FileEntry;
use ignore::{DirEntry, WalkBuilder};
use pathdiff::diff_paths;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Scanner {
    root: PathBuf,
    exclusions: Arc<Exclusions>,
}

impl Scanner {
    pub fn new(root: PathBuf, exclusions: Exclusions) -> Self {
        Self {
            root,
            exclusions: Arc::new(exclusions),
        }
    }

    /// Depth-first walk yielding regular files one at a time.
    ///
    /// Exclusions are checked before descending, so an excluded directory is
    /// never listed. Siblings come in file-name order. No ignore files are
    /// consulted and symlinks are not followed.
    pub fn walk(&self) -> impl Iterator<Item = FileEntry> {
        let filter_root = self.root.clone();
        let exclusions = Arc::clone(&self.exclusions);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| match diff_paths(entry.path(), &filter_root) {
                Some(relative) => !exclusions.is_excluded(&relative),
                None => true,
            })
            .build();

        let root = self.root.clone();
        walker.filter_map(move |result| match result {
            Ok(entry) => file_entry(&root, &entry),
            Err(err) => {
                log::warn!("Error walking entry: {}", err);
                None
            }
        })
    }
}

fn file_entry(root: &Path, entry: &DirEntry) -> Option<FileEntry> {
    // Directories are walked into, symlinks and special files are skipped.
    if !entry.file_type().is_some_and(|ft| ft.is_file()) {
        return None;
    }

    let relative = diff_paths(entry.path(), root)?;
    Some(FileEntry {
        abs_path: entry.path().to_path_buf(),
        rel_path: relative.to_string_lossy().into_owned(),
    })
}
