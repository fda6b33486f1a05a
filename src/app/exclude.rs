use std::path::{Path, MAIN_SEPARATOR};

/// The resolved exclusion list.
///
/// Every entry is matched three ways at once: as an exact relative path, as
/// an ancestor directory, and as a bare file or directory name at any depth.
/// The last mode is broad: excluding `test` drops everything named `test`
/// anywhere in the tree, not only at the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    entries: Vec<String>,
}

impl Exclusions {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Adds the export destination (full path and basename) so a run never
    /// picks up its own output.
    pub fn with_output(mut self, output: &Path) -> Self {
        let full = output.to_string_lossy().into_owned();
        let base = output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        for item in std::iter::once(full).chain(base) {
            if !item.is_empty() && !self.entries.contains(&item) {
                self.entries.push(item);
            }
        }
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_excluded(&self, rel_path: &Path) -> bool {
        let rel = rel_path.to_string_lossy();
        let base = rel_path.file_name().map(|name| name.to_string_lossy());

        self.entries.iter().any(|ex| {
            rel == ex.as_str()
                || rel
                    .strip_prefix(ex.as_str())
                    .is_some_and(|rest| rest.starts_with(MAIN_SEPARATOR))
                || base.as_deref() == Some(ex.as_str())
        })
    }
}
