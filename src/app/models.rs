use std::path::PathBuf;

/// Represents the final configuration after merging CLI, project and user layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub exclude: Vec<String>,
    pub output: Option<String>,
    pub output_dir: Option<String>,
}

/// Represents a single file discovered during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub abs_path: PathBuf,
    /// Relative to the scan root, platform separators.
    pub rel_path: String,
}

/// What happened when a file was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Read(String),
    Failed(String),
}

/// The per-file record every renderer works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub rel_path: String,
    pub outcome: Outcome,
}

impl FileResult {
    pub fn read(rel_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            outcome: Outcome::Read(content.into()),
        }
    }

    pub fn failed(rel_path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            outcome: Outcome::Failed(error.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Read(_))
    }

    pub fn content(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Read(content) => Some(content),
            Outcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Read(_) => None,
            Outcome::Failed(error) => Some(error),
        }
    }
}
