use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use pathdiff::diff_paths;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Used when neither `output` nor `outputDir` is configured.
pub const DEFAULT_OUTPUT: &str = "kodexor-export.md";
pub const DEFAULT_PROJECT_NAME: &str = "Project";

const MANIFEST: &str = "package.json";
const EXPORT_SUFFIX: &str = "-export.md";

#[derive(Deserialize, Debug, Default)]
struct Manifest {
    #[serde(default)]
    name: Option<String>,
}

/// `output` wins, then a name derived inside `outputDir`, then the default.
pub fn pick_output_path(config: &RuntimeConfig, cwd: &Path) -> PathBuf {
    if let Some(output) = non_empty(config.output.as_deref()) {
        return PathBuf::from(output);
    }

    match non_empty(config.output_dir.as_deref()) {
        Some(dir) => Path::new(dir).join(derived_file_name(cwd)),
        None => PathBuf::from(DEFAULT_OUTPUT),
    }
}

/// `{package}-{segments from the manifest dir down to cwd}-export.md`.
pub fn derived_file_name(cwd: &Path) -> String {
    let manifest_dir = find_nearest_manifest(cwd);

    let name = manifest_dir
        .as_deref()
        .and_then(|dir| manifest_name(&dir.join(MANIFEST)))
        .unwrap_or_else(|| {
            let dir = manifest_dir.as_deref().unwrap_or(cwd);
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

    let mut parts = vec![sanitize_name(&name)];
    if let Some(relative) = manifest_dir.and_then(|dir| diff_paths(cwd, dir)) {
        parts.extend(relative.components().filter_map(|c| match c {
            Component::Normal(seg) => Some(seg.to_string_lossy().into_owned()),
            _ => None,
        }));
    }

    format!("{}{}", parts.join("-"), EXPORT_SUFFIX)
}

/// Replaces anything outside `[A-Za-z0-9_.-]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Directory of the closest `package.json` at or above `start`.
pub fn find_nearest_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST).is_file())
        .map(Path::to_path_buf)
}

/// Title for the document: `name` from `<root>/package.json`, else "Project".
pub fn project_name(root: &Path) -> String {
    manifest_name(&root.join(MANIFEST)).unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
}

fn manifest_name(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Manifest>(&content) {
        Ok(manifest) => manifest.name.filter(|n| !n.is_empty()),
        Err(err) => {
            log::warn!("Ignoring unparsable {}: {}", path.display(), err);
            None
        }
    }
}

/// Creates missing parent directories and writes the document in one go.
pub fn write_document(path: &Path, document: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    fs::write(path, document).with_context(|| format!("Failed to write {:?}", path))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
