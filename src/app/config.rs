use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the user dotfile in the home directory.
pub const USER_RC_NAME: &str = ".kodexorrc";

/// Key under which `package.json` may carry project settings.
const PACKAGE_KEY: &str = "kodexor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceFormat {
    PackageJson,
    Json,
    Toml,
}

/// Checked in this order inside every directory on the way up.
const PROJECT_SOURCES: &[(&str, SourceFormat)] = &[
    ("package.json", SourceFormat::PackageJson),
    (".kodexorrc", SourceFormat::Json),
    (".kodexorrc.json", SourceFormat::Json),
    (".kodexorrc.toml", SourceFormat::Toml),
    ("kodexor.toml", SourceFormat::Toml),
];

/// One configuration layer. `None` means "not supplied here", which is
/// different from an empty list.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFragment {
    pub exclude: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(alias = "output_dir")]
    pub output_dir: Option<String>,
}

/// Merges the layers, highest precedence first. A field falls through only
/// when it is absent, never when it is merely empty.
pub fn resolve_config(
    cli: &ConfigFragment,
    project: &ConfigFragment,
    user: &ConfigFragment,
) -> RuntimeConfig {
    let layers = [cli, project, user];

    RuntimeConfig {
        exclude: layers
            .iter()
            .find_map(|l| l.exclude.clone())
            .unwrap_or_default(),
        output: layers.iter().find_map(|l| l.output.clone()),
        output_dir: layers.iter().find_map(|l| l.output_dir.clone()),
    }
}

/// Loads `~/.kodexorrc`. A broken file is reported and treated as empty.
pub fn load_user_fragment() -> ConfigFragment {
    match dirs::home_dir() {
        Some(home) => load_user_fragment_from(&home.join(USER_RC_NAME)),
        None => {
            log::debug!("No home directory, skipping {}", USER_RC_NAME);
            ConfigFragment::default()
        }
    }
}

pub fn load_user_fragment_from(path: &Path) -> ConfigFragment {
    if !path.exists() {
        return ConfigFragment::default();
    }

    match read_json(path) {
        Ok(fragment) => fragment,
        Err(err) => {
            log::warn!("Malformed {}: {:#}", path.display(), err);
            ConfigFragment::default()
        }
    }
}

/// Searches `start` and its ancestors for project settings, stopping after
/// `stop` (usually the home directory). Any failure yields an empty fragment.
pub fn discover_project_fragment(start: &Path, stop: Option<&Path>) -> ConfigFragment {
    match search_project_config(start, stop) {
        Ok(Some((path, fragment))) => {
            log::debug!("Using project config {}", path.display());
            fragment
        }
        Ok(None) => ConfigFragment::default(),
        Err(err) => {
            log::debug!("Ignoring project config: {:#}", err);
            ConfigFragment::default()
        }
    }
}

fn search_project_config(
    start: &Path,
    stop: Option<&Path>,
) -> Result<Option<(PathBuf, ConfigFragment)>> {
    for dir in start.ancestors() {
        for (name, format) in PROJECT_SOURCES {
            let candidate = dir.join(name);
            if !candidate.is_file() {
                continue;
            }
            if let Some(fragment) = parse_source(&candidate, *format)? {
                return Ok(Some((candidate, fragment)));
            }
        }
        if stop == Some(dir) {
            break;
        }
    }
    Ok(None)
}

fn parse_source(path: &Path, format: SourceFormat) -> Result<Option<ConfigFragment>> {
    match format {
        SourceFormat::Json => read_json(path).map(Some),
        SourceFormat::Toml => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {:?}", path))?;
            let fragment = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {:?}", path))?;
            Ok(Some(fragment))
        }
        SourceFormat::PackageJson => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let mut manifest: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {:?}", path))?;
            match manifest.get_mut(PACKAGE_KEY).map(serde_json::Value::take) {
                Some(section) => {
                    let fragment = serde_json::from_value(section).with_context(|| {
                        format!("Invalid \"{}\" section in {:?}", PACKAGE_KEY, path)
                    })?;
                    Ok(Some(fragment))
                }
                None => Ok(None),
            }
        }
    }
}

fn read_json(path: &Path) -> Result<ConfigFragment> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read config at {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fragment(exclude: Option<&[&str]>, output: Option<&str>, output_dir: Option<&str>) -> ConfigFragment {
        ConfigFragment {
            exclude: exclude.map(|items| items.iter().map(|s| s.to_string()).collect()),
            output: output.map(String::from),
            output_dir: output_dir.map(String::from),
        }
    }

    #[test]
    fn cli_wins_over_every_layer() {
        let cli = fragment(Some(&["a"]), Some("cli.md"), Some("cli-dir"));
        let project = fragment(Some(&["b"]), Some("project.md"), Some("project-dir"));
        let user = fragment(Some(&["c"]), Some("user.md"), Some("user-dir"));

        let config = resolve_config(&cli, &project, &user);
        assert_eq!(config.exclude, vec!["a"]);
        assert_eq!(config.output.as_deref(), Some("cli.md"));
        assert_eq!(config.output_dir.as_deref(), Some("cli-dir"));
    }

    #[test]
    fn fields_fall_through_independently() {
        let cli = fragment(None, None, Some("cli-dir"));
        let project = fragment(None, Some("project.md"), None);
        let user = fragment(Some(&["c"]), Some("user.md"), Some("user-dir"));

        let config = resolve_config(&cli, &project, &user);
        assert_eq!(config.exclude, vec!["c"]);
        assert_eq!(config.output.as_deref(), Some("project.md"));
        assert_eq!(config.output_dir.as_deref(), Some("cli-dir"));
    }

    #[test]
    fn empty_list_does_not_fall_through() {
        let cli = fragment(Some(&[]), None, None);
        let user = fragment(Some(&["c"]), None, None);

        let config = resolve_config(&cli, &ConfigFragment::default(), &user);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn nothing_supplied_gives_defaults() {
        let empty = ConfigFragment::default();
        assert_eq!(resolve_config(&empty, &empty, &empty), RuntimeConfig::default());
    }

    #[test]
    fn user_rc_is_parsed_as_json() {
        let dir = tempdir().unwrap();
        let rc = dir.path().join(USER_RC_NAME);
        fs::write(&rc, r#"{"exclude": ["target"], "outputDir": "exports"}"#).unwrap();

        let loaded = load_user_fragment_from(&rc);
        assert_eq!(loaded, fragment(Some(&["target"]), None, Some("exports")));
    }

    #[test]
    fn malformed_or_missing_user_rc_is_empty() {
        let dir = tempdir().unwrap();
        let rc = dir.path().join(USER_RC_NAME);
        assert_eq!(load_user_fragment_from(&rc), ConfigFragment::default());

        fs::write(&rc, "{ not json").unwrap();
        assert_eq!(load_user_fragment_from(&rc), ConfigFragment::default());
    }

    #[test]
    fn package_json_section_is_found_from_nested_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "demo", "kodexor": {"exclude": ["node_modules"], "output": "dump.md"}}"#,
        )
        .unwrap();
        let nested = dir.path().join("packages").join("web");
        fs::create_dir_all(&nested).unwrap();

        let found = discover_project_fragment(&nested, Some(dir.path()));
        assert_eq!(found, fragment(Some(&["node_modules"]), Some("dump.md"), None));
    }

    #[test]
    fn package_json_without_section_keeps_searching() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".kodexorrc.toml"), "exclude = [\"dist\"]\noutput_dir = \"out\"\n").unwrap();
        let nested = dir.path().join("app");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("package.json"), r#"{"name": "app"}"#).unwrap();

        let found = discover_project_fragment(&nested, Some(dir.path()));
        assert_eq!(found, fragment(Some(&["dist"]), None, Some("out")));
    }

    #[test]
    fn search_stops_at_the_stop_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".kodexorrc"), r#"{"output": "outer.md"}"#).unwrap();
        let home = dir.path().join("home");
        let project = home.join("project");
        fs::create_dir_all(&project).unwrap();

        assert_eq!(
            discover_project_fragment(&project, Some(&home)),
            ConfigFragment::default()
        );
    }

    #[test]
    fn broken_project_config_is_silently_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".kodexorrc.json"), "[1, 2").unwrap();

        assert_eq!(
            discover_project_fragment(dir.path(), Some(dir.path())),
            ConfigFragment::default()
        );
    }
}
