use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;

use crate::app::config::ConfigFragment;

#[derive(Parser, Debug)]
#[command(
    name = "kodexor",
    author,
    version,
    about = "Export every readable project file into a single markdown document",
    disable_version_flag = true
)]
pub struct Cli {
    /// Comma-separated paths, directories or file names to leave out
    #[arg(long, value_delimiter = ',', value_name = "a,b,...")]
    pub exclude: Option<Vec<String>>,

    /// File to write the export to
    #[arg(long, value_name = "PATH")]
    pub output: Option<String>,

    /// Directory to write the export to, file name derived from package.json
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Print version
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// What the process was asked to do, decided once before any scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help(String),
    Version(String),
    Export(ConfigFragment),
}

impl Invocation {
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) if cli.version => Ok(Self::Version(Cli::command().render_version())),
            Ok(cli) => Ok(Self::Export(cli.into_fragment())),
            Err(err) if err.kind() == ErrorKind::DisplayHelp => {
                Ok(Self::Help(err.render().to_string()))
            }
            Err(err) => Err(err),
        }
    }
}

impl Cli {
    /// Empty items are dropped, but `--exclude=` still counts as a supplied list.
    pub fn into_fragment(self) -> ConfigFragment {
        ConfigFragment {
            exclude: self.exclude.map(|items| {
                items
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            output: trimmed(self.output),
            output_dir: trimmed(self.output_dir),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(args: &[&str]) -> ConfigFragment {
        let argv = std::iter::once("kodexor").chain(args.iter().copied());
        match Invocation::from_args(argv).unwrap() {
            Invocation::Export(fragment) => fragment,
            other => panic!("expected export, got {:?}", other),
        }
    }

    #[test]
    fn parses_all_flags() {
        let fragment = export(&["--exclude=node_modules,dist", "--output=out.md", "--output-dir=docs"]);
        assert_eq!(
            fragment.exclude,
            Some(vec!["node_modules".to_string(), "dist".to_string()])
        );
        assert_eq!(fragment.output.as_deref(), Some("out.md"));
        assert_eq!(fragment.output_dir.as_deref(), Some("docs"));
    }

    #[test]
    fn absent_flags_stay_absent() {
        assert_eq!(export(&[]), ConfigFragment::default());
    }

    #[test]
    fn empty_exclude_is_present_but_empty() {
        let fragment = export(&["--exclude="]);
        assert_eq!(fragment.exclude, Some(Vec::new()));

        let fragment = export(&["--exclude=a,,b"]);
        assert_eq!(fragment.exclude, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn help_and_version_short_circuit() {
        let help = Invocation::from_args(["kodexor", "--help"]).unwrap();
        assert!(matches!(help, Invocation::Help(text) if text.contains("--output-dir")));

        for flag in ["-v", "--version"] {
            let version = Invocation::from_args(["kodexor", flag]).unwrap();
            assert!(
                matches!(version, Invocation::Version(ref text) if text.contains(env!("CARGO_PKG_VERSION"))),
                "{flag} should print the version"
            );
        }
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(Invocation::from_args(["kodexor", "--bogus"]).is_err());
    }
}
