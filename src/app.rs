// Declare modules
pub mod cli;
pub mod collector;
pub mod config;
pub mod exclude;
pub mod formatter;
pub mod models;
pub mod output;
pub mod scanner;
pub mod tree;

use anyhow::{Context, Result};
use std::env;
use std::ffi::OsString;
use std::path::Path;

use self::cli::Invocation;
use self::config::{discover_project_fragment, load_user_fragment, resolve_config};
use self::exclude::Exclusions;
use self::formatter::OutputGenerator;
use self::models::FileResult;
use self::output::{pick_output_path, project_name, write_document};
use self::scanner::Scanner;
use self::tree::FileTree;

/// Everything one run produced, before it is written anywhere.
#[derive(Debug)]
pub struct Export {
    pub results: Vec<FileResult>,
    pub document: String,
}

pub fn run() -> Result<()> {
    run_with_args(env::args_os())
}

/// Initializes components and orchestrates data flow.
pub fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    // 1. Parse Args; help and version never reach the filesystem
    let cli_fragment = match Invocation::from_args(args) {
        Ok(Invocation::Help(text)) | Ok(Invocation::Version(text)) => {
            print!("{}", text);
            return Ok(());
        }
        Ok(Invocation::Export(fragment)) => fragment,
        Err(err) => err.exit(),
    };

    // 2. Resolve Configuration: CLI > project > user
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let home = dirs::home_dir();
    let project = discover_project_fragment(&current_dir, home.as_deref());
    let user = load_user_fragment();
    let config = resolve_config(&cli_fragment, &project, &user);

    // 3. Pick the destination and keep it out of the scan
    let output_path = pick_output_path(&config, &current_dir);
    let exclusions = Exclusions::new(config.exclude).with_output(&output_path);
    log::debug!("Excluding {:?}", exclusions.entries());

    // 4. Scan, read, render
    let export = render_export(&current_dir, exclusions);
    log::info!(
        "Collected {} files ({} unreadable)",
        export.results.len(),
        export.results.iter().filter(|r| !r.is_ok()).count()
    );

    // 5. Write once
    write_document(&output_path, &export.document)?;
    println!("[kodexor] Export complete => {}", output_path.display());

    Ok(())
}

/// Walks `root`, reads every surviving file and assembles the document.
pub fn render_export(root: &Path, exclusions: Exclusions) -> Export {
    let scanner = Scanner::new(root.to_path_buf(), exclusions);
    let results = collector::collect(scanner.walk());

    let tree = FileTree::build(&results);
    let tree_str = OutputGenerator::generate_tree(&tree);
    let content_str = OutputGenerator::generate_content(&project_name(root), &results);

    Export {
        document: OutputGenerator::format_full_output(&content_str, &tree_str),
        results,
    }
}
