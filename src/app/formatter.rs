use crate::app::models::{FileResult, Outcome};
use crate::app::tree::{FileTree, NodeId};
use std::path::Path;

const FENCE: &str = "```";
/// A zero-width space splits the backticks so the outer fence stays closed.
const ESCAPED_FENCE: &str = "``\u{200B}`";

const OK_MARK: &str = "✅";
const FAILED_MARK: &str = "❌";
const READ_FAILED: &str = "Read failed";

pub const TREE_SECTION_TITLE: &str = "File export status (tree)";

pub struct OutputGenerator;

impl OutputGenerator {
    /// Draws the tree like the `tree` command. The root itself is not printed.
    pub fn generate_tree(tree: &FileTree) -> String {
        let mut output = String::new();
        render_children(tree, FileTree::ROOT, "", &mut output);
        output
    }

    pub fn generate_content(project_name: &str, results: &[FileResult]) -> String {
        let mut md = format!("# {}\n\n", project_name);

        for result in results {
            md.push_str(&format!("## {}\n", result.rel_path));
            match &result.outcome {
                Outcome::Read(content) => {
                    md.push_str(FENCE);
                    md.push_str(language_hint(&result.rel_path));
                    md.push('\n');
                    md.push_str(&escape_fences(content));
                }
                Outcome::Failed(error) => {
                    md.push_str(FENCE);
                    md.push('\n');
                    md.push_str(if error.is_empty() { READ_FAILED } else { error.as_str() });
                }
            }
            md.push_str("\n```\n\n");
        }

        md
    }

    pub fn format_full_output(content: &str, tree: &str) -> String {
        let mut out = String::from(content);
        out.push_str(&format!("# {}\n", TREE_SECTION_TITLE));
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(tree);
        out.push_str(FENCE);
        out.push('\n');
        out
    }
}

fn render_children(tree: &FileTree, id: NodeId, prefix: &str, output: &mut String) {
    let children = tree.children(id);
    let count = children.len();

    for (idx, child_id) in children.enumerate() {
        let child = tree.node(child_id);
        let is_last = idx + 1 == count;

        output.push_str(prefix);
        output.push_str(if is_last { "└── " } else { "├── " });
        output.push_str(&child.name);
        if let Some(leaf) = &child.leaf {
            output.push(' ');
            output.push_str(if leaf.ok { OK_MARK } else { FAILED_MARK });
        }
        output.push('\n');

        if child.has_children() {
            let nested = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
            render_children(tree, child_id, &nested, output);
        }
    }
}

/// Fence language from the file extension alone; empty when unknown.
pub fn language_hint(rel_path: &str) -> &'static str {
    let ext = Path::new(rel_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match ext {
        "json" => "json",
        "ts" => "ts",
        "js" => "js",
        "md" => "md",
        "sh" => "bash",
        "yml" | "yaml" => "yaml",
        _ => "",
    }
}

pub fn escape_fences(content: &str) -> String {
    content.replace(FENCE, ESCAPED_FENCE)
}

pub fn unescape_fences(content: &str) -> String {
    content.replace(ESCAPED_FENCE, FENCE)
}
