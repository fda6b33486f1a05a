use crate::app::models::FileResult;
use indexmap::IndexMap;
use std::path::Path;

/// Index of a node inside a [`FileTree`].
pub type NodeId = usize;

/// File metadata stamped on the node that ends a result's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub rel_path: String,
    pub ok: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    pub name: String,
    pub leaf: Option<Leaf>,
    /// First-seen order, never sorted.
    children: IndexMap<String, NodeId>,
}

impl TreeNode {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Hierarchy rebuilt from the flat result list. Nodes live in one arena and
/// parents own their children through indices.
#[derive(Debug, Clone)]
pub struct FileTree {
    nodes: Vec<TreeNode>,
}

impl Default for FileTree {
    fn default() -> Self {
        Self {
            nodes: vec![TreeNode::default()],
        }
    }
}

impl FileTree {
    pub const ROOT: NodeId = 0;

    pub fn build(results: &[FileResult]) -> Self {
        let mut tree = Self::default();
        for result in results {
            tree.insert(&result.rel_path, result.is_ok());
        }
        tree
    }

    /// Walks or creates one node per path segment, then stamps the last one.
    /// Stamping an already stamped node overwrites it.
    fn insert(&mut self, rel_path: &str, ok: bool) {
        let mut current = Self::ROOT;
        let mut touched = false;

        for component in Path::new(rel_path).components() {
            let segment = component.as_os_str().to_string_lossy();
            current = self.child_or_insert(current, &segment);
            touched = true;
        }

        if touched {
            self.nodes[current].leaf = Some(Leaf {
                rel_path: rel_path.to_string(),
                ok,
            });
        }
    }

    fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
        if let Some(&id) = self.nodes[parent].children.get(segment) {
            return id;
        }

        let id = self.nodes.len();
        self.nodes.push(TreeNode::named(segment));
        self.nodes[parent].children.insert(segment.to_string(), id);
        id
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.nodes[id].children.values().copied()
    }

    /// Every stamped node as `(rel_path, ok)`, depth-first.
    pub fn leaves(&self) -> Vec<(&str, bool)> {
        let mut out = Vec::new();
        let mut stack = vec![Self::ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(leaf) = &node.leaf {
                out.push((leaf.rel_path.as_str(), leaf.ok));
            }
            stack.extend(node.children.values().rev().copied());
        }
        out
    }
}
