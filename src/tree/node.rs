//! Hierarchical projection of the flat file mapping.
//!
//! The projection is rebuilt from the mapping whenever it is displayed and
//! carries no identity of its own.

use crate::tree::path;
use crate::types::FileMap;
use serde::Serialize;
use std::collections::HashMap;

/// File leaf in the projected tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub read_only: bool,
}

/// Folder implied by one or more file paths sharing its prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    pub name: String,
    pub path: String,
    pub children: Vec<FileTreeNode>,
}

/// Projected tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileTreeNode {
    File(FileNode),
    Folder(FolderNode),
}

impl FileTreeNode {
    pub fn name(&self) -> &str {
        match self {
            FileTreeNode::File(file) => &file.name,
            FileTreeNode::Folder(folder) => &folder.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileTreeNode::File(file) => &file.path,
            FileTreeNode::Folder(folder) => &folder.path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FileTreeNode::Folder(_))
    }
}

enum Draft {
    File {
        name: String,
        path: String,
        hidden: bool,
        read_only: bool,
    },
    Folder {
        name: String,
        path: String,
        children: Vec<usize>,
    },
}

/// Build the display tree for `entries`.
///
/// Keys are visited in sorted order and folders are memoized by path, so
/// shared ancestors appear once and sibling order is stable across calls.
/// Hidden files are dropped, then folders left without children.
pub fn project(entries: &FileMap) -> Vec<FileTreeNode> {
    let mut arena: Vec<Draft> = Vec::with_capacity(entries.len());
    let mut by_path: HashMap<String, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    'entries: for (full_path, entry) in entries {
        let mut parent: Option<usize> = None;
        let mut current = String::with_capacity(full_path.len());
        let segments: Vec<&str> = full_path.split('/').filter(|s| !s.is_empty()).collect();

        for (i, segment) in segments.iter().enumerate() {
            current.push('/');
            current.push_str(segment);
            let terminal = i + 1 == segments.len();

            let idx = match by_path.get(&current) {
                Some(&idx) => {
                    if matches!(arena[idx], Draft::File { .. }) {
                        tracing::debug!(path = %full_path, file = %current, "entry nested under a file path; skipped");
                        continue 'entries;
                    }
                    idx
                }
                None => {
                    let draft = if terminal {
                        Draft::File {
                            name: segment.to_string(),
                            path: current.clone(),
                            hidden: entry.hidden,
                            read_only: entry.is_read_only(),
                        }
                    } else {
                        Draft::Folder {
                            name: segment.to_string(),
                            path: current.clone(),
                            children: Vec::new(),
                        }
                    };
                    let idx = arena.len();
                    arena.push(draft);
                    by_path.insert(current.clone(), idx);
                    match parent {
                        Some(p) => {
                            if let Draft::Folder { children, .. } = &mut arena[p] {
                                children.push(idx);
                            }
                        }
                        None => roots.push(idx),
                    }
                    idx
                }
            };
            parent = Some(idx);
        }
    }

    roots
        .into_iter()
        .filter_map(|idx| materialize(&arena, idx))
        .collect()
}

fn materialize(arena: &[Draft], idx: usize) -> Option<FileTreeNode> {
    match &arena[idx] {
        Draft::File {
            name,
            path,
            hidden,
            read_only,
        } => {
            if *hidden {
                return None;
            }
            Some(FileTreeNode::File(FileNode {
                name: name.clone(),
                path: path.clone(),
                read_only: *read_only,
            }))
        }
        Draft::Folder {
            name,
            path,
            children,
        } => {
            let children: Vec<FileTreeNode> = children
                .iter()
                .filter_map(|&child| materialize(arena, child))
                .collect();
            if children.is_empty() {
                return None;
            }
            Some(FileTreeNode::Folder(FolderNode {
                name: name.clone(),
                path: path.clone(),
                children,
            }))
        }
    }
}

/// Indented text rendering used by the CLI.
pub fn render(nodes: &[FileTreeNode]) -> String {
    let mut out = String::new();
    render_into(nodes, 0, &mut out);
    out
}

fn render_into(nodes: &[FileTreeNode], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        match node {
            FileTreeNode::File(file) => {
                out.push_str(&file.name);
                if file.read_only {
                    out.push_str(" (read-only)");
                }
                out.push('\n');
            }
            FileTreeNode::Folder(folder) => {
                out.push_str(&folder.name);
                out.push_str("/\n");
                render_into(&folder.children, depth + 1, out);
            }
        }
    }
}

/// Total number of file leaves in a projection.
pub fn count_files(nodes: &[FileTreeNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            FileTreeNode::File(_) => 1,
            FileTreeNode::Folder(folder) => count_files(&folder.children),
        })
        .sum()
}

/// Locate a projected node by its path.
#[cfg(test)]
pub fn find<'a>(nodes: &'a [FileTreeNode], target: &str) -> Option<&'a FileTreeNode> {
    for node in nodes {
        if node.path() == target {
            return Some(node);
        }
        if let FileTreeNode::Folder(folder) = node {
            if path::is_under(target, &folder.path) {
                return find(&folder.children, target);
            }
        }
    }
    None
}
