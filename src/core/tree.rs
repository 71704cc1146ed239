//! In-memory tree data-structure rebuilt from a directory-listing dump.
//!
//! The [`FolderNode`] is the fundamental unit – it holds one directory's name,
//! its child folders and its files, and links to its neighbours via indices
//! into an arena (the [`FolderTree`] struct).  Using an arena avoids recursive
//! `Box` allocations, is cache-friendly, and gives us a parent link that is a
//! plain index rather than a borrow.
//!
//! Ownership flows strictly root-to-leaf through the arena; the `parent`
//! index exists only so the UI can reconstruct a path upwards.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use thiserror::Error;

// ───────────────────────────────────────── file metadata ─────

/// Metadata kept per file entry, as recovered from the listing text.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    /// Modification timestamp.  `None` when the listing's date/time text did
    /// not parse — an unreadable timestamp never aborts a load.
    pub modified: Option<NaiveDateTime>,
    /// File size in bytes.
    pub size: u64,
}

// ───────────────────────────────────────── errors ────────────

/// Violations of the tree's naming invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Tried to create a subfolder where a file of the same name exists.
    #[error("`{0}` already names a file in this folder")]
    NameTakenByFile(String),
    /// Tried to insert a file where a subfolder of the same name exists.
    #[error("`{0}` already names a subfolder in this folder")]
    NameTakenByFolder(String),
    /// Looked up a subfolder that does not exist, without auto-create.
    #[error("subfolder `{0}` does not exist")]
    FolderNotFound(String),
}

// ───────────────────────────────────────── tree node ─────────

/// Index into [`FolderTree::nodes`].
pub type NodeId = usize;

/// A single folder in the arena-allocated tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    name: String,
    parent: Option<NodeId>,
    /// Child folders by name.  A `BTreeMap` keeps them sorted, so the UI gets
    /// a stable, alphabetical ordering for free.
    subfolders: BTreeMap<String, NodeId>,
    /// Files by name; presentation order is the consumer's concern.
    files: HashMap<String, FileInfo>,
}

impl FolderNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_owned(),
            parent,
            subfolders: BTreeMap::new(),
            files: HashMap::new(),
        }
    }

    /// The folder's own path segment (empty for the root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The enclosing folder, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child folders, ordered by name.
    pub fn subfolders(&self) -> &BTreeMap<String, NodeId> {
        &self.subfolders
    }

    /// Files in this folder.
    pub fn files(&self) -> &HashMap<String, FileInfo> {
        &self.files
    }
}

// ───────────────────────────────────────── arena tree ────────

/// Arena-backed folder tree.
///
/// Nodes are stored in a flat `Vec` and reference each other by index.  The
/// root always exists, sits at index [`FolderTree::ROOT`], and carries an
/// empty name.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderTree {
    nodes: Vec<FolderNode>,
}

impl FolderTree {
    /// The root's [`NodeId`] — valid for the whole life of the tree.
    pub const ROOT: NodeId = 0;

    /// Create an empty tree holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![FolderNode::new("", None)],
        }
    }

    /// Return a reference to a node.
    pub fn get(&self, id: NodeId) -> &FolderNode {
        &self.nodes[id]
    }

    /// Drop every node but the root and clear the root's contents.
    ///
    /// Every previously obtained [`NodeId`] is invalid afterwards.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[Self::ROOT].subfolders.clear();
        self.nodes[Self::ROOT].files.clear();
    }

    /// Return the child folder `name` under `parent`, creating it if absent.
    pub fn add_subfolder(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        if self.nodes[parent].files.contains_key(name) {
            return Err(TreeError::NameTakenByFile(name.to_owned()));
        }
        if let Some(&id) = self.nodes[parent].subfolders.get(name) {
            return Ok(id);
        }
        let id = self.nodes.len();
        self.nodes.push(FolderNode::new(name, Some(parent)));
        self.nodes[parent].subfolders.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Look up the child folder `name` under `parent`.
    ///
    /// With `auto_create` a missing child is created (as in
    /// [`FolderTree::add_subfolder`]); without it the lookup fails.
    pub fn subfolder(
        &mut self,
        parent: NodeId,
        name: &str,
        auto_create: bool,
    ) -> Result<NodeId, TreeError> {
        if let Some(&id) = self.nodes[parent].subfolders.get(name) {
            return Ok(id);
        }
        if auto_create {
            self.add_subfolder(parent, name)
        } else {
            Err(TreeError::FolderNotFound(name.to_owned()))
        }
    }

    /// Insert or replace the file entry `name` under `parent`.
    pub fn add_file(&mut self, parent: NodeId, name: &str, info: FileInfo) -> Result<(), TreeError> {
        if self.nodes[parent].subfolders.contains_key(name) {
            return Err(TreeError::NameTakenByFolder(name.to_owned()));
        }
        self.nodes[parent].files.insert(name.to_owned(), info);
        Ok(())
    }

    /// Reconstruct the `/`-joined path of a node by walking `parent` links.
    /// The unnamed root contributes nothing.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current];
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            cursor = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Number of folders in the tree, the root excluded.
    pub fn folder_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of file entries across the whole tree.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(|node| node.files.len()).sum()
    }
}

impl Default for FolderTree {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────── tests ─────────────
