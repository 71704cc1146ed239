//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::{Path, PathBuf};

use ratatui::widgets::TableState;

use dump_tree::core::loader::{self, ListingFormat, LoadError};
use dump_tree::core::tree::{FolderTree, NodeId};

use crate::ui::tree_widget::TreeViewState;

/// Which pane currently receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    #[default]
    Folders,
    Files,
}

/// Top-level application state.
pub struct AppState {
    /// The tree rebuilt from the listing dump.
    pub tree: FolderTree,
    /// The listing file currently shown (and reloaded on `r`).
    pub listing_path: PathBuf,
    /// Format forced on the command line, if any; skips detection.
    pub forced_format: Option<ListingFormat>,
    /// Format of the current tree (detected or forced).
    pub format: ListingFormat,
    /// Node the folder pane starts rendering at (see [`display_start`]).
    pub start: NodeId,
    /// Folder whose files the right pane shows.
    pub selected_folder: NodeId,
    /// Which pane has focus.
    pub focus: PaneFocus,
    /// Folder-pane widget state (selection, scroll, expansion).
    pub tree_state: TreeViewState,
    /// File-pane widget state (selection, scroll).
    pub file_state: TableState,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        listing_path: PathBuf,
        tree: FolderTree,
        format: ListingFormat,
        forced_format: Option<ListingFormat>,
    ) -> Self {
        let mut state = Self {
            tree,
            listing_path,
            forced_format,
            format,
            start: FolderTree::ROOT,
            selected_folder: FolderTree::ROOT,
            focus: PaneFocus::default(),
            tree_state: TreeViewState::default(),
            file_state: TableState::default(),
            status_message: None,
            should_quit: false,
        };
        state.rebuild_view();
        state
    }

    /// Re-derive every piece of view state that hangs off the tree.  Must run
    /// after each (re)load: the old `NodeId`s died with the reset.
    pub fn rebuild_view(&mut self) {
        self.start = display_start(&self.tree);
        self.selected_folder = self.start;
        self.tree_state = TreeViewState::default();
        self.tree_state.expanded.insert(self.start);
        self.file_state = TableState::default();
        self.status_message = Some(format!(
            "{} folder(s), {} file(s) — {} format",
            self.tree.folder_count(),
            self.tree.file_count(),
            self.format.label(),
        ));
    }
}

/// Skip the boring prefix of the tree: while a folder has exactly one
/// subfolder and no files there is nothing to choose, so the display starts
/// at the first branching node (`C:` or `.` wrappers disappear this way).
pub fn display_start(tree: &FolderTree) -> NodeId {
    let mut node = FolderTree::ROOT;
    loop {
        let current = tree.get(node);
        if !current.files().is_empty() || current.subfolders().len() != 1 {
            return node;
        }
        match current.subfolders().values().next() {
            Some(&only) => node = only,
            None => return node,
        }
    }
}

/// Load `path` into `tree`, honouring a forced format when one was given.
pub fn load_listing(
    path: &Path,
    forced: Option<ListingFormat>,
    tree: &mut FolderTree,
) -> Result<ListingFormat, LoadError> {
    match forced {
        Some(ListingFormat::Windows) => {
            loader::load_windows_file_list(path, tree)?;
            Ok(ListingFormat::Windows)
        }
        Some(ListingFormat::Unix) => {
            loader::load_unix_file_list(path, tree)?;
            Ok(ListingFormat::Unix)
        }
        None => loader::load_file_list(path, tree),
    }
}
