//! Custom Ratatui widget that renders the folder half of a [`FolderTree`] as
//! an indented, collapsible list.
//!
//! Files never appear here — they belong to the file pane.  Expansion state
//! is keyed by [`NodeId`] and lives in [`TreeViewState`]; it is discarded
//! wholesale on reload because a tree reset invalidates every id.

use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use dump_tree::core::tree::{FolderTree, NodeId};

use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the folder pane (selection, scroll, expansion).
#[derive(Debug, Default)]
pub struct TreeViewState {
    /// Index into the *visible* flat row list that is currently highlighted.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
    /// Folders currently expanded.
    pub expanded: HashSet<NodeId>,
}

impl TreeViewState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row in the folder pane.
#[derive(Debug, Clone, Copy)]
pub struct TreeRow {
    pub node: NodeId,
    pub depth: usize,
    pub expanded: bool,
    pub has_subfolders: bool,
}

/// Flatten the subtree under `start` into visible rows, honouring the
/// expansion set.  Shared between rendering and the input handler, which
/// needs the same row order to resolve a selection index back to a node.
pub fn build_rows(tree: &FolderTree, start: NodeId, expanded: &HashSet<NodeId>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    collect_rows(tree, start, 0, expanded, &mut rows);
    rows
}

fn collect_rows(
    tree: &FolderTree,
    node: NodeId,
    depth: usize,
    expanded: &HashSet<NodeId>,
    rows: &mut Vec<TreeRow>,
) {
    let folder = tree.get(node);
    let is_expanded = expanded.contains(&node);
    rows.push(TreeRow {
        node,
        depth,
        expanded: is_expanded,
        has_subfolders: !folder.subfolders().is_empty(),
    });

    if is_expanded {
        for &child in folder.subfolders().values() {
            collect_rows(tree, child, depth + 1, expanded, rows);
        }
    }
}

// ───────────────────────────────────────── widget ────────────

/// The folder-pane widget itself — created fresh each frame.
pub struct FolderTreeWidget<'a> {
    tree: &'a FolderTree,
    start: NodeId,
    block: Option<Block<'a>>,
}

impl<'a> FolderTreeWidget<'a> {
    pub fn new(tree: &'a FolderTree, start: NodeId) -> Self {
        Self {
            tree,
            start,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> StatefulWidget for FolderTreeWidget<'a> {
    type State = TreeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let rows = build_rows(self.tree, self.start, &state.expanded);
        state.clamp_scroll(inner.height as usize);

        let visible_rows = rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible_rows.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;

            let indent = "  ".repeat(row.depth);
            let icon = if !row.has_subfolders {
                "  "
            } else if row.expanded {
                "▼ "
            } else {
                "▶ "
            };
            let style = if is_selected {
                Theme::selected_style()
            } else {
                Theme::folder_style()
            };

            let folder = self.tree.get(row.node);
            let label = if folder.name().is_empty() {
                // Only the unnamed root can end up here (empty listing).
                "/"
            } else {
                folder.name()
            };
            let mut spans = vec![
                Span::raw(indent),
                Span::styled(format!("{icon}{label}"), style),
            ];

            let file_count = folder.files().len();
            if file_count > 0 {
                let count_style = if is_selected {
                    Theme::selected_style()
                } else {
                    Theme::dimmed_style()
                };
                spans.push(Span::styled(format!(" {file_count}"), count_style));
            }

            let line = Line::from(spans);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapsed_folders_hide_their_subtree() {
        let mut tree = FolderTree::new();
        let a = tree.add_subfolder(FolderTree::ROOT, "a").unwrap();
        tree.add_subfolder(a, "nested").unwrap();
        tree.add_subfolder(FolderTree::ROOT, "b").unwrap();

        let mut expanded = HashSet::from([FolderTree::ROOT]);
        let rows = build_rows(&tree, FolderTree::ROOT, &expanded);
        // root, a (collapsed), b
        assert_eq!(rows.len(), 3);

        expanded.insert(a);
        let rows = build_rows(&tree, FolderTree::ROOT, &expanded);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].node, a);
        assert_eq!(rows[2].depth, 2);
    }

    #[test]
    fn rows_follow_subfolder_name_order() {
        let mut tree = FolderTree::new();
        tree.add_subfolder(FolderTree::ROOT, "zeta").unwrap();
        tree.add_subfolder(FolderTree::ROOT, "alpha").unwrap();

        let expanded = HashSet::from([FolderTree::ROOT]);
        let rows = build_rows(&tree, FolderTree::ROOT, &expanded);
        assert_eq!(tree.get(rows[1].node).name(), "alpha");
        assert_eq!(tree.get(rows[2].node).name(), "zeta");
    }

    #[test]
    fn scroll_clamps_to_keep_selection_visible() {
        let mut state = TreeViewState {
            selected: 12,
            offset: 0,
            expanded: HashSet::new(),
        };
        state.clamp_scroll(5);
        assert_eq!(state.offset, 8);

        state.selected = 2;
        state.clamp_scroll(5);
        assert_eq!(state.offset, 2);
    }
}
