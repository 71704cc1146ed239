//! Input handling — maps key events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::app::state::{load_listing, AppState, PaneFocus};
use crate::ui::file_list;
use crate::ui::tree_widget::{build_rows, TreeRow};

/// Process a key event, dispatching on the focused pane.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Ctrl+c always quits, regardless of focus.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
        }
        KeyCode::Tab => {
            state.focus = match state.focus {
                PaneFocus::Folders => PaneFocus::Files,
                PaneFocus::Files => PaneFocus::Folders,
            };
            if state.focus == PaneFocus::Files && state.file_state.selected().is_none() {
                select_first_file(state);
            }
        }
        KeyCode::Char('r') => {
            reload(state);
        }
        _ => match state.focus {
            PaneFocus::Folders => handle_folder_key(state, key),
            PaneFocus::Files => handle_file_key(state, key),
        },
    }
}

// ── Folder pane ─────────────────────────────────────────────────

fn handle_folder_key(state: &mut AppState, key: KeyEvent) {
    let rows = visible_rows(state);
    if rows.is_empty() {
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.tree_state.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.tree_state.select_next(rows.len());
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => {
            let row = rows[state.tree_state.selected.min(rows.len() - 1)];
            if row.has_subfolders {
                state.tree_state.expanded.insert(row.node);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let row = rows[state.tree_state.selected.min(rows.len() - 1)];
            if row.expanded {
                state.tree_state.expanded.remove(&row.node);
            } else if let Some(parent) = state.tree.get(row.node).parent() {
                // Collapsed already — jump to the parent row instead.
                if let Some(idx) = rows.iter().position(|r| r.node == parent) {
                    state.tree_state.selected = idx;
                }
            }
        }
        KeyCode::Home => {
            state.tree_state.selected = 0;
            state.tree_state.offset = 0;
        }
        KeyCode::End => {
            state.tree_state.selected = rows.len() - 1;
        }
        _ => return,
    }

    sync_selected_folder(state);
}

/// The folder pane's current flat row list.
pub fn visible_rows(state: &AppState) -> Vec<TreeRow> {
    build_rows(&state.tree, state.start, &state.tree_state.expanded)
}

/// Re-derive the selected folder from the selection index and reset the file
/// pane to match.
fn sync_selected_folder(state: &mut AppState) {
    let rows = visible_rows(state);
    if rows.is_empty() {
        return;
    }
    state.tree_state.selected = state.tree_state.selected.min(rows.len() - 1);
    let folder = rows[state.tree_state.selected].node;
    if folder != state.selected_folder {
        state.selected_folder = folder;
        state.file_state = Default::default();
        let count = state.tree.get(folder).files().len();
        state.status_message = Some(format!("{count} item(s)"));
    }
}

// ── File pane ───────────────────────────────────────────────────

fn handle_file_key(state: &mut AppState, key: KeyEvent) {
    let count = file_list::file_rows(&state.tree, state.selected_folder).len();
    if count == 0 {
        return;
    }
    let current = state.file_state.selected().unwrap_or(0);

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.file_state.select(Some(current.saturating_sub(1)));
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.file_state.select(Some((current + 1).min(count - 1)));
        }
        KeyCode::Home => {
            state.file_state.select(Some(0));
        }
        KeyCode::End => {
            state.file_state.select(Some(count - 1));
        }
        _ => {}
    }
}

fn select_first_file(state: &mut AppState) {
    if !file_list::file_rows(&state.tree, state.selected_folder).is_empty() {
        state.file_state.select(Some(0));
    }
}

// ── Reload ──────────────────────────────────────────────────────

/// Re-read the current listing file from disk, replacing the whole tree.
fn reload(state: &mut AppState) {
    let path = state.listing_path.clone();
    match load_listing(&path, state.forced_format, &mut state.tree) {
        Ok(format) => {
            state.format = format;
            state.rebuild_view();
        }
        Err(err) => {
            warn!(%err, "reload failed");
            // A failed load leaves the tree undefined — present it empty
            // rather than half-built.
            state.tree.reset();
            state.rebuild_view();
            state.status_message = Some(format!("Load failed: {err}"));
        }
    }
    state.focus = PaneFocus::Folders;
}
