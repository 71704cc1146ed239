//! File pane — a table of the selected folder's files.
//!
//! Columns mirror a file manager's detail view: name, type (extension),
//! size, modification time.  The underlying map is unordered, so rows are
//! sorted by name here for a stable display.

use std::path::Path;

use ratatui::{
    layout::Constraint,
    widgets::{Block, Row, Table},
};

use dump_tree::core::tree::{FolderTree, NodeId};

use super::theme::Theme;

/// One row of the file table, pre-formatted for display.
#[derive(Debug)]
pub struct FileRow {
    pub name: String,
    pub kind: String,
    pub size: String,
    pub modified: String,
}

/// Collect and format the files of `folder`, sorted by name.
pub fn file_rows(tree: &FolderTree, folder: NodeId) -> Vec<FileRow> {
    let files = tree.get(folder).files();
    let mut names: Vec<&String> = files.keys().collect();
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let info = &files[name];
            FileRow {
                name: name.clone(),
                kind: Path::new(name)
                    .extension()
                    .map(|ext| ext.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                size: human_size(info.size),
                modified: info
                    .modified
                    .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "—".into()),
            }
        })
        .collect()
}

/// Build the table widget over pre-computed rows.
pub fn file_table<'a>(rows: &'a [FileRow], block: Block<'a>) -> Table<'a> {
    let table_rows = rows.iter().map(|row| {
        Row::new(vec![
            row.name.clone(),
            row.kind.clone(),
            row.size.clone(),
            row.modified.clone(),
        ])
        .style(Theme::file_style())
    });

    let widths = [
        Constraint::Min(20),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(16),
    ];

    Table::new(table_rows, widths)
        .header(Row::new(vec!["Name", "Type", "Size", "Modified"]).style(Theme::table_header_style()))
        .row_highlight_style(Theme::selected_style())
        .block(block)
        .column_spacing(1)
}

/// `1536` → `"1.5 KiB"`.
pub fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = bytes as f64;
    for &unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PiB")
}
