//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: address line, folder/file panes, status bar.
pub struct AppLayout {
    pub address_area: Rect,
    pub folder_area: Rect,
    pub file_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // address line
                Constraint::Min(3),    // panes (take all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        // Folder pane : file pane at 1:2.
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
            .split(rows[1]);

        Self {
            address_area: rows[0],
            folder_area: panes[0],
            file_area: panes[1],
            status_area: rows[2],
        }
    }
}
