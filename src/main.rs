//! A TUI for browsing recursive directory-listing dumps.
//!
//! Point the binary at a transcript of `dir /s` or `ls -lR` and it rebuilds
//! the folder tree in memory: folders on the left, the selected folder's
//! files on the right.  Run with no argument to reopen the last listing.

mod app;
mod config;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use dump_tree::core::loader::ListingFormat;
use dump_tree::core::tree::FolderTree;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{load_listing, AppState, PaneFocus},
};
use crate::config::AppConfig;
use crate::ui::{file_list, layout::AppLayout, theme::Theme, tree_widget::FolderTreeWidget};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Browse `dir /s` / `ls -lR` listing dumps as a tree")]
struct Cli {
    /// Listing file to open (defaults to the one from the previous run).
    path: Option<PathBuf>,

    /// Listing format; skips auto-detection.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Windows,
    Unix,
}

impl From<FormatArg> for ListingFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Windows => ListingFormat::Windows,
            FormatArg::Unix => ListingFormat::Unix,
        }
    }
}

// ───────────────────────────────────────── main ──────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute the TUI
        .init();

    let cli = Cli::parse();
    let mut user_config = AppConfig::load();

    let path = cli
        .path
        .or_else(|| user_config.last_file.clone())
        .context("no listing file given and none remembered from a previous run")?;

    // ── build the tree before touching the terminal ───────────
    let forced = cli.format.map(ListingFormat::from);
    let mut tree = FolderTree::new();
    let format = load_listing(&path, forced, &mut tree)
        .with_context(|| format!("failed to load file list `{}`", path.display()))?;

    user_config.last_file = Some(path.clone());
    if let Err(err) = user_config.save() {
        tracing::warn!(%err, "could not persist config");
    }

    let mut state = AppState::new(path, tree, format, forced);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    // ── event loop ────────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| draw(frame, &mut state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(key) => handler::handle_key(&mut state, key),
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => {}
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

// ───────────────────────────────────────── rendering ─────────

fn draw(frame: &mut ratatui::Frame<'_>, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    // Address line — the selected folder's path, rebuilt from parent links.
    let address = Paragraph::new(format!(" {}", state.tree.path(state.selected_folder)))
        .style(Theme::address_style());
    frame.render_widget(address, layout.address_area);

    let pane_border = |focused: bool| {
        if focused {
            Theme::focused_border_style()
        } else {
            Theme::border_style()
        }
    };

    // Folder pane.
    let folder_block = Block::default()
        .title(format!(" {} ", state.listing_path.display()))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(pane_border(state.focus == PaneFocus::Folders));
    let folder_widget = FolderTreeWidget::new(&state.tree, state.start).block(folder_block);
    frame.render_stateful_widget(folder_widget, layout.folder_area, &mut state.tree_state);

    // File pane.
    let rows = file_list::file_rows(&state.tree, state.selected_folder);
    let file_block = Block::default()
        .title(format!(" Files ({}) ", rows.len()))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(pane_border(state.focus == PaneFocus::Files));
    let table = file_list::file_table(&rows, file_block);
    frame.render_stateful_widget(table, layout.file_area, &mut state.file_state);

    // Status bar.
    const HINT: &str = "q: quit | Tab: switch pane | ↑/↓: navigate | →/←: expand/collapse | r: reload";
    let status_text = state.status_message.as_deref().unwrap_or(HINT);
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}
