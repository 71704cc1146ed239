//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! This layer takes the *core* tree and turns it into pixels on the
//! terminal.  It only ever reads the tree; all mutation happens in the
//! parsing core.

pub mod file_list;
pub mod layout;
pub mod theme;
pub mod tree_widget;
