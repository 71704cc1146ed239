//! Block parser for Windows `dir /s` transcripts.
//!
//! A dump is a flat repetition of blocks:
//!
//! ```text
//!  Directory of C:\data\docs
//!
//! 12/05/2021  03:15 PM    <DIR>          sub
//! 12/05/2021  03:16 PM             1,024 a.txt
//!                1 File(s)          1,024 bytes
//! ```
//!
//! Entry lines start with a date digit; any other line of two or more
//! characters ends the block.  The terminating line is *not* discarded — it
//! is immediately re-examined as a possible header, so back-to-back blocks
//! parse without a separator line.

use chrono::NaiveDateTime;

use super::fields::split_fields;
use super::loader::LoadError;
use super::tree::{FileInfo, FolderTree, NodeId};

/// Marker introducing a header line, anywhere in the line.
const HEADER_MARKER: &str = "Directory of ";

/// Size-column literal marking a subfolder entry.
const DIR_MARKER: &str = "<DIR>";

/// Advance the parser by one raw input line.
pub(crate) fn process_line(
    tree: &mut FolderTree,
    current: &mut Option<NodeId>,
    line_no: u64,
    line: &str,
) -> Result<(), LoadError> {
    if line.len() < 2 {
        return Ok(());
    }
    let line = line.strip_suffix('\r').unwrap_or(line);

    if let Some(folder) = *current {
        if line.as_bytes()[0].is_ascii_digit() {
            return process_entry(tree, folder, line_no, line);
        }
        // Block over; the same line may already announce the next one.
        *current = None;
    }

    if let Some(at) = line.find(HEADER_MARKER) {
        let path = &line[at + HEADER_MARKER.len()..];
        let mut node = FolderTree::ROOT;
        for segment in path.split('\\') {
            node = tree.subfolder(node, segment, true)?;
        }
        *current = Some(node);
    }
    Ok(())
}

/// Decode one 5-field entry line: date, time, AM/PM, size-or-`<DIR>`, name.
fn process_entry(
    tree: &mut FolderTree,
    folder: NodeId,
    line_no: u64,
    line: &str,
) -> Result<(), LoadError> {
    let fields = split_fields(line, 5)
        .map_err(|source| LoadError::Entry { line: line_no, source })?;
    let name = fields[4];

    if fields[3] == DIR_MARKER {
        // `dir` lists the self and parent pseudo-entries in every block.
        if name == "." || name == ".." {
            return Ok(());
        }
        tree.add_subfolder(folder, name)?;
        return Ok(());
    }

    let info = FileInfo {
        modified: parse_timestamp(fields[0], fields[1], fields[2]),
        size: parse_size(fields[3], line_no)?,
    };
    tree.add_file(folder, name, info)?;
    Ok(())
}

/// `12/05/2021` + `03:16` + `PM` → 2021-05-12 15:16.  Unparseable text
/// degrades to `None`; the entry still counts.
fn parse_timestamp(date: &str, time: &str, meridiem: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{date} {time} {meridiem}"), "%d/%m/%Y %I:%M %p").ok()
}

/// Parse a size column with optional thousands separators (`1,024`).
fn parse_size(text: &str, line_no: u64) -> Result<u64, LoadError> {
    text.replace(',', "")
        .parse()
        .map_err(|source| LoadError::InvalidSize {
            line: line_no,
            text: text.to_owned(),
            source,
        })
}
