//! Block parser for Unix `ls -lR` transcripts.
//!
//! A dump is a flat repetition of blocks:
//!
//! ```text
//! ./data/docs:
//! total 8
//! drwxr-xr-x 2 user group 4096 2021-05-12 15:15:00.000000000 +0200 sub
//! -rw-r--r-- 1 user group 1024 2021-05-12 15:16:00.000000000 +0200 a.txt
//! ```
//!
//! A header starts with `.` and ends with `:`; a blank line closes the block
//! and is consumed (unlike the Windows parser, which re-examines its
//! terminator).  Lines opening with anything but `d` or `-` — `total`
//! summaries, symlinks, sockets — are skipped.

use chrono::NaiveDateTime;

use super::fields::split_fields;
use super::loader::LoadError;
use super::tree::{FileInfo, FolderTree, NodeId};

/// Advance the parser by one raw input line.
pub(crate) fn process_line(
    tree: &mut FolderTree,
    current: &mut Option<NodeId>,
    line_no: u64,
    line: &str,
) -> Result<(), LoadError> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let Some(folder) = *current else {
        if line.len() < 2 || !line.starts_with('.') || !line.ends_with(':') {
            return Ok(());
        }
        let path = &line[..line.len() - 1];
        let mut node = FolderTree::ROOT;
        for segment in path.split('/') {
            node = tree.subfolder(node, segment, true)?;
        }
        *current = Some(node);
        return Ok(());
    };

    if line.is_empty() {
        *current = None;
        return Ok(());
    }
    if !line.starts_with('d') && !line.starts_with('-') {
        return Ok(());
    }
    process_entry(tree, folder, line_no, line)
}

/// Decode one entry line.
///
/// `--time-style=full-iso` output has nine columns (the timezone is its
/// own field); listings captured without the timezone column have eight.
/// Size, date and time sit at indices 4, 5 and 6 either way, and the name is
/// always the final field — raw, so embedded spaces and symlink
/// `-> target` text survive.
fn process_entry(
    tree: &mut FolderTree,
    folder: NodeId,
    line_no: u64,
    line: &str,
) -> Result<(), LoadError> {
    let fields = split_fields(line, 9)
        .or_else(|_| split_fields(line, 8))
        .map_err(|source| LoadError::Entry { line: line_no, source })?;
    let name = fields[fields.len() - 1];

    if fields[0].starts_with('d') {
        tree.add_subfolder(folder, name)?;
        return Ok(());
    }

    let info = FileInfo {
        modified: parse_timestamp(fields[5], fields[6]),
        size: fields[4].parse().map_err(|source| LoadError::InvalidSize {
            line: line_no,
            text: fields[4].to_owned(),
            source,
        })?,
    };
    tree.add_file(folder, name, info)?;
    Ok(())
}

/// `2021-05-12` + the first 8 characters of `15:16:00.000000000` →
/// 2021-05-12 15:16:00.  Unparseable text degrades to `None`.
fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    let time = time.get(..8).unwrap_or(time);
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").ok()
}
