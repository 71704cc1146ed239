//! Format detection and the line-streaming load loop.
//!
//! A listing dump is classified by its very first line: Unix `ls -lR`
//! transcripts open with a `.:` header, everything else is assumed to be a
//! Windows `dir /s` transcript.  The chosen block parser is then fed the
//! whole file, line by line, against a freshly reset tree.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::fields::FieldCountError;
use super::tree::{FolderTree, NodeId, TreeError};
use super::{unix, windows};

// ───────────────────────────────────────── errors ────────────

/// Fatal load failures.  Timestamp problems are deliberately absent — they
/// degrade to `modified: None` instead of aborting.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open file list `{path}`")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("i/o error while reading the file list")]
    Read(#[from] io::Error),
    #[error("first line is too short to classify the listing format")]
    UnknownFormat,
    #[error("line {line}: {source}")]
    Entry {
        line: u64,
        #[source]
        source: FieldCountError,
    },
    #[error("line {line}: invalid file size `{text}`")]
    InvalidSize {
        line: u64,
        text: String,
        #[source]
        source: ParseIntError,
    },
    #[error(transparent)]
    Tree(#[from] TreeError),
}

// ───────────────────────────────────────── format tag ────────

/// Which of the two supported dump formats a file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// `dir /s` transcript: `Directory of C:\...` headers.
    Windows,
    /// `ls -lR` transcript: `./path:` headers, blank-line block ends.
    Unix,
}

impl ListingFormat {
    /// Classify a dump by its first line.
    ///
    /// Exactly two characters decide: a leading `.` followed by `:` means
    /// Unix, anything else Windows.  The rest of the file plays no part.
    pub fn detect(first_line: &str) -> Result<Self, LoadError> {
        let bytes = first_line.as_bytes();
        if bytes.len() < 2 {
            return Err(LoadError::UnknownFormat);
        }
        if bytes[0] == b'.' && bytes[1] == b':' {
            Ok(Self::Unix)
        } else {
            Ok(Self::Windows)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Unix => "Unix",
        }
    }
}

// ───────────────────────────────────────── block parser ──────

/// One block parser, two line strategies.
///
/// Both formats share the same two-state shape — "awaiting a header" vs.
/// "inside a block attached to `current`" — and differ only in how a single
/// line is interpreted.  The format tag selects the strategy; all tree
/// mutation goes through the shared state here.
pub(crate) struct BlockParser {
    format: ListingFormat,
    /// Folder the current block's entries attach to; `None` while a header
    /// line is awaited.
    current: Option<NodeId>,
}

impl BlockParser {
    pub(crate) fn new(format: ListingFormat) -> Self {
        Self {
            format,
            current: None,
        }
    }

    pub(crate) fn feed(
        &mut self,
        tree: &mut FolderTree,
        line_no: u64,
        line: &str,
    ) -> Result<(), LoadError> {
        match self.format {
            ListingFormat::Windows => windows::process_line(tree, &mut self.current, line_no, line),
            ListingFormat::Unix => unix::process_line(tree, &mut self.current, line_no, line),
        }
    }
}

// ───────────────────────────────────────── loaders ───────────

/// Load a listing dump of either format into `tree`, auto-detecting the
/// format from the first line.  Returns the detected format.
///
/// On failure the tree's contents are undefined (the reset has already
/// happened); callers should not present them.
pub fn load_file_list(path: &Path, tree: &mut FolderTree) -> Result<ListingFormat, LoadError> {
    let mut reader = open(path)?;
    let mut first = String::new();
    reader.read_line(&mut first)?;
    let first = first.strip_suffix('\n').unwrap_or(&first);

    let format = ListingFormat::detect(first)?;
    debug!(?format, ?path, "detected listing format");
    drop(reader);

    // The format loaders re-read from the top: a Unix dump's first line is
    // itself the first header and must reach the block parser.
    match format {
        ListingFormat::Windows => load_windows_file_list(path, tree)?,
        ListingFormat::Unix => load_unix_file_list(path, tree)?,
    }
    Ok(format)
}

/// Load a dump already known to be in the Windows format.
pub fn load_windows_file_list(path: &Path, tree: &mut FolderTree) -> Result<(), LoadError> {
    run(open(path)?, tree, ListingFormat::Windows)
}

/// Load a dump already known to be in the Unix format.
pub fn load_unix_file_list(path: &Path, tree: &mut FolderTree) -> Result<(), LoadError> {
    run(open(path)?, tree, ListingFormat::Unix)
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_owned(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reset `tree` and stream every line of `reader` through a [`BlockParser`].
///
/// Lines are cut at `\n` only; a trailing `\r` is left for the per-format
/// strategies, which strip it where their format allows one.
pub(crate) fn run<R: BufRead>(
    mut reader: R,
    tree: &mut FolderTree,
    format: ListingFormat,
) -> Result<(), LoadError> {
    tree.reset();
    let mut parser = BlockParser::new(format);

    let mut buf = String::new();
    let mut line_no = 0u64;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.strip_suffix('\n').unwrap_or(&buf);
        parser.feed(tree, line_no, line)?;
    }

    debug!(
        folders = tree.folder_count(),
        files = tree.file_count(),
        "file list loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_colon_prefix_means_unix() {
        assert_eq!(ListingFormat::detect(".:").unwrap(), ListingFormat::Unix);
        assert_eq!(
            ListingFormat::detect(".:\r").unwrap(),
            ListingFormat::Unix
        );
    }

    #[test]
    fn anything_else_means_windows() {
        for line in [" Volume in drive C has no label.", "..", "x:", "Directory of C:\\"] {
            assert_eq!(
                ListingFormat::detect(line).unwrap(),
                ListingFormat::Windows,
                "misclassified {line:?}"
            );
        }
    }

    #[test]
    fn short_first_line_cannot_be_classified() {
        assert!(matches!(
            ListingFormat::detect("."),
            Err(LoadError::UnknownFormat)
        ));
        assert!(matches!(
            ListingFormat::detect(""),
            Err(LoadError::UnknownFormat)
        ));
    }

    #[test]
    fn run_resets_the_tree_before_parsing() {
        let mut tree = FolderTree::new();
        tree.add_subfolder(FolderTree::ROOT, "stale").unwrap();

        let input = ".:\ndrwxr-xr-x 2 u g 4096 2021-05-12 15:15:00 fresh\n";
        run(input.as_bytes(), &mut tree, ListingFormat::Unix).unwrap();

        let root = tree.get(FolderTree::ROOT);
        assert!(!root.subfolders().contains_key("stale"));
        // `.` is an ordinary segment; `fresh` hangs beneath it.
        let dot = root.subfolders()["."];
        assert!(tree.get(dot).subfolders().contains_key("fresh"));
    }
}
