//! Rebuilds a browsable folder tree from recursive directory-listing dumps.
//!
//! The library half of the crate is the parsing core: feed
//! [`core::loader::load_file_list`] a transcript of `dir /s` or `ls -lR`
//! and it fills a [`core::tree::FolderTree`].  The binary adds a terminal
//! UI on top.

pub mod core;
