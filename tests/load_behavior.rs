use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use dump_tree::core::loader::{
    load_file_list, load_unix_file_list, load_windows_file_list, ListingFormat, LoadError,
};
use dump_tree::core::tree::{FolderTree, NodeId, TreeError};

fn write_listing(dir: &TempDir, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join("listing.txt");
    fs::write(&path, contents)?;
    Ok(path)
}

/// Walk `segments` down from the root, panicking on a missing folder.
fn descend(tree: &FolderTree, segments: &[&str]) -> NodeId {
    let mut node = FolderTree::ROOT;
    for segment in segments {
        node = *tree
            .get(node)
            .subfolders()
            .get(*segment)
            .unwrap_or_else(|| panic!("missing folder `{segment}`"));
    }
    node
}

const WINDOWS_DUMP: &str = concat!(
    " Volume in drive C has no label.\r\n",
    " Directory of C:\\data\\docs\r\n",
    "\r\n",
    "12/05/2021  03:15 PM    <DIR>          .\r\n",
    "12/05/2021  03:15 PM    <DIR>          ..\r\n",
    "12/05/2021  03:15 PM    <DIR>          sub\r\n",
    "12/05/2021  03:16 PM             1,024 a.txt\r\n",
    "               1 File(s)          1,024 bytes\r\n",
    "\r\n",
    " Directory of C:\\data\\docs\\sub\r\n",
    "\r\n",
    "12/05/2021  03:17 PM                 9 deep file.log\r\n",
);

const UNIX_DUMP: &str = concat!(
    "./data/docs:\n",
    "total 8\n",
    "drwxr-xr-x 2 user group 4096 2021-05-12 15:15:00.000000000 +0200 sub\n",
    "-rw-r--r-- 1 user group 1024 2021-05-12 15:16:00.000000000 +0200 a.txt\n",
    "\n",
    "./data/docs/sub:\n",
    "-rw-r--r-- 1 user group 9 2021-05-12 15:17:00.000000000 +0200 deep file.log\n",
);

#[test]
fn windows_dump_builds_the_expected_tree() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(&dir, WINDOWS_DUMP)?;

    let mut tree = FolderTree::new();
    let format = load_file_list(&path, &mut tree)?;
    assert_eq!(format, ListingFormat::Windows);

    let docs = descend(&tree, &["C:", "data", "docs"]);
    let node = tree.get(docs);
    assert_eq!(node.subfolders().len(), 1);
    assert!(node.subfolders().contains_key("sub"));

    let info = &node.files()["a.txt"];
    assert_eq!(info.size, 1024);
    assert_eq!(
        info.modified,
        NaiveDate::from_ymd_opt(2021, 5, 12).and_then(|d| d.and_hms_opt(15, 16, 0))
    );

    let sub = descend(&tree, &["C:", "data", "docs", "sub"]);
    assert!(tree.get(sub).files().contains_key("deep file.log"));
    assert_eq!(tree.path(sub), "C:/data/docs/sub");
    Ok(())
}

#[test]
fn unix_dump_builds_the_equivalent_tree() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(&dir, UNIX_DUMP)?;

    let mut tree = FolderTree::new();
    let format = load_file_list(&path, &mut tree)?;
    assert_eq!(format, ListingFormat::Unix);

    let docs = descend(&tree, &[".", "data", "docs"]);
    let node = tree.get(docs);
    assert!(node.subfolders().contains_key("sub"));
    assert_eq!(node.files()["a.txt"].size, 1024);
    assert_eq!(
        node.files()["a.txt"].modified,
        NaiveDate::from_ymd_opt(2021, 5, 12).and_then(|d| d.and_hms_opt(15, 16, 0))
    );

    let sub = descend(&tree, &[".", "data", "docs", "sub"]);
    assert!(tree.get(sub).files().contains_key("deep file.log"));
    Ok(())
}

#[test]
fn detection_looks_only_at_the_first_line() -> Result<()> {
    let dir = TempDir::new()?;

    // A lone `.:`-shaped first line routes to the Unix parser even though
    // nothing follows.
    let path = write_listing(&dir, ".:\n")?;
    let mut tree = FolderTree::new();
    assert_eq!(load_file_list(&path, &mut tree)?, ListingFormat::Unix);
    assert!(tree.get(FolderTree::ROOT).subfolders().contains_key("."));

    // Any other first line routes to the Windows parser, which shrugs off
    // headerless prose with an empty tree.
    let path = write_listing(&dir, "no headers anywhere\njust text\n")?;
    let mut tree = FolderTree::new();
    assert_eq!(load_file_list(&path, &mut tree)?, ListingFormat::Windows);
    assert_eq!(tree.folder_count(), 0);
    assert_eq!(tree.file_count(), 0);
    Ok(())
}

#[test]
fn too_short_first_line_fails_the_load() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(&dir, ".\n")?;

    let mut tree = FolderTree::new();
    let err = load_file_list(&path, &mut tree).unwrap_err();
    assert!(matches!(err, LoadError::UnknownFormat));
    Ok(())
}

#[test]
fn unopenable_input_reports_the_path() {
    let mut tree = FolderTree::new();
    let err = load_file_list(std::path::Path::new("/no/such/listing.txt"), &mut tree).unwrap_err();
    assert!(matches!(err, LoadError::Open { .. }));
}

#[test]
fn loading_twice_equals_loading_once() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(&dir, WINDOWS_DUMP)?;

    let mut twice = FolderTree::new();
    load_file_list(&path, &mut twice)?;
    load_file_list(&path, &mut twice)?;

    let mut once = FolderTree::new();
    load_file_list(&path, &mut once)?;

    assert_eq!(twice, once);
    Ok(())
}

#[test]
fn forced_format_loaders_skip_detection() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(&dir, UNIX_DUMP)?;

    let mut tree = FolderTree::new();
    load_unix_file_list(&path, &mut tree)?;
    assert_eq!(tree.file_count(), 2);

    // The same bytes through the Windows parser find no `Directory of `
    // headers and produce an empty tree — without erroring.
    load_windows_file_list(&path, &mut tree)?;
    assert_eq!(tree.folder_count(), 0);
    assert_eq!(tree.file_count(), 0);
    Ok(())
}

#[test]
fn malformed_size_aborts_the_whole_load() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(
        &dir,
        concat!(
            " Directory of C:\\data\r\n",
            "12/05/2021  03:16 PM        not-a-size a.txt\r\n",
        ),
    )?;

    let mut tree = FolderTree::new();
    let err = load_file_list(&path, &mut tree).unwrap_err();
    assert!(matches!(err, LoadError::InvalidSize { .. }));
    Ok(())
}

#[test]
fn folder_file_name_collision_aborts_the_load() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_listing(
        &dir,
        concat!(
            " Directory of C:\\data\r\n",
            "12/05/2021  03:16 PM                 1 x\r\n",
            "12/05/2021  03:16 PM    <DIR>          x\r\n",
        ),
    )?;

    let mut tree = FolderTree::new();
    let err = load_file_list(&path, &mut tree).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Tree(TreeError::NameTakenByFile(ref name)) if name == "x"
    ));
    Ok(())
}
