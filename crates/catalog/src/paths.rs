//! Layout of the data directory.
//!
//! The file names are fixed so an existing `data/` folder exported by the
//! game data scraper can be pointed at directly.

use std::path::{Path, PathBuf};

/// Series ids whose marks are limited to one per creature
pub const DEFAULT_RESTRICTED_CLASSES: [&str; 12] = [
    "57", "61", "65", "66", "67", "74", "75", "78", "80", "83", "84", "85",
];

/// Every file the search reads or writes, rooted at one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub root: PathBuf,
    /// Parsed mark catalog
    pub catalog: PathBuf,
    /// Enumerator output, regenerated on every run
    pub snapshot: PathBuf,
    /// Append-only log of validated rows
    pub result_log: PathBuf,
    /// Restricted series ids, one per line
    pub restricted_classes: PathBuf,
    /// Ids of marks limited to one per combination
    pub exclusivity_ids: PathBuf,
    /// Ids of marks the player does not own
    pub missing_ids: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            catalog: root.join("mintmark_data.csv"),
            snapshot: root.join("combinations_data.csv"),
            result_log: root.join("process.csv"),
            restricted_classes: root.join("only1_mintmark_class.txt"),
            exclusivity_ids: root.join("only1_mintmark_ids.txt"),
            missing_ids: root.join("missing_mintmark_ids.txt"),
            root,
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_root() {
        let paths = DataPaths::new("/tmp/marks");
        assert_eq!(paths.catalog, Path::new("/tmp/marks/mintmark_data.csv"));
        assert_eq!(paths.result_log, Path::new("/tmp/marks/process.csv"));
        assert!(paths.snapshot.starts_with(&paths.root));
    }
}
