//! Folder enumeration for folder and batch uploads.

use std::io;
use std::path::{Path, PathBuf};

/// Lists the files under `dir`, descending into subdirectories when
/// `recursive` is set.
///
/// Files come back in the order the filesystem yields them from
/// `read_dir`. That order is the upload order, so no sort is applied
/// here and none may be added: callers rely on enumeration order being
/// whatever the directory listing produces.
pub fn enumerate_files(dir: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(dir, recursive, &mut files)?;
    Ok(files)
}

fn collect(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            if recursive {
                collect(&path, recursive, files)?;
            }
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"b").unwrap();

        let files = enumerate_files(dir.path(), false).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);
    }

    #[test]
    fn recursive_descends_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.txt"), b"b").unwrap();

        let files = enumerate_files(dir.path(), true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&dir.path().join("a.txt")));
        assert!(files.contains(&dir.path().join("sub/b.txt")));
    }

    #[test]
    fn order_matches_directory_listing() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }

        // Whatever read_dir yields is the contract; repeated calls on an
        // unchanged directory must agree with it.
        let listing: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        let files = enumerate_files(dir.path(), false).unwrap();
        assert_eq!(files, listing);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        assert!(enumerate_files(&gone, false).is_err());
    }
}
