//! Producer-side batch queue.
//!
//! Collects files and folders into an ordered, deduplicated list, then
//! expands into per-file upload tasks sharing one template's settings.

use std::io;
use std::path::{Path, PathBuf};

use tgup_protocol::UploadTask;

use crate::scan::enumerate_files;

/// Ordered queue of files to upload in one batch command.
///
/// Entries keep insertion order; adding a path that is already queued is
/// a no-op, so re-adding a folder only appends its new files.
#[derive(Debug, Default)]
pub struct BatchQueue {
    entries: Vec<PathBuf>,
}

impl BatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one file. Returns whether it was newly added.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.entries.contains(&path) {
            return false;
        }
        self.entries.push(path);
        true
    }

    /// Appends every file under `dir` in enumeration order, skipping
    /// paths already queued. Returns how many were newly added.
    pub fn add_folder(&mut self, dir: &Path, recursive: bool) -> io::Result<usize> {
        let mut added = 0;
        for file in enumerate_files(dir, recursive)? {
            if self.add_file(file) {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn remove(&mut self, path: &Path) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p != path);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Expands the queue into per-file tasks carrying the template's chat,
    /// caption and flags, in queue order.
    pub fn to_tasks(&self, template: &UploadTask) -> Vec<UploadTask> {
        self.entries
            .iter()
            .map(|path| template.with_path(path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgup_protocol::ChatTarget;

    #[test]
    fn add_file_deduplicates() {
        let mut queue = BatchQueue::new();
        assert!(queue.add_file("/data/a.bin"));
        assert!(!queue.add_file("/data/a.bin"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn add_folder_keeps_enumeration_order_and_dedupes() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.txt", "two.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let expected = enumerate_files(dir.path(), false).unwrap();

        let mut queue = BatchQueue::new();
        queue.add_file(expected[0].clone());
        let added = queue.add_folder(dir.path(), false).unwrap();

        assert_eq!(added, 1);
        assert_eq!(queue.entries(), expected.as_slice());
    }

    #[test]
    fn to_tasks_carries_template_settings() {
        let mut template = UploadTask::new("/ignored", ChatTarget::Id(7));
        template.caption = "batch".into();
        template.delete_original = true;

        let mut queue = BatchQueue::new();
        queue.add_file("/data/a.bin");
        queue.add_file("/data/b.bin");

        let tasks = queue.to_tasks(&template);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].path, PathBuf::from("/data/a.bin"));
        assert_eq!(tasks[1].path, PathBuf::from("/data/b.bin"));
        assert!(tasks.iter().all(|t| t.caption == "batch" && t.delete_original));
    }

    #[test]
    fn remove_and_clear() {
        let mut queue = BatchQueue::new();
        queue.add_file("/data/a.bin");
        queue.add_file("/data/b.bin");

        assert!(queue.remove(Path::new("/data/a.bin")));
        assert!(!queue.remove(Path::new("/data/a.bin")));
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
    }
}
