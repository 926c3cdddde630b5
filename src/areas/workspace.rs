//! Working tree file operations
//!
//! The workspace is the user-editable directory the repository lives in.
//! The tracked namespace is flat: every tracked file is a direct child of
//! the repository root, addressed by its file name. The repository state
//! directory (`.jot`) is always ignored.

use anyhow::Context;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
    /// Name of the repository state directory to skip when listing
    ignored_dir: String,
}

impl Workspace {
    pub fn new(path: Box<Path>, ignored_dir: String) -> Self {
        Workspace { path, ignored_dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.path.join(name).is_file()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<String> {
        let file_path = self.path.join(name);

        std::fs::read_to_string(&file_path)
            .with_context(|| format!("Unable to read working file {}", file_path.display()))
    }

    pub fn write_file(&self, name: &str, content: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        std::fs::write(&file_path, content)
            .with_context(|| format!("Unable to write working file {}", file_path.display()))
    }

    /// Delete a working file. Deleting a file that is already gone is a
    /// no-op, so callers can converge on a target state unconditionally.
    pub fn delete_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.path.join(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path).with_context(|| {
                format!("Unable to delete working file {}", file_path.display())
            })?;
        }

        Ok(())
    }

    /// Every file name in the working tree, sorted. Only direct children
    /// count; the state directory and subdirectories are skipped.
    pub fn list_file_names(&self) -> anyhow::Result<Vec<String>> {
        let mut names = WalkDir::new(self.path.as_ref())
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| self.check_if_not_ignored(entry.path()))
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    fn check_if_not_ignored(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;
        let name = relative.to_string_lossy().to_string();

        if name == self.ignored_dir {
            None
        } else {
            Some(name)
        }
    }
}
