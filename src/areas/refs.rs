//! Branch references and HEAD
//!
//! Branches are mutable pointers into the commit graph, stored one file
//! per branch under `refs/heads/<name>`, each holding the 40-hex id of the
//! branch head. `HEAD` is a symbolic reference naming the current branch:
//! `ref: refs/heads/<name>`.
//!
//! Ref files are read and written wholesale, under an advisory file lock
//! for the duration of the write.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing the symbolic HEAD reference
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// Branch reference manager rooted at the repository state directory.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the state directory (`.jot`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    /// The branch HEAD currently names.
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let content = std::fs::read_to_string(self.head_path())
            .context("Unable to read the HEAD reference")?;
        let content = content.trim();

        let captures = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("Malformed HEAD reference: {content}"))?;

        BranchName::try_parse(captures[1].to_string())
    }

    /// Point HEAD at a branch.
    pub fn set_current_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(self.head_path(), format!("ref: refs/heads/{name}"))
    }

    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.heads_path().join(name.as_ref()).is_file()
    }

    /// The head commit id a branch points at.
    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.heads_path().join(name.as_ref());

        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("Unable to read branch file for {name}"))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    /// Create a new branch pointing at the given commit. The caller checks
    /// for duplicates first; an existing branch file is still refused here.
    pub fn create_branch(&self, name: &BranchName, head_id: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();

        if branch_path.exists() {
            anyhow::bail!("branch {name} already exists");
        }

        self.update_ref_file(branch_path, head_id.to_string())
    }

    /// Move an existing branch head to a new commit.
    pub fn update_branch(&self, name: &BranchName, head_id: &ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();

        self.update_ref_file(branch_path, head_id.to_string())
    }

    /// Delete a branch pointer. Commits stay in the object store.
    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref());

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {branch_path:?}"))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(())
    }

    /// Every branch name, sorted.
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(heads_path.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(heads_path.as_ref()).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!("failed to create parent directories for ref file at {path:?}")
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {path:?}"))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {parent:?}")
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
