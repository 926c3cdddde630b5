//! Status report assembly
//!
//! Gathers the five status sections: branches, staged files, removed
//! files, modifications not staged for commit, and untracked files. The
//! current branch is listed first with a `*` prefix; every other section
//! is in name order.

use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub branches: Vec<String>,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
}

impl StatusReport {
    pub fn gather(repository: &Repository) -> anyhow::Result<StatusReport> {
        let current_branch = repository.refs().current_branch()?;
        let head = repository.head_commit()?;

        let mut stage = repository.lock_stage()?;
        stage.rehydrate()?;
        let working_files = repository.workspace().list_file_names()?;

        let mut branches = vec![format!("*{current_branch}")];
        branches.extend(
            repository
                .refs()
                .list_branches()?
                .into_iter()
                .filter(|branch| branch != &current_branch)
                .map(|branch| branch.to_string()),
        );

        let staged = stage.additions().keys().cloned().collect();
        let removed = stage.removals().iter().cloned().collect();

        // names whose next-commit version is known: staged blob wins over
        // the committed one; names staged for removal drop out entirely
        let mut expected = Vec::<(String, ObjectId)>::new();
        let candidates: BTreeSet<&String> =
            head.snapshot().keys().chain(stage.additions().keys()).collect();
        for name in candidates {
            if stage.is_staged_for_removal(name) {
                continue;
            }
            let blob_id = stage.staged_blob(name).or_else(|| head.blob_id(name));
            if let Some(blob_id) = blob_id {
                expected.push((name.clone(), blob_id.clone()));
            }
        }

        let mut modified = Vec::new();
        for (name, blob_id) in &expected {
            if repository.workspace().file_exists(name) {
                let content = repository.workspace().read_file(name)?;
                let working_blob_id = Blob::new(content).object_id()?;
                if &working_blob_id != blob_id {
                    modified.push(format!("{name} (modified)"));
                }
            } else {
                modified.push(format!("{name} (deleted)"));
            }
        }

        let untracked = working_files
            .into_iter()
            .filter(|name| !head.tracks(name) && !stage.is_staged_for_addition(name))
            .collect();

        Ok(StatusReport {
            branches,
            staged,
            removed,
            modified,
            untracked,
        })
    }

    /// The full report: `=== <Title> ===` per section, entries one per
    /// line, a blank line after each section.
    pub fn render(&self) -> String {
        let sections: [(&str, &[String]); 5] = [
            ("Branches", &self.branches),
            ("Staged Files", &self.staged),
            ("Removed Files", &self.removed),
            ("Modifications Not Staged For Commit", &self.modified),
            ("Untracked Files", &self.untracked),
        ];

        let mut output = String::new();
        for (title, entries) in sections {
            output.push_str(&format!("=== {title} ===\n"));
            for entry in entries {
                output.push_str(entry);
                output.push('\n');
            }
            output.push('\n');
        }

        output
    }
}
