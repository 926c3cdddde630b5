//! Snapshot-to-snapshot migration
//!
//! Moves the working tree from the current snapshot to a target snapshot:
//! files tracked only by the current snapshot are deleted, every file in
//! the target snapshot is written out. Before anything is touched, the
//! untracked-overwrite guard rejects the whole operation if it would
//! destroy a working file the current snapshot does not track.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

type Snapshot = BTreeMap<String, ObjectId>;

pub struct Migration<'r> {
    workspace: &'r Workspace,
    database: &'r Database,
}

impl<'r> Migration<'r> {
    pub fn new(workspace: &'r Workspace, database: &'r Database) -> Self {
        Migration {
            workspace,
            database,
        }
    }

    /// Refuse to proceed when a working file would be overwritten that the
    /// current snapshot does not track. Performs no mutation.
    pub fn guard_untracked(&self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        for name in target.keys() {
            if !current.contains_key(name) && self.workspace.file_exists(name) {
                anyhow::bail!(JotError::UntrackedFileInTheWay);
            }
        }

        Ok(())
    }

    /// Replace the tracked contents of the working tree with the target
    /// snapshot. Deletions run first so a rename-like transition never
    /// leaves both names behind.
    pub fn apply(&self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        for name in current.keys() {
            if !target.contains_key(name) {
                self.workspace.delete_file(name)?;
            }
        }

        for (name, blob_id) in target {
            let blob = self.database.load_blob(blob_id)?;
            self.workspace.write_file(name, blob.content())?;
        }

        Ok(())
    }

    /// Guarded transition: the untracked check, then the migration.
    pub fn checkout(&self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        self.guard_untracked(current, target)?;
        self.apply(current, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;

    struct Fixture {
        _dir: tempfile::TempDir,
        workspace: Workspace,
        database: Database,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::new(dir.path().join(".jot").join("objects").into_boxed_path());
        std::fs::create_dir_all(database.objects_path()).unwrap();
        let workspace = Workspace::new(
            dir.path().to_path_buf().into_boxed_path(),
            String::from(".jot"),
        );
        Fixture {
            _dir: dir,
            workspace,
            database,
        }
    }

    fn snapshot_with(fx: &Fixture, entries: &[(&str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(name, content)| {
                let oid = fx.database.store(&Blob::new(content.to_string())).unwrap();
                (name.to_string(), oid)
            })
            .collect()
    }

    #[test]
    fn checkout_writes_target_files_and_deletes_stale_ones() {
        let fx = fixture();
        let current = snapshot_with(&fx, &[("stale.txt", "old"), ("both.txt", "v1")]);
        let target = snapshot_with(&fx, &[("both.txt", "v2"), ("fresh.txt", "new")]);
        fx.workspace.write_file("stale.txt", "old").unwrap();
        fx.workspace.write_file("both.txt", "v1").unwrap();

        Migration::new(&fx.workspace, &fx.database)
            .checkout(&current, &target)
            .unwrap();

        assert!(!fx.workspace.file_exists("stale.txt"));
        pretty_assertions::assert_eq!(fx.workspace.read_file("both.txt").unwrap(), "v2");
        pretty_assertions::assert_eq!(fx.workspace.read_file("fresh.txt").unwrap(), "new");
    }

    #[test]
    fn an_untracked_file_in_the_way_aborts_before_any_mutation() {
        let fx = fixture();
        let current = snapshot_with(&fx, &[("tracked.txt", "v1")]);
        let target = snapshot_with(&fx, &[("tracked.txt", "v2"), ("loose.txt", "incoming")]);
        fx.workspace.write_file("tracked.txt", "v1").unwrap();
        fx.workspace.write_file("loose.txt", "precious").unwrap();

        let error = Migration::new(&fx.workspace, &fx.database)
            .checkout(&current, &target)
            .unwrap_err();

        assert_eq!(
            error.downcast_ref::<JotError>(),
            Some(&JotError::UntrackedFileInTheWay)
        );
        // nothing moved
        pretty_assertions::assert_eq!(fx.workspace.read_file("tracked.txt").unwrap(), "v1");
        pretty_assertions::assert_eq!(fx.workspace.read_file("loose.txt").unwrap(), "precious");
    }

    #[test]
    fn tracked_working_files_may_be_overwritten_freely() {
        let fx = fixture();
        let current = snapshot_with(&fx, &[("a.txt", "v1")]);
        let target = snapshot_with(&fx, &[("a.txt", "v2")]);
        // dirty working copy of a tracked file loses to the target
        fx.workspace.write_file("a.txt", "dirty edit").unwrap();

        Migration::new(&fx.workspace, &fx.database)
            .checkout(&current, &target)
            .unwrap();

        pretty_assertions::assert_eq!(fx.workspace.read_file("a.txt").unwrap(), "v2");
    }
}
