//! Repository orchestrator
//!
//! Composes the object database, staging area, branch references, and
//! workspace into one value the commands operate on. All user-visible
//! output goes through the injected writer so tests can capture it.

use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::areas::stage::Stage;
use crate::areas::workspace::Workspace;
use crate::artifacts::errors::JotError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::Config;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct Repository {
    path: Box<Path>,
    config: Config,
    writer: RefCell<Box<dyn std::io::Write>>,
    stage: Arc<Mutex<Stage>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(
        path: &str,
        config: Config,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let state_path = path.join(&config.dir_name);

        let stage = Stage::new(state_path.join("stage").into_boxed_path());
        let database = Database::new(state_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path(), config.dir_name.clone());
        let refs = Refs::new(state_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            config,
            writer: RefCell::new(writer),
            stage: Arc::new(Mutex::new(stage)),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The state directory (`.jot`) everything persisted lives under.
    pub fn state_path(&self) -> PathBuf {
        self.path.join(&self.config.dir_name)
    }

    pub fn is_initialized(&self) -> bool {
        self.refs.head_path().is_file()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn lock_stage(&self) -> anyhow::Result<MutexGuard<'_, Stage>> {
        self.stage
            .lock()
            .map_err(|_| anyhow::anyhow!("stage lock poisoned"))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// The current branch's head commit id.
    pub fn head_commit_id(&self) -> anyhow::Result<ObjectId> {
        let branch = self.refs.current_branch()?;

        self.refs
            .read_branch(&branch)?
            .with_context(|| format!("branch {branch} has no head commit"))
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(&self.head_commit_id()?)
    }

    /// Resolve a commit id given as any unambiguous prefix.
    ///
    /// Reports [`JotError::CommitNotFound`] when the prefix matches no
    /// stored commit or more than one.
    pub fn resolve_commit_id(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let well_formed = !prefix.is_empty()
            && prefix.len() <= crate::artifacts::objects::OBJECT_ID_LENGTH
            && prefix.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            anyhow::bail!(JotError::CommitNotFound);
        }

        let mut matches = self
            .database
            .find_commits_by_prefix(&prefix.to_lowercase())?;

        match matches.len() {
            1 => Ok(matches.remove(0)),
            _ => anyhow::bail!(JotError::CommitNotFound),
        }
    }
}
