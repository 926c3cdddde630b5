//! Staging area
//!
//! The stage records the pending changes for the next commit: additions
//! (file name to blob id) and removals (a set of file names). A name never
//! appears on both sides at once. The whole stage is persisted to one
//! checksummed file and read back wholesale on load.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::stage::checksum::Checksum;
use crate::artifacts::stage::stage_entry::{
    ENTRY_BLOCK, ENTRY_MIN_SIZE, PendingChange, StageEntry,
};
use crate::artifacts::stage::stage_header::StageHeader;
use crate::artifacts::stage::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::anyhow;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::Path;

/// Staging area
///
/// Tracks the pending additions and removals for the next commit.
/// Persisted to disk with a checksummed trailer for integrity verification.
#[derive(Debug, Clone)]
pub struct Stage {
    /// Path to the stage file (`.jot/stage`)
    path: Box<Path>,
    /// Pending additions: file name to the blob id its content was stored under
    additions: BTreeMap<String, ObjectId>,
    /// Pending removals
    removals: BTreeSet<String>,
    header: StageHeader,
}

impl Stage {
    pub fn new(path: Box<Path>) -> Self {
        Stage {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            header: StageHeader::empty(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<String, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<String> {
        &self.removals
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn is_staged_for_removal(&self, name: &str) -> bool {
        self.removals.contains(name)
    }

    pub fn staged_blob(&self, name: &str) -> Option<&ObjectId> {
        self.additions.get(name)
    }

    /// Stage an addition.
    ///
    /// A pending removal of the same name is cancelled instead. Staging a
    /// blob identical to what HEAD already tracks for the name empties that
    /// slot rather than recording a no-op addition.
    pub fn stage_addition(&mut self, name: &str, blob_id: ObjectId, head_blob: Option<&ObjectId>) {
        if self.removals.remove(name) {
            return;
        }

        if head_blob == Some(&blob_id) {
            self.additions.remove(name);
            return;
        }

        self.additions.insert(name.to_string(), blob_id);
    }

    /// Stage a removal. Only meaningful for names tracked by HEAD; the
    /// caller enforces that precondition.
    pub fn stage_removal(&mut self, name: &str) {
        self.additions.remove(name);
        self.removals.insert(name.to_string());
    }

    /// Drop a pending addition without staging anything else.
    pub fn unstage(&mut self, name: &str) {
        self.additions.remove(name);
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.header = StageHeader::empty();
    }

    /// The snapshot the next commit gets: the parent snapshot with the
    /// pending additions applied over it and the pending removals deleted.
    pub fn apply_to(
        &self,
        mut snapshot: BTreeMap<String, ObjectId>,
    ) -> BTreeMap<String, ObjectId> {
        for (name, blob_id) in &self.additions {
            snapshot.insert(name.clone(), blob_id.clone());
        }
        for name in &self.removals {
            snapshot.remove(name);
        }

        snapshot
    }

    /// Load the stage from disk, verifying the checksum trailer. A missing
    /// or empty stage file loads as an empty stage.
    ///
    /// Acquires a shared lock on the stage file while reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path().exists() {
            self.reset_in_memory();
            std::fs::File::create(self.path())?;
        }

        let mut stage_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut stage_file, file_guard::Lock::Shared, 0, 1)?;

        self.reset_in_memory();

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = self.parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;

        reader.verify()
    }

    /// Persist the stage wholesale: header, entries, checksum trailer.
    ///
    /// Acquires an exclusive lock on the stage file while writing.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut stage_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.path())?;
        let lock = file_guard::lock(&mut stage_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut writer = Checksum::new(lock);

        self.header = StageHeader::new(
            String::from(SIGNATURE),
            VERSION,
            (self.additions.len() + self.removals.len()) as u32,
        );
        let header_bytes = self.header.serialize()?;
        writer.write(&header_bytes)?;

        for entry in self.entries() {
            let entry_bytes = entry.serialize()?;
            writer.write(&entry_bytes)?;
        }

        writer.write_checksum()?;

        Ok(())
    }

    fn entries(&self) -> impl Iterator<Item = StageEntry> + '_ {
        let additions = self
            .additions
            .iter()
            .map(|(name, oid)| StageEntry::new(name.clone(), PendingChange::Addition(oid.clone())));
        let removals = self
            .removals
            .iter()
            .map(|name| StageEntry::new(name.clone(), PendingChange::Removal));

        additions.chain(removals)
    }

    fn reset_in_memory(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.header = StageHeader::empty();
    }

    fn parse_header(&self, reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header_reader = std::io::Cursor::new(header_bytes);
        let header = StageHeader::deserialize(header_reader)?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid stage file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!("Unsupported stage file version: {}", header.version));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> anyhow::Result<()> {
        for _ in 0..entries_count {
            let entry_bytes = reader.read(ENTRY_MIN_SIZE)?;
            let mut entry_bytes = entry_bytes.to_vec();

            while entry_bytes[entry_bytes.len() - 1] != 0 {
                entry_bytes = [entry_bytes, reader.read(ENTRY_BLOCK)?.to_vec()].concat();
            }

            let entry_bytes = Bytes::from(entry_bytes);
            let entry_reader = std::io::Cursor::new(entry_bytes);
            let entry = StageEntry::deserialize(entry_reader)?;

            match entry.change {
                PendingChange::Addition(oid) => {
                    self.additions.insert(entry.name, oid);
                }
                PendingChange::Removal => {
                    self.removals.insert(entry.name);
                }
            }
        }

        self.header.entries_count = entries_count;

        Ok(())
    }
}
