//! Stage entry representation
//!
//! Each entry records one pending change: a file staged for addition
//! (name plus the blob id its content was stored under) or a file staged
//! for removal (name only).
//!
//! ## Entry Format
//!
//! Entries are stored in a binary format with 8-byte alignment:
//! kind (4 bytes), blob id (20 bytes, zeroed for removals), then the
//! null-terminated file name padded out to the alignment block.

use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Minimum size of a stage entry in bytes
pub const ENTRY_MIN_SIZE: usize = 32;

const KIND_ADDITION: u32 = 1;
const KIND_REMOVAL: u32 = 2;

/// The change an entry stages for the next commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    /// Stage the file's content (stored under the given blob id)
    Addition(ObjectId),
    /// Drop the file from the next snapshot
    Removal,
}

/// One staged file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StageEntry {
    /// File name (the namespace is flat, so this is a plain name)
    pub name: String,
    /// What the entry stages
    pub change: PendingChange,
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut entry_bytes = Vec::new();

        match &self.change {
            PendingChange::Addition(oid) => {
                entry_bytes.write_u32::<byteorder::NetworkEndian>(KIND_ADDITION)?;
                oid.write_h40_to(&mut entry_bytes)?;
            }
            PendingChange::Removal => {
                entry_bytes.write_u32::<byteorder::NetworkEndian>(KIND_REMOVAL)?;
                entry_bytes.write_all(&[0u8; 20])?;
            }
        }
        entry_bytes.write_all(self.name.as_bytes())?;

        // Pad to ENTRY_BLOCK size with at least one terminating null byte
        entry_bytes.push(0);
        while entry_bytes.len() % ENTRY_BLOCK != 0 {
            entry_bytes.push(0);
        }

        Ok(Bytes::from(entry_bytes))
    }
}

impl Unpackable for StageEntry {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let bytes = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        if bytes.len() < ENTRY_MIN_SIZE {
            return Err(anyhow::anyhow!("Invalid stage entry size"));
        }

        let kind = byteorder::NetworkEndian::read_u32(&bytes[0..4]);
        let mut oid_bytes = std::io::Cursor::new(&bytes[4..24]);
        let oid = ObjectId::read_h40_from(&mut oid_bytes)?;

        // Extract the entry name, which is null-terminated
        let name_end = bytes[24..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| anyhow::anyhow!("Missing null terminator in entry name"))?;
        let name_bytes = &bytes[24..24 + name_end];
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in entry name"))?
            .to_string();

        let change = match kind {
            KIND_ADDITION => PendingChange::Addition(oid),
            KIND_REMOVAL => PendingChange::Removal,
            other => return Err(anyhow::anyhow!("Invalid stage entry kind: {other}")),
        };

        Ok(StageEntry { name, change })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sha1::Digest;

    fn oid() -> ObjectId {
        let mut hasher = sha1::Sha1::new();
        hasher.update("test data");
        ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap()
    }

    #[rstest]
    #[case::short_name("a.txt")]
    #[case::name_filling_one_block("7chars!")]
    #[case::name_spilling_into_next_block("a much longer file name.txt")]
    fn addition_entries_round_trip(#[case] name: &str) {
        let entry = StageEntry::new(name.to_string(), PendingChange::Addition(oid()));

        let bytes = entry.serialize().unwrap();
        assert_eq!(bytes.len() % ENTRY_BLOCK, 0);
        assert!(bytes.len() >= ENTRY_MIN_SIZE);

        let parsed = StageEntry::deserialize(std::io::Cursor::new(bytes)).unwrap();
        pretty_assertions::assert_eq!(parsed, entry);
    }

    #[rstest]
    fn removal_entries_round_trip() {
        let entry = StageEntry::new("doomed.txt".to_string(), PendingChange::Removal);

        let bytes = entry.serialize().unwrap();
        let parsed = StageEntry::deserialize(std::io::Cursor::new(bytes)).unwrap();

        pretty_assertions::assert_eq!(parsed, entry);
    }

    #[rstest]
    fn rejects_unknown_entry_kind() {
        let entry = StageEntry::new("a.txt".to_string(), PendingChange::Removal);
        let mut bytes = entry.serialize().unwrap().to_vec();
        bytes[3] = 9;

        assert!(StageEntry::deserialize(std::io::Cursor::new(bytes)).is_err());
    }
}
