//! Commit object
//!
//! Commits represent snapshots of the tracked files at specific points in
//! time. They contain:
//! - A snapshot: flat map from file name to blob object ID
//! - Parent commit ID(s): one primary parent, plus a second parent for
//!   merge commits; the root commit has none
//! - Timestamp
//! - Commit message
//!
//! The commit's own ID is the SHA-1 of its serialized form, so message,
//! timestamp, snapshot, and parent ids all participate in the digest.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! entry <blob-sha> <file name>
//! parent <parent-sha>
//! timestamp <unix-seconds> <utc-offset>
//!
//! <commit message>
//! ```
//!
//! Snapshot entries serialize in name order, which keeps the digest a pure
//! function of the commit's content.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Message carried by the commit every repository starts from.
pub const ROOT_MESSAGE: &str = "initial commit";

/// Display offset used for commit timestamps, and the offset the pinned
/// root-commit timestamp is rendered in (`Wed Dec 31 16:00:00 1969 -0800`).
const ROOT_OFFSET_SECS: i32 = -8 * 3600;

/// The fixed offset commit timestamps display in.
pub fn display_offset() -> anyhow::Result<chrono::FixedOffset> {
    chrono::FixedOffset::east_opt(ROOT_OFFSET_SECS).context("Invalid display offset")
}

/// The fixed timestamp of every root commit: the Unix epoch.
///
/// Pinning the root timestamp (together with the empty snapshot and fixed
/// message) makes every repository's root commit hash identically.
pub fn root_timestamp() -> anyhow::Result<chrono::DateTime<chrono::FixedOffset>> {
    let epoch =
        chrono::DateTime::from_timestamp(0, 0).context("Invalid root timestamp")?;

    Ok(epoch.with_timezone(&display_offset()?))
}

fn parse_utc_offset(value: &str) -> anyhow::Result<chrono::FixedOffset> {
    // Format: +HHMM or -HHMM, as produced by chrono's %z
    anyhow::ensure!(value.len() == 5, "Invalid timezone offset: {value}");

    let (sign, digits) = value.split_at(1);
    let hours: i32 = digits[0..2]
        .parse()
        .with_context(|| format!("Invalid timezone offset: {value}"))?;
    let minutes: i32 = digits[2..4]
        .parse()
        .with_context(|| format!("Invalid timezone offset: {value}"))?;
    let seconds = (hours * 60 + minutes) * 60;

    match sign {
        "+" => chrono::FixedOffset::east_opt(seconds),
        "-" => chrono::FixedOffset::west_opt(seconds),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("Invalid timezone offset: {value}"))
}

/// Slim representation of a commit
///
/// Carries only what graph traversals need: the commit's identity and its
/// parent links. The snapshot stays unloaded.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// The commit's parent object IDs (primary first)
    pub parents: Vec<ObjectId>,
}

/// Commit object
///
/// An immutable record of a snapshot plus its place in history. Loaded
/// commits compare equal to their originals; re-serializing a loaded commit
/// reproduces its ID.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root commit, two for merge commits)
    parents: Vec<ObjectId>,
    /// File name to blob ID map
    snapshot: BTreeMap<String, ObjectId>,
    /// Commit timestamp with display offset
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    /// Commit message
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        snapshot: BTreeMap<String, ObjectId>,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            snapshot,
            timestamp,
            message,
        }
    }

    /// The commit every repository starts from: no parents, empty snapshot,
    /// pinned message and timestamp.
    pub fn root() -> anyhow::Result<Self> {
        Ok(Commit::new(
            Vec::new(),
            BTreeMap::new(),
            root_timestamp()?,
            String::from(ROOT_MESSAGE),
        ))
    }

    /// Get the full commit message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    /// Format the timestamp in the log form, e.g.
    /// `Wed Dec 31 16:00:00 1969 -0800`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    /// The primary parent, absent only for the root commit
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// The second parent a merge commit carries
    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn snapshot(&self) -> &BTreeMap<String, ObjectId> {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> BTreeMap<String, ObjectId> {
        self.snapshot
    }

    /// The blob ID recorded for `name`, if this commit tracks it
    pub fn blob_id(&self, name: &str) -> Option<&ObjectId> {
        self.snapshot.get(name)
    }

    pub fn tracks(&self, name: &str) -> bool {
        self.snapshot.contains_key(name)
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        for (name, blob_oid) in &self.snapshot {
            object_content.push(format!("entry {} {}", blob_oid.as_ref(), name));
        }
        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        let mut content_bytes = Vec::new();
        content_bytes.write_all(object_content.as_bytes())?;

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let mut snapshot = BTreeMap::new();
        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?;

        while let Some(entry) = next_line.strip_prefix("entry ") {
            // Fixed-width oid comes first so names may contain spaces
            anyhow::ensure!(
                entry.len() > OBJECT_ID_LENGTH + 1,
                "Invalid commit object: malformed snapshot entry"
            );
            let (oid, name) = entry.split_at(OBJECT_ID_LENGTH);
            let blob_oid = ObjectId::try_parse(oid.to_string())?;
            snapshot.insert(name[1..].to_string(), blob_oid);

            next_line = lines
                .next()
                .context("Invalid commit object: missing timestamp line")?;
        }

        let mut parents = Vec::new();
        while let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent_oid.to_string())?);

            next_line = lines
                .next()
                .context("Invalid commit object: missing timestamp line")?;
        }

        let timestamp_parts = next_line
            .strip_prefix("timestamp ")
            .context("Invalid commit object: invalid timestamp line")?;
        let (seconds, offset) = timestamp_parts
            .split_once(' ')
            .context("Invalid commit object: invalid timestamp line")?;
        let seconds: i64 = seconds
            .parse()
            .context("Invalid commit object: invalid timestamp")?;
        let offset = parse_utc_offset(offset)?;
        let timestamp = chrono::DateTime::from_timestamp(seconds, 0)
            .context("Invalid commit object: invalid timestamp")?
            .with_timezone(&offset);

        // skip the empty line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, snapshot, timestamp, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        for (name, blob_oid) in &self.snapshot {
            lines.push(format!("entry {} {}", blob_oid.as_ref(), name));
        }
        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("timestamp {}", self.readable_timestamp()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
