//! Staging area file format
//!
//! The staging area records the pending changes for the next commit:
//! additions (file name plus blob id) and removals (file name). It is
//! persisted wholesale to `.jot/stage` and read back wholesale on load.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "JSTG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Each entry padded to 8-byte alignment
//!   - Kind (addition or removal), blob id, file name
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod stage_entry;
pub mod stage_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of stage file header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying stage files
pub const SIGNATURE: &str = "JSTG";

/// Stage file format version
pub const VERSION: u32 = 1;
