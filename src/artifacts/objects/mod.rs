//! Object types and operations
//!
//! All repository content is stored as objects identified by SHA-1 hashes.
//! There are two object types:
//!
//! - **Blob**: file content (raw bytes)
//! - **Commit**: a snapshot with metadata (message, timestamp, parent ids,
//!   file name to blob id map)
//!
//! All objects implement serialization/deserialization for the object format:
//! `<type> <size>\0<content>`

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
