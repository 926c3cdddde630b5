//! Blob object
//!
//! Blobs store file content. They contain only the raw file data, without
//! any metadata like the file name (names live in commit snapshots). Two
//! files with identical content share a single blob.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Blob object representing file content
///
/// Blobs are the fundamental unit of file storage. Each unique file content
/// is stored as one blob, identified by its SHA-1 hash.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// File content as a string
    content: String,
}

impl Blob {
    /// Get the file content as a string
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        content_bytes.write_all(self.content.as_bytes())?;

        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_hashes_identically() {
        let first = Blob::new("This is a wug.".to_string());
        let second = Blob::new("This is a wug.".to_string());

        pretty_assertions::assert_eq!(
            first.object_id().unwrap(),
            second.object_id().unwrap()
        );
    }

    #[test]
    fn different_content_hashes_differently() {
        let first = Blob::new("This is a wug.".to_string());
        let second = Blob::new("This is not a wug.".to_string());

        assert_ne!(first.object_id().unwrap(), second.object_id().unwrap());
    }

    #[test]
    fn serialized_form_carries_type_and_size_header() {
        let blob = Blob::new("one".to_string());
        let bytes = blob.serialize().unwrap();

        assert!(bytes.starts_with(b"blob 3\0"));
        assert!(bytes.ends_with(b"one"));
    }
}
