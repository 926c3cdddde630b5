//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings representing SHA-1 hashes.
//! They uniquely identify all objects in the store (blobs and commits).
//!
//! ## Storage
//!
//! Objects are stored in `.jot/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use std::io;
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
///
/// A 40-character hexadecimal string that uniquely identifies an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_lowercase()))
    }

    /// Write the object ID in binary format (20 bytes)
    ///
    /// Used when serializing staging area entries.
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let hex40 = self.as_ref();

        // Process a nibble at a time
        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "Invalid hex digit"))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    ///
    /// Used when deserializing staging area entries.
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        let mut buffer = [0; 1];

        for _ in 0..(OBJECT_ID_LENGTH / 2) {
            reader.read_exact(&mut buffer)?;
            let hex_pair = &format!("{:02x}", u8::from_be_bytes(buffer));
            hex40.push_str(hex_pair);
        }

        Self::try_parse(hex40)
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Get abbreviated form of the object ID (first 7 characters)
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn accepts_any_40_char_hex_string(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            prop_assert_eq!(oid.as_ref(), id);
        }

        #[test]
        fn rejects_wrong_lengths(id in "[0-9a-f]{0,39}") {
            prop_assert!(ObjectId::try_parse(id).is_err());
        }

        #[test]
        fn round_trips_through_binary_form(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id).unwrap();
            let mut buffer = Vec::new();
            oid.write_h40_to(&mut buffer).unwrap();
            prop_assert_eq!(buffer.len(), 20);

            let mut reader = std::io::Cursor::new(buffer);
            let parsed = ObjectId::read_h40_from(&mut reader).unwrap();
            prop_assert_eq!(parsed, oid);
        }
    }

    #[test]
    fn rejects_non_hex_characters() {
        let id = "zz".repeat(20);
        assert!(ObjectId::try_parse(id).is_err());
    }

    #[test]
    fn sharded_path_splits_after_two_chars() {
        let oid = ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string())
            .unwrap();
        assert_eq!(
            oid.to_path(),
            PathBuf::from("01").join("23456789abcdef0123456789abcdef01234567")
        );
    }
}
