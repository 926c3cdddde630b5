//! Content-addressed object database
//!
//! All blobs and commits live under `objects/`, sharded by the first two
//! hex digits of their SHA-1 id. Object files are zlib-compressed and
//! write-once: storing the same content twice is a no-op, and nothing is
//! ever deleted. Every read recomputes the digest of the decompressed
//! bytes and refuses to return an object whose content no longer matches
//! its id.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Serialize, hash, and persist an object, returning its id. The write
    /// is skipped when the object file already exists.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = Self::hash(&object_content)?;
        let object_path = self.path.join(object_id.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object_content)?;
        }

        Ok(object_id)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader),
            other => anyhow::bail!("Object {object_id} is a {other}, not a commit"),
        }
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            other => anyhow::bail!("Object {object_id} is a {other}, not a blob"),
        }
    }

    /// A commit reduced to what graph traversals need (id plus parents).
    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        let commit = self.load_commit(object_id)?;

        Ok(SlimCommit {
            oid: object_id.clone(),
            parents: commit.parents().to_vec(),
        })
    }

    /// Every commit in the store, in directory scan order.
    pub fn all_commits(&self) -> anyhow::Result<Vec<(ObjectId, Commit)>> {
        let mut commits = Vec::new();

        for object_id in self.list_object_ids()? {
            let (object_type, object_reader) = self.parse_object_as_bytes(&object_id)?;
            if object_type == ObjectType::Commit {
                commits.push((object_id, Commit::deserialize(object_reader)?));
            }
        }

        Ok(commits)
    }

    /// Resolve an abbreviated id to every stored *commit* it prefixes.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let mut matches = Vec::new();

        for object_id in self.find_objects_by_prefix(prefix)? {
            let (object_type, _) = self.parse_object_as_bytes(&object_id)?;
            if object_type == ObjectType::Commit {
                matches.push(object_id);
            }
        }

        Ok(matches)
    }

    /// Find all objects whose id starts with the given prefix.
    ///
    /// For prefixes of 2+ characters only the matching shard directory is
    /// scanned; shorter prefixes fall back to a full scan.
    fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];

            Ok(self
                .list_object_ids_in_shard(dir_name)?
                .into_iter()
                .filter(|oid| oid.as_ref()[2..].starts_with(file_prefix))
                .collect())
        } else {
            Ok(self
                .list_object_ids()?
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(prefix))
                .collect())
        }
    }

    fn list_object_ids(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut object_ids = Vec::new();

        for i in 0..=255 {
            object_ids.extend(self.list_object_ids_in_shard(&format!("{i:02x}"))?);
        }

        Ok(object_ids)
    }

    fn list_object_ids_in_shard(&self, dir_name: &str) -> anyhow::Result<Vec<ObjectId>> {
        let dir_path = self.path.join(dir_name);
        let mut object_ids = Vec::new();

        if dir_path.is_dir() {
            for entry in std::fs::read_dir(&dir_path)? {
                let file_name = entry?.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                if let Ok(oid) = ObjectId::try_parse(full_oid) {
                    object_ids.push(oid);
                }
            }
        }

        Ok(object_ids)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead + use<>)> {
        let object_content = self.read_object(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        let object_content = Self::decompress(object_content.into())?;

        // integrity check: a stored object must still hash to its id
        let actual_id = Self::hash(&object_content)?;
        if &actual_id != object_id {
            anyhow::bail!("Object {object_id} is corrupt: content hashes to {actual_id}");
        }

        Ok(object_content)
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn hash(content: &Bytes) -> anyhow::Result<ObjectId> {
        let mut hasher = Sha1::new();
        hasher.update(content);

        ObjectId::try_parse(format!("{:x}", hasher.finalize()))
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
