//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Content-addressed object store for blobs and commits
//! - `stage`: Staging area tracking pending additions and removals
//! - `refs`: Branch pointers and the symbolic HEAD reference
//! - `repository`: High-level repository operations and coordination
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod stage;
pub(crate) mod workspace;
