//! # Bridge VFS - Virtual Filesystem Over Host Commands
//!
//! A client-side model of files and directories. Storage and byte
//! operations are delegated to the host through five commands
//! (see [`commands`]); this crate only tracks paths.
//!
//! ## Resolution
//!
//! ```text
//! resolve(url)
//!   ├── ends with "/", empty, or last segment without "."  → DirectoryEntry (local)
//!   └── otherwise → fileExists ──▶ exists  → FileEntry
//!                               └─▶ absent → VfsError::NotFound (code 1)
//! ```
//!
//! Extensionless files look like directories to the heuristic. Use
//! [`FileSystem::resolve_file`] or [`FileSystem::resolve_directory`] when the
//! caller knows better.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod commands;
pub mod entry;
pub mod error;
pub mod filesystem;
pub mod path;
mod reply;
pub mod writer;

pub use entry::{DirectoryEntry, DirectoryReader, Entry, FileContents, FileEntry, GetOptions};
pub use error::{VfsError, VfsResult};
pub use filesystem::{request_file_system, FileSystem, FileSystemKind};
pub use path::DATA_DIRECTORY;
pub use writer::FileWriter;
