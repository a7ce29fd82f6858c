//! File and directory entries.
//!
//! Entries are plain path values plus a back-reference to their filesystem.
//! They cache nothing: every navigation or I/O call goes to the host again.

use crate::commands;
use crate::error::{VfsError, VfsResult};
use crate::filesystem::FileSystem;
use crate::path;
use crate::reply::HostReply;
use crate::writer::FileWriter;
use bridge_core::BridgeError;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Options for [`DirectoryEntry::get_file`] and
/// [`DirectoryEntry::get_directory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    /// Return the entry without asking the host; the file is created by the
    /// first write.
    pub create: bool,
    /// Accepted, not enforced.
    pub exclusive: bool,
}

impl GetOptions {
    pub fn create() -> Self {
        Self {
            create: true,
            exclusive: false,
        }
    }
}

/// Either kind of entry.
#[derive(Debug, Clone)]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => f.name(),
            Self::Directory(d) => d.name(),
        }
    }

    pub fn full_path(&self) -> &str {
        match self {
            Self::File(f) => f.full_path(),
            Self::Directory(d) => d.full_path(),
        }
    }

    pub fn into_file(self) -> Option<FileEntry> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<DirectoryEntry> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }
}

/// Contents of a file as returned by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContents {
    pub name: String,
    pub full_path: String,
    /// Raw content, usually a string
    pub data: Value,
}

impl FileContents {
    /// Content as text, if the host sent a string.
    pub fn text(&self) -> Option<&str> {
        self.data.as_str()
    }
}

/// A file in a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct FileEntry {
    name: String,
    full_path: String,
    filesystem: FileSystem,
}

impl FileEntry {
    pub(crate) fn new(path: &str, filesystem: FileSystem) -> Self {
        Self {
            name: path::file_name(path),
            full_path: path::file_path(path),
            filesystem,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn filesystem(&self) -> &FileSystem {
        &self.filesystem
    }

    /// Read the whole file.
    pub async fn read(&self) -> VfsResult<FileContents> {
        debug!(path = %self.full_path, "Reading file");
        let reply = self
            .filesystem
            .command(commands::FILE_READ, json!({ "path": self.full_path }))
            .await
            .map_err(|e| self.read_error(e))?;

        let reply = HostReply::from_value(&reply);
        if let Some(message) = reply.error() {
            error!(path = %self.full_path, error = message, "Read failed");
            return Err(VfsError::Read {
                code: reply.code.unwrap_or(crate::error::codes::NOT_FOUND_ERR),
                message: message.to_string(),
            });
        }

        Ok(FileContents {
            name: self.name.clone(),
            full_path: self.full_path.clone(),
            data: reply.data.unwrap_or(Value::Null),
        })
    }

    fn read_error(&self, err: BridgeError) -> VfsError {
        error!(path = %self.full_path, error = %err, "Read failed");
        match err {
            BridgeError::Host(message) => VfsError::Read {
                code: crate::error::codes::NOT_FOUND_ERR,
                message,
            },
            other => VfsError::Bridge(other),
        }
    }

    /// Writer replacing the whole file on each write.
    pub fn create_writer(&self) -> FileWriter {
        debug!(path = %self.full_path, "Creating writer");
        FileWriter::new(self.clone())
    }

    /// Delete the file.
    pub async fn remove(&self) -> VfsResult<()> {
        debug!(path = %self.full_path, "Removing file");
        remove_with(&self.filesystem, commands::FILE_DELETE, &self.full_path).await
    }
}

/// A directory in a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    name: String,
    full_path: String,
    filesystem: FileSystem,
}

impl DirectoryEntry {
    pub(crate) fn new(path: &str, filesystem: FileSystem) -> Self {
        Self {
            name: path::directory_name(path),
            full_path: path::directory_path(path),
            filesystem,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn filesystem(&self) -> &FileSystem {
        &self.filesystem
    }

    /// Look up a file in this directory.
    ///
    /// With `create` the entry comes back without contacting the host.
    /// Otherwise the host must report the file as existing.
    pub async fn get_file(&self, name: &str, options: GetOptions) -> VfsResult<FileEntry> {
        let entry = FileEntry::new(&path::join(&self.full_path, name), self.filesystem.clone());
        debug!(path = %entry.full_path(), create = options.create, "Getting file");
        if !options.create {
            self.filesystem.ensure_exists(&entry).await?;
        }
        Ok(entry)
    }

    /// Subdirectory entry. Never verified with the host.
    pub fn get_directory(&self, name: &str, options: GetOptions) -> DirectoryEntry {
        debug!(directory = %self.full_path, name, create = options.create, "Getting directory");
        DirectoryEntry::new(&path::join(&self.full_path, name), self.filesystem.clone())
    }

    /// Children of this directory. The host offers no listing, so this is
    /// always empty.
    pub fn list(&self) -> Vec<Entry> {
        Vec::new()
    }

    pub fn create_reader(&self) -> DirectoryReader {
        DirectoryReader {
            directory: self.clone(),
        }
    }

    /// Remove the directory and everything below it. The host decides what
    /// that means.
    pub async fn remove_recursively(&self) -> VfsResult<()> {
        debug!(path = %self.full_path, "Removing directory recursively");
        remove_with(&self.filesystem, commands::DIRECTORY_REMOVE, &self.full_path).await
    }
}

/// Reader over a directory's children.
#[derive(Debug, Clone)]
pub struct DirectoryReader {
    directory: DirectoryEntry,
}

impl DirectoryReader {
    pub fn read_entries(&self) -> Vec<Entry> {
        self.directory.list()
    }
}

async fn remove_with(filesystem: &FileSystem, command: &str, full_path: &str) -> VfsResult<()> {
    let reply = filesystem
        .command(command, json!({ "path": full_path }))
        .await
        .map_err(|e| VfsError::Remove(e.to_string()))?;

    match HostReply::from_value(&reply).error() {
        Some(message) => {
            error!(path = full_path, command, error = message, "Remove failed");
            Err(VfsError::Remove(message.to_string()))
        }
        None => Ok(()),
    }
}
